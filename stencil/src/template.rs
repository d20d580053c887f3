use std::collections::BTreeSet;

use errors::{RenderError, StencilError};
use parser::{compile, CompileOptions, Compiled, Program, Vars};
use span::Spanned;
use tracing::{debug, trace};
use types::Context;

use crate::{renderer::Renderer, resolve::resolve};

/// A compiled template, rendered any number of times
///
/// ```
/// use stencil::{Context, Template};
///
/// let template = Template::new("Hello, {{ name }}!").unwrap();
/// let ctx = Context::new().with("name", "World");
///
/// assert_eq!("Hello, World!", template.render(Some(&ctx)).unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct Template {
    context: Context,
    program: Program,
    vars: Vars,
}

impl Template {
    /// Compile `text` with an empty base context
    pub fn new(text: &str) -> Result<Self, Spanned<StencilError>> {
        Self::with_options(text, std::iter::empty(), &CompileOptions::default())
    }

    /// Compile `text`, merging `contexts` in to the base context
    ///
    /// Later contexts override earlier ones.
    pub fn with_contexts<'a>(
        text: &str,
        contexts: impl IntoIterator<Item = &'a Context>,
    ) -> Result<Self, Spanned<StencilError>> {
        Self::with_options(text, contexts, &CompileOptions::default())
    }

    pub fn with_options<'a>(
        text: &str,
        contexts: impl IntoIterator<Item = &'a Context>,
        options: &CompileOptions,
    ) -> Result<Self, Spanned<StencilError>> {
        let context = Context::merged(contexts);

        let Compiled { program, vars } = compile(text, options).map_err(|(err, span)| {
            debug!(%err, ?span, "template failed to compile");
            (StencilError::from(err), span)
        })?;

        Ok(Self {
            context,
            program,
            vars,
        })
    }

    /// Render with the base context, overlaid with `ctx` if given
    pub fn render(&self, ctx: Option<&Context>) -> Result<String, RenderError> {
        let mut render_ctx = self.context.clone();

        if let Some(ctx) = ctx {
            render_ctx.merge(ctx);
        }

        trace!(names = render_ctx.len(), ops = self.program.len(), "rendering template");

        Renderer::new(&self.program, &render_ctx, resolve).render()
    }

    /// Every name the template references
    pub fn all_vars(&self) -> &BTreeSet<String> {
        &self.vars.all
    }

    /// Names bound by `for` tags
    pub fn loop_vars(&self) -> &BTreeSet<String> {
        &self.vars.loops
    }

    /// Names that must be present in the render context
    pub fn free_vars(&self) -> impl Iterator<Item = &String> {
        self.vars.free()
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    /// The merged base context
    pub fn context(&self) -> &Context {
        &self.context
    }
}
