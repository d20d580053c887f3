//! A minimal text templating compiler
//!
//! ```text
//! {{ expr }}                               - output
//! {% if expr %}...{% endif %}              - conditional
//! {% for var in expr %}...{% endfor %}     - loop
//! {# ... #}                                - comment
//! expr := name ('.' member)* ('|' filter)*
//! ```
//!
//! Templates compile once in to a [Program] and render many times.

pub use diagnostics;
pub use errors;
pub use errors::{CompileError, ConfigError, ContextError, RenderError, StencilError};
pub use parser::{CompileOptions, Expr, Fragment, Op, Program};
pub use resolve::resolve;
pub use span;
pub use template::Template;
pub use types;
pub use types::{Context, Func, Object, Value};

pub mod prelude;
mod renderer;
mod resolve;
mod template;
