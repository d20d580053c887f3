use std::{collections::HashMap, ops::Range};

use errors::RenderError;
use parser::{Expr, Fragment, Op, Program};
use types::{Context, Value};

use crate::resolve::Resolver;

/// Interprets a [Program] against a single render context
///
/// The local scope holds names bound by the prologue and by `for` tags.
/// Expressions only ever read from the local scope.
pub(crate) struct Renderer<'a> {
    program: &'a Program,
    context: &'a Context,
    resolve: Resolver,
    scope: HashMap<String, Value>,
}

impl<'a> Renderer<'a> {
    pub fn new(program: &'a Program, context: &'a Context, resolve: Resolver) -> Self {
        Self {
            program,
            context,
            resolve,
            scope: HashMap::new(),
        }
    }

    pub fn render(mut self) -> Result<String, RenderError> {
        let mut out = String::new();

        self.exec(0..self.program.len(), &mut out)?;

        Ok(out)
    }

    fn exec(&mut self, ops: Range<usize>, out: &mut String) -> Result<(), RenderError> {
        let program = self.program;
        let mut pc = ops.start;

        while pc < ops.end {
            let (op, _) = &program.ops()[pc];

            match op {
                Op::Bind(name) => {
                    let value = self
                        .context
                        .get(name)
                        .cloned()
                        .ok_or_else(|| RenderError::UndefinedVariable(name.clone()))?;

                    self.scope.insert(name.clone(), value);
                    pc += 1;
                }
                Op::Output(fragments) => {
                    for fragment in fragments {
                        match fragment {
                            Fragment::Text(text) => out.push_str(text),
                            Fragment::Expr(expr) => out.push_str(&self.eval(expr)?.to_string()),
                        }
                    }
                    pc += 1;
                }
                Op::If { cond, end } => {
                    if self.eval(cond)?.is_truthy() {
                        self.exec(pc + 1..*end, out)?;
                    }
                    pc = end + 1;
                }
                Op::For { var, iter, end } => {
                    for item in self.eval(iter)?.iterate()? {
                        self.scope.insert(var.clone(), item);
                        self.exec(pc + 1..*end, out)?;
                    }
                    pc = end + 1;
                }
                Op::End => pc += 1,
            }
        }

        Ok(())
    }

    fn eval(&self, expr: &Expr) -> Result<Value, RenderError> {
        match expr {
            Expr::Var(name) => self.lookup(name),
            Expr::Dots { base, members } => (self.resolve)(self.eval(base)?, members),
            Expr::Filter { name, arg } => match self.lookup(name)? {
                Value::Func(func) if func.arity() == 1 => func.call(&[self.eval(arg)?]),
                other => Err(RenderError::NotCallable {
                    name: name.clone(),
                    kind: other.kind().to_string(),
                }),
            },
        }
    }

    fn lookup(&self, name: &str) -> Result<Value, RenderError> {
        self.scope
            .get(name)
            .cloned()
            .ok_or_else(|| RenderError::UndefinedVariable(name.to_string()))
    }
}
