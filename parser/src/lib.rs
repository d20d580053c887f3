pub use compiler::{compile, Compiled, Vars};
pub use emitter::{Emitter, Fragment, Op, Program};
pub use expr::{compile_expr, Expr};
pub use options::CompileOptions;

mod compiler;
mod emitter;
mod expr;
mod options;

/// Names, members, and filters must match this pattern
pub const IDENTIFIER_PATTERN: &str = r"^[_a-zA-Z][_a-zA-Z0-9]*$";
