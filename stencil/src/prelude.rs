pub use crate::resolve::resolve;
pub use crate::span::{Span, Spanned};
pub use crate::template::Template;
pub use crate::types::{Context, Func, Object, Value};
pub use crate::{CompileOptions, RenderError, StencilError};
