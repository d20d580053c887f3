use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Common error for compiling and rendering templates
#[derive(Debug, Clone, Error, PartialEq, Serialize, Deserialize)]
pub enum StencilError {
    #[error("CompileError: {0}")]
    CompileError(CompileError),
    #[error("RenderError: {0}")]
    RenderError(RenderError),
    #[error("ContextError: {0}")]
    ContextError(ContextError),
    #[error("ConfigError: {0}")]
    ConfigError(ConfigError),
}

/// Errors raised while turning template source into a program
///
/// Every variant carries the offending source fragment.
#[derive(Debug, Clone, Error, PartialEq, Serialize, Deserialize)]
pub enum CompileError {
    #[error("invalid variable name: {0:?}")]
    InvalidName(String),
    #[error("invalid syntax: if: {0:?}")]
    InvalidIfSyntax(String),
    #[error("invalid syntax: for: {0:?}")]
    InvalidForSyntax(String),
    #[error("invalid syntax: end: {0:?}")]
    InvalidEndSyntax(String),
    #[error("invalid tag: {0:?}")]
    InvalidTag(String),
    #[error("no opening tag for end: {0:?}")]
    NoOpeningTag(String),
    #[error("mismatched end tag, expected end{expected}: {found:?}")]
    MismatchedEndTag { expected: String, found: String },
    #[error("unclosed tag, expected end{kind}: {tag:?}")]
    UnclosedTag { kind: String, tag: String },
    #[error("unterminated delimiter: {0:?}")]
    UnterminatedDelimiter(String),
}

impl CompileError {
    /// The error message without the offending fragment
    pub fn message(&self) -> String {
        match self {
            CompileError::InvalidName(_) => "invalid variable name".to_string(),
            CompileError::InvalidIfSyntax(_) => "invalid syntax: if".to_string(),
            CompileError::InvalidForSyntax(_) => "invalid syntax: for".to_string(),
            CompileError::InvalidEndSyntax(_) => "invalid syntax: end".to_string(),
            CompileError::InvalidTag(_) => "invalid tag".to_string(),
            CompileError::NoOpeningTag(_) => "no opening tag for end".to_string(),
            CompileError::MismatchedEndTag { expected, .. } => {
                format!("mismatched end tag, expected end{expected}")
            }
            CompileError::UnclosedTag { kind, .. } => format!("unclosed tag, expected end{kind}"),
            CompileError::UnterminatedDelimiter(_) => "unterminated delimiter".to_string(),
        }
    }

    /// The template text the error is about
    pub fn fragment(&self) -> &str {
        match self {
            CompileError::InvalidName(fragment)
            | CompileError::InvalidIfSyntax(fragment)
            | CompileError::InvalidForSyntax(fragment)
            | CompileError::InvalidEndSyntax(fragment)
            | CompileError::InvalidTag(fragment)
            | CompileError::NoOpeningTag(fragment)
            | CompileError::UnterminatedDelimiter(fragment) => fragment,
            CompileError::MismatchedEndTag { found, .. } => found,
            CompileError::UnclosedTag { tag, .. } => tag,
        }
    }
}

/// Errors raised while rendering a compiled template against a context
///
/// These describe data that does not satisfy the template, never the
/// template itself.
#[derive(Debug, Clone, Error, PartialEq, Serialize, Deserialize)]
pub enum RenderError {
    #[error("undefined variable: {0:?}")]
    UndefinedVariable(String),
    #[error("{kind} value has no attribute or key {name:?}")]
    LookupFailed { name: String, kind: String },
    #[error("{name:?} is not callable with one argument ({kind} value)")]
    NotCallable { name: String, kind: String },
    #[error("{name} takes {expected} argument(s) but {given} were given")]
    ArityMismatch {
        name: String,
        expected: usize,
        given: usize,
    },
    #[error("{0} value is not iterable")]
    NotIterable(String),
    #[error("{name} failed: {message}")]
    FunctionError { name: String, message: String },
}

/// Errors raised while building a context from host data
#[derive(Debug, Clone, Error, PartialEq, Serialize, Deserialize)]
pub enum ContextError {
    #[error("Context must serialize to a map, got {0}")]
    NotAMap(String),
    #[error("Context could not be serialized: {message}")]
    SerializationError { message: String },
}

/// Errors raised while loading compile options
#[derive(Debug, Clone, Error, PartialEq, Serialize, Deserialize)]
pub enum ConfigError {
    #[error("Options are invalid: {message}")]
    InvalidOptions { message: String },
}

macro_rules! impl_from_error {
    ($($error:tt),+) => {$(
        impl From<$error> for StencilError {
            fn from(e: $error) -> Self {
                StencilError::$error(e)
            }
        }
    )+};
}

impl_from_error!(CompileError, RenderError, ContextError, ConfigError);
