use codespan_reporting::{
    diagnostic::{Diagnostic, Label},
    files::SimpleFile,
    term::{self, termcolor::NoColor},
};
use errors::{CompileError, ConfigError, ContextError, RenderError, StencilError};
use serde::{Deserialize, Serialize};
use span::{Span, Spanned};
use str_idxpos::index_to_position;

/// Get a list of diagnostics from a list of errors
pub fn get_diagnostics(errs: &[Spanned<StencilError>], source: &str) -> Vec<Diagnosis> {
    errs.iter()
        .map(|(err, span)| Diagnosis {
            range: get_range(source, span),
            severity: Some(DiagnosisSeverity::ERROR),
            message: err.to_string(),
        })
        .collect()
}

/// Render an error against its template source as plain text
///
/// ```text
/// error[CompileError]: CompileError: invalid tag: "{% raw %}"
///   ┌─ page.html:1:3
///   │
/// 1 │ a {% raw %}
///   │   ^^^^^^^^^ invalid tag
/// ```
pub fn report(err: &Spanned<StencilError>, name: &str, source: &str) -> String {
    let (err, span) = err;

    let file = SimpleFile::new(name, source);
    let diagnostic = err.as_diagnostic(span);
    let mut writer = NoColor::new(Vec::new());

    match term::emit(&mut writer, &term::Config::default(), &file, &diagnostic) {
        Ok(()) => String::from_utf8_lossy(&writer.into_inner()).into_owned(),
        Err(_) => err.to_string(),
    }
}

fn get_range(source: &str, span: &Span) -> DiagnosisRange {
    DiagnosisRange {
        start: get_position(source, span.start),
        end: get_position(source, span.end),
    }
}

fn get_position(source: &str, idx: usize) -> DiagnosisPosition {
    let (line, character) = index_to_position(source, idx);

    DiagnosisPosition {
        line: line as u32,
        character: character as u32,
    }
}

#[derive(Debug, Eq, PartialEq, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnosis {
    pub range: DiagnosisRange,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<DiagnosisSeverity>,

    pub message: String,
}

#[derive(Debug, Eq, PartialEq, Ord, PartialOrd, Clone, Copy, Deserialize, Serialize)]
#[serde(transparent)]
pub struct DiagnosisSeverity(i32);
impl DiagnosisSeverity {
    pub const ERROR: DiagnosisSeverity = DiagnosisSeverity(1);
    pub const WARNING: DiagnosisSeverity = DiagnosisSeverity(2);
}

#[derive(Debug, Eq, PartialEq, Ord, PartialOrd, Copy, Clone, Default, Deserialize, Serialize)]
pub struct DiagnosisPosition {
    pub line: u32,
    pub character: u32,
}

impl DiagnosisPosition {
    pub fn new(line: u32, character: u32) -> DiagnosisPosition {
        DiagnosisPosition { line, character }
    }
}

#[derive(Debug, Eq, PartialEq, Copy, Clone, Default, Deserialize, Serialize)]
pub struct DiagnosisRange {
    /// The range's start position (inclusive)
    pub start: DiagnosisPosition,
    /// The range's end position (exclusive)
    pub end: DiagnosisPosition,
}

impl DiagnosisRange {
    pub fn new(start: DiagnosisPosition, end: DiagnosisPosition) -> DiagnosisRange {
        DiagnosisRange { start, end }
    }
}

trait AsDiagnostic {
    fn as_diagnostic(&self, span: &Span) -> Diagnostic<()>;
}

macro_rules! impl_as_diagnostic {
    ($($error:tt),+) => {$(
        impl AsDiagnostic for $error {
            fn as_diagnostic(&self, span: &Span) -> Diagnostic<()> {
                Diagnostic::error()
                    .with_code(stringify!($error))
                    .with_message(StencilError::from(self.clone()).to_string())
                    .with_labels(vec![Label::primary((), span.clone())])
            }
        }
    )+};
}

impl_as_diagnostic!(RenderError, ContextError, ConfigError);

impl AsDiagnostic for CompileError {
    fn as_diagnostic(&self, span: &Span) -> Diagnostic<()> {
        Diagnostic::error()
            .with_code("CompileError")
            .with_message(StencilError::from(self.clone()).to_string())
            .with_labels(vec![
                Label::primary((), span.clone()).with_message(self.message()),
            ])
    }
}

impl AsDiagnostic for StencilError {
    fn as_diagnostic(&self, span: &Span) -> Diagnostic<()> {
        match self {
            StencilError::CompileError(e) => e.as_diagnostic(span),
            StencilError::RenderError(e) => e.as_diagnostic(span),
            StencilError::ContextError(e) => e.as_diagnostic(span),
            StencilError::ConfigError(e) => e.as_diagnostic(span),
        }
    }
}
