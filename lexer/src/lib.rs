use std::sync::LazyLock;

use errors::CompileError;
use regex::{Match, Regex};
use span::{Span, Spanned};

/// Matches the three delimited forms, non-greedy and across lines
pub const DELIMITER_PATTERN: &str = r"(?s)\{\{.*?\}\}|\{%.*?%\}|\{#.*?#\}";

static DELIMITERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(DELIMITER_PATTERN).expect("delimiter pattern should compile"));

const OPENERS: [&str; 3] = ["{{", "{%", "{#"];

/// A piece of template source
///
/// Delimited tokens hold their trimmed body. The span of a token always
/// covers the full source text, delimiters included.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Literal text, kept verbatim
    Text(String),
    /// `{{ expr }}`
    Expr(String),
    /// `{% tag %}`
    Tag(String),
    /// `{# comment #}`
    Comment(String),
}

pub struct Lexer<'input> {
    input: &'input str,
    pos: usize,
    strict: bool,
    pending: Option<Spanned<Token>>,
}

impl<'input> Lexer<'input> {
    pub fn new(input: &'input str) -> Self {
        Self {
            input,
            pos: 0,
            strict: false,
            pending: None,
        }
    }

    /// Reject literal text containing an opening delimiter with no closing one
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Collect every token, stopping at the first error
    pub fn tokenize(self) -> Result<Vec<Spanned<Token>>, Spanned<CompileError>> {
        self.collect()
    }

    fn text(&self, span: Span) -> Result<Spanned<Token>, Spanned<CompileError>> {
        let text = &self.input[span.clone()];

        if self.strict {
            let opener = OPENERS.iter().filter_map(|o| text.find(o)).min();

            if let Some(offset) = opener {
                let start = span.start + offset;

                return Err((
                    CompileError::UnterminatedDelimiter(self.input[start..span.end].to_string()),
                    start..span.end,
                ));
            }
        }

        Ok((Token::Text(text.to_string()), span))
    }

    fn delimited(m: Match) -> Spanned<Token> {
        let raw = m.as_str();
        let body = raw[2..raw.len() - 2].trim().to_string();

        let token = match &raw[..2] {
            "{{" => Token::Expr(body),
            "{%" => Token::Tag(body),
            _ => Token::Comment(body),
        };

        (token, m.range())
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Spanned<Token>, Spanned<CompileError>>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(token) = self.pending.take() {
            return Some(Ok(token));
        }

        if self.pos >= self.input.len() {
            return None;
        }

        let start = self.pos;

        let item = match DELIMITERS.find_at(self.input, start) {
            Some(m) if m.start() > start => {
                self.pending = Some(Self::delimited(m));
                self.pos = m.end();
                self.text(start..m.start())
            }
            Some(m) => {
                self.pos = m.end();
                Ok(Self::delimited(m))
            }
            None => {
                self.pos = self.input.len();
                self.text(start..self.input.len())
            }
        };

        if item.is_err() {
            self.pending = None;
            self.pos = self.input.len();
        }

        Some(item)
    }
}
