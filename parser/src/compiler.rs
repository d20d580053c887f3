use std::{collections::BTreeSet, fmt::Display};

use errors::CompileError;
use lexer::{Lexer, Token};
use span::{Span, Spanned, NO_SPAN};
use tracing::{debug, trace};

use crate::{
    emitter::{Emitter, Fragment, Op, Program},
    expr::{compile_expr, variable, Expr},
    CompileOptions,
};

/// Names referenced by a template
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Vars {
    /// Every name referenced, loop targets and filters included
    pub all: BTreeSet<String>,
    /// Names bound by `for` tags
    pub loops: BTreeSet<String>,
}

impl Vars {
    /// Names the prologue has to bind from the context
    pub fn free(&self) -> impl Iterator<Item = &String> {
        self.all.difference(&self.loops)
    }
}

/// The result of compiling a template
#[derive(Debug, Clone, PartialEq)]
pub struct Compiled {
    pub program: Program,
    pub vars: Vars,
}

/// Compile template source in to a [Program]
///
/// The first pass validates every token and collects the referenced names.
/// The second pass emits the prologue binding the free names, then the body.
pub fn compile(source: &str, options: &CompileOptions) -> Result<Compiled, Spanned<CompileError>> {
    let tokens = Lexer::new(source)
        .strict(options.strict_delimiters)
        .tokenize()?;

    let (stmts, vars) = analyze(source, &tokens)?;
    let program = emit(stmts, &vars, options.indent_width);

    debug!(
        ops = program.len(),
        free = ?vars.free().collect::<Vec<_>>(),
        loops = ?vars.loops,
        "compiled template"
    );

    Ok(Compiled { program, vars })
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum BlockKind {
    If,
    For,
}

impl BlockKind {
    fn as_str(&self) -> &'static str {
        match self {
            BlockKind::If => "if",
            BlockKind::For => "for",
        }
    }
}

impl Display for BlockKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A validated token
#[derive(Debug, Clone, PartialEq)]
enum Stmt {
    Text(String),
    Print(Expr),
    If(Expr),
    For { var: String, iter: Expr },
    End,
}

fn analyze(
    source: &str,
    tokens: &[Spanned<Token>],
) -> Result<(Vec<Spanned<Stmt>>, Vars), Spanned<CompileError>> {
    let mut vars = Vars::default();
    let mut ops_stack: Vec<(BlockKind, Span)> = vec![];
    let mut stmts: Vec<Spanned<Stmt>> = vec![];

    for (token, span) in tokens {
        let fragment = span::slice(source, span);
        let at = |err: CompileError| (err, span.clone());

        match token {
            Token::Comment(_) => continue,
            Token::Text(text) => stmts.push((Stmt::Text(text.clone()), span.clone())),
            Token::Expr(expr) => {
                let expr = compile_expr(expr, &mut vars.all).map_err(at)?;
                stmts.push((Stmt::Print(expr), span.clone()));
            }
            Token::Tag(body) => {
                let words: Vec<&str> = body.split_whitespace().collect();

                trace!(tag = %body, "dispatching tag");

                match words.as_slice() {
                    ["if", rest @ ..] => {
                        let [cond] = rest else {
                            return Err(at(CompileError::InvalidIfSyntax(fragment.to_string())));
                        };

                        ops_stack.push((BlockKind::If, span.clone()));
                        let cond = compile_expr(cond, &mut vars.all).map_err(at)?;
                        stmts.push((Stmt::If(cond), span.clone()));
                    }
                    ["for", rest @ ..] => {
                        let [var, "in", iter] = rest else {
                            return Err(at(CompileError::InvalidForSyntax(fragment.to_string())));
                        };

                        ops_stack.push((BlockKind::For, span.clone()));
                        variable(var, &mut vars.loops).map_err(at)?;
                        vars.all.insert(var.to_string());
                        let iter = compile_expr(iter, &mut vars.all).map_err(at)?;
                        stmts.push((
                            Stmt::For {
                                var: var.to_string(),
                                iter,
                            },
                            span.clone(),
                        ));
                    }
                    [word, rest @ ..] if word.starts_with("end") => {
                        if !rest.is_empty() {
                            return Err(at(CompileError::InvalidEndSyntax(fragment.to_string())));
                        }

                        let end = &word[3..];

                        let Some((start, _)) = ops_stack.pop() else {
                            return Err(at(CompileError::NoOpeningTag(fragment.to_string())));
                        };

                        if start.as_str() != end {
                            return Err(at(CompileError::MismatchedEndTag {
                                expected: start.to_string(),
                                found: end.to_string(),
                            }));
                        }

                        stmts.push((Stmt::End, span.clone()));
                    }
                    _ => return Err(at(CompileError::InvalidTag(fragment.to_string()))),
                }
            }
        }
    }

    if let Some((kind, span)) = ops_stack.pop() {
        return Err((
            CompileError::UnclosedTag {
                kind: kind.to_string(),
                tag: span::slice(source, &span).to_string(),
            },
            span,
        ));
    }

    Ok((stmts, vars))
}

/// Output fragments waiting to be flushed as a single op
#[derive(Default)]
struct OutputBuffer {
    fragments: Vec<Fragment>,
    span: Option<Span>,
}

impl OutputBuffer {
    fn push(&mut self, fragment: Fragment, span: &Span) {
        self.fragments.push(fragment);
        self.span = Some(match self.span.take() {
            Some(current) => current.start..span.end,
            None => span.clone(),
        });
    }

    fn flush(&mut self, code: &mut Emitter) {
        if self.fragments.is_empty() {
            return;
        }

        let span = self.span.take().unwrap_or(NO_SPAN);
        code.emit(Op::Output(std::mem::take(&mut self.fragments)), span);
    }
}

fn emit(stmts: Vec<Spanned<Stmt>>, vars: &Vars, indent_width: usize) -> Program {
    let mut code = Emitter::new(indent_width);

    for name in vars.free() {
        code.emit(Op::Bind(name.clone()), NO_SPAN);
    }

    let mut buffer = OutputBuffer::default();

    for (stmt, span) in stmts {
        match stmt {
            Stmt::Text(text) => buffer.push(Fragment::Text(text), &span),
            Stmt::Print(expr) => buffer.push(Fragment::Expr(expr), &span),
            Stmt::If(cond) => {
                buffer.flush(&mut code);
                code.begin(Op::If { cond, end: 0 }, span);
            }
            Stmt::For { var, iter } => {
                buffer.flush(&mut code);
                code.begin(Op::For { var, iter, end: 0 }, span);
            }
            Stmt::End => {
                buffer.flush(&mut code);
                code.end(span);
            }
        }
    }

    buffer.flush(&mut code);

    code.finish()
}
