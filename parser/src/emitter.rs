use std::fmt::{self, Display};

use span::{Span, Spanned};

use crate::Expr;

/// A piece of pending output
#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
    Text(String),
    Expr(Expr),
}

impl Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fragment::Text(text) => write!(f, "{text:?}"),
            Fragment::Expr(expr) => write!(f, "str({expr})"),
        }
    }
}

/// A single compiled instruction
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    /// Copy a name from the render context in to the local scope
    Bind(String),
    /// Append the fragments to the output, in order
    Output(Vec<Fragment>),
    /// Run the ops up to `end` when `cond` is truthy
    If { cond: Expr, end: usize },
    /// Run the ops up to `end` once per element of `iter`, binding `var`
    For { var: String, iter: Expr, end: usize },
    /// Closes the innermost `If` or `For`
    End,
}

/// Accumulates ops while tracking block nesting
///
/// Opening a block indents, closing it dedents and points the block header
/// at its matching [Op::End].
#[derive(Debug)]
pub struct Emitter {
    ops: Vec<Spanned<Op>>,
    open: Vec<usize>,
    indent_width: usize,
}

impl Emitter {
    pub fn new(indent_width: usize) -> Self {
        Self {
            ops: vec![],
            open: vec![],
            indent_width,
        }
    }

    /// Current indentation, in columns
    pub fn level(&self) -> usize {
        self.open.len() * self.indent_width
    }

    pub fn emit(&mut self, op: Op, span: Span) {
        self.ops.push((op, span));
    }

    /// Emit a block header and indent
    pub fn begin(&mut self, op: Op, span: Span) {
        self.open.push(self.ops.len());
        self.emit(op, span);
    }

    /// Close the innermost block and dedent
    pub fn end(&mut self, span: Span) {
        let end_index = self.ops.len();

        if let Some(start) = self.open.pop() {
            if let Some((Op::If { end, .. } | Op::For { end, .. }, _)) = self.ops.get_mut(start) {
                *end = end_index;
            }
        }

        self.emit(Op::End, span);
    }

    pub fn finish(self) -> Program {
        debug_assert!(self.open.is_empty(), "every block should be closed");

        Program {
            ops: self.ops,
            indent_width: self.indent_width,
        }
    }
}

/// A compiled template: a flat list of ops with resolved block ends
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    ops: Vec<Spanned<Op>>,
    indent_width: usize,
}

impl Program {
    pub fn ops(&self) -> &[Spanned<Op>] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

/// Indented listing of the program, one line per op
impl Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut level = 0usize;

        for (op, _) in &self.ops {
            let indent = " ".repeat(level * self.indent_width);

            match op {
                Op::Bind(name) => writeln!(f, "{indent}{name} = context[{name:?}]")?,
                Op::Output(fragments) => match fragments.as_slice() {
                    [fragment] => writeln!(f, "{indent}append({fragment})")?,
                    fragments => {
                        let fragments: Vec<String> =
                            fragments.iter().map(|x| x.to_string()).collect();
                        writeln!(f, "{indent}extend([{}])", fragments.join(", "))?
                    }
                },
                Op::If { cond, .. } => {
                    writeln!(f, "{indent}if {cond}:")?;
                    level += 1;
                }
                Op::For { var, iter, .. } => {
                    writeln!(f, "{indent}for {var} in {iter}:")?;
                    level += 1;
                }
                Op::End => level = level.saturating_sub(1),
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    fn var(name: &str) -> Expr {
        Expr::Var(name.to_string())
    }

    #[test]
    fn tracks_indentation() {
        let mut code = Emitter::new(4);
        assert_eq!(0, code.level());

        code.begin(
            Op::If {
                cond: var("a"),
                end: 0,
            },
            0..1,
        );
        assert_eq!(4, code.level());

        code.begin(
            Op::If {
                cond: var("b"),
                end: 0,
            },
            1..2,
        );
        assert_eq!(8, code.level());

        code.end(2..3);
        code.end(3..4);
        assert_eq!(0, code.level());
    }

    #[test]
    fn patches_block_ends() {
        let mut code = Emitter::new(4);

        code.begin(
            Op::For {
                var: "n".to_string(),
                iter: var("items"),
                end: 0,
            },
            0..1,
        );
        code.emit(Op::Output(vec![Fragment::Expr(var("n"))]), 1..2);
        code.end(2..3);

        let program = code.finish();

        assert_eq!(
            &[
                (
                    Op::For {
                        var: "n".to_string(),
                        iter: var("items"),
                        end: 2
                    },
                    0..1
                ),
                (Op::Output(vec![Fragment::Expr(var("n"))]), 1..2),
                (Op::End, 2..3),
            ],
            program.ops()
        );
    }

    #[test]
    fn lists_program_as_indented_source() {
        let mut code = Emitter::new(2);

        code.emit(Op::Bind("flag".to_string()), 0..0);
        code.begin(
            Op::If {
                cond: var("flag"),
                end: 0,
            },
            0..1,
        );
        code.emit(Op::Output(vec![Fragment::Text("Y".to_string())]), 1..2);
        code.emit(
            Op::Output(vec![
                Fragment::Text("a".to_string()),
                Fragment::Expr(var("flag")),
            ]),
            2..3,
        );
        code.end(3..4);

        assert_eq!(
            concat!(
                "flag = context[\"flag\"]\n",
                "if flag:\n",
                "  append(\"Y\")\n",
                "  extend([\"a\", str(flag)])\n",
            ),
            code.finish().to_string()
        );
    }
}
