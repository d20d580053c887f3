use std::{collections::BTreeSet, fmt::Display, sync::LazyLock};

use errors::CompileError;
use regex::Regex;

use crate::IDENTIFIER_PATTERN;

static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(IDENTIFIER_PATTERN).expect("identifier pattern should compile"));

/// A compiled output expression
///
/// ```text
/// a.b|f  =>  Filter { name: "f", arg: Dots { base: Var("a"), members: ["b"] } }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A name bound by the prologue or a `for` tag
    Var(String),
    /// Members resolved left to right against the base value
    Dots { base: Box<Expr>, members: Vec<String> },
    /// A context callable applied to the value of `arg`
    Filter { name: String, arg: Box<Expr> },
}

impl Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::Var(name) => write!(f, "{name}"),
            Expr::Dots { base, members } => {
                let members: Vec<String> = members.iter().map(|m| format!("{m:?}")).collect();
                write!(f, "resolve({base}, {})", members.join(", "))
            }
            Expr::Filter { name, arg } => write!(f, "{name}({arg})"),
        }
    }
}

/// Compile an expression, registering every referenced name in `vars`
///
/// Filters are split off first, so dotted access binds tighter than a pipe.
pub fn compile_expr(expr: &str, vars: &mut BTreeSet<String>) -> Result<Expr, CompileError> {
    if expr.contains('|') {
        let mut pipes = expr.split('|');
        let base = pipes.next().unwrap_or_default().trim();

        let mut code = compile_expr(base, vars)?;

        for name in pipes {
            let name = name.trim();
            variable(name, vars)?;

            code = Expr::Filter {
                name: name.to_string(),
                arg: Box::new(code),
            };
        }

        Ok(code)
    } else if expr.contains('.') {
        let mut dots = expr.split('.');
        let base = compile_expr(dots.next().unwrap_or_default(), vars)?;

        let members = dots
            .map(|member| identifier(member).map(|_| member.to_string()))
            .collect::<Result<Vec<String>, CompileError>>()?;

        Ok(Expr::Dots {
            base: Box::new(base),
            members,
        })
    } else {
        variable(expr, vars)?;

        Ok(Expr::Var(expr.to_string()))
    }
}

/// Validate `name` and add it to `vars`
pub fn variable(name: &str, vars: &mut BTreeSet<String>) -> Result<(), CompileError> {
    identifier(name)?;
    vars.insert(name.to_string());

    Ok(())
}

fn identifier(name: &str) -> Result<(), CompileError> {
    if IDENTIFIER.is_match(name) {
        Ok(())
    } else {
        Err(CompileError::InvalidName(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    macro_rules! expr_test {
        ($test_name:ident, $expr:expr, $code:expr, $vars:expr) => {
            #[test]
            fn $test_name() {
                let mut vars = BTreeSet::new();
                let code = compile_expr($expr, &mut vars);

                assert_eq!($code, code.map(|c| c.to_string()));

                let expected_vars: BTreeSet<String> =
                    $vars.iter().map(|v: &&str| v.to_string()).collect();
                assert_eq!(expected_vars, vars);
            }
        };
    }

    expr_test!(bare_name, "name", Ok("name".to_string()), ["name"]);

    expr_test!(
        dotted_access,
        "user.address.city",
        Ok("resolve(user, \"address\", \"city\")".to_string()),
        ["user"]
    );

    expr_test!(
        filters_apply_left_to_right,
        "name|lower|title",
        Ok("title(lower(name))".to_string()),
        ["lower", "name", "title"]
    );

    expr_test!(
        dots_bind_tighter_than_pipes,
        "a.b|f",
        Ok("f(resolve(a, \"b\"))".to_string()),
        ["a", "f"]
    );

    expr_test!(
        pipes_may_have_spaces,
        "a.b | f",
        Ok("f(resolve(a, \"b\"))".to_string()),
        ["a", "f"]
    );

    expr_test!(
        invalid_name,
        "1bad",
        Err(CompileError::InvalidName("1bad".to_string())),
        [] as [&str; 0]
    );

    expr_test!(
        invalid_member,
        "user.1st",
        Err(CompileError::InvalidName("1st".to_string())),
        ["user"]
    );

    expr_test!(
        invalid_filter,
        "name|up-per",
        Err(CompileError::InvalidName("up-per".to_string())),
        ["name"]
    );

    expr_test!(
        empty_expression,
        "",
        Err(CompileError::InvalidName("".to_string())),
        [] as [&str; 0]
    );

    expr_test!(
        empty_member,
        "user.",
        Err(CompileError::InvalidName("".to_string())),
        ["user"]
    );

    #[test]
    fn compiles_to_nested_tree() {
        let mut vars = BTreeSet::new();

        assert_eq!(
            Ok(Expr::Filter {
                name: "f".to_string(),
                arg: Box::new(Expr::Dots {
                    base: Box::new(Expr::Var("a".to_string())),
                    members: vec!["b".to_string()],
                }),
            }),
            compile_expr("a.b|f", &mut vars)
        );
    }
}
