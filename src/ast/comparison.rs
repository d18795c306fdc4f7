use std::fmt::Display;

/// A `for`-loop termination test. All four comparison forms are valid here
/// (unlike `if`, which is restricted to `Lt`/`Gt` — see [`super::IfOperator`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Lt,
    Gt,
    Eq,
    Neq,
}

impl Display for Comparison {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Comparison::Lt => "<",
            Comparison::Gt => ">",
            Comparison::Eq => "==",
            Comparison::Neq => "!=",
        })
    }
}
