use std::fmt::Display;

/// An `if` condition test. Unlike [`super::Comparison`], equality forms are
/// not permitted here (§3/§4.2 invariant) — encoding that as a two-variant
/// enum instead of reusing `Comparison` makes the restriction a type-level
/// fact rather than something the parser has to remember to check twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IfOperator {
    Lt,
    Gt,
}

impl Display for IfOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            IfOperator::Lt => "<",
            IfOperator::Gt => ">",
        })
    }
}
