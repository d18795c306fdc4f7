use std::fmt::Display;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodegenError {
    UnknownFunction(String),
    UnknownVariable(String),
    ArgumentCount {
        builtin: &'static str,
        expected: usize,
        found: usize,
    },
    ArgumentKind {
        builtin: &'static str,
        expected: &'static str,
    },
}

impl Display for CodegenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CodegenError::UnknownFunction(name) => write!(f, "function \"{name}\" does not exist"),
            CodegenError::UnknownVariable(name) => write!(f, "variable \"{name}\" not found"),
            CodegenError::ArgumentCount {
                builtin,
                expected,
                found,
            } => write!(
                f,
                "{builtin} expects {expected} argument(s) but got {found}"
            ),
            CodegenError::ArgumentKind { builtin, expected } => {
                write!(f, "{builtin} expects an argument of kind {expected}")
            }
        }
    }
}

impl std::error::Error for CodegenError {}
