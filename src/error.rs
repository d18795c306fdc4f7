//! Crate-wide error, aggregating each component's own error type so
//! `compile_file` can return a single `Result` while still letting callers
//! match on which stage failed.

use std::fmt::Display;

use crate::codegen::CodegenError;
use crate::driver::DriverError;
use crate::lexer::LexError;
use crate::parser::ParseError;

#[derive(Debug)]
pub enum CompileError {
    Lex(LexError),
    Parse(ParseError),
    Codegen(CodegenError),
    Driver(DriverError),
}

impl Display for CompileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompileError::Lex(err) => write!(f, "{err}"),
            CompileError::Parse(err) => write!(f, "{err}"),
            CompileError::Codegen(err) => write!(f, "{err}"),
            CompileError::Driver(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for CompileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CompileError::Lex(err) => Some(err),
            CompileError::Parse(err) => Some(err),
            CompileError::Codegen(err) => Some(err),
            CompileError::Driver(err) => Some(err),
        }
    }
}

impl From<LexError> for CompileError {
    fn from(err: LexError) -> Self {
        CompileError::Lex(err)
    }
}

impl From<ParseError> for CompileError {
    fn from(err: ParseError) -> Self {
        CompileError::Parse(err)
    }
}

impl From<CodegenError> for CompileError {
    fn from(err: CodegenError) -> Self {
        CompileError::Codegen(err)
    }
}

impl From<DriverError> for CompileError {
    fn from(err: DriverError) -> Self {
        CompileError::Driver(err)
    }
}
