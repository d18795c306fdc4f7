//! `sasc`: an ahead-of-time compiler for the SAS toy language, targeting
//! x86-64 Linux by emitting NASM assembly and driving `nasm`/`ld`.
//!
//! One-way pipeline: [`lexer`] -> [`parser`] -> [`codegen`] -> [`driver`].

pub mod asm;
pub mod ast;
pub mod codegen;
pub mod driver;
pub mod error;
pub mod lexer;
pub mod parser;

use std::fs;
use std::path::Path;

pub use error::CompileError;

/// Lexes, parses and lowers `source` to a rendered NASM assembly listing,
/// without touching the filesystem or invoking any external tool. Exposed
/// separately from [`compile_file`] so tests can assert on the generated
/// assembly text directly.
pub fn compile_source(source: &str) -> Result<String, CompileError> {
    let tokens = lexer::Lexer::new(source).lex()?;
    let nodes = parser::parse(tokens)?;
    let assembly = codegen::compile(&nodes)?;
    Ok(assembly.render())
}

/// Compiles the `.sas` file at `input` into a standalone executable at
/// `output`, running the full pipeline including the `nasm`/`ld` driver.
pub fn compile_file(input: &Path, output: &Path) -> Result<(), CompileError> {
    let source = fs::read_to_string(input).map_err(driver::DriverError::from)?;
    let assembly = compile_source(&source)?;
    driver::assemble_and_link(&assembly, output)?;
    Ok(())
}

/// Derives the default output path for an input path by stripping a
/// trailing `.sas` suffix, matching the original's `str.endswith('.sas')`
/// check (not `Path::extension`, which treats `a.b.sas` differently and
/// gives no answer at all for an extension-less input).
pub fn default_output_path(input: &Path) -> std::path::PathBuf {
    let input_str = input.to_string_lossy();
    match input_str.strip_suffix(".sas") {
        Some(stripped) => std::path::PathBuf::from(stripped),
        None => input.to_path_buf(),
    }
}
