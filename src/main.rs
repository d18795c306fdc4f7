//! The `sasc` binary: CLI argument handling, logging setup, and exit-code
//! mapping around the [`sasc`] library. Grounded on the teacher's
//! `src/bin/why/cli.rs` and `src/bin/why/main.rs` (clap derive CLI, a
//! `LogLevel` `ValueEnum` wired to `log`/`simple_logger`), adapted from a
//! subcommand-based CLI down to the flat `sasc <INPUT> [-o ..] [-v ..]`
//! surface this language needs.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::error;

use sasc::{compile_file, default_output_path};

/// Ahead-of-time compiler for the SAS toy language.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Path to the `.sas` source file to compile.
    #[arg(index = 1)]
    input: PathBuf,

    /// Path to the output executable. Defaults to the input path with its
    /// trailing `.sas` extension stripped.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Log verbosity.
    #[arg(value_enum, short, long, default_value_t = LogLevel::default())]
    verbosity: LogLevel,
}

#[derive(ValueEnum, Clone, Default, Debug)]
enum LogLevel {
    #[default]
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<&LogLevel> for log::Level {
    fn from(value: &LogLevel) -> Self {
        match value {
            LogLevel::Error => log::Level::Error,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Info => log::Level::Info,
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Trace => log::Level::Trace,
        }
    }
}

fn main() {
    // `Cli::parse()` would let clap exit with its own usage-error code (2)
    // on a missing `INPUT`, bypassing the exit(1) below — usage errors are
    // one of §6's failure categories and must exit 1 like every other one.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            let code = match err.kind() {
                clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            std::process::exit(code);
        }
    };

    simple_logger::init_with_level((&cli.verbosity).into()).unwrap();

    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&cli.input));

    if let Err(err) = compile_file(&cli.input, &output) {
        error!("{err}");
        std::process::exit(1);
    }
}
