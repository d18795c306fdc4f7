use std::{
    error::Error,
    io,
    path::Path,
    process::{Command, Output},
    str,
};

const SASC_PATH: &str = "./target/debug/sasc";
const OUTPUT_PATH: &str = "./output";

pub struct Expected<'a> {
    pub stdout: &'a str,
    pub stderr: &'a str,
    pub exit_code: i32,
}

impl<'a> Expected<'a> {
    fn assert_matches(self, output: &Output) -> Result<(), Box<dyn Error>> {
        assert_eq!(str::from_utf8(&output.stdout)?, self.stdout);
        assert_eq!(str::from_utf8(&output.stderr)?, self.stderr);
        assert_eq!(output.status.code(), Some(self.exit_code));
        Ok(())
    }
}

fn run_compiler(src_path: &Path, out_path: &Path) -> Result<Output, io::Error> {
    Command::new(SASC_PATH)
        .arg(src_path)
        .arg("-o")
        .arg(out_path)
        .output()
}

pub fn check_compilation(src_path: &Path, expected: Expected) -> Result<(), Box<dyn Error>> {
    let out_path = Path::new(OUTPUT_PATH).join(src_path.file_stem().unwrap());

    let compile_output = run_compiler(src_path, &out_path)?;
    let compile_stdout = str::from_utf8(&compile_output.stdout)?;
    let compile_stderr = str::from_utf8(&compile_output.stderr)?;

    println!("{compile_stdout}");
    assert!(compile_stderr.is_empty(), "{}", compile_stderr);
    assert!(
        compile_output.status.success(),
        "sasc exited with status {:?}",
        compile_output.status.code()
    );

    let output = Command::new(&out_path).output()?;

    expected.assert_matches(&output)?;

    Ok(())
}

pub fn check_failing_compilation(src_path: &Path) -> Result<(), Box<dyn Error>> {
    let out_path = Path::new(OUTPUT_PATH).join(src_path.file_stem().unwrap());

    let compile_output = run_compiler(src_path, &out_path)?;

    println!("{compile_output:?}");
    assert!(
        !compile_output.status.success(),
        "sasc should have rejected {}",
        src_path.display()
    );

    Ok(())
}

/// Invokes `sasc` with raw CLI `args` (bypassing `run_compiler`'s assumption
/// of a source file and `-o`) and asserts its exit code.
pub fn check_exit_code(args: &[&str], expected_code: i32) -> Result<(), Box<dyn Error>> {
    let output = Command::new(SASC_PATH).args(args).output()?;

    assert_eq!(
        output.status.code(),
        Some(expected_code),
        "sasc {args:?} exited with {:?}, stderr: {}",
        output.status.code(),
        str::from_utf8(&output.stderr)?
    );

    Ok(())
}
