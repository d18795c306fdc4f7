//! Invokes `nasm` and `ld` to turn a rendered assembly listing into a
//! standalone ELF executable. Grounded directly on
//! `original_source/compiler.py`'s tail end (`Compiler.compile`): the same
//! two subprocess argument lists, the same `/tmp/<random>` / `/tmp/<random>.o`
//! naming scheme, and the same "remove both temp files once linking
//! succeeds" cleanup.

use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use log::debug;

#[derive(Debug)]
pub enum DriverError {
    Assembler(ExitStatus),
    Linker(ExitStatus),
    Io(std::io::Error),
}

impl Display for DriverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DriverError::Assembler(status) => {
                write!(f, "nasm failed with {status}")
            }
            DriverError::Linker(status) => {
                write!(f, "ld failed with {status}")
            }
            DriverError::Io(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for DriverError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DriverError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for DriverError {
    fn from(err: std::io::Error) -> Self {
        DriverError::Io(err)
    }
}

/// Best-effort cleanup guard for the two temp files this module creates.
/// Removal failures are logged, never fatal — mirrors the original only
/// ever removing on the success path, generalized to also clean up after a
/// failed `nasm`/`ld` invocation instead of leaking files in `/tmp`.
struct TempFiles {
    asm_path: PathBuf,
    obj_path: PathBuf,
}

impl Drop for TempFiles {
    fn drop(&mut self) {
        for path in [&self.asm_path, &self.obj_path] {
            if path.exists() {
                if let Err(err) = fs::remove_file(path) {
                    debug!("failed to remove temp file {}: {err}", path.display());
                }
            }
        }
    }
}

/// The `-o` argument `ld` is invoked with: relative output paths are always
/// passed with a `./` prefix (§6), matching the original's `f'./{compiled_name}'`
/// regardless of whether the caller already wrote one.
fn link_output_arg(output: &Path) -> std::ffi::OsString {
    if output.is_absolute() {
        output.as_os_str().to_owned()
    } else {
        let mut arg = std::ffi::OsString::from("./");
        arg.push(output.as_os_str());
        arg
    }
}

/// Writes `assembly` to a temp file, assembles it with `nasm -g -felf64`,
/// links the resulting object with `ld`, and places the executable at
/// `output`. The temp files live under `std::env::temp_dir()` rather than a
/// hardcoded `/tmp`, named from the process id so concurrent invocations
/// never collide.
pub fn assemble_and_link(assembly: &str, output: &Path) -> Result<(), DriverError> {
    let pid = std::process::id();
    let asm_path = std::env::temp_dir().join(format!("sasc-{pid}.asm"));
    let obj_path = std::env::temp_dir().join(format!("sasc-{pid}.o"));

    fs::write(&asm_path, assembly)?;

    let _guard = TempFiles {
        asm_path: asm_path.clone(),
        obj_path: obj_path.clone(),
    };

    debug!("assembling {}", asm_path.display());

    let assemble_status = Command::new("nasm")
        .arg("-g")
        .arg("-felf64")
        .arg(&asm_path)
        .arg("-o")
        .arg(&obj_path)
        .status()?;

    if !assemble_status.success() {
        return Err(DriverError::Assembler(assemble_status));
    }

    debug!("linking {}", obj_path.display());

    let link_arg = link_output_arg(output);

    let link_status = Command::new("ld")
        .arg(&obj_path)
        .arg("-o")
        .arg(&link_arg)
        .status()?;

    if !link_status.success() {
        return Err(DriverError::Linker(link_status));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages_name_the_failing_tool() {
        use std::os::unix::process::ExitStatusExt;

        let status = ExitStatus::from_raw(256);
        assert!(DriverError::Assembler(status).to_string().contains("nasm"));
        assert!(DriverError::Linker(status).to_string().contains("ld"));
    }

    #[test]
    fn relative_output_gets_a_dot_slash_prefix() {
        assert_eq!(link_output_arg(Path::new("hello")), "./hello");
        assert_eq!(link_output_arg(Path::new("sub/dir/hello")), "./sub/dir/hello");
    }

    #[test]
    fn absolute_output_is_left_unprefixed() {
        assert_eq!(link_output_arg(Path::new("/tmp/hello")), "/tmp/hello");
    }
}
