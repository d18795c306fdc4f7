use std::path::Path;

use test_utils::{check_compilation, Expected};

#[test]
fn print_never_adds_a_trailing_newline() {
    check_compilation(
        Path::new("demos/print_no_newline.sas"),
        Expected {
            stdout: "ab",
            stderr: "",
            exit_code: 0,
        },
    )
    .unwrap();
}
