use std::path::Path;

use test_utils::{check_compilation, Expected};

#[test]
fn for_loop_repeats_its_body() {
    check_compilation(
        Path::new("demos/for_loop.sas"),
        Expected {
            stdout: "tick\ntick\ntick\n",
            stderr: "",
            exit_code: 0,
        },
    )
    .unwrap();
}
