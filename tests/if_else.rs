use std::path::Path;

use test_utils::{check_compilation, Expected};

#[test]
fn if_else_branches_on_the_loop_variable() {
    check_compilation(
        Path::new("demos/if_else.sas"),
        Expected {
            stdout: "small\nsmall\nbig\nbig\n",
            stderr: "",
            exit_code: 0,
        },
    )
    .unwrap();
}
