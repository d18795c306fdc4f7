use std::path::Path;

use test_utils::{check_compilation, Expected};

#[test]
fn prints_a_greeting() {
    check_compilation(
        Path::new("demos/hello.sas"),
        Expected {
            stdout: "hello, world\n",
            stderr: "",
            exit_code: 0,
        },
    )
    .unwrap();
}
