use test_utils::check_exit_code;

#[test]
fn missing_input_exits_one_not_clap_default() {
    check_exit_code(&[], 1).unwrap();
}
