use assert_cmd::Command;

#[test]
fn test_interactive_flag_is_documented() {
    let mut cmd = Command::cargo_bin("optik").unwrap();
    cmd.arg("quote").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicates::str::contains("--interactive"))
        .stdout(predicates::str::contains("--input"));
}

#[test]
fn test_interactive_conflicts_with_input_file() {
    let mut cmd = Command::cargo_bin("optik").unwrap();
    cmd.arg("quote")
        .arg("--interactive")
        .arg("--input")
        .arg("form.json");

    cmd.assert()
        .failure()
        .stderr(predicates::str::contains("cannot be used with"));
}
