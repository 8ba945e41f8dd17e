use assert_cmd::Command;

#[test]
fn test_server_command_available() {
    let mut cmd = Command::cargo_bin("optik").unwrap();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicates::str::contains("server"));
}

#[test]
fn test_server_help_lists_routes() {
    let mut cmd = Command::cargo_bin("optik").unwrap();
    cmd.arg("server").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicates::str::contains("POST /quote"))
        .stdout(predicates::str::contains("--port"));
}

#[test]
fn test_server_rejects_bad_port() {
    let mut cmd = Command::cargo_bin("optik").unwrap();
    cmd.arg("server").arg("--port").arg("not-a-port");

    cmd.assert()
        .failure()
        .stderr(predicates::str::contains("invalid value"));
}

#[test]
fn test_server_reports_bad_config_before_binding() {
    let mut cmd = Command::cargo_bin("optik").unwrap();
    cmd.arg("server")
        .arg("--config")
        .arg("/nonexistent/optik-rules.json");

    cmd.assert()
        .failure()
        .stderr(predicates::str::contains("Failed to read config file"));
}
