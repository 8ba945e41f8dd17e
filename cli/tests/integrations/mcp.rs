use assert_cmd::Command;

#[test]
fn test_mcp_command_available() {
    let mut cmd = Command::cargo_bin("optik").unwrap();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicates::str::contains("mcp"));
}

#[test]
fn test_mcp_answers_over_stdio() {
    let requests = concat!(
        r#"{"jsonrpc":"2.0","id":1,"method":"initialize"}"#,
        "\n",
        r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#,
        "\n",
        r#"{"jsonrpc":"2.0","id":3,"method":"tools/call","params":{"name":"recommend_index","arguments":{"total_diopter":4.2}}}"#,
        "\n"
    );

    let mut cmd = Command::cargo_bin("optik").unwrap();
    cmd.arg("mcp").write_stdin(requests);

    let output = cmd.assert().success().get_output().stdout.clone();
    let stdout = String::from_utf8(output).unwrap();
    let responses: Vec<serde_json::Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    assert_eq!(responses.len(), 3);
    assert_eq!(
        responses[0]["result"]["serverInfo"]["name"],
        "optik-mcp-server"
    );
    assert_eq!(responses[1]["result"]["tools"].as_array().unwrap().len(), 6);
    assert!(responses[2]["result"]["content"][0]["text"]
        .as_str()
        .unwrap()
        .contains("Recommended index: 1.60"));
}

#[test]
fn test_mcp_reports_parse_errors() {
    let mut cmd = Command::cargo_bin("optik").unwrap();
    cmd.arg("mcp").write_stdin("this is not json\n");

    cmd.assert()
        .success()
        .stdout(predicates::str::contains("-32700"));
}
