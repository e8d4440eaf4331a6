use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn bin() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_jira"));
    cmd.env_remove("JIRA_CLI_CONFIG_DIR").env("NO_COLOR", "1");
    cmd
}

fn run(dir: &Path, args: &[&str]) -> Output {
    bin()
        .arg("--config-dir")
        .arg(dir)
        .args(args)
        .output()
        .expect("run jira")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

#[test]
fn board_pointer_set_and_unset() {
    let dir = TempDir::new().expect("config dir");

    let set = run(dir.path(), &["set", "board", "Team Rocket"]);
    assert!(set.status.success(), "{}", stderr(&set));
    assert!(stdout(&set).contains("Active board set to Team Rocket"));
    assert_eq!(
        fs::read_to_string(dir.path().join("board")).expect("board file"),
        "Team Rocket"
    );

    let unset = run(dir.path(), &["unset", "board"]);
    assert!(unset.status.success());
    assert!(!dir.path().join("board").exists());

    let again = run(dir.path(), &["unset", "board"]);
    assert!(again.status.success());
    assert!(stdout(&again).contains("No active board was set"));
}

#[test]
fn config_dir_can_come_from_the_environment() {
    let dir = TempDir::new().expect("config dir");
    let output = bin()
        .env("JIRA_CLI_CONFIG_DIR", dir.path())
        .args(["set", "board", "Ops"])
        .output()
        .expect("run jira");
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(dir.path().join("board").exists());
}

#[test]
fn set_issue_checks_the_key_remotely() {
    let mut server = mockito::Server::new();
    let found = server
        .mock("GET", "/rest/api/2/issue/ABC-12")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_body(r#"{"id":"10012","key":"ABC-12"}"#)
        .create();
    server
        .mock("GET", "/rest/api/2/issue/ABC-404")
        .match_query(mockito::Matcher::Any)
        .with_status(404)
        .create();

    let dir = TempDir::new().expect("config dir");
    fs::write(
        dir.path().join("config.json"),
        format!(
            r#"{{"jira_url":"{}","username":"alice","password":"secret"}}"#,
            server.url()
        ),
    )
    .expect("write config");

    let ok = run(dir.path(), &["set", "issue", "abc-12"]);
    assert!(ok.status.success(), "{}", stderr(&ok));
    found.assert();
    assert_eq!(
        fs::read_to_string(dir.path().join("issue")).expect("issue file"),
        "ABC-12"
    );

    let missing = run(dir.path(), &["set", "issue", "ABC-404"]);
    assert_eq!(missing.status.code(), Some(1));
    assert!(stderr(&missing).contains("ABC-404 does not exist"));
}

#[test]
fn malformed_input_fails_before_any_request() {
    let dir = TempDir::new().expect("config dir");

    let stats = run(dir.path(), &["get", "myworklog", "stats", "2024-13-01", "2024-02-01"]);
    assert_eq!(stats.status.code(), Some(1));
    assert!(stderr(&stats).contains("invalid date '2024-13-01'"));

    let work = run(dir.path(), &["add", "work", "ABC-1", "5x"]);
    assert_eq!(work.status.code(), Some(1));
    assert!(stderr(&work).contains("invalid duration '5x'"));
}

#[test]
fn remote_commands_require_a_server() {
    let dir = TempDir::new().expect("config dir");
    let output = run(dir.path(), &["get", "all"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("jira_url is not set"));
}

#[test]
fn worklog_editing_requires_the_timesheet_plugin() {
    let dir = TempDir::new().expect("config dir");
    fs::write(
        dir.path().join("config.json"),
        r#"{"use_timesheet_plugin":false}"#,
    )
    .expect("write config");

    let output = run(dir.path(), &["edit", "myworklog", "2024-03-04"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("timesheet plugin"));
}

#[test]
fn invalid_config_is_reported() {
    let dir = TempDir::new().expect("config dir");
    fs::write(dir.path().join("config.json"), "{broken").expect("write config");
    let output = run(dir.path(), &["unset", "issue"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("configuration error"));
}
