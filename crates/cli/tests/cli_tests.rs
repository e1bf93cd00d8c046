//! CLI integration tests

use mockito::Matcher;
use std::process::{Command, Output};

fn fleetctl(args: &[&str], api_url: Option<&str>) -> Output {
    let mut command = Command::new(env!("CARGO_BIN_EXE_fleetctl"));
    command.args(args).env("NO_COLOR", "1");
    match api_url {
        Some(url) => command.env("FLEETCTL_API_URL", url),
        None => command.env_remove("FLEETCTL_API_URL"),
    };
    command.output().expect("Failed to execute fleetctl")
}

/// Test that the CLI shows help
#[test]
fn test_cli_help() {
    let output = fleetctl(&["--help"], None);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI help should succeed");
    assert!(stdout.contains("Fleet Scaler"), "Should show app name");
    assert!(stdout.contains("group"), "Should show group command");
    assert!(stdout.contains("service"), "Should show service command");
    assert!(stdout.contains("health"), "Should show health command");
}

/// Test that the CLI shows version
#[test]
fn test_cli_version() {
    let output = fleetctl(&["--version"], None);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI version should succeed");
    assert!(stdout.contains("fleetctl"), "Should show binary name");
}

/// Test group subcommand help
#[test]
fn test_group_help() {
    let output = fleetctl(&["group", "--help"], None);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Group help should succeed");
    assert!(stdout.contains("--add"), "Should show add option");
    assert!(stdout.contains("--set"), "Should show set option");
}

/// Test that a change is required
#[test]
fn test_group_without_change_fails() {
    let output = fleetctl(&["group", "web-asg"], None);
    assert!(!output.status.success());
}

/// Test a full group adjustment against a mock service
#[test]
fn test_group_set_against_mock_service() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/v1/instance-groups/scale")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "group": "web-asg",
            "mode": "set",
            "amount": 10
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"resource": "web-asg", "kind": "instance_group", "mode": "set", "amount": 10,
                "baseline": 2, "previous_desired": 2, "target": 5, "min": 1, "max": 5,
                "stages": ["start", "reading", "computing", "applying", "done"],
                "completed_at": 1700000000}"#,
        )
        .create();

    let url = server.url();
    let output = fleetctl(
        &["--format", "json", "group", "web-asg", "--set", "10"],
        Some(&url),
    );
    let stdout = String::from_utf8_lossy(&output.stdout);

    mock.assert();
    assert!(output.status.success(), "Adjustment should succeed");
    let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(report["target"], 5);
}

/// Test that a failed adjustment exits non-zero with the error code
#[test]
fn test_service_not_found_exits_non_zero() {
    let mut server = mockito::Server::new();
    server
        .mock("POST", "/v1/container-services/scale")
        .with_status(404)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error": "service prod/api not found", "code": "resource_not_found", "stage": "reading"}"#)
        .create();

    let url = server.url();
    let output = fleetctl(&["service", "prod", "api", "--add", "-2"], Some(&url));
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(stderr.contains("resource_not_found"));
}
