//! End-to-end tests for the `tools` binary.

use assert_cmd::Command;
use predicates::prelude::*;

fn fixture_url(name: &str) -> String {
    format!("file://{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn tools() -> Command {
    let mut cmd = Command::cargo_bin("tools").unwrap();
    cmd.env_remove("MCP_TEMPERATURE_UNIT")
        .env_remove("MCP_LOG_LEVEL")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_no_arguments_prints_listing() {
    tools()
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "Usage: tools <namespace>__<operation> [args...]",
        ))
        .stdout(predicate::str::contains("[math]"))
        .stdout(predicate::str::contains("[user_information]"))
        .stdout(predicate::str::contains("math__add(a: float, b: float)"));
}

#[test]
fn test_call_prints_json_result() {
    tools()
        .args(["math__add", "2", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"result\": 5.0"));
}

#[test]
fn test_dotted_name_is_accepted() {
    tools()
        .args(["math.multiply", "6", "7"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"result\": 42.0"));
}

#[test]
fn test_negative_numbers_are_arguments() {
    tools()
        .args(["math__absolute", "-4"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"result\": 4.0"));
}

#[test]
fn test_soft_failure_exits_zero_with_error_mapping() {
    tools()
        .args(["math__divide", "1", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"error\": \"Division by zero\""));
}

#[test]
fn test_unknown_names_are_usage_errors() {
    tools()
        .arg("add")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("<namespace>__<operation>"));

    tools()
        .arg("maths__add")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Available namespaces"));

    tools()
        .arg("math__plus")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Available operations"));
}

#[test]
fn test_coercion_failure_is_usage_error() {
    tools()
        .args(["math__factorial", "five"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("invalid int value for 'n'"));

    tools()
        .args(["math__absolute", "inf"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("invalid float value for 'a'"));
}

#[test]
fn test_missing_profile_is_hard_failure() {
    let dir = tempfile::tempdir().unwrap();

    tools()
        .arg("user_information__personal_data")
        .env("MCP_USER_DATA_PATH", dir.path().join("user.data.json"))
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("birthday"));
}

#[test]
fn test_personal_data_from_profile() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("user.data.json");
    std::fs::write(
        &path,
        r#"{"name": "Ada", "birthday": "1990-01-01", "email": "ada@example.com",
            "phone": "555-0100", "addresss": ["1 Main St"]}"#,
    )
    .unwrap();

    tools()
        .arg("user_information__personal_data")
        .env("MCP_USER_DATA_PATH", &path)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\": \"Ada\""))
        .stdout(predicate::str::contains("\"age\""));
}

#[test]
fn test_public_ip_from_fixture() {
    tools()
        .arg("ip_address__public_ipv4")
        .env("MCP_IPINFO_URL", fixture_url("ipinfo.mock.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("203.0.113.42"))
        .stdout(predicate::str::contains("Example ISP"));
}

#[test]
fn test_weather_from_fixture_in_celsius() {
    tools()
        .args(["weather__current_with_forecast", "34.05", "-118.24", "c"])
        .env("MCP_WEATHER_URL", fixture_url("weather.mock.html"))
        .assert()
        .success()
        .stdout(predicate::str::contains("\"location\": \"Los Angeles CA\""))
        .stdout(predicate::str::contains("\"unit\": \"celsius\""));
}

#[test]
fn test_temperature_unit_for_country() {
    tools()
        .args(["weather__temperature_unit_for_country", "usa"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"default_unit\": \"fahrenheit\""));
}
