//! Runs the `tf-inventory` binary against state fixtures

use pretty_assertions::assert_eq;
use std::io::Write;
use std::process::{Command, Output, Stdio};

fn tf_inventory(args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_tf-inventory"))
        .args(args)
        .env_remove("ANSIBLE_TF_BIN")
        .env_remove("ANSIBLE_TF_DIR")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("binary must start");

    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(stdin.as_bytes())
        .expect("stdin must accept input");

    child.wait_with_output().expect("binary must finish")
}

fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{name}", env!("CARGO_MANIFEST_DIR"))
}

fn stdout_json(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout must be json")
}

#[test]
fn list() {
    let output = tf_inventory(&["--list", "--state", &fixture("basic.json")], "");

    assert!(output.status.success());
    assert_eq!(
        stdout_json(&output),
        serde_json::json!({
            "all": ["h1"],
            "app": ["h1"],
            "_meta": { "hostvars": { "h1": { "x": "1" } } }
        })
    );
}

#[test]
fn host() {
    let output = tf_inventory(
        &["--host", "web1.example.com", "--state", &fixture("groups.json")],
        "",
    );

    assert!(output.status.success());
    assert_eq!(
        stdout_json(&output),
        serde_json::json!({ "ansible_user": "deploy" })
    );
}

#[test]
fn unknown_host() {
    let output = tf_inventory(&["--host", "nope", "--state", &fixture("groups.json")], "");

    assert!(output.status.success());
    assert_eq!(stdout_json(&output), serde_json::json!({}));
}

#[test]
fn state_from_stdin() {
    let state = r#"{"modules": [{"resources": {"ansible_host.a": {
        "type": "ansible_host",
        "primary": {"attributes": {"inventory_hostname": "a", "groups.#": "0"}}
    }}}]}"#;
    let output = tf_inventory(&["--state", "-"], state);

    assert!(output.status.success());
    assert_eq!(
        stdout_json(&output),
        serde_json::json!({ "all": ["a"], "_meta": { "hostvars": { "a": {} } } })
    );
}

#[test]
fn malformed_state_aborts_without_output() {
    let output = tf_inventory(&["--state", "-"], "this is not json");

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn missing_count_marker_aborts_without_output() {
    let state = r#"{"modules": [{"resources": {"ansible_host.a": {
        "type": "ansible_host",
        "primary": {"attributes": {"inventory_hostname": "a", "groups.0": "web"}}
    }}}]}"#;
    let output = tf_inventory(&["--state", "-"], state);

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("groups.#"));
}

#[test]
fn yaml_output() {
    let output = tf_inventory(
        &["--output-format", "yaml", "--state", &fixture("basic.json")],
        "",
    );

    assert!(output.status.success());
    let value: serde_yaml::Value = serde_yaml::from_slice(&output.stdout).expect("stdout must be yaml");
    assert_eq!(value["app"][0].as_str(), Some("h1"));
}
