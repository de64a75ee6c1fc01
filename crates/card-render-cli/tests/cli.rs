#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{Value, json};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn write_json(dir: &TempDir, name: &str, value: &Value) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, serde_json::to_vec_pretty(value).expect("json")).expect("write");
    path
}

fn card_render() -> Command {
    let mut cmd = Command::cargo_bin("card-render").expect("binary");
    cmd.env_remove("ADAPTIVE_CARD_UNSUPPORTED_POLICY")
        .env_remove("RUST_LOG");
    cmd
}

fn feedback_card() -> Value {
    json!({
        "version": "1.5",
        "body": [
            { "type": "TextBlock", "text": "How was it?", "size": "large" },
            { "type": "Input.Text", "id": "comment", "value": "fine" },
            { "type": "Image", "url": "https://example.com/logo.png" }
        ],
        "actions": [
            { "type": "Action.Submit", "id": "send", "title": "Send", "data": { "form": "feedback" } }
        ]
    })
}

#[test]
fn render_prints_the_element_tree() {
    let dir = TempDir::new().expect("tempdir");
    let card = write_json(&dir, "card.json", &feedback_card());

    let output = card_render()
        .args(["render", "--card"])
        .arg(&card)
        .output()
        .expect("run");
    assert!(output.status.success());
    let tree: Value = serde_json::from_slice(&output.stdout).expect("stdout json");
    assert_eq!(tree["root"]["kind"], json!("card"));
    assert_eq!(tree["root"]["children"][0]["kind"], json!("text"));
    assert_eq!(tree["warnings"], json!([]));
}

#[test]
fn submit_merges_inputs_and_static_data() {
    let dir = TempDir::new().expect("tempdir");
    let card = write_json(&dir, "card.json", &feedback_card());

    let output = card_render()
        .args(["submit", "--action", "send", "--input", "comment=great", "--card"])
        .arg(&card)
        .output()
        .expect("run");
    assert!(output.status.success());
    let invocation: Value = serde_json::from_slice(&output.stdout).expect("stdout json");
    assert_eq!(invocation["actionType"], json!("Action.Submit"));
    assert_eq!(invocation["actionId"], json!("send"));
    assert_eq!(
        invocation["data"],
        json!({ "form": "feedback", "comment": "great" })
    );
}

#[test]
fn submit_rejects_unknown_input_ids() {
    let dir = TempDir::new().expect("tempdir");
    let card = write_json(&dir, "card.json", &feedback_card());

    card_render()
        .args(["submit", "--action", "send", "--input", "missing=x", "--card"])
        .arg(&card)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("no input with id `missing`"));
}

#[test]
fn submit_rejects_unknown_actions() {
    let dir = TempDir::new().expect("tempdir");
    let card = write_json(&dir, "card.json", &feedback_card());

    card_render()
        .args(["submit", "--action", "nope", "--card"])
        .arg(&card)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("no interactive action with id `nope`"));
}

#[test]
fn unknown_element_aborts_by_default() {
    let dir = TempDir::new().expect("tempdir");
    let card = write_json(
        &dir,
        "card.json",
        &json!({ "body": [{ "type": "Media", "sources": [] }] }),
    );

    card_render()
        .args(["render", "--card"])
        .arg(&card)
        .assert()
        .code(3)
        .stderr(predicate::str::contains("`Media`"));
}

#[test]
fn placeholder_policy_flag_keeps_rendering() {
    let dir = TempDir::new().expect("tempdir");
    let card = write_json(
        &dir,
        "card.json",
        &json!({ "body": [{ "type": "Media", "sources": [] }] }),
    );

    let output = card_render()
        .args(["render", "--policy", "placeholder", "--card"])
        .arg(&card)
        .output()
        .expect("run");
    assert!(output.status.success());
    let tree: Value = serde_json::from_slice(&output.stdout).expect("stdout json");
    assert_eq!(tree["root"]["children"][0]["kind"], json!("placeholder"));
}

#[test]
fn policy_env_var_applies_without_flag() {
    let dir = TempDir::new().expect("tempdir");
    let card = write_json(
        &dir,
        "card.json",
        &json!({ "body": [{ "type": "Media" }, { "type": "TextBlock", "text": "kept" }] }),
    );

    let output = card_render()
        .env("ADAPTIVE_CARD_UNSUPPORTED_POLICY", "skip")
        .args(["render", "--card"])
        .arg(&card)
        .output()
        .expect("run");
    assert!(output.status.success());
    let tree: Value = serde_json::from_slice(&output.stdout).expect("stdout json");
    assert_eq!(tree["root"]["children"][0]["kind"], json!("text"));
    assert_eq!(tree["warnings"][0]["code"], json!("unsupported_element"));
}

#[test]
fn host_config_defaults_are_printed() {
    let output = card_render().arg("host-config").output().expect("run");
    assert!(output.status.success());
    let config: Value = serde_json::from_slice(&output.stdout).expect("stdout json");
    assert_eq!(config["supportsInteractivity"], json!(true));
    assert!(config["fontSizes"].is_object());
}

#[test]
fn invalid_host_config_fails_validation() {
    let dir = TempDir::new().expect("tempdir");
    let host = write_json(
        &dir,
        "host.json",
        &json!({ "colors": { "default": { "normal": "blue" } } }),
    );

    card_render()
        .args(["host-config", "--host-config"])
        .arg(&host)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("host config failed"));
}

#[test]
fn resources_lists_remote_urls() {
    let dir = TempDir::new().expect("tempdir");
    let card = write_json(&dir, "card.json", &feedback_card());

    card_render()
        .args(["resources", "--card"])
        .arg(&card)
        .assert()
        .success()
        .stdout(predicate::str::contains("https://example.com/logo.png"));
}

#[test]
fn missing_card_file_is_reported() {
    let dir = TempDir::new().expect("tempdir");
    card_render()
        .args(["render", "--card"])
        .arg(dir.path().join("absent.json"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("card file failed"));
}
