//! CLI binary integration tests using assert_cmd + predicates.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use std::fs;
use tempfile::TempDir;

#[allow(deprecated)]
fn cmd() -> Command {
    Command::cargo_bin("jsonschema-form").expect("binary should exist")
}

fn contributor_schema() -> String {
    json!({
        "title": "Contributor",
        "anyOf": [
            {
                "title": "Person",
                "type": "object",
                "properties": { "name": { "type": "string" } },
                "required": ["name"]
            },
            {
                "title": "Organization",
                "type": "object",
                "properties": { "url": { "type": "string" } },
                "required": ["url"]
            }
        ]
    })
    .to_string()
}

fn write(dir: &TempDir, name: &str, content: &str) -> String {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path.to_str().unwrap().to_string()
}

fn stdout_json(output: &[u8]) -> Value {
    serde_json::from_slice(output).expect("stdout should be valid JSON")
}

// ── Transform ───────────────────────────────────────────────────────────────

#[test]
fn test_transform_template_to_stdout() {
    let dir = TempDir::new().unwrap();
    let schema = write(&dir, "schema.json", &contributor_schema());

    let assert = cmd().args(["transform", &schema]).assert().success();
    let out = stdout_json(&assert.get_output().stdout);

    assert!(out["schema"].get("anyOf").is_none());
    assert_eq!(out["schema"]["oneOf"][0]["title"], "Person");
    assert_eq!(out["instance"], Value::Null);
}

#[test]
fn test_transform_with_instance_to_file() {
    let dir = TempDir::new().unwrap();
    let schema = write(&dir, "schema.json", &contributor_schema());
    let instance = write(&dir, "instance.json", r#"{ "url": "https://lab.org" }"#);
    let output = dir.path().join("out.json");

    cmd()
        .args(["transform", &schema, "--instance", &instance])
        .args(["-o", output.to_str().unwrap()])
        .args(["--format", "compact"])
        .assert()
        .success();

    let content = fs::read_to_string(&output).expect("output file should exist");
    assert_eq!(content.lines().count(), 1, "compact output is one line");
    let out: Value = serde_json::from_str(&content).unwrap();
    assert_eq!(
        out["instance"],
        json!({ "url": "https://lab.org", "schemaKey": "Organization" })
    );
}

#[test]
fn test_transform_custom_discriminator_key() {
    let dir = TempDir::new().unwrap();
    let schema = write(&dir, "schema.json", &contributor_schema());
    let instance = write(&dir, "instance.json", r#"{ "name": "Ada" }"#);

    let assert = cmd()
        .args(["transform", &schema, "--instance", &instance])
        .args(["--discriminator-key", "kind"])
        .assert()
        .success();
    let out = stdout_json(&assert.get_output().stdout);

    assert_eq!(out["instance"]["kind"], "Person");
    assert!(out["schema"]["oneOf"][0]["properties"].get("kind").is_some());
}

#[test]
fn test_transform_config_file_with_flag_override() {
    let dir = TempDir::new().unwrap();
    let schema = write(&dir, "schema.json", r#"{ "oneOf": [{ "type": "string" }] }"#);
    let config = write(
        &dir,
        "options.json",
        r#"{ "discriminator-key": "variant", "value-key": "data" }"#,
    );

    let assert = cmd()
        .args(["transform", &schema, "--config", &config])
        .args(["--value-key", "v"])
        .assert()
        .success();
    let out = stdout_json(&assert.get_output().stdout);
    let props = &out["schema"]["oneOf"][0]["properties"];

    assert!(props.get("variant").is_some());
    assert!(props.get("v").is_some());
    assert!(props.get("data").is_none());
}

#[test]
fn test_transform_rejects_equal_keys() {
    let dir = TempDir::new().unwrap();
    let schema = write(&dir, "schema.json", &contributor_schema());

    cmd()
        .args(["transform", &schema, "--value-key", "schemaKey"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must differ"));
}

#[test]
fn test_transform_invalid_alternative() {
    let dir = TempDir::new().unwrap();
    let schema = write(&dir, "schema.json", r#"{ "oneOf": [{ "type": "not-a-type" }] }"#);
    let instance = write(&dir, "instance.json", "{}");

    cmd()
        .args(["transform", &schema, "--instance", &instance])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Transformation failed"))
        .stderr(predicate::str::contains("#/oneOf/0"));
}

// ── Match ───────────────────────────────────────────────────────────────────

#[test]
fn test_match_prints_alternative() {
    let dir = TempDir::new().unwrap();
    let schema = write(&dir, "schema.json", &contributor_schema());
    let instance = write(&dir, "instance.json", r#"{ "url": "u" }"#);

    let assert = cmd()
        .args(["match", &schema, &instance])
        .assert()
        .success();
    let out = stdout_json(&assert.get_output().stdout);
    assert_eq!(out["title"], "Organization");
}

#[test]
fn test_match_without_match_fails() {
    let dir = TempDir::new().unwrap();
    let schema = write(&dir, "schema.json", &contributor_schema());
    let instance = write(&dir, "instance.json", r#"{ "email": "e" }"#);

    cmd()
        .args(["match", &schema, &instance])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no matching schema"));
}

// ── Split ───────────────────────────────────────────────────────────────────

#[test]
fn test_split_parts() {
    let dir = TempDir::new().unwrap();
    let schema = write(
        &dir,
        "schema.json",
        &json!({
            "type": "object",
            "properties": {
                "name": { "type": "string" },
                "address": { "type": "object", "properties": {} }
            },
            "required": ["name", "address"]
        })
        .to_string(),
    );

    let basic = cmd()
        .args(["split", &schema, "--part", "basic"])
        .assert()
        .success();
    let basic = stdout_json(&basic.get_output().stdout);
    assert_eq!(basic["required"], json!(["name"]));
    assert!(basic["properties"].get("address").is_none());

    let complex = cmd()
        .args(["split", &schema, "--part", "complex"])
        .assert()
        .success();
    let complex = stdout_json(&complex.get_output().stdout);
    assert_eq!(complex["required"], json!(["address"]));
}

// ── Invalid Input ───────────────────────────────────────────────────────────

#[test]
fn test_missing_schema_file() {
    cmd()
        .args(["transform", "/nonexistent/path/schema.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to open schema file"));
}

#[test]
fn test_malformed_instance_file() {
    let dir = TempDir::new().unwrap();
    let schema = write(&dir, "schema.json", &contributor_schema());
    let instance = write(&dir, "instance.json", "{ not json");

    cmd()
        .args(["transform", &schema, "--instance", &instance])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse instance"));
}

// ── Help Output ─────────────────────────────────────────────────────────────

#[test]
fn test_help_output() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("transform"))
        .stdout(predicate::str::contains("match"))
        .stdout(predicate::str::contains("split"));
}

#[test]
fn test_transform_help() {
    cmd()
        .args(["transform", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--discriminator-key"))
        .stdout(predicate::str::contains("--all-of"))
        .stdout(predicate::str::contains("--config"));
}
