//! Tests for `envseal keys`.

#![cfg(unix)]

use crate::support::*;

#[test]
fn test_keys_lists_names_not_values() {
    let t = Test::with_store("secrets.json", r#"{"DB_PASSWORD": "hunter2", "API_KEY": "abc123"}"#);

    let output = t.keys();
    assert_success(&output);
    assert_stdout_contains(&output, "2 secrets");
    assert_stdout_contains(&output, "API_KEY");
    assert_stdout_contains(&output, "DB_PASSWORD");
    assert_output_excludes(&output, "hunter2");
    assert_output_excludes(&output, "abc123");
}

#[test]
fn test_keys_json() {
    let t = Test::with_store("secrets.json", r#"{"B": "2", "A": "1"}"#);

    let output = t.keys_json();
    assert_success(&output);

    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["store"], "secrets.json");
    assert_eq!(json["count"], 2);
    assert_eq!(json["keys"], serde_json::json!(["A", "B"]));
}

#[test]
fn test_keys_text_layout() {
    let t = Test::with_store("secrets.json", r#"{"B": "2", "A": "1"}"#);

    let output = t.keys();
    assert_success(&output);

    let out = stdout(&output);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("2 secrets in "));
    assert!(lines[0].contains("secrets.json"));
    assert!(lines[1].ends_with("A"));
    assert!(lines[2].ends_with("B"));
    assert!(stderr(&output).is_empty());
}

#[test]
fn test_keys_empty_store() {
    let t = Test::with_store("secrets.json", "{}");

    let output = t.keys();
    assert_success(&output);
    assert_stdout_contains(&output, "no secrets in store");
}

#[test]
fn test_keys_reports_invalid_names() {
    let t = Test::with_store("secrets.yaml", "9LIVES: cat\n");

    let output = t.keys();
    assert_failure(&output);
    assert_stderr_contains(&output, "invalid secret key '9LIVES'");
}

#[test]
fn test_keys_is_repeatable() {
    let t = Test::with_store("secrets.json", r#"{"A": "1", "B": "2"}"#);

    let first = t.keys_json();
    let second = t.keys_json();
    assert_success(&first);
    assert_eq!(first.stdout, second.stdout);
}
