//! Tests for launch failures and general CLI behavior.

use crate::support::*;
use predicates::prelude::*;

#[test]
fn test_version() {
    let t = Test::new();

    t.cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("envseal "));
}

#[test]
fn test_exec_without_command_is_usage_error() {
    let t = Test::with_store("secrets.json", "{}");

    t.cmd()
        .arg("exec")
        .assert()
        .failure()
        .stderr(predicate::str::contains("COMMAND"));
}

#[test]
fn test_help() {
    let t = Test::new();

    let output = t.cmd().arg("--help").output().unwrap();
    assert_success(&output);
    assert_stdout_contains(&output, "Usage");
}

#[test]
fn test_unknown_command_fails() {
    let t = Test::new();

    let output = t.cmd().arg("unknown-command").output().unwrap();
    assert_failure(&output);
}

#[test]
fn test_completions_bash_outputs_script() {
    let t = Test::new();

    let output = t.cmd().args(["completions", "bash"]).output().unwrap();
    assert_success(&output);
    assert_stdout_contains(&output, "envseal");
}

#[test]
fn test_missing_store_config() {
    let t = Test::new();

    let output = t.exec(&["echo", "never"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "no secret store configured");
    assert_stderr_contains(&output, "--store");
    assert_output_excludes(&output, "never");
}

#[test]
fn test_malformed_config_file() {
    let t = Test::new();
    t.write(".envseal.toml", "store = [unterminated");

    let output = t.exec(&["echo", "never"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "invalid config file");
}

#[cfg(unix)]
mod launch_failures {
    use crate::support::*;

    /// A target that leaves a marker behind if it ever runs.
    const TOUCH_MARKER: &[&str] = &["sh", "-c", "touch ran.marker"];

    #[test]
    fn test_decryption_failure_halts_launch() {
        let t = Test::new();
        t.write("secrets.json", "ENC[...]");
        t.write(
            ".envseal.toml",
            r#"
store = "secrets.json"

[decryptor]
command = "sh"
args = ["-c", "echo 'Failed to get the data key required to decrypt' >&2; exit 128", "sh"]
"#,
        );

        let output = t.exec(TOUCH_MARKER);
        assert_eq!(output.status.code(), Some(1));
        assert_stderr_contains(&output, "decryption failed");
        assert_stderr_contains(&output, "Failed to get the data key");
        assert!(!t.path("ran.marker").exists());
    }

    #[test]
    fn test_missing_decryptor() {
        let t = Test::new();
        t.write("secrets.json", "{}");
        t.write(
            ".envseal.toml",
            "store = \"secrets.json\"\n[decryptor]\ncommand = \"envseal-no-such-tool\"\n",
        );

        let output = t.exec(TOUCH_MARKER);
        assert_failure(&output);
        assert_stderr_contains(&output, "not found");
        assert!(!t.path("ran.marker").exists());
    }

    #[test]
    fn test_missing_store_file() {
        let t = Test::new();
        t.write(".envseal.toml", &format!("store = \"absent.json\"\n{}", CAT_CONFIG));

        let output = t.exec(TOUCH_MARKER);
        assert_failure(&output);
        assert_stderr_contains(&output, "decryption failed");
        assert!(!t.path("ran.marker").exists());
    }

    #[test]
    fn test_truncated_payload_halts_launch() {
        let t = Test::with_store("secrets.json", r#"{"A": "1", "B": "#);

        let output = t.exec(TOUCH_MARKER);
        assert_eq!(output.status.code(), Some(1));
        assert_stderr_contains(&output, "failed to parse json secrets");
        assert!(!t.path("ran.marker").exists());
    }

    #[test]
    fn test_invalid_secret_key_halts_launch() {
        let t = Test::with_store("secrets.json", r#"{"GOOD": "1", "BAD-KEY": "supersecret"}"#);

        let output = t.exec(TOUCH_MARKER);
        assert_eq!(output.status.code(), Some(1));
        assert_stderr_contains(&output, "invalid secret key 'BAD-KEY'");
        assert_output_excludes(&output, "supersecret");
        assert!(!t.path("ran.marker").exists());
    }

    #[test]
    fn test_missing_target() {
        let t = Test::with_store("secrets.json", r#"{"TOKEN": "supersecret"}"#);

        let output = t.exec(&["envseal-no-such-target", "--arg"]);
        assert_eq!(output.status.code(), Some(1));
        assert_stderr_contains(&output, "cannot exec 'envseal-no-such-target'");
        assert_stderr_contains(&output, "check the target path");
        assert_output_excludes(&output, "supersecret");
    }

    #[test]
    fn test_non_executable_target() {
        let t = Test::with_store("secrets.json", r#"{"A": "1"}"#);
        t.write("script.sh", "#!/bin/sh\ntouch ran.marker\n");

        let output = t.exec(&["./script.sh"]);
        assert_failure(&output);
        assert_stderr_contains(&output, "cannot exec");
        assert!(!t.path("ran.marker").exists());
    }
}
