//! Command helper methods for Test.

use super::Test;
use assert_cmd::Command;
use std::process::Output;

impl Test {
    /// Create an envseal command isolated from the caller's settings.
    ///
    /// Returns a Command with:
    /// - Current directory set to the test project directory
    /// - `ENVSEAL_*` variables removed
    /// - Colors disabled
    pub fn cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("envseal").expect("failed to find envseal binary");
        for var in [
            "ENVSEAL_STORE",
            "ENVSEAL_FORMAT",
            "ENVSEAL_DECRYPTOR",
            "ENVSEAL_CONFIG",
            "ENVSEAL_LOG",
        ] {
            cmd.env_remove(var);
        }
        cmd.env("NO_COLOR", "1");
        cmd.current_dir(self.dir.path());
        cmd
    }

    /// Shortcut for `envseal exec -- <command...>`.
    pub fn exec(&self, command: &[&str]) -> Output {
        self.cmd()
            .arg("exec")
            .arg("--")
            .args(command)
            .output()
            .expect("failed to run envseal exec")
    }

    /// Shortcut for `envseal keys`.
    pub fn keys(&self) -> Output {
        self.cmd()
            .arg("keys")
            .output()
            .expect("failed to run envseal keys")
    }

    /// Shortcut for `envseal keys --json`.
    pub fn keys_json(&self) -> Output {
        self.cmd()
            .args(["keys", "--json"])
            .output()
            .expect("failed to run envseal keys --json")
    }
}
