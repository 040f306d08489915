//! Constants used throughout envseal.
//!
//! Centralizes defaults and magic strings.

/// Configuration file name (.envseal.toml).
pub const CONFIG_FILE: &str = ".envseal.toml";

/// Default decryption tool.
pub const DEFAULT_DECRYPTOR: &str = "sops";

/// Arguments passed to the decryption tool before the store path.
pub const DEFAULT_DECRYPTOR_ARGS: &[&str] = &["--decrypt"];

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "ENVSEAL_LOG";

/// Exit status for any aborted launch.
pub const EXIT_FAILURE: i32 = 1;

/// Search path for the target when the launch environment has no `PATH`.
pub const DEFAULT_PATH: &str = "/usr/bin:/bin";
