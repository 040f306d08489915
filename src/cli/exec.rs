//! Exec command.
//!
//! Decrypts the store and replaces this process with the target, which
//! inherits the secrets as environment variables.

use std::ffi::OsString;
use std::path::Path;

use crate::core::config::{Config, Overrides};
use crate::core::launch::Target;
use crate::error::{Error, Result};

/// Replace the current process with `command`, secrets injected.
///
/// Only returns on failure.
pub fn execute(config_path: Option<&Path>, overrides: Overrides, command: Vec<OsString>) -> Result<()> {
    let config = Config::load(config_path, overrides)?;

    let mut command = command.into_iter();
    let program = command.next().ok_or_else(|| Error::ProcessReplaceFailed {
        program: String::new(),
        reason: "no command specified".to_string(),
    })?;
    let target = Target::new(program, command);

    Err(config.launcher().launch(&target))
}
