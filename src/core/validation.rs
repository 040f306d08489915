//! Input validation for secrets headed into the environment.

use crate::error::{Error, Result};

/// Validate a secret name as an environment variable name.
///
/// Names must be portable shell identifiers:
/// - Only A-Z, a-z, 0-9, and underscore
/// - Cannot start with a digit
/// - Cannot be empty
///
/// This also rules out `=` and NUL, which the OS cannot represent in a name.
pub fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(invalid(key, "name is empty"));
    }

    if key.starts_with(|c: char| c.is_ascii_digit()) {
        return Err(invalid(key, "cannot start with a digit"));
    }

    for (i, ch) in key.chars().enumerate() {
        if !ch.is_ascii_alphanumeric() && ch != '_' {
            return Err(invalid(
                key,
                format!(
                    "invalid character {:?} at position {}. Only A-Z, a-z, 0-9, and underscore are allowed",
                    ch,
                    i + 1
                ),
            ));
        }
    }

    Ok(())
}

/// Validate that a secret value can be passed through `execve`.
///
/// The value itself is never echoed back in the error.
pub fn validate_value(key: &str, value: &str) -> Result<()> {
    if value.contains('\0') {
        return Err(invalid(key, "value contains a NUL byte"));
    }
    Ok(())
}

fn invalid(key: &str, reason: impl Into<String>) -> Error {
    Error::InvalidSecretKey {
        key: key.to_string(),
        reason: reason.into(),
    }
}
