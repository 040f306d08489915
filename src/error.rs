//! Error types for envseal.
//!
//! Every launch stage has exactly one fatal variant. None of them are
//! retried; `main` reports the message and exits non-zero.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error.
#[derive(Error, Debug)]
pub enum Error {
    /// The external decryption tool could not produce a payload.
    #[error("decryption failed for {}: {reason}", store.display())]
    DecryptionFailed { store: PathBuf, reason: String },

    /// The decrypted payload is not a flat key/value document.
    #[error("failed to parse {format} secrets: {reason}")]
    SecretParseFailed { format: &'static str, reason: String },

    /// A secret cannot be exported as an environment variable.
    #[error("invalid secret key '{key}': {reason}")]
    InvalidSecretKey { key: String, reason: String },

    /// Control could not be handed to the target executable.
    #[error("cannot exec '{program}': {reason}")]
    ProcessReplaceFailed { program: String, reason: String },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("no secret store configured")]
    MissingStore,
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Shorthand for a [`Error::SecretParseFailed`].
    pub(crate) fn parse(format: &'static str, reason: impl Into<String>) -> Self {
        Error::SecretParseFailed {
            format,
            reason: reason.into(),
        }
    }

    /// An operator hint for the error, if one applies.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Error::DecryptionFailed { .. } => {
                Some("check that the store exists and its decryption key is available")
            }
            Error::SecretParseFailed { .. } => {
                Some("the store must decrypt to a flat map of names to scalar values")
            }
            Error::InvalidSecretKey { .. } => {
                Some("secret names must match [A-Za-z_][A-Za-z0-9_]*")
            }
            Error::ProcessReplaceFailed { .. } => Some("check the target path and its permissions"),
            Error::Config(ConfigError::MissingStore) => {
                Some("pass --store, set ENVSEAL_STORE, or add `store` to .envseal.toml")
            }
            _ => None,
        }
    }
}
