//! Decryptor invocation.
//!
//! envseal never decrypts anything itself. A [`Decryptor`] turns an encrypted
//! secret store into a plaintext payload, which stays in memory only.
//!
//! ## Security
//!
//! - The payload is captured from the tool's stdout straight into memory
//! - It is wrapped in [`Zeroizing`] so it is wiped when dropped
//! - No temporary files are created

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, trace};
use zeroize::Zeroizing;

use crate::core::constants;
use crate::error::{Error, Result};

/// Capability that turns an encrypted store into a plaintext payload.
///
/// Implementations may shell out or call a library; the launch pipeline
/// only sees the returned bytes.
pub trait Decryptor {
    /// Human-readable name for logs and errors.
    fn name(&self) -> &str;

    /// Decrypt the store at `store`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DecryptionFailed`] if no payload could be produced.
    fn decrypt(&self, store: &Path) -> Result<Zeroizing<Vec<u8>>>;
}

/// Decryptor backed by an external command such as `sops --decrypt`.
///
/// The store path is appended as the final argument.
#[derive(Debug, Clone)]
pub struct CommandDecryptor {
    name: String,
    program: OsString,
    args: Vec<OsString>,
}

impl CommandDecryptor {
    /// Create a decryptor that runs `program args... <store>`.
    pub fn new<I, A>(program: impl Into<OsString>, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<OsString>,
    {
        let program = program.into();
        Self {
            name: program.to_string_lossy().into_owned(),
            program,
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// The default `sops --decrypt` decryptor.
    pub fn sops() -> Self {
        Self::new(
            constants::DEFAULT_DECRYPTOR,
            constants::DEFAULT_DECRYPTOR_ARGS.iter().copied(),
        )
    }

    fn fail(store: &Path, reason: impl Into<String>) -> Error {
        Error::DecryptionFailed {
            store: store.to_path_buf(),
            reason: reason.into(),
        }
    }

    /// Locate the decryption tool on PATH.
    fn locate(&self, store: &Path) -> Result<PathBuf> {
        which::which(&self.program).map_err(|e| {
            Self::fail(
                store,
                format!("decryptor '{}' not found: {}", self.name, e),
            )
        })
    }
}

impl Default for CommandDecryptor {
    fn default() -> Self {
        Self::sops()
    }
}

impl Decryptor for CommandDecryptor {
    fn name(&self) -> &str {
        &self.name
    }

    fn decrypt(&self, store: &Path) -> Result<Zeroizing<Vec<u8>>> {
        if !store.is_file() {
            return Err(Self::fail(store, "store does not exist or is not a file"));
        }

        let program = self.locate(store)?;
        debug!(decryptor = %program.display(), store = %store.display(), "invoking decryptor");

        let output = Command::new(&program)
            .args(&self.args)
            .arg(store)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| Self::fail(store, format!("failed to run '{}': {}", self.name, e)))?;

        let payload = Zeroizing::new(output.stdout);

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stderr = stderr.trim();
            let reason = if stderr.is_empty() {
                match output.status.code() {
                    Some(code) => format!("{} exited with status {}", self.name, code),
                    None => format!("{} was terminated by a signal", self.name),
                }
            } else {
                format!("{}: {}", self.name, stderr)
            };
            return Err(Self::fail(store, reason));
        }

        trace!(payload_len = payload.len(), "decryptor succeeded");
        Ok(payload)
    }
}
