//! The launch pipeline: decrypt, parse, build, replace.
//!
//! Each stage runs to completion before the next starts, and the first
//! failure ends the launch.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::core::bundle::{Format, SecretBundle};
use crate::core::decrypt::Decryptor;
use crate::core::env::LaunchEnvironment;
use crate::core::launch::{self, Target};
use crate::error::{Error, Result};

/// Launches a target with the secrets of one store.
pub struct Launcher<D> {
    decryptor: D,
    store: PathBuf,
    format: Option<Format>,
}

impl<D: Decryptor> Launcher<D> {
    pub fn new(decryptor: D, store: impl Into<PathBuf>) -> Self {
        Self {
            decryptor,
            store: store.into(),
            format: None,
        }
    }

    /// Force a payload format instead of detecting it from the extension.
    pub fn with_format(mut self, format: Option<Format>) -> Self {
        self.format = format;
        self
    }

    pub fn store(&self) -> &Path {
        &self.store
    }

    /// The payload format this launcher will parse.
    pub fn format(&self) -> Format {
        self.format.unwrap_or_else(|| Format::detect(&self.store))
    }

    /// Decrypt and parse the store.
    pub fn load(&self) -> Result<SecretBundle> {
        debug!(
            decryptor = self.decryptor.name(),
            store = %self.store.display(),
            "decrypting store"
        );
        let payload = self.decryptor.decrypt(&self.store)?;
        SecretBundle::parse(&payload, self.format())
    }

    /// Run every stage except the handoff, against an explicit inherited
    /// environment.
    pub fn prepare<I, K, V>(&self, inherited: I) -> Result<LaunchEnvironment>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<OsString>,
        V: Into<OsString>,
    {
        let bundle = self.load()?;
        LaunchEnvironment::build(inherited, &bundle)
    }

    /// Run the full pipeline and replace the current process with `target`.
    ///
    /// Returns only if the launch was aborted.
    pub fn launch(&self, target: &Target) -> Error {
        match self.prepare(std::env::vars_os()) {
            Ok(env) => launch::replace(target, env),
            Err(e) => e,
        }
    }
}
