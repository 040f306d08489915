//! Launch environment construction.
//!
//! Merges a [`SecretBundle`] over a snapshot of the inherited environment.
//! The live process environment is never touched; the result is handed to
//! the process replacer explicitly.

use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};
use std::fmt;
use tracing::debug;

use crate::core::bundle::SecretBundle;
use crate::core::validation::{validate_key, validate_value};
use crate::error::Result;

/// The complete environment a target process will start with.
///
/// Secret values win over inherited variables of the same name. On Unix
/// all values are zeroed when the environment is dropped.
#[derive(Default, PartialEq, Eq)]
pub struct LaunchEnvironment {
    vars: BTreeMap<OsString, OsString>,
    overridden: Vec<String>,
}

impl LaunchEnvironment {
    /// Build from an explicit snapshot of inherited variables.
    ///
    /// Every secret is validated before anything is merged, so an invalid
    /// name aborts the build without producing a partial environment.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::Error::InvalidSecretKey`] if a secret name is
    /// not a valid environment variable name or its value holds a NUL byte.
    pub fn build<I, K, V>(inherited: I, bundle: &SecretBundle) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<OsString>,
        V: Into<OsString>,
    {
        for (key, value) in bundle.iter() {
            validate_key(key)?;
            validate_value(key, value)?;
        }

        let mut vars: BTreeMap<OsString, OsString> = inherited
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        let inherited_count = vars.len();

        let mut overridden = Vec::new();
        for (key, value) in bundle.iter() {
            if vars.insert(key.into(), value.into()).is_some() {
                overridden.push(key.to_string());
            }
        }

        debug!(
            inherited = inherited_count,
            secrets = bundle.len(),
            overridden = ?overridden,
            "built launch environment"
        );

        Ok(Self { vars, overridden })
    }

    /// Build from the current process environment.
    pub fn from_current(bundle: &SecretBundle) -> Result<Self> {
        Self::build(std::env::vars_os(), bundle)
    }

    /// Get a variable by name.
    pub fn get(&self, key: impl AsRef<OsStr>) -> Option<&OsStr> {
        self.vars.get(key.as_ref()).map(OsString::as_os_str)
    }

    /// All variables in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&OsStr, &OsStr)> {
        self.vars.iter().map(|(k, v)| (k.as_os_str(), v.as_os_str()))
    }

    /// Variable names in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &OsStr> {
        self.vars.keys().map(OsString::as_os_str)
    }

    /// The variables as a map.
    pub fn as_map(&self) -> &BTreeMap<OsString, OsString> {
        &self.vars
    }

    /// Secret names that replaced an inherited variable.
    pub fn overridden(&self) -> &[String] {
        &self.overridden
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl fmt::Debug for LaunchEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LaunchEnvironment")
            .field("keys", &self.vars.keys().collect::<Vec<_>>())
            .field("overridden", &self.overridden)
            .finish()
    }
}

impl Drop for LaunchEnvironment {
    fn drop(&mut self) {
        #[cfg(unix)]
        {
            use std::os::unix::ffi::OsStringExt;
            use zeroize::Zeroize;

            for (_, value) in std::mem::take(&mut self.vars) {
                value.into_vec().zeroize();
            }
        }
    }
}
