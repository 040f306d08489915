//! Configuration loading.
//!
//! Settings come from, highest precedence first: command-line flags,
//! `ENVSEAL_*` environment variables (both handled by clap), the
//! `.envseal.toml` file, and built-in defaults.
//!
//! ```toml
//! store = "secrets.enc.json"
//! format = "json"
//!
//! [decryptor]
//! command = "sops"
//! args = ["--decrypt"]
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::core::bundle::Format;
use crate::core::constants;
use crate::core::decrypt::CommandDecryptor;
use crate::core::pipeline::Launcher;
use crate::error::{ConfigError, Result};

/// Contents of `.envseal.toml`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Encrypted secret store. Relative paths are relative to the file.
    #[serde(default)]
    pub store: Option<PathBuf>,
    /// Payload format; detected from the store extension when absent
    #[serde(default)]
    pub format: Option<Format>,
    #[serde(default)]
    pub decryptor: DecryptorConfig,
}

/// The `[decryptor]` table.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DecryptorConfig {
    #[serde(default)]
    pub command: Option<String>,
    #[serde(default)]
    pub args: Option<Vec<String>>,
}

impl FileConfig {
    /// Load a config file.
    ///
    /// With no explicit path, `.envseal.toml` in the current directory is
    /// used if present and an empty config otherwise.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if an explicit path doesn't exist,
    /// or `ConfigError::Parse` if the TOML is malformed.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) if !path.exists() => {
                return Err(ConfigError::NotFound(path.to_path_buf()).into())
            }
            Some(path) => path.to_path_buf(),
            None => {
                let default = PathBuf::from(constants::CONFIG_FILE);
                if !default.exists() {
                    debug!("no config file, using defaults");
                    return Ok(Self::default());
                }
                default
            }
        };

        debug!(path = %path.display(), "loading config");
        let contents = std::fs::read_to_string(&path).map_err(ConfigError::ReadFile)?;
        let mut config = Self::from_toml(&contents)?;

        if let (Some(store), Some(dir)) = (&config.store, path.parent()) {
            if store.is_relative() && !dir.as_os_str().is_empty() {
                config.store = Some(dir.join(store));
            }
        }

        Ok(config)
    }

    /// Parse config file contents.
    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents).map_err(ConfigError::Parse)?)
    }
}

/// Values supplied on the command line or through the environment.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub store: Option<PathBuf>,
    pub format: Option<Format>,
    pub decryptor: Option<String>,
    /// Replaces the file's decryptor args when non-empty
    pub decryptor_args: Vec<String>,
}

/// Fully resolved settings for one launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub store: PathBuf,
    pub format: Option<Format>,
    pub decryptor: String,
    pub decryptor_args: Vec<String>,
}

impl Config {
    /// Merge overrides over a config file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingStore` if no layer names a store.
    pub fn resolve(file: FileConfig, overrides: Overrides) -> Result<Self> {
        let store = overrides
            .store
            .or(file.store)
            .ok_or(ConfigError::MissingStore)?;

        let decryptor = overrides
            .decryptor
            .or(file.decryptor.command)
            .unwrap_or_else(|| constants::DEFAULT_DECRYPTOR.to_string());

        let decryptor_args = if !overrides.decryptor_args.is_empty() {
            overrides.decryptor_args
        } else {
            file.decryptor.args.unwrap_or_else(|| {
                constants::DEFAULT_DECRYPTOR_ARGS
                    .iter()
                    .map(|s| s.to_string())
                    .collect()
            })
        };

        let config = Self {
            store,
            format: overrides.format.or(file.format),
            decryptor,
            decryptor_args,
        };
        debug!(
            store = %config.store.display(),
            decryptor = %config.decryptor,
            format = ?config.format,
            "config resolved"
        );
        Ok(config)
    }

    /// Load the config file at `path` (or the default) and apply overrides.
    pub fn load(path: Option<&Path>, overrides: Overrides) -> Result<Self> {
        Self::resolve(FileConfig::load(path)?, overrides)
    }

    pub fn decryptor(&self) -> CommandDecryptor {
        CommandDecryptor::new(&self.decryptor, &self.decryptor_args)
    }

    pub fn launcher(&self) -> Launcher<CommandDecryptor> {
        Launcher::new(self.decryptor(), &self.store).with_format(self.format)
    }
}
