//! Keys command.
//!
//! Decrypts the store and lists the secret names it would inject. Values
//! are never printed.

use std::path::Path;

use crate::cli::output;
use crate::core::config::{Config, Overrides};
use crate::core::validation::{validate_key, validate_value};
use crate::error::Result;

/// List the secret names in the configured store.
pub fn execute(config_path: Option<&Path>, overrides: Overrides, json: bool) -> Result<()> {
    let config = Config::load(config_path, overrides)?;
    let bundle = config.launcher().load()?;

    for (key, value) in bundle.iter() {
        validate_key(key)?;
        validate_value(key, value)?;
    }

    let keys: Vec<&str> = bundle.keys().collect();

    if json {
        let output = serde_json::json!({
            "store": config.store,
            "keys": keys,
            "count": keys.len()
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if keys.is_empty() {
        output::dimmed("no secrets in store");
    } else {
        output::header(&format!(
            "{} secrets in {}",
            keys.len(),
            output::path(&config.store.display().to_string())
        ));
        for key in keys {
            output::list_item(key);
        }
    }

    Ok(())
}
