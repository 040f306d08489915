//! Secret bundle parsing.
//!
//! A decrypted store is a flat document mapping secret names to scalar
//! values. SOPS emits the same format the store was written in, so the
//! format is usually picked from the store's file extension.
//!
//! # Supported Formats
//!
//! - JSON (flat object)
//! - YAML (flat mapping)
//! - dotenv (`KEY=value` lines)
//!
//! Values keep their textual form: `PORT: 8080` yields the string `"8080"`.

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use serde_json::value::RawValue;
use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;
use std::path::Path;
use tracing::debug;
use zeroize::Zeroizing;

use crate::error::{Error, Result};

type Entries = BTreeMap<String, Zeroizing<String>>;

/// Payload format produced by the decryptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Json,
    Yaml,
    Dotenv,
}

impl Format {
    /// Pick a format from the store's extension.
    ///
    /// Unknown extensions fall back to JSON, which is what SOPS emits for
    /// files it cannot classify.
    pub fn detect(store: &Path) -> Self {
        let ext = store
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match ext.as_deref() {
            Some("yaml" | "yml") => Format::Yaml,
            Some("env" | "dotenv") => Format::Dotenv,
            _ => Format::Json,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Yaml => "yaml",
            Format::Dotenv => "dotenv",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decrypted secrets, held in memory for the duration of a launch.
///
/// Values are zeroized on drop. `Debug` output lists names only.
#[derive(Default, PartialEq, Eq)]
pub struct SecretBundle {
    secrets: Entries,
}

impl SecretBundle {
    /// Parse a decrypted payload.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SecretParseFailed`] if the payload is not valid
    /// UTF-8, is syntactically malformed, is not a map at the top level,
    /// repeats a key, or holds a nested or null value. Nothing is returned
    /// on failure, so a partially parsed bundle can never be used.
    pub fn parse(payload: &[u8], format: Format) -> Result<Self> {
        let text = std::str::from_utf8(payload)
            .map_err(|e| Error::parse(format.as_str(), format!("payload is not valid UTF-8: {}", e)))?;

        let secrets = match format {
            Format::Json => parse_json(text)?,
            Format::Yaml => parse_yaml(text)?,
            Format::Dotenv => parse_dotenv(text)?,
        };

        debug!(%format, count = secrets.len(), "parsed secret bundle");
        Ok(Self { secrets })
    }

    /// Get a secret value by name.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.secrets.get(key).map(|v| v.as_str())
    }

    /// Secret names in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.secrets.keys().map(String::as_str)
    }

    /// All secrets in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.secrets.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.secrets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.secrets.is_empty()
    }
}

impl FromIterator<(String, String)> for SecretBundle {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            secrets: iter
                .into_iter()
                .map(|(k, v)| (k, Zeroizing::new(v)))
                .collect(),
        }
    }
}

impl fmt::Debug for SecretBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretBundle")
            .field("keys", &self.secrets.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Map visitor shared by the JSON and YAML parsers.
///
/// Rejects duplicate keys, which both serde_json and serde_yaml would
/// otherwise resolve silently or inconsistently.
struct FlatVisitor<K, V> {
    key: fn(K) -> std::result::Result<String, String>,
    value: fn(V) -> std::result::Result<String, String>,
    marker: PhantomData<(K, V)>,
}

impl<K, V> FlatVisitor<K, V> {
    fn new(
        key: fn(K) -> std::result::Result<String, String>,
        value: fn(V) -> std::result::Result<String, String>,
    ) -> Self {
        Self {
            key,
            value,
            marker: PhantomData,
        }
    }
}

impl<'de, K, V> Visitor<'de> for FlatVisitor<K, V>
where
    K: Deserialize<'de>,
    V: Deserialize<'de>,
{
    type Value = Entries;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a flat map of secret names to scalar values")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<Entries, A::Error> {
        let mut entries = Entries::new();

        while let Some(key) = map.next_key::<K>()? {
            let key = (self.key)(key).map_err(de::Error::custom)?;
            let value = map.next_value::<V>()?;

            if entries.contains_key(&key) {
                return Err(de::Error::custom(format!("duplicate key '{}'", key)));
            }
            let value = (self.value)(value)
                .map_err(|reason| de::Error::custom(format!("key '{}': {}", key, reason)))?;
            entries.insert(key, Zeroizing::new(value));
        }

        Ok(entries)
    }

    // A bare string document must not be quoted back in the error.
    fn visit_str<E: de::Error>(self, _v: &str) -> std::result::Result<Entries, E> {
        Err(E::custom("expected a map at the top level, found a string"))
    }
}

fn parse_json(text: &str) -> Result<Entries> {
    let fail = |e: serde_json::Error| Error::parse("json", e.to_string());

    let mut de = serde_json::Deserializer::from_str(text);
    let entries = (&mut de)
        .deserialize_any(FlatVisitor::new(Ok, json_scalar))
        .map_err(fail)?;
    de.end().map_err(fail)?;

    Ok(entries)
}

/// Keep the source text of a JSON scalar; only strings are unescaped.
fn json_scalar(raw: Box<RawValue>) -> std::result::Result<String, String> {
    let text = raw.get();
    match text.as_bytes().first() {
        Some(b'"') => serde_json::from_str::<String>(text).map_err(|e| e.to_string()),
        Some(b'{') => Err("nested objects are not supported".to_string()),
        Some(b'[') => Err("arrays are not supported".to_string()),
        Some(b'n') => Err("null is not a secret value".to_string()),
        Some(_) => Ok(text.to_string()),
        None => Err("empty value".to_string()),
    }
}

/// Parse a flat YAML mapping.
///
/// The first pass checks the shape: scalar values, no nulls, no duplicates.
/// The second reads every scalar as a string, which gives back its source
/// text (`1.50`, `0x1F`, `0123`) instead of a resolved number.
fn parse_yaml(text: &str) -> Result<Entries> {
    let fail = |e: serde_yaml::Error| Error::parse("yaml", e.to_string());

    serde_yaml::Deserializer::from_str(text)
        .deserialize_any(FlatVisitor::new(yaml_key, require_scalar))
        .map_err(fail)?;

    serde_yaml::Deserializer::from_str(text)
        .deserialize_any(FlatVisitor::<String, String>::new(Ok, Ok))
        .map_err(fail)
}

fn yaml_key(key: serde_yaml::Value) -> std::result::Result<String, String> {
    match key {
        serde_yaml::Value::String(s) => Ok(s),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        serde_yaml::Value::Bool(b) => Ok(b.to_string()),
        _ => Err("keys must be scalars".to_string()),
    }
}

/// Shape check only; the value's text is read in the second pass.
fn require_scalar(value: serde_yaml::Value) -> std::result::Result<String, String> {
    match value {
        serde_yaml::Value::String(_)
        | serde_yaml::Value::Number(_)
        | serde_yaml::Value::Bool(_) => Ok(String::new()),
        serde_yaml::Value::Null => Err("null is not a secret value".to_string()),
        serde_yaml::Value::Sequence(_) => Err("sequences are not supported".to_string()),
        serde_yaml::Value::Mapping(_) => Err("nested mappings are not supported".to_string()),
        serde_yaml::Value::Tagged(tagged) => Err(format!("unsupported tag {}", tagged.tag)),
    }
}

/// Parse `KEY=value` lines.
///
/// Skips blank lines and `#` comments, accepts an `export ` prefix, and
/// strips one pair of matching surrounding quotes. SOPS writes newlines in
/// values as `\n`; those are restored except inside single quotes.
fn parse_dotenv(text: &str) -> Result<Entries> {
    let mut entries = Entries::new();

    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let line = line.strip_prefix("export ").map_or(line, str::trim_start);
        let (key, value) = line
            .split_once('=')
            .ok_or_else(|| Error::parse("dotenv", format!("line {}: missing '='", i + 1)))?;

        let key = key.trim().to_string();
        if entries.contains_key(&key) {
            return Err(Error::parse(
                "dotenv",
                format!("line {}: duplicate key '{}'", i + 1, key),
            ));
        }
        entries.insert(key, Zeroizing::new(dotenv_value(value.trim())));
    }

    Ok(entries)
}

fn dotenv_value(value: &str) -> String {
    let single_quoted = value.len() >= 2 && value.starts_with('\'') && value.ends_with('\'');
    let double_quoted = value.len() >= 2 && value.starts_with('"') && value.ends_with('"');

    if single_quoted {
        value[1..value.len() - 1].to_string()
    } else if double_quoted {
        value[1..value.len() - 1].replace("\\n", "\n")
    } else {
        value.replace("\\n", "\n")
    }
}
