//! Persisted config file - `<data_dir>/darkpoold.conf`
//!
//! INI with a single `[Default]` section of flat keys:
//!
//! ```text
//! [Default]
//! bitcoind-rpc-user = alice
//! gui-port: 8080
//! ; comment
//! ```
//!
//! Values are taken verbatim after trimming (no quote or escape processing).
//! Keys are case-insensitive. A missing file or a missing section contributes
//! nothing.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use ini::{Ini, ParseOption};
use tracing::debug;

use super::sources::{Setting, ValueSource};
use super::ConfigError;
use crate::core::paths::keys;

#[derive(Debug, Clone, Default)]
pub struct ConfigFile {
    section: Option<BTreeMap<String, String>>,
}

impl ConfigFile {
    /// No file, no values.
    pub fn empty() -> Self { Self::default() }

    /// Load from disk. Absent file is not an error; unreadable or invalid is.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file");
            return Ok(Self::empty());
        }
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let file = Self::parse(&raw).map_err(|source| ConfigError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), has_section = file.has_section(), "config file loaded");
        Ok(file)
    }

    pub fn parse(raw: &str) -> Result<Self, ini::ParseError> {
        let mut options = ParseOption::default();
        options.enabled_quote = false;
        options.enabled_escape = false;

        let ini = Ini::load_from_str_opt(raw, options)?;
        let section = ini.section(Some(keys::SECTION)).map(|props| {
            props
                .iter()
                .map(|(key, value)| (key.trim().to_ascii_lowercase(), value.trim().to_string()))
                .collect()
        });
        Ok(Self { section })
    }

    pub fn has_section(&self) -> bool { self.section.is_some() }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.section.as_ref()?.get(key).map(String::as_str)
    }
}

impl ValueSource for ConfigFile {
    fn name(&self) -> &'static str { "file" }

    fn lookup(&self, setting: Setting) -> Option<String> {
        self.get(setting.file_key()).map(str::to_string)
    }
}
