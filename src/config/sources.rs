//! Value sources for configuration resolution.
//!
//! Each resolvable setting is looked up in an ordered chain of sources
//! (overrides, config file, built-in defaults). The first source that returns a
//! non-empty value wins. Empty strings count as absent at every level.

use std::path::{Path, PathBuf};

use tracing::trace;

use super::port::{DEFAULT_GUI_PORT, DEFAULT_RPC_PORT};
use crate::core::paths::{files, keys};

/// Settings resolved through the source chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Setting {
    RpcConnect,
    RpcPort,
    RpcUser,
    RpcPassword,
    GuiHost,
    GuiPort,
    GuiUser,
    GuiPassword,
    LogFile,
}

impl Setting {
    /// Key under the `[Default]` section of the config file.
    pub fn file_key(&self) -> &'static str {
        match self {
            Setting::RpcConnect => keys::RPC_CONNECT,
            Setting::RpcPort => keys::RPC_PORT,
            Setting::RpcUser => keys::RPC_USER,
            Setting::RpcPassword => keys::RPC_PASSWORD,
            Setting::GuiHost => keys::GUI_HOST,
            Setting::GuiPort => keys::GUI_PORT,
            Setting::GuiUser => keys::GUI_USER,
            Setting::GuiPassword => keys::GUI_PASSWORD,
            Setting::LogFile => keys::LOG_FILE,
        }
    }
}

pub trait ValueSource {
    /// Short label for trace output.
    fn name(&self) -> &'static str;
    fn lookup(&self, setting: Setting) -> Option<String>;
}

/// Ordered list of sources. Earlier sources take precedence.
pub struct SourceChain<'a> {
    sources: Vec<&'a dyn ValueSource>,
}

impl<'a> SourceChain<'a> {
    pub fn new(sources: Vec<&'a dyn ValueSource>) -> Self { Self { sources } }

    pub fn resolve(&self, setting: Setting) -> Option<String> {
        for source in &self.sources {
            if let Some(value) = source.lookup(setting).filter(|v| !v.is_empty()) {
                trace!(key = setting.file_key(), source = source.name(), "setting resolved");
                return Some(value);
            }
        }
        None
    }

    /// Resolved value, or empty string when no source has one.
    pub fn value(&self, setting: Setting) -> String {
        self.resolve(setting).unwrap_or_default()
    }
}

/// Built-in defaults. The log file default depends on the data directory.
#[derive(Debug, Clone)]
pub struct Defaults {
    log_file: PathBuf,
}

impl Defaults {
    pub fn new(data_dir: &Path) -> Self {
        Self { log_file: data_dir.join(files::LOG) }
    }
}

impl ValueSource for Defaults {
    fn name(&self) -> &'static str { "default" }

    fn lookup(&self, setting: Setting) -> Option<String> {
        let value = match setting {
            Setting::RpcConnect => "localhost".to_string(),
            Setting::RpcPort => DEFAULT_RPC_PORT.to_string(),
            Setting::RpcUser => "bitcoinrpc".to_string(),
            Setting::GuiHost => "localhost".to_string(),
            Setting::GuiPort => DEFAULT_GUI_PORT.to_string(),
            Setting::GuiUser => "xcpgui".to_string(),
            Setting::LogFile => self.log_file.to_string_lossy().into_owned(),
            Setting::RpcPassword | Setting::GuiPassword => return None,
        };
        Some(value)
    }
}
