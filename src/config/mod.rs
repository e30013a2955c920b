//! Runtime configuration - resolved once at startup, read-only afterwards.
//!
//! Resolution order, applied per setting:
//!
//! ```text
//! ConfigOverrides (CLI / embedding host / tests)
//!        │  absent or empty
//!        ▼
//! ConfigFile       (<data_dir>/darkpoold.conf, [Default] section)
//!        │  absent or empty
//!        ▼
//! Defaults         (built in)
//! ```
//!
//! Ports are the only fail-soft fields: whatever the source, a value that does
//! not parse or is out of range becomes the field default.

mod file;
mod port;
mod sources;

pub use file::ConfigFile;
pub use port::{parse_or_default, port_or_default, DEFAULT_GUI_PORT, DEFAULT_RPC_PORT};
pub use sources::{Defaults, Setting, SourceChain, ValueSource};

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use crate::core::paths::{files, APP_NAME};
use crate::core::protocol::{ProtocolParams, VERSION_MAJOR};
use crate::uri::ConnectionUri;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unit-test mode requires testnet")]
    UnitTestRequiresTestnet,
    #[error("no platform data directory available")]
    NoDataDir,
    #[error("create data directory {}: {source}", .path.display())]
    DataDir { path: PathBuf, #[source] source: io::Error },
    #[error("read config file {}: {source}", .path.display())]
    ConfigRead { path: PathBuf, #[source] source: io::Error },
    #[error("parse config file {}: {source}", .path.display())]
    ConfigParse { path: PathBuf, #[source] source: ini::ParseError },
}

/// Explicit overrides. Highest precedence; `None` and empty strings defer to
/// the config file.
#[derive(Clone, Default)]
pub struct ConfigOverrides {
    pub data_dir: Option<PathBuf>,
    pub rpc_connect: Option<String>,
    pub rpc_port: Option<String>,
    pub rpc_user: Option<String>,
    pub rpc_password: Option<String>,
    pub gui_host: Option<String>,
    pub gui_port: Option<String>,
    pub gui_user: Option<String>,
    pub gui_password: Option<String>,
    pub log_file: Option<PathBuf>,
    pub database_file: Option<PathBuf>,
    /// Schema version used in the derived database file name.
    pub version_major: Option<u32>,
    pub testnet: bool,
    pub testcoin: bool,
    pub unittest: bool,
    pub headless: bool,
}

impl ConfigOverrides {
    pub fn new() -> Self { Self::default() }
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self { self.data_dir = Some(dir.into()); self }
    pub fn with_rpc(mut self, connect: impl Into<String>, port: impl Into<String>) -> Self {
        self.rpc_connect = Some(connect.into());
        self.rpc_port = Some(port.into());
        self
    }
    pub fn with_rpc_auth(mut self, user: impl Into<String>, password: impl Into<String>) -> Self {
        self.rpc_user = Some(user.into());
        self.rpc_password = Some(password.into());
        self
    }
    pub fn with_gui(mut self, host: impl Into<String>, port: impl Into<String>) -> Self {
        self.gui_host = Some(host.into());
        self.gui_port = Some(port.into());
        self
    }
    pub fn with_gui_auth(mut self, user: impl Into<String>, password: impl Into<String>) -> Self {
        self.gui_user = Some(user.into());
        self.gui_password = Some(password.into());
        self
    }
    pub fn with_log_file(mut self, path: impl Into<PathBuf>) -> Self { self.log_file = Some(path.into()); self }
    pub fn with_database_file(mut self, path: impl Into<PathBuf>) -> Self { self.database_file = Some(path.into()); self }
    pub fn with_version_major(mut self, version: u32) -> Self { self.version_major = Some(version); self }
    pub fn testnet(mut self) -> Self { self.testnet = true; self }
    pub fn testcoin(mut self) -> Self { self.testcoin = true; self }
    pub fn unittest(mut self) -> Self { self.unittest = true; self }
    pub fn headless(mut self) -> Self { self.headless = true; self }

    /// Unit tests always run on testnet.
    fn check_mode(&self) -> Result<(), ConfigError> {
        if self.unittest && !self.testnet {
            return Err(ConfigError::UnitTestRequiresTestnet);
        }
        Ok(())
    }
}

impl ValueSource for ConfigOverrides {
    fn name(&self) -> &'static str { "override" }

    fn lookup(&self, setting: Setting) -> Option<String> {
        match setting {
            Setting::RpcConnect => self.rpc_connect.clone(),
            Setting::RpcPort => self.rpc_port.clone(),
            Setting::RpcUser => self.rpc_user.clone(),
            Setting::RpcPassword => self.rpc_password.clone(),
            Setting::GuiHost => self.gui_host.clone(),
            Setting::GuiPort => self.gui_port.clone(),
            Setting::GuiUser => self.gui_user.clone(),
            Setting::GuiPassword => self.gui_password.clone(),
            Setting::LogFile => self.log_file.as_ref().map(|p| p.to_string_lossy().into_owned()),
        }
    }
}

impl fmt::Debug for ConfigOverrides {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigOverrides")
            .field("data_dir", &self.data_dir)
            .field("rpc_connect", &self.rpc_connect)
            .field("rpc_port", &self.rpc_port)
            .field("rpc_user", &self.rpc_user)
            .field("rpc_password", &redact(self.rpc_password.as_deref()))
            .field("gui_host", &self.gui_host)
            .field("gui_port", &self.gui_port)
            .field("gui_user", &self.gui_user)
            .field("gui_password", &redact(self.gui_password.as_deref()))
            .field("log_file", &self.log_file)
            .field("database_file", &self.database_file)
            .field("version_major", &self.version_major)
            .field("testnet", &self.testnet)
            .field("testcoin", &self.testcoin)
            .field("unittest", &self.unittest)
            .field("headless", &self.headless)
            .finish()
    }
}

/// Resolved configuration for one process lifetime.
#[derive(Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct RuntimeConfig {
    pub data_dir: PathBuf,
    pub rpc_connect: String,
    pub rpc_port: u16,
    pub rpc_user: String,
    pub rpc_password: String,
    pub gui_host: String,
    pub gui_port: u16,
    pub gui_user: String,
    pub gui_password: String,
    pub log_file: PathBuf,
    pub database_path: PathBuf,
    pub protocol: ProtocolParams,
    pub headless: bool,
    pub testnet: bool,
    pub testcoin: bool,
}

impl RuntimeConfig {
    /// Resolve from overrides, the config file in the data directory, and
    /// defaults. Creates the data directory if it does not exist.
    pub fn resolve(overrides: &ConfigOverrides) -> Result<Self, ConfigError> {
        overrides.check_mode()?;
        let data_dir = prepare_data_dir(overrides.data_dir.as_deref())?;
        let file = ConfigFile::load(&data_dir.join(files::CONFIG))?;
        Ok(Self::build(overrides, data_dir, &file))
    }

    /// Same as [`RuntimeConfig::resolve`] with already-parsed file contents.
    pub fn resolve_with(overrides: &ConfigOverrides, file: &ConfigFile) -> Result<Self, ConfigError> {
        overrides.check_mode()?;
        let data_dir = prepare_data_dir(overrides.data_dir.as_deref())?;
        Ok(Self::build(overrides, data_dir, file))
    }

    fn build(overrides: &ConfigOverrides, data_dir: PathBuf, file: &ConfigFile) -> Self {
        let defaults = Defaults::new(&data_dir);
        let chain = SourceChain::new(vec![overrides as &dyn ValueSource, file, &defaults]);

        let rpc_port = port_or_default(Setting::RpcPort.file_key(), &chain.value(Setting::RpcPort), DEFAULT_RPC_PORT);
        let gui_port = port_or_default(Setting::GuiPort.file_key(), &chain.value(Setting::GuiPort), DEFAULT_GUI_PORT);

        let database_path = overrides
            .database_file
            .clone()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| database_path_for(&data_dir, overrides.version_major.unwrap_or(VERSION_MAJOR)));

        let config = Self {
            rpc_connect: chain.value(Setting::RpcConnect),
            rpc_port,
            rpc_user: chain.value(Setting::RpcUser),
            rpc_password: chain.value(Setting::RpcPassword),
            gui_host: chain.value(Setting::GuiHost),
            gui_port,
            gui_user: chain.value(Setting::GuiUser),
            gui_password: chain.value(Setting::GuiPassword),
            log_file: PathBuf::from(chain.value(Setting::LogFile)),
            database_path,
            protocol: ProtocolParams::default(),
            headless: overrides.headless,
            testnet: overrides.testnet || overrides.unittest,
            testcoin: overrides.testcoin,
            data_dir,
        };
        info!(data_dir = %config.data_dir.display(), rpc = %config.rpc_uri(), gui = %config.gui_uri(), "configuration resolved");
        config
    }

    pub fn rpc_uri(&self) -> ConnectionUri {
        ConnectionUri::http(&self.rpc_user, &self.rpc_password, &self.rpc_connect, self.rpc_port)
    }

    pub fn gui_uri(&self) -> ConnectionUri {
        ConnectionUri::http(&self.gui_user, &self.gui_password, &self.gui_host, self.gui_port)
    }

    /// See [`check_config`].
    pub fn is_complete(&self) -> bool { check_config(self) }

    /// Everything except passwords, for display and the GUI API.
    pub fn summary(&self) -> ConfigSummary {
        ConfigSummary {
            data_dir: self.data_dir.clone(),
            rpc_connect: self.rpc_connect.clone(),
            rpc_port: self.rpc_port,
            rpc_user: self.rpc_user.clone(),
            rpc_password_set: !self.rpc_password.is_empty(),
            gui_host: self.gui_host.clone(),
            gui_port: self.gui_port,
            gui_user: self.gui_user.clone(),
            gui_password_set: !self.gui_password.is_empty(),
            log_file: self.log_file.clone(),
            database_path: self.database_path.clone(),
            headless: self.headless,
            testnet: self.testnet,
            testcoin: self.testcoin,
            complete: self.is_complete(),
        }
    }
}

impl fmt::Debug for RuntimeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuntimeConfig")
            .field("data_dir", &self.data_dir)
            .field("rpc", &self.rpc_uri())
            .field("gui", &self.gui_uri())
            .field("log_file", &self.log_file)
            .field("database_path", &self.database_path)
            .field("protocol", &self.protocol)
            .field("headless", &self.headless)
            .field("testnet", &self.testnet)
            .field("testcoin", &self.testcoin)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ConfigSummary {
    pub data_dir: PathBuf,
    pub rpc_connect: String,
    pub rpc_port: u16,
    pub rpc_user: String,
    pub rpc_password_set: bool,
    pub gui_host: String,
    pub gui_port: u16,
    pub gui_user: String,
    pub gui_password_set: bool,
    pub log_file: PathBuf,
    pub database_path: PathBuf,
    pub headless: bool,
    pub testnet: bool,
    pub testcoin: bool,
    pub complete: bool,
}

/// True iff GUI host/port/user/password and RPC host/port/user are set.
/// The RPC password may be empty.
pub fn check_config(config: &RuntimeConfig) -> bool {
    !config.gui_host.is_empty()
        && config.gui_port != 0
        && !config.gui_user.is_empty()
        && !config.gui_password.is_empty()
        && !config.rpc_connect.is_empty()
        && config.rpc_port != 0
        && !config.rpc_user.is_empty()
}

/// `<data_dir>/darkpoold.<version>.db`
pub fn database_path_for(data_dir: &Path, version_major: u32) -> PathBuf {
    data_dir.join(format!("{}.{}.{}", files::DATABASE_STEM, version_major, files::DATABASE_EXT))
}

/// Per-user application data directory, e.g. `~/.local/share/darkpoold`.
pub fn default_data_dir() -> Result<PathBuf, ConfigError> {
    dirs::data_dir().map(|d| d.join(APP_NAME)).ok_or(ConfigError::NoDataDir)
}

/// Create the leaf directory if missing. Parents must already exist.
fn prepare_data_dir(explicit: Option<&Path>) -> Result<PathBuf, ConfigError> {
    let dir = match explicit.filter(|p| !p.as_os_str().is_empty()) {
        Some(dir) => dir.to_path_buf(),
        None => default_data_dir()?,
    };
    if !dir.is_dir() {
        match fs::create_dir(&dir) {
            Ok(()) => debug!(path = %dir.display(), "created data directory"),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists && dir.is_dir() => {}
            Err(source) => return Err(ConfigError::DataDir { path: dir, source }),
        }
    }
    Ok(dir)
}

fn redact(value: Option<&str>) -> Option<&'static str> {
    value.map(|_| "***")
}
