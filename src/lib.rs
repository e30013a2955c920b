//! darkpoold: daemon bootstrap. Resolves configuration, talks to a
//! bitcoind-style JSON-RPC backend, exposes an authenticated GUI API.
//!
//! # Architecture
//!
//! ```text
//! ConfigOverrides ─┐
//! darkpoold.conf ──┼──► RuntimeConfig (resolved once, read-only)
//! Defaults ────────┘        │
//!                           ├── rpc_uri() ──► HttpTransport ──► WalletUnlocker
//!                           ├── gui_uri() ──► server (axum, Basic auth)
//!                           ├── database_path ──► db::connect
//!                           └── log_file ──► logging
//! ```
//!
//! # Features
//!
//! - `server` (default) - GUI API on tokio/axum
//!
//! # Usage
//!
//! ```ignore
//! use darkpoold::{ConfigOverrides, HttpTransport, RuntimeConfig, WalletUnlocker};
//!
//! let config = RuntimeConfig::resolve(&ConfigOverrides::new().testnet())?;
//! let unlocker = WalletUnlocker::new(HttpTransport::from_config(&config));
//! let result = unlocker.unlock(Some("passphrase"))?;
//! ```

pub mod auth;
pub mod config;
pub mod core;
pub mod db;
pub mod logging;
pub mod rpc;
pub mod uri;
pub mod wallet;

#[cfg(feature = "server")]
pub mod runtime;
#[cfg(feature = "server")]
pub mod server;

pub use auth::{check_auth, Credentials};
pub use config::{check_config, ConfigError, ConfigFile, ConfigOverrides, RuntimeConfig};
pub use rpc::{Field, HttpTransport, RpcResponse, RpcTransport, TransportError};
pub use uri::ConnectionUri;
pub use wallet::{LockState, UnlockError, WalletUnlockResult, WalletUnlocker};

#[cfg(feature = "server")]
pub use runtime::{install_signal_handlers, Shutdown};
#[cfg(feature = "server")]
pub use server::{create_router, create_router_with_transport};
