//! Path and key constants
//!
//! Centralized registry for on-disk names, config file keys and API routes.

/// Application name, used for the platform data directory.
pub const APP_NAME: &str = "darkpoold";

/// Files inside the data directory
pub mod files {
    pub const CONFIG: &str = "darkpoold.conf";
    pub const LOG: &str = "darkpoold.log";
    pub const DATABASE_STEM: &str = "darkpoold";
    pub const DATABASE_EXT: &str = "db";
}

/// Config file section and keys
pub mod keys {
    pub const SECTION: &str = "Default";

    pub const RPC_CONNECT: &str = "bitcoind-rpc-connect";
    pub const RPC_PORT: &str = "bitcoind-rpc-port";
    pub const RPC_USER: &str = "bitcoind-rpc-user";
    pub const RPC_PASSWORD: &str = "bitcoind-rpc-password";
    pub const GUI_HOST: &str = "gui-host";
    pub const GUI_PORT: &str = "gui-port";
    pub const GUI_USER: &str = "gui-user";
    pub const GUI_PASSWORD: &str = "gui-password";
    pub const LOG_FILE: &str = "logfile";
}

/// GUI API routes
pub mod routes {
    pub const HEALTH: &str = "/health";
    pub const CONFIG: &str = "/config";
    pub const WALLET_UNLOCK: &str = "/wallet/unlock";
}

/// Backend RPC method names
pub mod methods {
    pub const GET_INFO: &str = "getinfo";
    pub const WALLET_PASSPHRASE: &str = "walletpassphrase";
}
