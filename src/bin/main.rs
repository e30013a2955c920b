//! darkpoold CLI
//!
//!   darkpoold check-config              → resolve config, report completeness
//!   darkpoold show-config               → resolved config as JSON (no passwords)
//!   darkpoold unlock-wallet [--passphrase <p>]
//!   darkpoold serve                     → GUI API on gui-host:gui-port
//!
//! Global options override the config file (`<data-dir>/darkpoold.conf`), which
//! overrides built-in defaults. Each option can also be set through its
//! `DARKPOOLD_*` environment variable.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use serde_json::json;
use tracing::info;

use darkpoold::logging::{init_logging, with_stderr_logging};
use darkpoold::{check_config, ConfigOverrides, HttpTransport, RuntimeConfig, WalletUnlocker};

#[derive(Debug, Parser)]
#[command(name = "darkpoold", version, about = "Daemon bootstrap and GUI API")]
struct Cli {
    #[command(flatten)]
    overrides: OverrideArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct OverrideArgs {
    /// Data directory (default: platform user data dir)
    #[arg(long, global = true, env = "DARKPOOLD_DATA_DIR")]
    data_dir: Option<PathBuf>,
    /// Backend RPC host
    #[arg(long, global = true, env = "DARKPOOLD_BITCOIND_RPC_CONNECT")]
    bitcoind_rpc_connect: Option<String>,
    /// Backend RPC port
    #[arg(long, global = true, env = "DARKPOOLD_BITCOIND_RPC_PORT")]
    bitcoind_rpc_port: Option<String>,
    /// Backend RPC user
    #[arg(long, global = true, env = "DARKPOOLD_BITCOIND_RPC_USER")]
    bitcoind_rpc_user: Option<String>,
    /// Backend RPC password
    #[arg(long, global = true, env = "DARKPOOLD_BITCOIND_RPC_PASSWORD", hide_env_values = true)]
    bitcoind_rpc_password: Option<String>,
    /// GUI API host
    #[arg(long, global = true, env = "DARKPOOLD_GUI_HOST")]
    gui_host: Option<String>,
    /// GUI API port
    #[arg(long, global = true, env = "DARKPOOLD_GUI_PORT")]
    gui_port: Option<String>,
    /// GUI API user
    #[arg(long, global = true, env = "DARKPOOLD_GUI_USER")]
    gui_user: Option<String>,
    /// GUI API password
    #[arg(long, global = true, env = "DARKPOOLD_GUI_PASSWORD", hide_env_values = true)]
    gui_password: Option<String>,
    /// Log file (default: <data-dir>/darkpoold.log)
    #[arg(long, global = true, env = "DARKPOOLD_LOG_FILE")]
    log_file: Option<PathBuf>,
    /// Database file (default: <data-dir>/darkpoold.<version>.db)
    #[arg(long, global = true, env = "DARKPOOLD_DATABASE_FILE")]
    database_file: Option<PathBuf>,
    #[arg(long, global = true)]
    testnet: bool,
    #[arg(long, global = true)]
    testcoin: bool,
    /// Unit-test mode; requires --testnet
    #[arg(long, global = true)]
    unittest: bool,
    #[arg(long, global = true)]
    headless: bool,
}

impl From<OverrideArgs> for ConfigOverrides {
    fn from(args: OverrideArgs) -> Self {
        ConfigOverrides {
            data_dir: args.data_dir,
            rpc_connect: args.bitcoind_rpc_connect,
            rpc_port: args.bitcoind_rpc_port,
            rpc_user: args.bitcoind_rpc_user,
            rpc_password: args.bitcoind_rpc_password,
            gui_host: args.gui_host,
            gui_port: args.gui_port,
            gui_user: args.gui_user,
            gui_password: args.gui_password,
            log_file: args.log_file,
            database_file: args.database_file,
            version_major: None,
            testnet: args.testnet,
            testcoin: args.testcoin,
            unittest: args.unittest,
            headless: args.headless,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Resolve configuration and report whether it is complete
    CheckConfig,
    /// Print the resolved configuration (passwords omitted)
    ShowConfig,
    /// Unlock the backend wallet if it is locked
    UnlockWallet {
        #[arg(long, env = "DARKPOOLD_WALLET_PASSPHRASE", hide_env_values = true)]
        passphrase: Option<String>,
    },
    /// Start the GUI API server
    Serve,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}", json!({"error": format!("{e:#}")}));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let overrides: ConfigOverrides = cli.overrides.into();
    let config = with_stderr_logging(|| RuntimeConfig::resolve(&overrides)).context("resolve configuration")?;
    let _log_guard = init_logging(&config.log_file);

    match cli.command {
        Command::CheckConfig => {
            let complete = check_config(&config);
            println!("{}", json!({"complete": complete}));
            Ok(if complete { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
        Command::ShowConfig => {
            println!("{}", serde_json::to_string_pretty(&config.summary())?);
            Ok(ExitCode::SUCCESS)
        }
        Command::UnlockWallet { passphrase } => {
            let unlocker = WalletUnlocker::new(HttpTransport::from_config(&config));
            let result = unlocker.unlock(passphrase.as_deref()).context("query wallet status")?;
            println!("{}", serde_json::to_string(&result)?);
            Ok(if result.success { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
        Command::Serve => serve(config),
    }
}

#[cfg(feature = "server")]
fn serve(config: RuntimeConfig) -> Result<ExitCode> {
    use darkpoold::{install_signal_handlers, server, Shutdown};
    use std::sync::Arc;

    if !check_config(&config) {
        bail!("incomplete configuration: GUI host, port, user and password and RPC host, port and user are required");
    }

    let rt = tokio::runtime::Runtime::new().context("create runtime")?;
    rt.block_on(async {
        let shutdown = Shutdown::new();
        install_signal_handlers(shutdown.clone());
        server::serve(Arc::new(config), shutdown).await.context("GUI API server")
    })?;
    info!("GUI API stopped");
    Ok(ExitCode::SUCCESS)
}

#[cfg(not(feature = "server"))]
fn serve(_config: RuntimeConfig) -> Result<ExitCode> {
    bail!("built without the `server` feature")
}
