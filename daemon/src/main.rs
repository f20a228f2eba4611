//! rollcall daemon: entry point for serving presence tokens.

mod config;

use std::net::IpAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use rollcall_presence::{Collaborators, Issuer, Verifier};
use rollcall_rpc::{AppState, RpcServer};
use rollcall_store_lmdb::LmdbEnvironment;
use rollcall_types::{EventKey, EventWindow, HolderIdentity, HolderKey, Timestamp};
use rollcall_utils::{format_duration, init_logging, LogFormat};

use crate::config::{DaemonConfig, Overrides};

#[derive(Parser)]
#[command(name = "rollcall-daemon", about = "Presence token issuer and verifier")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "ROLLCALL_CONFIG")]
    config: Option<PathBuf>,

    /// Data directory for the LMDB store.
    #[arg(long, env = "ROLLCALL_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Address the HTTP server binds to.
    #[arg(long, env = "ROLLCALL_RPC_BIND")]
    rpc_bind: Option<IpAddr>,

    #[arg(long, env = "ROLLCALL_RPC_PORT")]
    rpc_port: Option<u16>,

    /// Log format: "human" or "json".
    #[arg(long, env = "ROLLCALL_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "ROLLCALL_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Run the HTTP server.
    Serve {
        /// Seconds a token stays on-time after issuance.
        #[arg(long, env = "ROLLCALL_VALIDITY_SECS")]
        validity_secs: Option<u64>,

        /// Seconds after expiry during which a token is still accepted as late.
        #[arg(long, env = "ROLLCALL_GRACE_SECS")]
        grace_secs: Option<u64>,
    },
    /// Manage holders.
    Holder {
        #[command(subcommand)]
        action: HolderAction,
    },
    /// Manage events.
    Event {
        #[command(subcommand)]
        action: EventAction,
    },
}

#[derive(clap::Subcommand)]
enum HolderAction {
    /// Enroll a holder with a freshly generated signing secret.
    Enroll {
        #[arg(long)]
        key: String,
    },
}

#[derive(clap::Subcommand)]
enum EventAction {
    /// Create or replace an event window.
    Add {
        #[arg(long)]
        key: String,

        /// Window start in Unix seconds; defaults to now.
        #[arg(long)]
        starts_at: Option<u64>,

        /// Window length in seconds.
        #[arg(long, default_value_t = 3600)]
        duration_secs: u64,
    },
}

impl Cli {
    fn resolve_config(&self) -> anyhow::Result<DaemonConfig> {
        let base = match &self.config {
            Some(path) => DaemonConfig::from_toml_file(path)?,
            None => DaemonConfig::default(),
        };
        let (validity_secs, grace_secs) = match &self.command {
            Command::Serve {
                validity_secs,
                grace_secs,
            } => (*validity_secs, *grace_secs),
            _ => (None, None),
        };
        let config = base.apply(Overrides {
            data_dir: self.data_dir.clone(),
            rpc_bind: self.rpc_bind,
            rpc_port: self.rpc_port,
            log_format: self.log_format,
            log_level: self.log_level.clone(),
            validity_secs,
            grace_secs,
        })?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.resolve_config()?;
    init_logging(config.log_format, &config.log_level).context("initialise logging")?;

    if let Some(path) = &cli.config {
        tracing::info!("Loaded config from {}", path.display());
    }

    let store = LmdbEnvironment::open(&config.data_dir, config.map_size_bytes())
        .with_context(|| format!("open store at {}", config.data_dir.display()))?;

    match cli.command {
        Command::Serve { .. } => serve(config, store).await?,
        Command::Holder {
            action: HolderAction::Enroll { key },
        } => {
            let key = HolderKey::parse(&key)?;
            let secret = rollcall_crypto::generate_holder_secret()?;
            store.put_holder(&HolderIdentity {
                key: key.clone(),
                secret,
            })?;
            tracing::info!(holder = %key, "holder enrolled");
        }
        Command::Event {
            action:
                EventAction::Add {
                    key,
                    starts_at,
                    duration_secs,
                },
        } => {
            let key = EventKey::parse(&key)?;
            let starts_at = starts_at.map(Timestamp::new).unwrap_or_else(Timestamp::now);
            let window = EventWindow {
                key: key.clone(),
                starts_at,
                ends_at: starts_at.plus_secs(duration_secs),
            };
            store.put_event(&window)?;
            tracing::info!(
                event = %key,
                starts_at = %window.starts_at,
                ends_at = %window.ends_at,
                "event window saved"
            );
        }
    }

    Ok(())
}

async fn serve(config: DaemonConfig, store: LmdbEnvironment) -> anyhow::Result<()> {
    tracing::info!(
        "Starting rollcall on {} (validity {}, grace {}, {} holders, {} events)",
        config.rpc_addr(),
        format_duration(config.presence.validity_secs),
        format_duration(config.presence.grace_secs),
        store.holder_count()?,
        store.event_count()?,
    );

    let deps = Collaborators::from_store(Arc::new(store));
    let state = Arc::new(AppState::new(
        Issuer::new(deps.clone(), config.presence.clone()),
        Verifier::new(deps, config.presence.clone()),
    ));

    let server = RpcServer::new(config.rpc_addr(), state);
    server
        .start(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutdown signal received, stopping server");
        })
        .await?;

    tracing::info!("rollcall daemon exited cleanly");
    Ok(())
}
