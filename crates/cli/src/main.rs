//! Workflow monitor entry point.
//!
//! This binary is the composition root. Responsibilities:
//!
//! 1. **Parse configuration**: namespace, callback token and listen address
//!    from the command line, validated into an immutable [`relay::RelayConfig`].
//! 2. **Wire observability**: `tracing-subscriber` with a JSON layer and an
//!    `EnvFilter` (`RUST_LOG` wins over `--log-level`).
//! 3. **Construct infrastructure**: a [`backend::BackendClient`] injected into
//!    the [`relay::Dispatcher`], fronted by a [`listener::EventListener`].
//! 4. **Supervise**: serve until Ctrl-C, or until the listener escalates a
//!    fatal relay error, in which case the process exits with status 1.

mod cli;
mod supervisor;

use std::process::ExitCode;

use anyhow::Context;
use backend::BackendClient;
use clap::Parser;
use listener::EventListener;
use relay::{Dispatcher, RelayConfig};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::supervisor::{report_fatal, supervise, Termination};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = init_tracing(&cli.log_level) {
        eprintln!("workflow-monitor: {err:#}");
        return ExitCode::FAILURE;
    }

    match run(cli).await {
        Ok(Termination::Shutdown) => {
            info!("workflow-monitor stopped");
            ExitCode::SUCCESS
        }
        Ok(Termination::Fatal(err)) => {
            report_fatal(&err);
            ExitCode::FAILURE
        }
        Err(err) => {
            tracing::error!(severity = "critical", error = ?err, "workflow-monitor failed to start");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(level: &str) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .with_context(|| format!("invalid log level '{level}'"))?;

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(env_filter)
        .with_target(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))
}

async fn run(cli: Cli) -> anyhow::Result<Termination> {
    let config = RelayConfig::new(cli.namespace, cli.callback_token)
        .with_backend_domain(cli.backend_domain)?;

    info!(
        namespace = %config.namespace(),
        backend_host = %config.backend_host(),
        listen = %cli.listen,
        "workflow-monitor starting"
    );

    let client = BackendClient::new()?;
    let (fatal_tx, fatal_rx) = mpsc::channel(1);
    let listener = EventListener::new(Dispatcher::new(config, client), fatal_tx);

    let tcp = TcpListener::bind(cli.listen)
        .await
        .with_context(|| format!("failed to bind {}", cli.listen))?;

    supervise(listener, tcp, fatal_rx, shutdown_signal()).await
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(err) => {
            // Without a signal handler the listener runs until a fatal error.
            tracing::warn!(error = %err, "Failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    }
}
