//! `sous-chef` entry point.
//!
//! This binary is the composition root for the entire system:
//!
//! 1. **Load configuration** from flags, the environment and an optional
//!    `.env` file, and refuse to start without a usable API key.
//! 2. **Wire observability**: `tracing-subscriber` with a JSON (or pretty)
//!    layer and, when an OTLP endpoint is configured, an OpenTelemetry layer.
//!    All spans and events from every crate in the workspace flow through it.
//! 3. **Construct infrastructure**: the [`llm::GatewayClient`] is injected
//!    into the [`nodes::Orchestrator`], which is shared by every request the
//!    [`listener`] router serves.
//! 4. **Serve** until Ctrl-C, then drain in-flight connections and flush spans.

mod config;
mod telemetry;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use listener::AppState;
use llm::GatewayClient;
use nodes::{Mode, Orchestrator};
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::config::Args;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let telemetry = telemetry::init(args.log_format, args.otlp_endpoint.as_deref())?;
    let result = run(args).await;
    if let Err(err) = &result {
        error!(error = %format!("{err:#}"), "sous-chef stopped with an error");
    }
    telemetry.shutdown();
    result
}

async fn run(args: Args) -> anyhow::Result<()> {
    let gateway = args
        .gateway_config()
        .context("invalid completion gateway configuration")?;
    let mode = Mode::from(args.mode);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        mode = ?mode,
        model = %gateway.model(),
        gateway = gateway.url(),
        "Starting sous-chef"
    );

    let client = GatewayClient::new(gateway).context("failed to build the gateway client")?;
    let orchestrator = Arc::new(Orchestrator::new(Arc::new(client), mode));
    let app = listener::router(AppState::new(orchestrator));

    let tcp = TcpListener::bind(args.bind)
        .await
        .with_context(|| format!("failed to bind {}", args.bind))?;
    info!(addr = %tcp.local_addr()?, "Listening");

    axum::serve(tcp, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server terminated unexpectedly")?;

    info!("Shut down cleanly");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "Failed to listen for the shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
