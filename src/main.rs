//! OTP Gate - One-time-password issuance with per-phone-number deduplication
//!
//! Serves the gate over HTTP, backed by the development OTP service.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use otp_gate::api::create_router;
use otp_gate::{spawn_cleanup_task, AppState, Config};

/// Main entry point for the OTP gate server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Build the gate, OTP service and orchestrator
/// 4. Start the expired marker sweep (unless disabled)
/// 5. Serve the Axum router on the configured port
/// 6. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "otp_gate=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting OTP Gate Server");

    let config = Config::from_env();
    info!(
        "Configuration loaded: otp_ttl={}s, port={}, sweep_interval={}s, request_timeout={}s, rollback_on_issue_failure={}",
        config.otp_ttl,
        config.server_port,
        config.sweep_interval,
        config.request_timeout,
        config.rollback_on_issue_failure
    );

    let state = AppState::from_config(&config);
    info!("Phone number cache initialized");

    let sweep_handle = if config.sweep_interval > 0 {
        let handle = spawn_cleanup_task(
            state.cache().clone(),
            Duration::from_secs(config.sweep_interval),
        );
        info!("Expired marker sweep started");
        Some(handle)
    } else {
        info!("Expired marker sweep disabled; relying on lazy expiry");
        None
    };

    let app = create_router(state, config.timeout());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(sweep_handle))
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM), then aborts the sweep task.
async fn shutdown_signal(sweep_handle: Option<JoinHandle<()>>) {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    if let Some(handle) = sweep_handle {
        handle.abort();
        warn!("Sweep task aborted");
    }
}
