// src/main.rs
use anyhow::{Context, Result};
use health_check_worker::{load_config, HealthCheckLoop, TracingReporter};
use std::path::PathBuf;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("health_check_worker=info".parse()?),
        )
        .init();

    // Optional path to a settings file; environment variables still apply
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    if let Some(path) = &config_path {
        info!("Loading configuration from: {}", path.display());
    }

    let config = load_config(config_path.as_deref()).context("Invalid configuration")?;
    let worker =
        HealthCheckLoop::new(config, TracingReporter).context("Failed to create HTTP client")?;

    let cancel = CancellationToken::new();
    let worker_cancel = cancel.clone();
    let handle = tokio::spawn(async move { worker.run(worker_cancel).await });

    shutdown_signal().await?;
    cancel.cancel();

    handle.await.context("Health check task failed")?;
    Ok(())
}

// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() -> Result<()> {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .context("Failed to install Ctrl+C handler")
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .context("Failed to install signal handler")?
            .recv()
            .await;
        Ok::<_, anyhow::Error>(())
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<Result<()>>();

    tokio::select! {
        res = ctrl_c => res?,
        res = terminate => res?,
    }

    info!("Shutdown signal received");
    Ok(())
}
