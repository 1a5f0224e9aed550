use std::time::Duration;

use anyhow::Result;
use ronja_core::config::{AppConfig, LoadOptions};
use ronja_server::shutdown::serve_until;
use ronja_server::{bootstrap, router};

fn init_logging(config: &AppConfig) {
    use ronja_core::config::LogFormat::*;
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    match config.logging.format {
        Compact => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).compact().init();
        }
        Pretty => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).pretty().init();
        }
        Json => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).json().init();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    run().await
}

async fn run() -> Result<()> {
    // Logging must be up before bootstrap emits its lifecycle events.
    let config = AppConfig::load(LoadOptions::default())?;
    init_logging(&config);

    let app = bootstrap::bootstrap_with_config(config).await?;
    let address = format!("{}:{}", app.config.server.bind_address, app.config.server.port);
    let listener = tokio::net::TcpListener::bind(&address).await?;

    tracing::info!(
        event_name = "system.server.started",
        correlation_id = "bootstrap",
        bind_address = %address,
        "ronja-server listening"
    );

    let state = app.state;
    let grace = Duration::from_secs(app.config.server.graceful_shutdown_secs);
    let outcome = serve_until(
        move |stop| async move {
            axum::serve(listener, router(state))
                .with_graceful_shutdown(async {
                    let _ = stop.await;
                })
                .await
        },
        wait_for_shutdown(),
        grace,
    )
    .await;
    app.db_pool.close().await;
    outcome?;

    Ok(())
}

async fn wait_for_shutdown() -> Result<()> {
    tokio::signal::ctrl_c().await?;
    Ok(())
}
