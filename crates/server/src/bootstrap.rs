use ronja_core::config::{AppConfig, ConfigError, LoadOptions};
use ronja_db::{connect_with_settings, migrations, DbPool};
use ronja_exchange::{ExchangeError, MetalExchangeClient};
use thiserror::Error;
use tracing::{info, warn};

use crate::AppState;

pub struct Application {
    pub config: AppConfig,
    pub db_pool: DbPool,
    pub state: AppState,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("database connection failed: {0}")]
    DatabaseConnect(#[source] sqlx::Error),
    #[error("database migration failed: {0}")]
    Migration(#[source] sqlx::migrate::MigrateError),
    #[error("exchange client setup failed: {0}")]
    Exchange(#[source] ExchangeError),
}

pub async fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config).await
}

/// Composition root: pool, schema, stores, services and the optional
/// exchange client, wired into router state.
pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let db_pool = connect_with_settings(
        &config.database.url,
        config.database.max_connections,
        config.database.timeout_secs,
    )
    .await
    .map_err(BootstrapError::DatabaseConnect)?;
    info!(
        event_name = "system.bootstrap.database_connected",
        correlation_id = "bootstrap",
        "database connection established"
    );

    migrations::run_pending(&db_pool).await.map_err(BootstrapError::Migration)?;
    info!(
        event_name = "system.bootstrap.migrations_applied",
        correlation_id = "bootstrap",
        "database migrations applied"
    );

    let exchange = if config.exchange.has_access_key() {
        let client =
            MetalExchangeClient::from_config(&config.exchange).map_err(BootstrapError::Exchange)?;
        info!(
            event_name = "system.bootstrap.exchange_ready",
            correlation_id = "bootstrap",
            base_url = client.base_url(),
            "exchange client configured"
        );
        Some(client)
    } else {
        warn!(
            event_name = "system.bootstrap.exchange_disabled",
            correlation_id = "bootstrap",
            "exchange.access_key is not set; /exchange/latest will answer 503"
        );
        None
    };

    let state = AppState::with_sql_store(db_pool.clone(), exchange);
    Ok(Application { config, db_pool, state })
}

#[cfg(test)]
mod tests {
    use ronja_core::config::{ConfigOverrides, LoadOptions};

    use crate::bootstrap::{bootstrap, BootstrapError};

    fn overrides(database_url: &str, access_key: Option<&str>) -> LoadOptions {
        LoadOptions {
            overrides: ConfigOverrides {
                database_url: Some(database_url.to_string()),
                database_max_connections: Some(1),
                exchange_access_key: access_key.map(str::to_string),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        }
    }

    #[tokio::test]
    async fn bootstrap_applies_migrations_and_leaves_exchange_disabled_without_key() {
        let app = bootstrap(overrides("sqlite::memory:", None)).await.expect("bootstrap");

        let (table_count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM sqlite_master \
             WHERE type = 'table' AND name IN ('customer', 'representative')",
        )
        .fetch_one(&app.db_pool)
        .await
        .expect("table count");

        assert_eq!(table_count, 2);
        assert!(app.state.exchange.is_none());
        assert!(app.state.customers.find_all().await.expect("list").is_empty());
    }

    #[tokio::test]
    async fn bootstrap_builds_exchange_client_when_key_is_present() {
        let app =
            bootstrap(overrides("sqlite::memory:", Some("private-token"))).await.expect("bootstrap");
        assert!(app.state.exchange.is_some());
    }

    #[tokio::test]
    async fn bootstrap_rejects_non_sqlite_database_url() {
        let result = bootstrap(overrides("postgres://localhost/ronja", None)).await;
        assert!(matches!(result, Err(BootstrapError::Config(_))));
    }
}
