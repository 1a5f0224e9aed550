use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use ronja_db::DbPool;
use serde::Serialize;
use tracing::warn;

#[derive(Clone)]
pub struct HealthState {
    db_pool: DbPool,
    exchange_configured: bool,
}

impl HealthState {
    pub fn new(db_pool: DbPool, exchange_configured: bool) -> Self {
        Self { db_pool, exchange_configured }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: HealthCheck,
    pub exchange: HealthCheck,
    pub checked_at: String,
}

pub fn router(state: HealthState) -> Router {
    Router::new().route("/health", get(health)).with_state(state)
}

/// Readiness follows the database only; a missing exchange key just disables
/// `/exchange/latest`.
pub async fn health(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let database = database_check(&state.db_pool).await;
    let ready = database.status == "ready";

    let exchange = if state.exchange_configured {
        HealthCheck { status: "ready", detail: "exchange access key configured".to_string() }
    } else {
        HealthCheck { status: "disabled", detail: "exchange.access_key is not set".to_string() }
    };

    let payload = HealthResponse {
        status: if ready { "ready" } else { "degraded" },
        database,
        exchange,
        checked_at: Utc::now().to_rfc3339(),
    };

    let status_code = if ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (status_code, Json(payload))
}

async fn database_check(pool: &DbPool) -> HealthCheck {
    match sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM customer").fetch_one(pool).await {
        Ok(count) => HealthCheck { status: "ready", detail: format!("{count} customer(s) stored") },
        Err(error) => {
            warn!(
                event_name = "system.health.database_degraded",
                error = %error,
                "database health check failed"
            );
            HealthCheck { status: "degraded", detail: format!("database query failed: {error}") }
        }
    }
}
