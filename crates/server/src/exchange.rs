use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use ronja_core::errors::ApplicationError;
use ronja_exchange::{MetalExchange, MetalExchangeClient};

use crate::error::ApiError;

pub type ExchangeState = Option<Arc<MetalExchangeClient>>;

pub fn router(client: ExchangeState) -> Router {
    Router::new().route("/exchange/latest", get(latest)).with_state(client)
}

pub async fn latest(State(client): State<ExchangeState>) -> Result<Json<MetalExchange>, ApiError> {
    let client =
        client.ok_or_else(|| ApiError::unavailable("exchange.access_key is not configured"))?;
    let exchange = client.fetch_exchange_data().await.map_err(ApplicationError::from)?;
    Ok(Json(exchange))
}

#[cfg(test)]
mod tests {
    use axum::extract::State;
    use axum::http::StatusCode;

    use super::latest;

    #[tokio::test]
    async fn latest_without_client_is_service_unavailable() {
        let error = latest(State(None)).await.expect_err("no client");
        assert_eq!(error.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
