use std::time::Duration;

use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use tracing::{info, warn};

use ronja_core::config::ExchangeConfig;
use ronja_core::errors::ApplicationError;

use crate::model::{
    LatestPayload, MetalExchange, Rates, ALUMINUM_SYMBOL, COPPER_SYMBOL, LEAD_SYMBOL,
};

#[derive(Debug, Error)]
pub enum ExchangeError {
    #[error("exchange client is not configured: {0}")]
    Configuration(String),
    #[error("exchange request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("exchange service answered with HTTP {status}")]
    Status { status: u16 },
    #[error("exchange payload could not be decoded: {0}")]
    Decode(String),
    #[error("exchange service rejected the request (code {code:?}): {info}")]
    Rejected { code: Option<i64>, info: String },
}

impl From<ExchangeError> for ApplicationError {
    fn from(value: ExchangeError) -> Self {
        match value {
            ExchangeError::Configuration(message) => Self::Configuration(message),
            other => Self::Integration(other.to_string()),
        }
    }
}

/// Fetches the latest quotes with a single GET per call. No retry, no caching.
#[derive(Clone)]
pub struct MetalExchangeClient {
    http: Client,
    base_url: String,
    access_key: SecretString,
    currency: String,
    symbols: String,
}

impl std::fmt::Debug for MetalExchangeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetalExchangeClient")
            .field("base_url", &self.base_url)
            .field("currency", &self.currency)
            .field("symbols", &self.symbols)
            .finish_non_exhaustive()
    }
}

impl MetalExchangeClient {
    pub fn from_config(config: &ExchangeConfig) -> Result<Self, ExchangeError> {
        let access_key = config
            .access_key
            .clone()
            .filter(|_| config.has_access_key())
            .ok_or_else(|| ExchangeError::Configuration("exchange.access_key is not set".into()))?;

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()
            .map_err(|error| ExchangeError::Configuration(error.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            access_key,
            currency: config.currency.clone(),
            symbols: config.symbol_list(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn fetch_exchange_data(&self) -> Result<MetalExchange, ExchangeError> {
        let response = self
            .http
            .get(&self.base_url)
            .query(&[
                ("base", self.currency.as_str()),
                ("symbols", self.symbols.as_str()),
                ("access_key", self.access_key.expose_secret()),
            ])
            .send()
            .await
            .map_err(|error| {
                // The URL carries the access key.
                let error = error.without_url();
                warn!(
                    event_name = "exchange.fetch.transport_failed",
                    error = %error,
                    "exchange request failed"
                );
                ExchangeError::Transport(error)
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(
                event_name = "exchange.fetch.bad_status",
                status = status.as_u16(),
                "exchange service returned an error status"
            );
            return Err(ExchangeError::Status { status: status.as_u16() });
        }

        let body =
            response.text().await.map_err(|error| ExchangeError::Transport(error.without_url()))?;
        let payload: LatestPayload =
            serde_json::from_str(&body).map_err(|error| ExchangeError::Decode(error.to_string()))?;
        let exchange = into_exchange(payload, &self.currency)?;

        info!(
            event_name = "exchange.fetch.completed",
            currency = %exchange.currency,
            date = %exchange.date,
            "exchange rates fetched"
        );
        Ok(exchange)
    }
}

fn into_exchange(payload: LatestPayload, requested: &str) -> Result<MetalExchange, ExchangeError> {
    if !payload.success {
        let (code, info) = match payload.error {
            Some(error) => (
                error.code,
                error.info.or(error.kind).unwrap_or_else(|| "no detail given".to_string()),
            ),
            None => (None, "no detail given".to_string()),
        };
        return Err(ExchangeError::Rejected { code, info });
    }

    let rate = |symbol: &str| {
        payload
            .rates
            .get(symbol)
            .copied()
            .ok_or_else(|| ExchangeError::Decode(format!("missing rate `{symbol}`")))
    };
    let rates = Rates {
        aluminum: rate(ALUMINUM_SYMBOL)?,
        copper: rate(COPPER_SYMBOL)?,
        lead: rate(LEAD_SYMBOL)?,
    };
    let date = payload.date.ok_or_else(|| ExchangeError::Decode("missing `date`".to_string()))?;

    Ok(MetalExchange {
        success: true,
        currency: payload.base.unwrap_or_else(|| requested.to_string()),
        date,
        rates,
    })
}

#[cfg(test)]
mod tests {
    use ronja_core::config::AppConfig;
    use ronja_core::errors::ApplicationError;

    use super::{ExchangeError, MetalExchangeClient};

    #[test]
    fn client_requires_access_key() {
        let config = AppConfig::default();
        let error = MetalExchangeClient::from_config(&config.exchange).expect_err("no key");

        assert!(matches!(error, ExchangeError::Configuration(_)));
        assert!(matches!(ApplicationError::from(error), ApplicationError::Configuration(_)));
    }

    #[test]
    fn blank_access_key_counts_as_missing() {
        let mut config = AppConfig::default();
        config.exchange.access_key = Some("   ".to_string().into());

        assert!(MetalExchangeClient::from_config(&config.exchange).is_err());
    }

    #[test]
    fn debug_output_hides_access_key() {
        let mut config = AppConfig::default();
        config.exchange.access_key = Some("private-token".to_string().into());

        let client = MetalExchangeClient::from_config(&config.exchange).expect("client");
        assert!(!format!("{client:?}").contains("private-token"));
    }

    #[test]
    fn rejected_maps_to_integration_failure() {
        let error = ExchangeError::Rejected { code: Some(101), info: "invalid key".into() };
        assert!(matches!(ApplicationError::from(error), ApplicationError::Integration(_)));
    }
}
