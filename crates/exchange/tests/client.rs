use std::str::FromStr;
use std::time::Duration;

use chrono::Local;
use httpmock::prelude::*;
use ronja_core::config::{AppConfig, ExchangeConfig};
use ronja_exchange::{ExchangeError, MetalExchangeClient};
use rust_decimal::Decimal;

const ACCESS_KEY: &str = "private-token";
const PAYLOAD: &str = include_str!("fixtures/latest.json");

fn exchange_config(server: &MockServer) -> ExchangeConfig {
    let mut config = AppConfig::default().exchange;
    config.base_url = server.url("/api/latest");
    config.access_key = Some(ACCESS_KEY.to_string().into());
    config
}

fn decimal(raw: &str) -> Decimal {
    Decimal::from_str(raw).expect("decimal literal")
}

#[tokio::test]
async fn fetch_exchange_data_maps_fixture_payload() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/latest")
            .query_param("base", "USD")
            .query_param("symbols", "LME-ALU,LME-XCU,LME-LEAD")
            .query_param("access_key", ACCESS_KEY);
        then.status(200).header("content-type", "application/json").body(PAYLOAD);
    });

    let client = MetalExchangeClient::from_config(&exchange_config(&server)).expect("client");
    let exchange = client.fetch_exchange_data().await.expect("exchange data");

    mock.assert();
    assert!(exchange.success);
    assert_eq!(exchange.currency, "USD");
    assert_eq!(exchange.rates.aluminum, decimal("10.573385811699"));
    assert_eq!(exchange.rates.copper, decimal("3.256136987247"));
    assert_eq!(exchange.rates.lead, decimal("14.319008911883"));
    assert!(exchange.date <= Local::now().date_naive());
}

#[tokio::test]
async fn non_success_status_is_reported() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/latest");
        then.status(500).body("upstream exploded");
    });

    let client = MetalExchangeClient::from_config(&exchange_config(&server)).expect("client");
    let error = client.fetch_exchange_data().await.expect_err("status error");

    assert!(matches!(error, ExchangeError::Status { status: 500 }));
}

#[tokio::test]
async fn rejected_request_carries_upstream_detail() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/latest");
        then.status(200).header("content-type", "application/json").body(
            r#"{"success":false,"error":{"code":101,"type":"invalid_access_key","info":"You have not supplied a valid API Access Key."}}"#,
        );
    });

    let client = MetalExchangeClient::from_config(&exchange_config(&server)).expect("client");
    let error = client.fetch_exchange_data().await.expect_err("rejected");

    match error {
        ExchangeError::Rejected { code, info } => {
            assert_eq!(code, Some(101));
            assert!(info.contains("valid API Access Key"));
        }
        other => panic!("expected rejection, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_body_is_decode_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/latest");
        then.status(200).body("<html>maintenance</html>");
    });

    let client = MetalExchangeClient::from_config(&exchange_config(&server)).expect("client");
    let error = client.fetch_exchange_data().await.expect_err("decode error");

    assert!(matches!(error, ExchangeError::Decode(_)));
}

#[tokio::test]
async fn missing_rate_is_decode_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/latest");
        then.status(200).body(
            r#"{"success":true,"base":"USD","date":"2021-03-15","rates":{"LME-ALU":10.5}}"#,
        );
    });

    let client = MetalExchangeClient::from_config(&exchange_config(&server)).expect("client");
    let error = client.fetch_exchange_data().await.expect_err("missing rate");

    assert!(matches!(error, ExchangeError::Decode(message) if message.contains("LME-XCU")));
}

#[tokio::test]
async fn slow_upstream_hits_configured_timeout() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/latest");
        then.status(200).delay(Duration::from_secs(3)).body(PAYLOAD);
    });

    let mut config = exchange_config(&server);
    config.timeout_secs = 1;
    let client = MetalExchangeClient::from_config(&config).expect("client");
    let error = client.fetch_exchange_data().await.expect_err("timeout");

    assert!(matches!(error, ExchangeError::Transport(_)));
}
