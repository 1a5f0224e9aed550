use ronja_core::config::{AppConfig, LoadOptions};
use ronja_exchange::{ExchangeError, MetalExchangeClient};

use crate::commands::{current_thread_runtime, CommandResult};

pub fn run() -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "rates",
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
        }
    };

    let client = match MetalExchangeClient::from_config(&config.exchange) {
        Ok(client) => client,
        Err(error) => {
            return CommandResult::failure("rates", "exchange_config", error.to_string(), 2);
        }
    };

    let runtime = match current_thread_runtime() {
        Ok(runtime) => runtime,
        Err(message) => return CommandResult::failure("rates", "runtime_init", message, 3),
    };

    match runtime.block_on(client.fetch_exchange_data()) {
        Ok(exchange) => {
            let message = format!("rates in {} as of {}", exchange.currency, exchange.date);
            match serde_json::to_value(&exchange) {
                Ok(data) => CommandResult::success_with_data("rates", message, Some(data)),
                Err(error) => CommandResult::failure("rates", "serialization", error.to_string(), 3),
            }
        }
        Err(error) => {
            let error_class = match error {
                ExchangeError::Configuration(_) => "exchange_config",
                ExchangeError::Transport(_) => "upstream_transport",
                ExchangeError::Status { .. } => "upstream_status",
                ExchangeError::Decode(_) => "upstream_decode",
                ExchangeError::Rejected { .. } => "upstream_rejected",
            };
            CommandResult::failure("rates", error_class, error.to_string(), 6)
        }
    }
}
