//! HTTP client for the upstream metal exchange-rate service.

pub mod client;
pub mod model;

pub use client::{ExchangeError, MetalExchangeClient};
pub use model::{MetalExchange, Rates};
