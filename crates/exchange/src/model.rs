use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub const ALUMINUM_SYMBOL: &str = "LME-ALU";
pub const COPPER_SYMBOL: &str = "LME-XCU";
pub const LEAD_SYMBOL: &str = "LME-LEAD";

/// Latest metal quotes in the requested base currency.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetalExchange {
    pub success: bool,
    pub currency: String,
    pub date: NaiveDate,
    pub rates: Rates,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rates {
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub aluminum: Decimal,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub copper: Decimal,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub lead: Decimal,
}

/// Body as the upstream service sends it. Rate numbers are read from their
/// literal text, never through `f64`.
#[derive(Debug, Deserialize)]
pub(crate) struct LatestPayload {
    #[serde(default)]
    pub success: bool,
    #[serde(alias = "source")]
    pub base: Option<String>,
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub rates: HashMap<String, Decimal>,
    pub error: Option<UpstreamError>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UpstreamError {
    pub code: Option<i64>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub info: Option<String>,
}
