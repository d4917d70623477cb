//! Response DTOs for pricing API endpoints.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::currency::{Currency, ExchangeRateTable};
use super::rates::RateFetch;

/// Response for the rate inspection endpoint
#[derive(Debug, Serialize)]
pub struct RatesResponse {
    /// "fresh" or "degraded"
    pub status: &'static str,
    pub base: Currency,
    pub rates: ExchangeRateTable,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fetched_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
}

impl RatesResponse {
    pub fn from_fetch(base: Currency, fetch: RateFetch) -> Self {
        match fetch {
            RateFetch::Fresh { table, fetched_at } => Self {
                status: "fresh",
                base,
                rates: table,
                fetched_at: Some(fetched_at),
                cause: None,
            },
            RateFetch::Degraded { table, cause } => Self {
                status: "degraded",
                base,
                rates: table,
                fetched_at: None,
                cause: Some(cause.to_string()),
            },
        }
    }
}

/// Generic pricing error response
#[derive(Debug, Serialize)]
pub struct PricingErrorResponse {
    pub error_type: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}
