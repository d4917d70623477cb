//! Exchange-rate provider.
//!
//! Rates are fetched once per pricing request and returned as an immutable
//! [`ExchangeRateTable`]. A failed fetch never reaches the caller as an error:
//! it comes back as [`RateFetch::Degraded`] carrying the fixed fallback table.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use tracing::{debug, warn};

use super::calculators::round_money;
use super::currency::{Currency, ExchangeRateTable};

/// Why a rate fetch fell back to the fixed table
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RateSourceError {
    #[error("Rate request failed: {0}")]
    Http(String),

    #[error("Rate source returned HTTP {0}")]
    Status(u16),

    #[error("Malformed rate payload: {0}")]
    Payload(String),

    #[error("Rate payload is missing {0}")]
    MissingRate(String),

    #[error("Rate for {code} is not a positive number: {value}")]
    InvalidRate { code: String, value: f64 },

    #[error("Derived {0} rate is outside the accepted range")]
    OutOfRange(&'static str),

    #[error("Live rates are disabled (offline mode)")]
    Offline,
}

/// Smallest derived rate accepted after rounding
const MIN_RATE: Decimal = dec!(0.0001);
/// Largest derived rate accepted
const MAX_RATE: Decimal = dec!(1000000);

/// Outcome of a rate refresh
#[derive(Debug, Clone, PartialEq)]
pub enum RateFetch {
    Fresh {
        table: ExchangeRateTable,
        fetched_at: DateTime<Utc>,
    },
    Degraded {
        table: ExchangeRateTable,
        cause: RateSourceError,
    },
}

impl RateFetch {
    /// Rate snapshot to price with, fresh or fallback.
    pub fn table(&self) -> ExchangeRateTable {
        match self {
            RateFetch::Fresh { table, .. } | RateFetch::Degraded { table, .. } => *table,
        }
    }

    pub fn is_fresh(&self) -> bool {
        matches!(self, RateFetch::Fresh { .. })
    }

    /// Wrap a failure into a degraded result with the fallback table.
    pub fn degraded(cause: RateSourceError) -> Self {
        warn!(error = %cause, "Exchange rate fetch failed, using fallback rates");
        RateFetch::Degraded {
            table: ExchangeRateTable::fallback(),
            cause,
        }
    }
}

/// Source of exchange-rate snapshots
#[async_trait]
pub trait RateSource: Send + Sync {
    /// Fetch a rate table for `base`. Never fails; see [`RateFetch`].
    async fn fetch_rates(&self, base: &Currency) -> RateFetch;
}

/// Body of `GET {base_url}/{base}`
#[derive(Debug, Deserialize)]
struct RatesPayload {
    rates: HashMap<String, f64>,
}

/// Rate source backed by an exchangerate-api style HTTP endpoint.
#[derive(Debug, Clone)]
pub struct HttpRateSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRateSource {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, RateSourceError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RateSourceError::Http(format!("Failed to initialize HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn try_fetch(&self, base: &Currency) -> Result<ExchangeRateTable, RateSourceError> {
        let url = format!("{}/{}", self.base_url, base.code());
        debug!("Fetching exchange rates from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| RateSourceError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RateSourceError::Status(status.as_u16()));
        }

        let payload: RatesPayload = response
            .json()
            .await
            .map_err(|e| RateSourceError::Payload(e.to_string()))?;

        triangulate(base, &payload.rates)
    }
}

#[async_trait]
impl RateSource for HttpRateSource {
    async fn fetch_rates(&self, base: &Currency) -> RateFetch {
        match self.try_fetch(base).await {
            Ok(table) => RateFetch::Fresh {
                table,
                fetched_at: Utc::now(),
            },
            Err(cause) => RateFetch::degraded(cause),
        }
    }
}

/// Rate source that always returns the same table as fresh.
#[derive(Debug, Clone, Copy)]
pub struct StaticRateSource {
    table: ExchangeRateTable,
}

impl StaticRateSource {
    pub fn new(table: ExchangeRateTable) -> Self {
        Self { table }
    }
}

#[async_trait]
impl RateSource for StaticRateSource {
    async fn fetch_rates(&self, _base: &Currency) -> RateFetch {
        RateFetch::Fresh {
            table: self.table,
            fetched_at: Utc::now(),
        }
    }
}

/// Rate source for runs without the live provider.
///
/// Always answers with the fallback table, reported as degraded.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineRateSource;

#[async_trait]
impl RateSource for OfflineRateSource {
    async fn fetch_rates(&self, _base: &Currency) -> RateFetch {
        debug!("Offline mode, pricing with fallback rates");
        RateFetch::Degraded {
            table: ExchangeRateTable::fallback(),
            cause: RateSourceError::Offline,
        }
    }
}

/// Derive the four directed rates from a base-currency rate map.
///
/// `rates[X]` is units of X per one unit of `base`. The base's own rate is
/// taken as 1 when the map omits it. Results are rounded to 4 places.
pub fn triangulate(
    base: &Currency,
    rates: &HashMap<String, f64>,
) -> Result<ExchangeRateTable, RateSourceError> {
    let rate_of = |code: &str| -> Result<Decimal, RateSourceError> {
        let raw = match rates.get(code) {
            Some(raw) => *raw,
            None if base.code() == code => return Ok(Decimal::ONE),
            None => return Err(RateSourceError::MissingRate(code.to_string())),
        };
        if !raw.is_finite() || raw <= 0.0 {
            return Err(RateSourceError::InvalidRate {
                code: code.to_string(),
                value: raw,
            });
        }
        Decimal::from_f64(raw).ok_or_else(|| RateSourceError::InvalidRate {
            code: code.to_string(),
            value: raw,
        })
    };

    let try_rate = rate_of("TRY")?;
    let eur_rate = rate_of("EUR")?;
    let usd_rate = rate_of("USD")?;

    Ok(ExchangeRateTable {
        eur_try: ratio("EUR_TRY", try_rate, eur_rate)?,
        usd_try: ratio("USD_TRY", try_rate, usd_rate)?,
        eur_usd: ratio("EUR_USD", usd_rate, eur_rate)?,
        usd_eur: ratio("USD_EUR", eur_rate, usd_rate)?,
    })
}

fn ratio(
    pair: &'static str,
    numerator: Decimal,
    denominator: Decimal,
) -> Result<Decimal, RateSourceError> {
    numerator
        .checked_div(denominator)
        .map(|rate| round_money(rate, 4))
        .filter(|rate| (MIN_RATE..=MAX_RATE).contains(rate))
        .ok_or(RateSourceError::OutOfRange(pair))
}
