//! Currency codes, exchange-rate snapshots and pairwise conversion.
//!
//! Conversion covers TRY, EUR and USD through a four-rate table. The table is
//! passed explicitly to every conversion so a request only ever sees the
//! snapshot it fetched.

use std::fmt;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Currency code used by the pricing engine.
///
/// Codes outside TRY/EUR/USD are carried as `Other` rather than rejected;
/// conversions involving them pass the amount through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Currency {
    #[default]
    Try,
    Eur,
    Usd,
    Other(String),
}

impl Currency {
    /// Parse a currency code, case-insensitively.
    pub fn parse(code: &str) -> Self {
        let code = code.trim().to_ascii_uppercase();
        match code.as_str() {
            "TRY" => Currency::Try,
            "EUR" => Currency::Eur,
            "USD" => Currency::Usd,
            _ => Currency::Other(code),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            Currency::Try => "TRY",
            Currency::Eur => "EUR",
            Currency::Usd => "USD",
            Currency::Other(code) => code,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl From<String> for Currency {
    fn from(code: String) -> Self {
        Currency::parse(&code)
    }
}

impl From<Currency> for String {
    fn from(currency: Currency) -> Self {
        currency.code().to_string()
    }
}

/// Directed exchange rates for one pricing request.
///
/// All rates are positive. EUR_USD and USD_EUR are reciprocal as delivered by
/// the rate provider; nothing here re-checks that.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeRateTable {
    #[serde(rename = "EUR_TRY")]
    pub eur_try: Decimal,
    #[serde(rename = "USD_TRY")]
    pub usd_try: Decimal,
    #[serde(rename = "EUR_USD")]
    pub eur_usd: Decimal,
    #[serde(rename = "USD_EUR")]
    pub usd_eur: Decimal,
}

impl ExchangeRateTable {
    /// Fixed table used whenever the rate source is unavailable (rates of 23.10.2025).
    pub fn fallback() -> Self {
        Self {
            eur_try: dec!(48.72),
            usd_try: dec!(41.98),
            eur_usd: dec!(1.16),
            usd_eur: dec!(0.86),
        }
    }

    /// Rate pairs in document order.
    pub fn pairs(&self) -> [(&'static str, Decimal); 4] {
        [
            ("EUR_TRY", self.eur_try),
            ("USD_TRY", self.usd_try),
            ("EUR_USD", self.eur_usd),
            ("USD_EUR", self.usd_eur),
        ]
    }
}

/// Convert `amount` from one currency to another using the given snapshot.
///
/// No rounding is applied. Unsupported pairs return the amount unchanged.
pub fn convert(
    amount: Decimal,
    from: &Currency,
    to: &Currency,
    rates: &ExchangeRateTable,
) -> Decimal {
    if from == to {
        return amount;
    }

    match (from, to) {
        (Currency::Try, Currency::Eur) => amount / rates.eur_try,
        (Currency::Try, Currency::Usd) => amount / rates.usd_try,
        (Currency::Eur, Currency::Try) => amount * rates.eur_try,
        (Currency::Eur, Currency::Usd) => amount * rates.eur_usd,
        (Currency::Usd, Currency::Try) => amount * rates.usd_try,
        (Currency::Usd, Currency::Eur) => amount / rates.eur_usd,
        _ => {
            warn!(
                from = %from,
                to = %to,
                "Unsupported currency pair, passing amount through unconverted"
            );
            amount
        }
    }
}
