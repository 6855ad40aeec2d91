//! Currency conversion through the pivot currency of a rate snapshot.
//!
//! A [`RateSnapshot`] quotes every currency against one base (USD by
//! default). Converting A → B goes A → base → B:
//! `amount / rate[A] × rate[B]`.

#[cfg(feature = "live_rates")]
pub mod client;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use crate::error::WebToolsError;
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::WebToolsResult;

/// Currencies offered by the converter's pickers.
pub const SUPPORTED_CURRENCIES: [&str; 9] = [
    "USD", "EUR", "GBP", "JPY", "AUD", "CAD", "CHF", "CNY", "INR",
];

/// Snapshots older than this produce a staleness warning.
const STALE_AFTER_HOURS: i64 = 24;

/// ISO 4217 style three-letter code, stored upper-case.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn usd() -> Self {
        CurrencyCode("USD".into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = WebToolsError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let code = value.trim().to_ascii_uppercase();
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(WebToolsError::invalid(
                "currency",
                format!("'{value}' is not a three-letter currency code"),
            ));
        }
        Ok(CurrencyCode(code))
    }
}

impl FromStr for CurrencyCode {
    type Err = WebToolsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CurrencyCode::try_from(s.to_string())
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Exchange rates quoted against `base` at one point in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateSnapshot {
    pub base: CurrencyCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    /// When this process received the snapshot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fetched_at: Option<DateTime<Utc>>,
    /// Units of each currency per one unit of `base`.
    pub rates: BTreeMap<CurrencyCode, Decimal>,
}

impl RateSnapshot {
    pub fn new(base: CurrencyCode, rates: BTreeMap<CurrencyCode, Decimal>) -> Self {
        RateSnapshot {
            base,
            date: None,
            fetched_at: None,
            rates,
        }
    }

    /// Units of `code` per one unit of the base currency.
    pub fn rate(&self, code: &CurrencyCode) -> WebToolsResult<Decimal> {
        let rate = match self.rates.get(code) {
            Some(rate) => *rate,
            None if *code == self.base => Decimal::ONE,
            None => {
                return Err(WebToolsError::invalid(
                    "currency",
                    format!("No {} rate available for {code}", self.base),
                ))
            }
        };
        if rate <= Decimal::ZERO {
            return Err(WebToolsError::invalid(
                "currency",
                format!("Rate for {code} must be positive, got {rate}"),
            ));
        }
        Ok(rate)
    }

    /// Units of `to` per one unit of `from`.
    pub fn exchange_rate(&self, from: &CurrencyCode, to: &CurrencyCode) -> WebToolsResult<Decimal> {
        self.rate(to)?
            .checked_div(self.rate(from)?)
            .ok_or_else(|| out_of_range("exchange rate", from, to))
    }

    pub fn convert(&self, amount: Money, from: &CurrencyCode, to: &CurrencyCode) -> WebToolsResult<Money> {
        let (from_rate, to_rate) = (self.rate(from)?, self.rate(to)?);
        amount
            .checked_div(from_rate)
            .and_then(|in_base| in_base.checked_mul(to_rate))
            .ok_or_else(|| out_of_range("converted amount", from, to))
    }

    pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
        match self.fetched_at {
            Some(fetched) => now - fetched > Duration::hours(STALE_AFTER_HOURS),
            None => false,
        }
    }
}

fn out_of_range(what: &str, from: &CurrencyCode, to: &CurrencyCode) -> WebToolsError {
    WebToolsError::invalid(
        "amount",
        format!("{what} from {from} to {to} is outside the decimal range"),
    )
}

/// Input for converting an amount with a given rate snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrencyConversionInput {
    pub amount: Money,
    pub from: CurrencyCode,
    pub to: CurrencyCode,
    pub snapshot: RateSnapshot,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrencyConversionOutput {
    pub amount: Money,
    pub from: CurrencyCode,
    pub to: CurrencyCode,
    /// Full-precision converted amount.
    pub converted: Money,
    /// Converted amount rounded to 2 places for display.
    pub converted_display: Money,
    /// 1 `from` = `rate` `to`, rounded to 4 places.
    pub rate: Decimal,
    /// 1 `to` = `inverse_rate` `from`, rounded to 4 places.
    pub inverse_rate: Decimal,
}

pub fn convert_currency(
    input: &CurrencyConversionInput,
) -> WebToolsResult<ComputationOutput<CurrencyConversionOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let snapshot = &input.snapshot;
    let converted = snapshot.convert(input.amount, &input.from, &input.to)?;
    let rate = snapshot.exchange_rate(&input.from, &input.to)?;
    let inverse_rate = snapshot.exchange_rate(&input.to, &input.from)?;

    if snapshot.is_stale(Utc::now()) {
        warnings.push(format!(
            "Exchange rates are more than {STALE_AFTER_HOURS} hours old"
        ));
    }
    if input.amount < Decimal::ZERO {
        warnings.push("Negative amount converted".into());
    }

    let output = CurrencyConversionOutput {
        amount: input.amount,
        from: input.from.clone(),
        to: input.to.clone(),
        converted,
        converted_display: converted.round_dp(2),
        rate: rate.round_dp(4),
        inverse_rate: inverse_rate.round_dp(4),
    };

    let methodology = format!("Cross conversion through {} pivot", snapshot.base);
    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        &methodology,
        &serde_json::json!({
            "base": snapshot.base,
            "date": snapshot.date,
            "fetched_at": snapshot.fetched_at,
        }),
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn code(s: &str) -> CurrencyCode {
        s.parse().unwrap()
    }

    fn snapshot() -> RateSnapshot {
        let mut rates = BTreeMap::new();
        rates.insert(code("EUR"), dec!(0.85));
        rates.insert(code("GBP"), dec!(0.73));
        rates.insert(code("JPY"), dec!(151.2));
        RateSnapshot::new(CurrencyCode::usd(), rates)
    }

    #[test]
    fn test_usd_to_eur() {
        let s = snapshot();
        assert_eq!(s.convert(dec!(100), &code("USD"), &code("EUR")).unwrap(), dec!(85));
    }

    #[test]
    fn test_cross_through_pivot() {
        let s = snapshot();
        let gbp = s.convert(dec!(85), &code("EUR"), &code("GBP")).unwrap();
        assert_eq!(gbp, dec!(73));
    }

    #[test]
    fn test_unknown_currency_is_an_error() {
        let s = snapshot();
        assert!(matches!(
            s.convert(dec!(1), &code("USD"), &code("CHF")),
            Err(WebToolsError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_amount_beyond_decimal_range_is_an_error() {
        let mut s = snapshot();
        s.rates.insert(code("BTC"), dec!(0.00001));
        assert!(matches!(
            s.convert(Decimal::MAX / dec!(2), &code("BTC"), &code("USD")),
            Err(WebToolsError::InvalidInput { .. })
        ));
        // Small amounts in the same pair are fine
        assert_eq!(s.convert(dec!(1), &code("BTC"), &code("USD")).unwrap(), dec!(100000));
    }

    #[test]
    fn test_code_validation() {
        assert_eq!(code(" eur ").as_str(), "EUR");
        assert!("EURO".parse::<CurrencyCode>().is_err());
        assert!("E1R".parse::<CurrencyCode>().is_err());
    }

    #[test]
    fn test_staleness() {
        let mut s = snapshot();
        let now = Utc::now();
        assert!(!s.is_stale(now));
        s.fetched_at = Some(now - Duration::hours(25));
        assert!(s.is_stale(now));
    }

    #[test]
    fn test_convert_currency_envelope() {
        let out = convert_currency(&CurrencyConversionInput {
            amount: dec!(1),
            from: code("EUR"),
            to: code("USD"),
            snapshot: snapshot(),
        })
        .unwrap();
        assert_eq!(out.result.converted_display, dec!(1.18));
        assert_eq!(out.result.rate, dec!(1.1765));
        assert_eq!(out.result.inverse_rate, dec!(0.85));
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_snapshot_deserializes_api_shape() {
        let json = r#"{"base":"USD","date":"2024-03-20","rates":{"EUR":0.85,"GBP":0.73,"USD":1}}"#;
        let s: RateSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(s.rate(&code("EUR")).unwrap(), dec!(0.85));
        assert_eq!(s.date, NaiveDate::from_ymd_opt(2024, 3, 20));
    }
}
