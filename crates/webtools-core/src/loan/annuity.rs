//! Level-payment annuity math shared by the rate solver and the schedule
//! generator.
//!
//! Everything is written in terms of the discount factor `d = (1 + c)^-n`
//! rather than the growth factor, so long terms at high rates never overflow
//! the 28-digit decimal range.

use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;

use crate::error::WebToolsError;
use crate::types::{Money, Rate};
use crate::WebToolsResult;

pub const MONTHS_PER_YEAR: u32 = 12;

/// Longest loan term accepted by the loan tools.
pub const MAX_TERM_YEARS: u32 = 50;

/// Validate a term in years and convert it to a number of monthly payments.
pub fn term_in_months(term_years: u32) -> WebToolsResult<u32> {
    if term_years == 0 {
        return Err(WebToolsError::invalid(
            "term_years",
            "Loan term must be at least 1 year",
        ));
    }
    if term_years > MAX_TERM_YEARS {
        return Err(WebToolsError::invalid(
            "term_years",
            format!("Loan term cannot exceed {MAX_TERM_YEARS} years"),
        ));
    }
    Ok(term_years * MONTHS_PER_YEAR)
}

/// `(1 + rate)^-periods`. Collapses to zero once the growth factor leaves
/// the representable range, which is exact to 28 digits.
pub fn discount_factor(rate: Rate, periods: u32) -> Decimal {
    match (Decimal::ONE + rate).checked_powu(u64::from(periods)) {
        Some(growth) if !growth.is_zero() => Decimal::ONE / growth,
        _ => Decimal::ZERO,
    }
}

/// Level payment that retires `principal` over `periods` at `rate` per period:
/// `P = L·c / (1 − (1 + c)^-n)`.
pub fn level_payment(principal: Money, rate: Rate, periods: u32) -> WebToolsResult<Money> {
    if periods == 0 {
        return Err(WebToolsError::invalid(
            "periods",
            "Number of periods must be > 0",
        ));
    }
    if rate.is_zero() {
        return Ok(principal / Decimal::from(periods));
    }

    let annuity_denominator = Decimal::ONE - discount_factor(rate, periods);
    if annuity_denominator.is_zero() {
        return Err(WebToolsError::DivisionByZero {
            context: "level payment annuity factor".into(),
        });
    }
    principal
        .checked_mul(rate)
        .and_then(|interest| interest.checked_div(annuity_denominator))
        .ok_or_else(|| out_of_range("level payment"))
}

/// Derivative of [`level_payment`] with respect to the periodic rate:
/// `dP/dc = L/(1−d) · (1 − c·n·d / ((1+c)(1−d)))`.
pub fn level_payment_slope(principal: Money, rate: Rate, periods: u32) -> WebToolsResult<Decimal> {
    let d = discount_factor(rate, periods);
    let one_minus_d = Decimal::ONE - d;
    if one_minus_d.is_zero() {
        return Err(WebToolsError::DivisionByZero {
            context: "level payment slope".into(),
        });
    }

    let n = Decimal::from(periods);
    let correction = rate
        .checked_mul(n)
        .and_then(|x| x.checked_mul(d))
        .and_then(|x| x.checked_div((Decimal::ONE + rate).checked_mul(one_minus_d)?))
        .ok_or_else(|| out_of_range("level payment slope"))?;
    principal
        .checked_div(one_minus_d)
        .and_then(|x| x.checked_mul(Decimal::ONE - correction))
        .ok_or_else(|| out_of_range("level payment slope"))
}

/// Error for an intermediate that leaves the 28-digit decimal range.
pub(crate) fn out_of_range(what: &str) -> WebToolsError {
    WebToolsError::invalid(
        "principal",
        format!("{what} is outside the decimal range for this loan amount and rate"),
    )
}
