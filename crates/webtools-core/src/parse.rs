//! Text-field parsing for calculator inputs.
//!
//! Form fields arrive as strings. Anything that is not a finite decimal is
//! reported as a [`WebToolsError::Parse`] naming the field, never coerced to
//! NaN or zero.

use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::error::WebToolsError;
use crate::WebToolsResult;

/// Parse a decimal number typed into `field`.
///
/// Accepts surrounding whitespace, an optional sign, plain decimals
/// (`"1250.50"`) and scientific notation (`"1.5e3"`).
pub fn parse_decimal(field: &str, text: &str) -> WebToolsResult<Decimal> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(WebToolsError::Parse {
            input: text.to_string(),
            position: 0,
            reason: format!("{field} is empty"),
        });
    }

    if let Ok(value) = Decimal::from_str(trimmed) {
        return Ok(value);
    }
    if trimmed.contains(|c: char| c == 'e' || c == 'E') {
        if let Ok(value) = Decimal::from_scientific(trimmed) {
            return Ok(value);
        }
    }

    Err(WebToolsError::Parse {
        input: text.to_string(),
        position: first_invalid_position(text),
        reason: format!("{field} is not a number"),
    })
}

/// Parse a whole number of years/months typed into `field`.
pub fn parse_count(field: &str, text: &str) -> WebToolsResult<u32> {
    let value = parse_decimal(field, text)?;
    if value.fract() != Decimal::ZERO || value.is_sign_negative() {
        return Err(WebToolsError::invalid(
            field,
            "must be a non-negative whole number",
        ));
    }
    value
        .to_u32()
        .ok_or_else(|| WebToolsError::invalid(field, "is too large"))
}

fn first_invalid_position(text: &str) -> usize {
    let leading = text.len() - text.trim_start().len();
    text.trim_start()
        .char_indices()
        .find(|(i, c)| {
            !(c.is_ascii_digit()
                || *c == '.'
                || matches!(c, 'e' | 'E')
                || (matches!(c, '-' | '+') && *i == 0))
        })
        .map(|(i, _)| leading + i)
        .unwrap_or(leading)
}
