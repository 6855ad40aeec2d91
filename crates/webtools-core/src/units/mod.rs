//! Unit conversion for length, weight, area, and temperature.
//!
//! Linear categories convert through a base unit: `value × from / to`.
//! Temperature is an offset scale and pivots through Celsius.

pub mod tables;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use crate::error::WebToolsError;
use crate::types::{with_metadata, ComputationOutput};
use crate::WebToolsResult;

pub use tables::UnitDefinition;

const ABSOLUTE_ZERO_C: Decimal = dec!(-273.15);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitCategory {
    Length,
    Weight,
    Area,
    Temperature,
}

impl UnitCategory {
    pub const ALL: [UnitCategory; 4] = [
        UnitCategory::Length,
        UnitCategory::Weight,
        UnitCategory::Area,
        UnitCategory::Temperature,
    ];

    pub fn units(self) -> &'static [UnitDefinition] {
        match self {
            UnitCategory::Length => &tables::LENGTH,
            UnitCategory::Weight => &tables::WEIGHT,
            UnitCategory::Area => &tables::AREA,
            UnitCategory::Temperature => &tables::TEMPERATURE,
        }
    }

    /// Decimal places shown for converted values.
    pub fn display_precision(self) -> u32 {
        match self {
            UnitCategory::Temperature => 2,
            _ => 6,
        }
    }
}

impl fmt::Display for UnitCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UnitCategory::Length => "length",
            UnitCategory::Weight => "weight",
            UnitCategory::Area => "area",
            UnitCategory::Temperature => "temperature",
        };
        f.write_str(name)
    }
}

impl FromStr for UnitCategory {
    type Err = WebToolsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UnitCategory::ALL
            .into_iter()
            .find(|c| c.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                WebToolsError::invalid(
                    "category",
                    format!("Unknown unit category '{s}' (expected length, weight, area, or temperature)"),
                )
            })
    }
}

/// Find a unit by key (`km`), symbol (`km²`, `°F`), or label, singular or
/// plural (`Kilometer`, `feet`). Matching ignores ASCII case.
pub fn find_unit(
    query: &str,
    category: Option<UnitCategory>,
) -> Option<(UnitCategory, &'static UnitDefinition)> {
    let q = query.trim();
    let categories: Vec<UnitCategory> = match category {
        Some(c) => vec![c],
        None => UnitCategory::ALL.to_vec(),
    };

    categories.into_iter().find_map(|cat| {
        cat.units()
            .iter()
            .find(|u| matches_unit(u, q))
            .map(|u| (cat, u))
    })
}

fn matches_unit(unit: &UnitDefinition, q: &str) -> bool {
    unit.key.eq_ignore_ascii_case(q)
        || unit.symbol == q
        || unit.label.eq_ignore_ascii_case(q)
        || plural_label(unit.label).eq_ignore_ascii_case(q)
}

fn plural_label(label: &str) -> String {
    if let Some(stem) = label.strip_suffix("Foot") {
        format!("{stem}Feet")
    } else if label.ends_with("Inch") {
        format!("{label}es")
    } else {
        format!("{label}s")
    }
}

/// Input for a single unit conversion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitConversionInput {
    pub value: Decimal,
    pub from: String,
    pub to: String,
    /// Restrict unit lookup to one category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<UnitCategory>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitConversionOutput {
    pub category: UnitCategory,
    pub from: String,
    pub to: String,
    pub input_value: Decimal,
    /// Full-precision result.
    pub value: Decimal,
    /// Result rounded to the category's display precision, with symbol.
    pub display: String,
}

/// Convert `value` between two units of the same category.
pub fn convert(value: Decimal, from: &str, to: &str) -> WebToolsResult<Decimal> {
    let (from_cat, from_unit) = lookup("from", from, None)?;
    let (to_cat, to_unit) = lookup("to", to, Some(from_cat))
        .map_err(|e| mismatch_or(e, to, from_cat))?;
    convert_resolved(value, to_cat, from_unit, to_unit)
}

pub fn convert_units(
    input: &UnitConversionInput,
) -> WebToolsResult<ComputationOutput<UnitConversionOutput>> {
    let start = Instant::now();

    let (category, from_unit) = lookup("from", &input.from, input.category)?;
    let (_, to_unit) = lookup("to", &input.to, Some(category))
        .map_err(|e| mismatch_or(e, &input.to, category))?;
    let value = convert_resolved(input.value, category, from_unit, to_unit)?;

    let precision = category.display_precision() as usize;
    let display = format!(
        "{:.*} {}",
        precision,
        value.round_dp(precision as u32),
        to_unit.symbol
    );

    let output = UnitConversionOutput {
        category,
        from: from_unit.key.to_string(),
        to: to_unit.key.to_string(),
        input_value: input.value,
        value,
        display,
    };

    let methodology = match category {
        UnitCategory::Temperature => "Offset conversion through Celsius",
        _ => "Ratio conversion through the category base unit (value × from / to)",
    };
    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(methodology, input, Vec::new(), elapsed, output))
}

fn lookup(
    field: &str,
    query: &str,
    category: Option<UnitCategory>,
) -> WebToolsResult<(UnitCategory, &'static UnitDefinition)> {
    find_unit(query, category).ok_or_else(|| {
        let scope = category.map(|c| format!(" {c}")).unwrap_or_default();
        WebToolsError::invalid(field, format!("Unknown{scope} unit '{query}'"))
    })
}

/// Distinguish "unknown unit" from "known unit in another category".
fn mismatch_or(err: WebToolsError, query: &str, expected: UnitCategory) -> WebToolsError {
    match find_unit(query, None) {
        Some((other, unit)) => WebToolsError::invalid(
            "to",
            format!(
                "Cannot convert {expected} to {other} ('{}' is a {other} unit)",
                unit.key
            ),
        ),
        None => err,
    }
}

fn convert_resolved(
    value: Decimal,
    category: UnitCategory,
    from: &UnitDefinition,
    to: &UnitDefinition,
) -> WebToolsResult<Decimal> {
    match category {
        UnitCategory::Temperature => {
            let celsius = to_celsius(value, from.key)?;
            if celsius < ABSOLUTE_ZERO_C {
                return Err(WebToolsError::invalid(
                    "value",
                    format!("{value}{} is below absolute zero", from.symbol),
                ));
            }
            from_celsius(celsius, to.key)
        }
        _ => value
            .checked_mul(from.ratio)
            .and_then(|base| base.checked_div(to.ratio))
            .ok_or_else(|| out_of_range(value, from)),
    }
}

fn out_of_range(value: Decimal, from: &UnitDefinition) -> WebToolsError {
    WebToolsError::invalid(
        "value",
        format!("{value}{} converts to a value outside the decimal range", from.symbol),
    )
}

fn to_celsius(value: Decimal, key: &str) -> WebToolsResult<Decimal> {
    match key {
        "c" => Ok(value),
        "f" => value
            .checked_sub(dec!(32))
            .and_then(|x| x.checked_mul(dec!(5)))
            .map(|x| x / dec!(9))
            .ok_or_else(|| range_error(value)),
        "k" => value.checked_add(ABSOLUTE_ZERO_C).ok_or_else(|| range_error(value)),
        other => Err(WebToolsError::invalid("from", format!("Unknown temperature unit '{other}'"))),
    }
}

fn range_error(value: Decimal) -> WebToolsError {
    WebToolsError::invalid("value", format!("{value} is outside the convertible temperature range"))
}

fn from_celsius(celsius: Decimal, key: &str) -> WebToolsResult<Decimal> {
    match key {
        "c" => Ok(celsius),
        "f" => celsius
            .checked_mul(dec!(9))
            .map(|x| x / dec!(5))
            .and_then(|x| x.checked_add(dec!(32)))
            .ok_or_else(|| range_error(celsius)),
        "k" => celsius.checked_sub(ABSOLUTE_ZERO_C).ok_or_else(|| range_error(celsius)),
        other => Err(WebToolsError::invalid("to", format!("Unknown temperature unit '{other}'"))),
    }
}
