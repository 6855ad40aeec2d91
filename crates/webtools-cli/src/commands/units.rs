use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use webtools_core::units::{self, UnitCategory, UnitConversionInput};

use crate::input;

/// Arguments for a unit conversion
#[derive(Args)]
pub struct ConvertUnitArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Value to convert
    #[arg(long, allow_hyphen_values = true)]
    pub value: Option<Decimal>,

    /// Source unit (key, symbol, or name, e.g. "km", "°F", "pounds")
    #[arg(long)]
    pub from: Option<String>,

    /// Target unit
    #[arg(long)]
    pub to: Option<String>,

    /// Only look units up in this category (length, weight, area, temperature)
    #[arg(long)]
    pub category: Option<UnitCategory>,
}

pub fn run_convert_unit(args: ConvertUnitArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let conversion: UnitConversionInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        UnitConversionInput {
            value: args.value.ok_or("--value is required (or provide --input)")?,
            from: args.from.ok_or("--from is required (or provide --input)")?,
            to: args.to.ok_or("--to is required (or provide --input)")?,
            category: args.category,
        }
    };

    let result = units::convert_units(&conversion)?;
    Ok(serde_json::to_value(result)?)
}

/// Arguments for listing the unit tables
#[derive(Args)]
pub struct ListUnitsArgs {
    /// Only list one category
    #[arg(long)]
    pub category: Option<UnitCategory>,
}

pub fn run_list_units(args: ListUnitsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let categories: Vec<UnitCategory> = match args.category {
        Some(c) => vec![c],
        None => UnitCategory::ALL.to_vec(),
    };

    let rows: Vec<Value> = categories
        .into_iter()
        .flat_map(|category| {
            category.units().iter().map(move |u| {
                json!({
                    "category": category,
                    "key": u.key,
                    "symbol": u.symbol,
                    "label": u.label,
                    "ratio": u.ratio,
                })
            })
        })
        .collect();
    Ok(Value::Array(rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_units_single_category() {
        let value = run_list_units(ListUnitsArgs {
            category: Some(UnitCategory::Weight),
        })
        .unwrap();
        let rows = value.as_array().unwrap();
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0]["key"], "kg");
        assert_eq!(rows[0]["category"], "weight");
    }

    #[test]
    fn test_list_units_all_categories() {
        let value = run_list_units(ListUnitsArgs { category: None }).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 8 + 5 + 8 + 3);
    }
}
