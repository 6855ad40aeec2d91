use serde_json::Value;

use super::{cell, result_of};

/// Headline field for each tool, tried in order. The first non-null one
/// present in the result is printed alone.
const PRIORITY_KEYS: [&str; 8] = [
    "monthly_payment",
    "annual_rate_percent",
    "display",
    "converted_display",
    "password",
    "value",
    "winner",
    "rates",
];

/// Print just the key answer from the output.
pub fn print_minimal(value: &Value) {
    println!("{}", headline(value));
}

fn headline(value: &Value) -> String {
    let result = result_of(value);

    if let Value::Object(map) = result {
        if let Some(val) = PRIORITY_KEYS
            .iter()
            .filter_map(|key| map.get(*key))
            .find(|val| !val.is_null())
        {
            return cell(val);
        }
        if let Some((key, val)) = map.iter().next() {
            return format!("{}: {}", key, cell(val));
        }
    }
    cell(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payment_is_the_amortization_headline() {
        let v = json!({"result": {"total_paid": "431676.38", "monthly_payment": "1199.10"}});
        assert_eq!(headline(&v), "1199.10");
    }

    #[test]
    fn test_null_winner_falls_through() {
        let v = json!({"result": {"standings": [], "winner": null}});
        assert_eq!(headline(&v), "standings: []");
    }

    #[test]
    fn test_unit_display_beats_raw_value() {
        let v = json!({"result": {"value": "0.1", "display": "0.100000 km"}});
        assert_eq!(headline(&v), "0.100000 km");
    }
}
