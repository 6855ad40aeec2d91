use serde_json::Value;
use std::io;

use super::{cell, is_record_list, result_of};

/// Write output as CSV to stdout.
///
/// A result holding a list of records (schedule rows, standings, unit
/// tables) is written as one CSV row per record; anything else becomes a
/// two-column `field,value` listing.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let result = result_of(value);
    let records = match result {
        Value::Array(_) if is_record_list(result) => Some(result),
        Value::Object(map) => map.values().find(|v| is_record_list(v)),
        _ => None,
    };

    let written = match (records, result) {
        (Some(Value::Array(items)), _) => write_records(&mut wtr, items),
        (_, Value::Object(map)) => {
            let mut rows = vec![["field".to_string(), "value".to_string()]];
            rows.extend(map.iter().map(|(k, v)| [k.clone(), cell(v)]));
            rows.iter().try_for_each(|r| wtr.write_record(r))
        }
        (_, Value::Array(items)) => items.iter().try_for_each(|i| wtr.write_record([cell(i)])),
        (_, other) => wtr.write_record([cell(other)]),
    };

    if let Err(e) = written.and_then(|_| wtr.flush().map_err(csv::Error::from)) {
        tracing::error!(error = %e, "failed to write CSV");
    }
}

fn write_records<W: io::Write>(wtr: &mut csv::Writer<W>, items: &[Value]) -> csv::Result<()> {
    let Some(Value::Object(first)) = items.first() else {
        return Ok(());
    };
    let headers: Vec<&str> = first.keys().map(String::as_str).collect();
    wtr.write_record(&headers)?;

    for item in items {
        if let Value::Object(map) = item {
            wtr.write_record(
                headers
                    .iter()
                    .map(|h| map.get(*h).map(cell).unwrap_or_default()),
            )?;
        }
    }
    Ok(())
}
