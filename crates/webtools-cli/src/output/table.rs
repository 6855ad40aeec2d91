use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{cell, is_record_list, result_of};

/// Format output as tables: scalar fields first, then one table per nested
/// list or map (schedule rows, standings, rates), then warnings.
pub fn print_table(value: &Value) {
    match result_of(value) {
        Value::Object(result) => print_object(result),
        Value::Array(items) => print_records(items),
        other => println!("{}", cell(other)),
    }

    if let Some(envelope) = value.as_object() {
        print_envelope_notes(envelope);
    }
}

fn print_object(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    let mut nested: Vec<(&String, &Value)> = Vec::new();
    for (key, val) in map {
        if is_record_list(val) || val.is_object() {
            nested.push((key, val));
        } else {
            builder.push_record([key.as_str(), &list_cell(val)]);
        }
    }
    println!("{}", Table::from(builder));

    for (key, val) in nested {
        println!("\n{}:", key);
        match val {
            Value::Array(items) => print_records(items),
            Value::Object(inner) => print_key_values(inner),
            _ => {}
        }
    }
}

fn print_records(items: &[Value]) {
    let Some(Value::Object(first)) = items.first() else {
        if items.is_empty() {
            println!("(empty)");
        }
        for item in items {
            println!("{}", cell(item));
        }
        return;
    };

    let headers: Vec<String> = first.keys().cloned().collect();
    let mut builder = Builder::default();
    builder.push_record(headers.iter().map(String::as_str));
    for item in items {
        if let Value::Object(map) = item {
            builder.push_record(
                headers
                    .iter()
                    .map(|h| map.get(h.as_str()).map(list_cell).unwrap_or_default()),
            );
        }
    }
    println!("{}", Table::from(builder));
}

fn print_key_values(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Key", "Value"]);
    for (key, val) in map {
        builder.push_record([key.as_str(), &list_cell(val)]);
    }
    println!("{}", Table::from(builder));
}

fn print_envelope_notes(envelope: &Map<String, Value>) {
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {}", w);
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

/// Like `cell`, but short scalar arrays read as a comma list.
fn list_cell(value: &Value) -> String {
    match value {
        Value::Array(items) if !is_record_list(value) => {
            items.iter().map(cell).collect::<Vec<_>>().join(", ")
        }
        Value::Null => "-".to_string(),
        _ => cell(value),
    }
}
