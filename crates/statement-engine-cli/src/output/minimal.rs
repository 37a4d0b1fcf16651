use serde_json::Value;

use super::flatten;

/// Print just the key answer value from the output.
///
/// Heuristic: look for well-known result fields in order of priority,
/// matched on the last path segment, then fall back to the first field.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    let priority_keys = [
        "netIncome",
        "currentRatio",
        "transactionCount",
        "difference",
        "cash",
    ];

    let rows = flatten(result_obj);

    for key in &priority_keys {
        let hit = rows.iter().find(|(path, val)| {
            path.rsplit('.').next() == Some(*key) && !val.is_null()
        });
        if let Some((_, val)) = hit {
            println!("{}", format_minimal(val));
            return;
        }
    }

    match rows.first() {
        Some((key, val)) if !key.is_empty() => println!("{}: {}", key, format_minimal(val)),
        _ => println!("{}", format_minimal(result_obj)),
    }
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
