//! Post-write verification.
//!
//! eBay accepts a replacement and may still store a normalised value (a
//! price of "10.00" comes back as "10.0", quantities as numbers). After a
//! write the resource is fetched again and every requested leaf is compared
//! against what eBay kept.

use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Discrepancy {
    pub field: String,
    pub requested: Value,
    pub stored: Value,
}

/// Requested leaves whose stored value differs after normalisation.
pub fn find_discrepancies(requested: &Value, stored: &Value) -> Vec<Discrepancy> {
    let mut found = Vec::new();
    collect(requested, stored, String::new(), &mut found);
    found
}

fn collect(requested: &Value, stored: &Value, field: String, found: &mut Vec<Discrepancy>) {
    match requested {
        Value::Object(map) => {
            for (key, value) in map {
                let child = if field.is_empty() {
                    key.clone()
                } else {
                    format!("{field}.{key}")
                };
                let stored_child = stored.get(key).unwrap_or(&Value::Null);
                collect(value, stored_child, child, found);
            }
        }
        _ => {
            if !values_match(requested, stored) {
                found.push(Discrepancy {
                    field,
                    requested: requested.clone(),
                    stored: stored.clone(),
                });
            }
        }
    }
}

/// Whether `stored` holds what was `requested`.
///
/// Numeric strings compare as numbers and null equals absent. Objects are
/// compared on the requested keys only, since eBay adds fields of its own.
pub fn values_match(requested: &Value, stored: &Value) -> bool {
    match (requested, stored) {
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| values_match(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => xs
            .iter()
            .all(|(k, v)| values_match(v, ys.get(k).unwrap_or(&Value::Null))),
        (Value::Array(xs), Value::Null) => xs.is_empty(),
        (Value::Array(_) | Value::Object(_), _) | (_, Value::Array(_) | Value::Object(_)) => false,
        _ => normalize(requested) == normalize(stored),
    }
}

#[derive(Debug, PartialEq)]
enum Scalar {
    Number(f64),
    Text(String),
}

fn normalize(value: &Value) -> Scalar {
    match value {
        Value::Null => Scalar::Text(String::new()),
        Value::Bool(b) => Scalar::Text(b.to_string()),
        Value::Number(n) => n
            .as_f64()
            .map(Scalar::Number)
            .unwrap_or_else(|| Scalar::Text(n.to_string())),
        Value::String(s) => match s.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => Scalar::Number(n),
            _ => Scalar::Text(s.clone()),
        },
        Value::Array(_) | Value::Object(_) => Scalar::Text(value.to_string()),
    }
}

/// One-line summary appended to a tool message.
pub fn summarize(discrepancies: &[Discrepancy]) -> Option<String> {
    if discrepancies.is_empty() {
        return None;
    }
    let parts: Vec<String> = discrepancies
        .iter()
        .map(|d| format!("{} (requested {}, eBay stored {})", d.field, d.requested, d.stored))
        .collect();
    Some(format!(
        "Verification found differences: {}",
        parts.join("; ")
    ))
}
