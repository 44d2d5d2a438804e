//! Payload preparation for full-replace endpoints.

use serde_json::{Map, Value};

use crate::ebay::{ApiError, ApiResult};

/// How a resource type is prepared for a full replacement.
#[derive(Debug, Clone)]
pub struct ReplacePolicy {
    /// Document the caller's fields are laid over when nothing exists yet.
    pub defaults: Value,
    /// Top-level fields eBay returns on GET but rejects on PUT.
    pub read_only: &'static [&'static str],
    /// Dotted paths that must be present before a create is sent.
    pub required_on_create: &'static [&'static str],
}

/// Deep-merge `changes` over `base`.
///
/// Objects merge key by key, anything else in `changes` replaces the base
/// value, arrays included. An explicit `null` overrides too, which is how a
/// caller clears a field.
pub fn merge_changes(base: &Value, changes: &Value) -> Value {
    match (base, changes) {
        (Value::Object(base_map), Value::Object(change_map)) => {
            let mut merged = base_map.clone();
            for (key, value) in change_map {
                let next = match (merged.get(key), value) {
                    (Some(existing @ Value::Object(_)), Value::Object(_)) => {
                        merge_changes(existing, value)
                    }
                    _ => value.clone(),
                };
                merged.insert(key.clone(), next);
            }
            Value::Object(merged)
        }
        _ => changes.clone(),
    }
}

/// Drop `null` members recursively. A full replacement clears a field by
/// leaving it out.
pub fn prune_nulls(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k, prune_nulls(v)))
                .collect::<Map<String, Value>>(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(prune_nulls).collect()),
        other => other,
    }
}

/// Dotted paths from `required` that are absent or null in `doc`.
pub fn missing_fields(doc: &Value, required: &[&str]) -> Vec<String> {
    required
        .iter()
        .filter(|path| {
            let found = path.split('.').try_fold(doc, |node, key| node.get(key));
            matches!(found, None | Some(Value::Null))
        })
        .map(|path| path.to_string())
        .collect()
}

/// Build the complete body for a full-replace write.
///
/// With a `current` document (modify), read-only fields are removed and the
/// changes are merged over what is left, so every other field is carried
/// forward. Without one (create), the changes are laid over the policy
/// defaults and the required fields are checked.
pub fn prepare_replace_payload(
    current: Option<&Value>,
    changes: &Value,
    policy: &ReplacePolicy,
) -> ApiResult<Value> {
    if !changes.is_object() {
        return Err(ApiError::validation("changes must be a JSON object"));
    }

    let base = match current {
        Some(doc) => {
            let mut doc = doc.clone();
            if let Value::Object(map) = &mut doc {
                for field in policy.read_only {
                    map.remove(*field);
                }
            }
            doc
        }
        None => policy.defaults.clone(),
    };

    let payload = prune_nulls(merge_changes(&base, changes));

    if current.is_none() {
        let missing = missing_fields(&payload, policy.required_on_create);
        if !missing.is_empty() {
            return Err(ApiError::validation(format!(
                "missing required fields for create: {}",
                missing.join(", ")
            )));
        }
    }

    Ok(payload)
}
