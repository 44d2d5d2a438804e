//! Parameter checks run before anything is sent to eBay.
//!
//! The limits mirror what the Sell Inventory API enforces, so a bad request
//! is rejected locally with a readable message instead of an eBay error code.

use serde_json::Value;

use crate::ebay::{ApiError, ApiResult};

pub const MAX_SKU_LEN: usize = 50;
pub const MAX_TITLE_LEN: usize = 80;
pub const MAX_DESCRIPTION_LEN: usize = 4000;
pub const MAX_LISTING_DESCRIPTION_LEN: usize = 500_000;
pub const MAX_MERCHANT_LOCATION_KEY_LEN: usize = 36;
pub const MAX_STORE_CATEGORY_NAMES: usize = 2;
pub const MAX_LISTING_FEE_OFFERS: usize = 250;

/// Item conditions accepted by the Inventory API.
pub const CONDITIONS: &[&str] = &[
    "NEW",
    "LIKE_NEW",
    "NEW_OTHER",
    "NEW_WITH_DEFECTS",
    "USED_EXCELLENT",
    "USED_VERY_GOOD",
    "USED_GOOD",
    "USED_ACCEPTABLE",
    "FOR_PARTS_OR_NOT_WORKING",
    "PRE_OWNED_EXCELLENT",
    "PRE_OWNED_FAIR",
];

pub fn sku(value: &str) -> ApiResult<&str> {
    if value.trim().is_empty() {
        return Err(ApiError::validation("sku must not be empty"));
    }
    if value.chars().count() > MAX_SKU_LEN {
        return Err(ApiError::validation(format!("sku must be at most {MAX_SKU_LEN} characters")));
    }
    Ok(value)
}

pub fn non_empty<'a>(name: &str, value: &'a str) -> ApiResult<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation(format!("{name} must not be empty")));
    }
    Ok(trimmed)
}

/// Apply `default` and check `min..=max`.
pub fn bounded(name: &str, value: Option<u32>, default: u32, min: u32, max: u32) -> ApiResult<u32> {
    let value = value.unwrap_or(default);
    if !(min..=max).contains(&value) {
        return Err(ApiError::validation(format!(
            "{name} must be between {min} and {max}, got {value}"
        )));
    }
    Ok(value)
}

/// A change document: a JSON object, or a string holding one.
pub fn document(name: &str, value: Value) -> ApiResult<Value> {
    let value = match value {
        Value::String(text) => serde_json::from_str(&text)
            .map_err(|e| ApiError::validation(format!("{name} is not valid JSON: {e}")))?,
        other => other,
    };
    match &value {
        Value::Object(map) if map.is_empty() => Err(ApiError::validation(format!(
            "{name} must contain at least one field"
        ))),
        Value::Object(_) => Ok(value),
        _ => Err(ApiError::validation(format!("{name} must be a JSON object"))),
    }
}

pub fn offer_fields(doc: &Value) -> ApiResult<()> {
    let mut problems = Vec::new();

    check_integer(doc, "availableQuantity", 0, &mut problems);
    check_integer(doc, "quantityLimitPerBuyer", 1, &mut problems);
    check_integer(doc, "lotSize", 1, &mut problems);
    check_length(
        doc,
        "listingDescription",
        MAX_LISTING_DESCRIPTION_LEN,
        &mut problems,
    );
    check_length(
        doc,
        "merchantLocationKey",
        MAX_MERCHANT_LOCATION_KEY_LEN,
        &mut problems,
    );

    match lookup(doc, "storeCategoryNames") {
        None => {}
        Some(Value::Array(names)) if names.len() <= MAX_STORE_CATEGORY_NAMES => {}
        Some(Value::Array(_)) => problems.push(format!(
            "storeCategoryNames allows at most {MAX_STORE_CATEGORY_NAMES} entries"
        )),
        Some(_) => problems.push("storeCategoryNames must be a list".to_string()),
    }

    finish(problems)
}

pub fn item_fields(doc: &Value) -> ApiResult<()> {
    let mut problems = Vec::new();

    match lookup(doc, "condition") {
        None => {}
        Some(Value::String(c)) if CONDITIONS.contains(&c.as_str()) => {}
        Some(other) => problems.push(format!(
            "condition {other} is not one of {}",
            CONDITIONS.join(", ")
        )),
    }
    check_length(doc, "product.title", MAX_TITLE_LEN, &mut problems);
    check_length(
        doc,
        "product.description",
        MAX_DESCRIPTION_LEN,
        &mut problems,
    );
    check_integer(
        doc,
        "availability.shipToLocationAvailability.quantity",
        0,
        &mut problems,
    );

    finish(problems)
}

/// Non-null value at a dotted path.
fn lookup<'a>(doc: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(doc, |node, key| node.get(key))
        .filter(|v| !v.is_null())
}

fn check_integer(doc: &Value, path: &str, min: i64, problems: &mut Vec<String>) {
    let Some(value) = lookup(doc, path) else {
        return;
    };
    let parsed = match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    match parsed {
        Some(n) if n >= min => {}
        Some(n) => problems.push(format!("{path} must be at least {min}, got {n}")),
        None => problems.push(format!("{path} must be a whole number")),
    }
}

fn check_length(doc: &Value, path: &str, max: usize, problems: &mut Vec<String>) {
    match lookup(doc, path) {
        None => {}
        Some(Value::String(s)) if s.chars().count() <= max => {}
        Some(Value::String(_)) => problems.push(format!("{path} must be at most {max} characters")),
        Some(_) => problems.push(format!("{path} must be a string")),
    }
}

fn finish(problems: Vec<String>) -> ApiResult<()> {
    if problems.is_empty() {
        Ok(())
    } else {
        Err(ApiError::validation(problems.join("; ")))
    }
}
