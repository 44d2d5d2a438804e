//! Tests for tool parameter validation

use serde_json::json;

use crate::ebay::ApiError;
use crate::mcp::tools::validate::*;

fn message(err: ApiError) -> String {
    match err {
        ApiError::Validation { message } => message,
        other => panic!("expected a validation error, got {other:?}"),
    }
}

#[test]
fn test_sku_length() {
    assert_eq!(sku("A-1").unwrap(), "A-1");
    assert!(sku(&"x".repeat(MAX_SKU_LEN)).is_ok());
    let too_long = message(sku(&"x".repeat(MAX_SKU_LEN + 1)).unwrap_err());
    assert!(too_long.contains("50"));
    assert!(message(sku(" ").unwrap_err()).contains("empty"));
}

#[test]
fn test_bounded_applies_default() {
    assert_eq!(bounded("limit", None, 10, 1, 200).unwrap(), 10);
    assert_eq!(bounded("limit", Some(200), 10, 1, 200).unwrap(), 200);
    assert!(bounded("limit", Some(0), 10, 1, 200).is_err());
}

#[test]
fn test_document_accepts_objects_and_json_strings() {
    assert_eq!(
        document("offer_data", json!({"lotSize": 2})).unwrap(),
        json!({"lotSize": 2})
    );
    assert_eq!(
        document("offer_data", json!("{\"lotSize\": 2}")).unwrap(),
        json!({"lotSize": 2})
    );
    let unparsable = message(document("offer_data", json!("{nope")).unwrap_err());
    assert!(unparsable.contains("not valid JSON"));
    let not_object = message(document("offer_data", json!([1])).unwrap_err());
    assert!(not_object.contains("JSON object"));
    let empty = message(document("offer_data", json!({})).unwrap_err());
    assert!(empty.contains("at least one field"));
}

#[test]
fn test_offer_fields_collects_every_problem() {
    let err = offer_fields(&json!({
        "availableQuantity": "many",
        "lotSize": 0,
        "quantityLimitPerBuyer": 0,
        "merchantLocationKey": "k".repeat(37),
        "storeCategoryNames": ["a", "b", "c"]
    }))
    .unwrap_err();

    let text = message(err);
    for field in [
        "availableQuantity",
        "lotSize",
        "quantityLimitPerBuyer",
        "merchantLocationKey",
        "storeCategoryNames",
    ] {
        assert!(text.contains(field), "{field} missing from: {text}");
    }
}

#[test]
fn test_offer_fields_accept_valid_values() {
    assert!(offer_fields(&json!({
        "availableQuantity": "0",
        "lotSize": 1,
        "quantityLimitPerBuyer": 2,
        "listingDescription": "<p>Boxed</p>",
        "storeCategoryNames": ["/Cameras"]
    }))
    .is_ok());
    // Nulls clear fields and are not checked
    assert!(offer_fields(&json!({"lotSize": null})).is_ok());
}

#[test]
fn test_item_fields() {
    assert!(item_fields(&json!({
        "condition": "PRE_OWNED_FAIR",
        "product": {"title": "t".repeat(MAX_TITLE_LEN)},
        "availability": {"shipToLocationAvailability": {"quantity": 0}}
    }))
    .is_ok());

    let text = message(
        item_fields(&json!({
            "condition": "MINT",
            "product": {"title": 5, "description": "d".repeat(MAX_DESCRIPTION_LEN + 1)},
            "availability": {"shipToLocationAvailability": {"quantity": -2}}
        }))
        .unwrap_err(),
    );
    assert!(text.contains("condition"));
    assert!(text.contains("product.title must be a string"));
    assert!(text.contains("product.description"));
    assert!(text.contains("quantity must be at least 0"));
}
