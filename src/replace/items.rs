//! Inventory item actions.

use serde_json::{Value, json};
use tracing::info;

use crate::ebay::{ApiError, ApiResult, EbayClient};

use super::{ActionOutcome, ReplacePolicy, prepare_replace_payload};

pub const ITEM_REQUIRED_ON_CREATE: &[&str] = &[
    "condition",
    "product.title",
    "product.description",
    "availability.shipToLocationAvailability.quantity",
];

/// Returned by GET but not accepted in the replacement body.
pub const ITEM_READ_ONLY: &[&str] = &["sku", "locale", "groupIds"];

/// Policy for inventory items. New items without images get the holding
/// image, since eBay will not publish an item without one.
pub fn item_policy(placeholder_image_url: Option<&str>) -> ReplacePolicy {
    let defaults = match placeholder_image_url {
        Some(url) => json!({"product": {"imageUrls": [url]}}),
        None => json!({}),
    };
    ReplacePolicy {
        defaults,
        read_only: ITEM_READ_ONLY,
        required_on_create: ITEM_REQUIRED_ON_CREATE,
    }
}

pub async fn create_item(
    client: &EbayClient,
    token: &str,
    sku: &str,
    item_data: &Value,
    placeholder_image_url: Option<&str>,
) -> ApiResult<ActionOutcome> {
    let payload = prepare_replace_payload(None, item_data, &item_policy(placeholder_image_url))?;

    if client.find_inventory_item(token, sku).await?.is_some() {
        return Err(ApiError::Conflict {
            message: format!(
                "An inventory item already exists for SKU '{sku}'. Use action 'modify' to change it."
            ),
        });
    }

    let response = client.put_inventory_item(token, sku, &payload).await?;
    info!(sku, "Created inventory item");

    let refetched = client.get_inventory_item(token, sku).await;
    Ok(
        ActionOutcome::new("create", sku, format!("Inventory item {sku} created."))
            .with_details(response)
            .verified(item_data, refetched),
    )
}

pub async fn modify_item(
    client: &EbayClient,
    token: &str,
    sku: &str,
    changes: &Value,
) -> ApiResult<ActionOutcome> {
    let current = client.get_inventory_item(token, sku).await?;
    let payload = prepare_replace_payload(Some(&current), changes, &item_policy(None))?;

    let response = client.put_inventory_item(token, sku, &payload).await?;
    info!(sku, "Replaced inventory item");

    let refetched = client.get_inventory_item(token, sku).await;
    Ok(
        ActionOutcome::new("modify", sku, format!("Inventory item {sku} updated."))
            .with_details(response)
            .verified(changes, refetched),
    )
}

pub async fn get_item(client: &EbayClient, token: &str, sku: &str) -> ApiResult<ActionOutcome> {
    let item = client.get_inventory_item(token, sku).await?;
    Ok(
        ActionOutcome::new("get", sku, format!("Inventory item {sku} retrieved."))
            .with_details(item),
    )
}

pub async fn delete_item(client: &EbayClient, token: &str, sku: &str) -> ApiResult<ActionOutcome> {
    client.delete_inventory_item(token, sku).await?;
    info!(sku, "Deleted inventory item");
    Ok(ActionOutcome::new(
        "delete",
        sku,
        format!("Inventory item {sku} and any offers for it were deleted."),
    ))
}
