//! Offer actions.

use serde_json::{Value, json};
use tracing::info;

use crate::config::OfferDefaults;
use crate::ebay::inventory::offer_id_of;
use crate::ebay::{ApiError, ApiResult, EbayClient};

use super::{ActionOutcome, ReplacePolicy, merge_changes, prepare_replace_payload};

pub const OFFER_REQUIRED_ON_CREATE: &[&str] = &[
    "marketplaceId",
    "format",
    "availableQuantity",
    "categoryId",
    "listingPolicies",
    "merchantLocationKey",
    "pricingSummary",
];

pub fn offer_policy(defaults: &OfferDefaults) -> ReplacePolicy {
    ReplacePolicy {
        defaults: defaults.to_document(),
        read_only: &[],
        required_on_create: OFFER_REQUIRED_ON_CREATE,
    }
}

pub async fn create_offer(
    client: &EbayClient,
    token: &str,
    sku: &str,
    offer_data: &Value,
    defaults: &OfferDefaults,
) -> ApiResult<ActionOutcome> {
    let changes = merge_changes(offer_data, &json!({"sku": sku}));
    let payload = prepare_replace_payload(None, &changes, &offer_policy(defaults))?;
    let marketplace_id = payload
        .get("marketplaceId")
        .and_then(Value::as_str)
        .unwrap_or(defaults.marketplace_id.as_str())
        .to_string();

    if let Some(existing) = client.find_offer(token, sku, &marketplace_id).await? {
        let existing_id = existing
            .get("offerId")
            .and_then(Value::as_str)
            .unwrap_or("unknown");
        return Err(ApiError::Conflict {
            message: format!(
                "An offer already exists for SKU '{sku}' (offerId {existing_id}). Use action 'modify' to change it."
            ),
        });
    }

    let created = client.create_offer(token, &payload).await?;
    let offer_id = offer_id_of(&created)?;
    info!(sku, offer_id = %offer_id, "Created offer");

    let refetched = client.require_offer(token, sku, &marketplace_id).await;
    Ok(
        ActionOutcome::new("create", sku, format!("Offer {offer_id} created."))
            .with_offer_id(offer_id)
            .verified(offer_data, refetched),
    )
}

pub async fn modify_offer(
    client: &EbayClient,
    token: &str,
    sku: &str,
    changes: &Value,
    defaults: &OfferDefaults,
) -> ApiResult<ActionOutcome> {
    let current = client
        .require_offer(token, sku, &defaults.marketplace_id)
        .await?;
    let offer_id = offer_id_of(&current)?;
    let payload = prepare_replace_payload(Some(&current), changes, &offer_policy(defaults))?;

    let response = client.update_offer(token, &offer_id, &payload).await?;
    info!(sku, offer_id = %offer_id, "Replaced offer");

    let refetched = client
        .require_offer(token, sku, &defaults.marketplace_id)
        .await;
    Ok(
        ActionOutcome::new("modify", sku, format!("Offer {offer_id} updated."))
            .with_offer_id(offer_id)
            .with_details(response)
            .verified(changes, refetched),
    )
}

pub async fn get_offer(
    client: &EbayClient,
    token: &str,
    sku: &str,
    marketplace_id: &str,
) -> ApiResult<ActionOutcome> {
    let offer = client.require_offer(token, sku, marketplace_id).await?;
    let offer_id = offer_id_of(&offer)?;
    Ok(
        ActionOutcome::new("get", sku, format!("Offer {offer_id} retrieved."))
            .with_offer_id(offer_id)
            .with_details(offer),
    )
}

pub async fn withdraw_offer(
    client: &EbayClient,
    token: &str,
    sku: &str,
    marketplace_id: &str,
) -> ApiResult<ActionOutcome> {
    let offer = client.require_offer(token, sku, marketplace_id).await?;
    let offer_id = offer_id_of(&offer)?;
    let response = client.withdraw_offer(token, &offer_id).await?;
    info!(sku, offer_id = %offer_id, "Withdrew offer");

    Ok(ActionOutcome::new(
        "withdraw",
        sku,
        format!("Offer {offer_id} withdrawn; the listing has ended."),
    )
    .with_offer_id(offer_id)
    .with_details(response))
}

pub async fn publish_offer(
    client: &EbayClient,
    token: &str,
    sku: &str,
    marketplace_id: &str,
) -> ApiResult<ActionOutcome> {
    let offer = client.require_offer(token, sku, marketplace_id).await?;
    let offer_id = offer_id_of(&offer)?;
    let response = client.publish_offer(token, &offer_id).await?;
    let listing_id = response
        .get("listingId")
        .and_then(Value::as_str)
        .map(str::to_string);
    info!(sku, offer_id = %offer_id, listing_id = ?listing_id, "Published offer");

    let message = match &listing_id {
        Some(id) => format!("Offer {offer_id} published as listing {id}."),
        None => format!("Offer {offer_id} published."),
    };
    let mut outcome = ActionOutcome::new("publish", sku, message)
        .with_offer_id(offer_id)
        .with_details(response);
    outcome.listing_id = listing_id;
    Ok(outcome)
}
