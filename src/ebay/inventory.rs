//! Sell Inventory API calls.

use serde_json::{Value, json};

use super::client::{ApiPath, EbayClient};
use super::error::{ApiError, ApiResult};

const INVENTORY_API: &str = "/sell/inventory/v1";

fn offer_path() -> ApiPath {
    ApiPath::new(INVENTORY_API).segment("offer")
}

fn inventory_item_path(sku: &str) -> ApiPath {
    ApiPath::new(INVENTORY_API)
        .segment("inventory_item")
        .segment(sku)
}

impl EbayClient {
    /// `GET /offer?sku=..` as returned by eBay.
    pub async fn get_offers_by_sku(
        &self,
        token: &str,
        sku: &str,
        marketplace_id: &str,
    ) -> ApiResult<Value> {
        self.get_json(
            token,
            &offer_path(),
            &[
                ("sku", sku.to_string()),
                ("marketplace_id", marketplace_id.to_string()),
            ],
        )
        .await
    }

    /// First offer for `sku`, or `None` when eBay has none.
    pub async fn find_offer(
        &self,
        token: &str,
        sku: &str,
        marketplace_id: &str,
    ) -> ApiResult<Option<Value>> {
        match self.get_offers_by_sku(token, sku, marketplace_id).await {
            Ok(body) => Ok(first_offer(body)),
            Err(err) if err.is_not_found() => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// First offer for `sku`. eBay's 404 is passed through as an upstream
    /// error; an empty offer list is reported as not found.
    pub async fn require_offer(
        &self,
        token: &str,
        sku: &str,
        marketplace_id: &str,
    ) -> ApiResult<Value> {
        let body = self.get_offers_by_sku(token, sku, marketplace_id).await?;
        first_offer(body).ok_or_else(|| ApiError::NotFound {
            message: format!("No offer exists for SKU '{sku}'. Use action 'create' to create one."),
        })
    }

    pub async fn create_offer(&self, token: &str, offer: &Value) -> ApiResult<Value> {
        self.post_json(token, &offer_path(), offer).await
    }

    pub async fn update_offer(
        &self,
        token: &str,
        offer_id: &str,
        offer: &Value,
    ) -> ApiResult<Value> {
        self.put_json(token, &offer_path().segment(offer_id), offer)
            .await
    }

    pub async fn withdraw_offer(&self, token: &str, offer_id: &str) -> ApiResult<Value> {
        self.post_json(
            token,
            &offer_path().segment(offer_id).segment("withdraw"),
            &json!({}),
        )
        .await
    }

    pub async fn publish_offer(&self, token: &str, offer_id: &str) -> ApiResult<Value> {
        self.post_json(
            token,
            &offer_path().segment(offer_id).segment("publish"),
            &json!({}),
        )
        .await
    }

    pub async fn get_listing_fees(&self, token: &str, offer_ids: &[String]) -> ApiResult<Value> {
        let offers: Vec<Value> = offer_ids.iter().map(|id| json!({"offerId": id})).collect();
        self.post_json(
            token,
            &offer_path().segment("get_listing_fees"),
            &json!({"offers": offers}),
        )
        .await
    }

    pub async fn get_inventory_item(&self, token: &str, sku: &str) -> ApiResult<Value> {
        self.get_json(token, &inventory_item_path(sku), &[]).await
    }

    /// Inventory item for `sku`, or `None` on 404.
    pub async fn find_inventory_item(&self, token: &str, sku: &str) -> ApiResult<Option<Value>> {
        match self.get_inventory_item(token, sku).await {
            Ok(item) => Ok(Some(item)),
            Err(err) if err.is_not_found() => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Create or fully replace an inventory item.
    pub async fn put_inventory_item(
        &self,
        token: &str,
        sku: &str,
        item: &Value,
    ) -> ApiResult<Value> {
        self.put_json(token, &inventory_item_path(sku), item).await
    }

    pub async fn delete_inventory_item(&self, token: &str, sku: &str) -> ApiResult<Value> {
        self.delete(token, &inventory_item_path(sku)).await
    }

    pub async fn list_inventory_items(
        &self,
        token: &str,
        limit: u32,
        offset: u32,
    ) -> ApiResult<Value> {
        self.get_json(
            token,
            &ApiPath::new(INVENTORY_API).segment("inventory_item"),
            &[("limit", limit.to_string()), ("offset", offset.to_string())],
        )
        .await
    }
}

fn first_offer(body: Value) -> Option<Value> {
    match body {
        Value::Object(mut map) => match map.remove("offers") {
            Some(Value::Array(offers)) => offers.into_iter().next(),
            _ => None,
        },
        _ => None,
    }
}

/// `offerId` of an offer document.
pub fn offer_id_of(offer: &Value) -> ApiResult<String> {
    offer
        .get("offerId")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| ApiError::InvalidResponse {
            message: "offer has no offerId".to_string(),
        })
}
