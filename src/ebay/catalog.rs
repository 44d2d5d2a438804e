//! Browse, Taxonomy and Catalog API calls.

use serde_json::Value;

use super::client::{ApiPath, EbayClient};
use super::error::ApiResult;

fn category_tree(tree_id: &str) -> ApiPath {
    ApiPath::new("/commerce/taxonomy/v1/category_tree").segment(tree_id)
}

impl EbayClient {
    pub async fn search_items(&self, token: &str, query: &str, limit: u32) -> ApiResult<Value> {
        self.get_json(
            token,
            &ApiPath::new("/buy/browse/v1/item_summary/search"),
            &[("q", query.to_string()), ("limit", limit.to_string())],
        )
        .await
    }

    pub async fn category_suggestions(
        &self,
        token: &str,
        tree_id: &str,
        query: &str,
    ) -> ApiResult<Value> {
        self.get_json(
            token,
            &category_tree(tree_id).segment("get_category_suggestions"),
            &[("q", query.to_string())],
        )
        .await
    }

    pub async fn item_aspects_for_category(
        &self,
        token: &str,
        tree_id: &str,
        category_id: &str,
    ) -> ApiResult<Value> {
        self.get_json(
            token,
            &category_tree(tree_id).segment("get_item_aspects_for_category"),
            &[("category_id", category_id.to_string())],
        )
        .await
    }

    pub async fn search_products_by_gtin(&self, token: &str, gtin: &str) -> ApiResult<Value> {
        self.get_json(
            token,
            &ApiPath::new("/commerce/catalog/v1_beta/product_summary/search"),
            &[("gtin", gtin.to_string())],
        )
        .await
    }
}
