//! MCP tool implementations
//!
//! Tool handlers are grouped by eBay API. Each struct holds the shared
//! executor and settings; [`super::McpServer`] registers the tools and
//! delegates to these handlers.
//!
//! Failures never surface as protocol errors. They come back as tool results
//! flagged `is_error` whose text names the failed operation and what to do
//! next, so the calling model can recover on its own.

mod auth;
mod browse;
mod catalog;
mod inventory_items;
mod offers;
mod taxonomy;
pub mod validate;

#[cfg(test)]
mod auth_test;
#[cfg(test)]
mod offers_test;
#[cfg(test)]
mod validate_test;

pub use auth::AuthTools;
pub use browse::{BrowseTools, SearchItemsParams};
pub use catalog::{CatalogTools, SearchByGtinParams};
pub use inventory_items::{
    GetInventoryItemsParams, InventoryItemAction, InventoryItemTools, ManageInventoryItemParams,
};
pub use offers::{GetListingFeesParams, ManageOfferParams, OfferAction, OfferTools};
pub use taxonomy::{CategorySuggestionsParams, ItemAspectsParams, TaxonomyTools};

use rmcp::{ErrorData as McpError, model::*};
use serde::Serialize;
use tracing::warn;

use crate::ebay::{ApiError, ApiResult};

/// Pretty-printed JSON success result.
pub(crate) fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let text = serde_json::to_string_pretty(value).map_err(|e| {
        McpError::internal_error(
            "serialization_failed",
            Some(serde_json::json!({"error": e.to_string()})),
        )
    })?;
    Ok(CallToolResult::success(vec![Content::text(text)]))
}

/// Error result carrying the actionable message for `operation`.
pub(crate) fn error_result(operation: &str, err: &ApiError) -> CallToolResult {
    warn!(operation, error = %err, "Tool call failed");
    CallToolResult::error(vec![Content::text(err.describe(operation))])
}

/// Map an API outcome onto a tool result.
pub(crate) fn tool_result<T: Serialize>(
    operation: &str,
    result: ApiResult<T>,
) -> Result<CallToolResult, McpError> {
    match result {
        Ok(value) => json_result(&value),
        Err(err) => Ok(error_result(operation, &err)),
    }
}
