//! MCP tools for inventory items.

use std::sync::Arc;

use rmcp::{
    ErrorData as McpError, handler::server::wrapper::Parameters, model::*, schemars,
    schemars::JsonSchema,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::Settings;
use crate::credentials::CredentialStore;
use crate::ebay::{ApiError, ApiResult, SharedExecutor};
use crate::mcp::tools::{tool_result, validate};
use crate::replace::{ActionOutcome, items};

pub const DEFAULT_PAGE_SIZE: u32 = 25;
pub const MAX_PAGE_SIZE: u32 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum InventoryItemAction {
    Create,
    Modify,
    Get,
    Delete,
}

impl InventoryItemAction {
    pub fn as_str(self) -> &'static str {
        match self {
            InventoryItemAction::Create => "create",
            InventoryItemAction::Modify => "modify",
            InventoryItemAction::Get => "get",
            InventoryItemAction::Delete => "delete",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ManageInventoryItemParams {
    #[schemars(description = "Seller SKU of the inventory item (1-50 characters)")]
    pub sku: String,
    #[schemars(
        description = "'create' a new item, 'modify' fields of an existing item, 'get' it, or 'delete' it together with its offers"
    )]
    pub action: InventoryItemAction,
    #[schemars(
        description = "Item fields for create/modify. Create needs condition, product.title (max 80), product.description (max 4000) and availability.shipToLocationAvailability.quantity. Modify only needs the fields that change. Not accepted for get or delete."
    )]
    pub item_data: Option<Value>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct GetInventoryItemsParams {
    #[schemars(description = "Page size (default: 25, range: 1-200)")]
    pub limit: Option<u32>,
    #[schemars(description = "Number of items to skip (default: 0)")]
    pub offset: Option<u32>,
}

pub struct InventoryItemTools<S> {
    executor: SharedExecutor<S>,
    settings: Arc<Settings>,
}

impl<S> Clone for InventoryItemTools<S> {
    fn clone(&self) -> Self {
        Self {
            executor: Arc::clone(&self.executor),
            settings: Arc::clone(&self.settings),
        }
    }
}

impl<S: CredentialStore + 'static> InventoryItemTools<S> {
    pub fn new(executor: SharedExecutor<S>, settings: Arc<Settings>) -> Self {
        Self { executor, settings }
    }

    pub async fn manage_inventory_item(
        &self,
        params: Parameters<ManageInventoryItemParams>,
    ) -> Result<CallToolResult, McpError> {
        let Parameters(params) = params;
        let operation = format!("manage_inventory_item({})", params.action.as_str());
        let result = self.run_item_action(&operation, params).await;
        tool_result(&operation, result)
    }

    async fn run_item_action(
        &self,
        operation: &str,
        params: ManageInventoryItemParams,
    ) -> ApiResult<ActionOutcome> {
        let sku = validate::sku(&params.sku)?;
        let data = match params.item_data.filter(|d| !d.is_null()) {
            None => None,
            Some(_)
                if matches!(
                    params.action,
                    InventoryItemAction::Get | InventoryItemAction::Delete
                ) =>
            {
                return Err(ApiError::validation(format!(
                    "item_data is only accepted for create and modify, not '{}'",
                    params.action.as_str()
                )));
            }
            Some(data) => {
                let data = validate::document("item_data", data)?;
                validate::item_fields(&data)?;
                Some(data)
            }
        };
        let placeholder = self.settings.placeholder_image_url.as_deref();

        match (params.action, data) {
            (InventoryItemAction::Create, Some(data)) => {
                let data = &data;
                self.executor
                    .execute(operation, |token, client| async move {
                        items::create_item(&client, &token, sku, data, placeholder).await
                    })
                    .await
            }
            (InventoryItemAction::Modify, Some(changes)) => {
                let changes = &changes;
                self.executor
                    .execute(operation, |token, client| async move {
                        items::modify_item(&client, &token, sku, changes).await
                    })
                    .await
            }
            (InventoryItemAction::Get, _) => {
                self.executor
                    .execute(operation, |token, client| async move {
                        items::get_item(&client, &token, sku).await
                    })
                    .await
            }
            (InventoryItemAction::Delete, _) => {
                self.executor
                    .execute(operation, |token, client| async move {
                        items::delete_item(&client, &token, sku).await
                    })
                    .await
            }
            (action @ (InventoryItemAction::Create | InventoryItemAction::Modify), None) => {
                Err(ApiError::validation(format!(
                    "item_data is required for action '{}'",
                    action.as_str()
                )))
            }
        }
    }

    pub async fn get_inventory_items(
        &self,
        params: Parameters<GetInventoryItemsParams>,
    ) -> Result<CallToolResult, McpError> {
        let limit = validate::bounded(
            "limit",
            params.0.limit,
            DEFAULT_PAGE_SIZE,
            1,
            MAX_PAGE_SIZE,
        );
        let result = match limit {
            Ok(limit) => {
                let offset = params.0.offset.unwrap_or(0);
                self.executor
                    .execute("get_inventory_items", |token, client| async move {
                        client.list_inventory_items(&token, limit, offset).await
                    })
                    .await
            }
            Err(e) => Err(e),
        };
        tool_result("get_inventory_items", result)
    }
}
