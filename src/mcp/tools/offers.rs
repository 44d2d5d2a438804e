//! MCP tools for offers.
//!
//! `manage_offer` is one tool with an action field. The action is a closed
//! enum and every arm calls its own pipeline in [`crate::replace::offers`].

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
use crate::replace::{ActionOutcome, offers};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum OfferAction {
    Create,
    Modify,
    Withdraw,
    Publish,
    Get,
}

impl OfferAction {
    pub fn as_str(self) -> &'static str {
        match self {
            OfferAction::Create => "create",
            OfferAction::Modify => "modify",
            OfferAction::Withdraw => "withdraw",
            OfferAction::Publish => "publish",
            OfferAction::Get => "get",
        }
    }

    fn takes_data(self) -> bool {
        matches!(self, OfferAction::Create | OfferAction::Modify)
    }
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ManageOfferParams {
    #[schemars(description = "Seller SKU the offer belongs to (1-50 characters)")]
    pub sku: String,
    #[schemars(
        description = "'create' a new offer, 'modify' fields of the existing offer, 'withdraw' (end the listing), 'publish' (list it), or 'get' the current offer"
    )]
    pub action: OfferAction,
    #[schemars(
        description = "Offer fields for create/modify, e.g. {\"availableQuantity\": 5, \"pricingSummary\": {\"price\": {\"value\": \"12.50\", \"currency\": \"GBP\"}}}. Modify only needs the fields that change; every other field is kept. Create fills marketplace, format, policies and location from the server defaults. Set a field to null to clear it. Not accepted for withdraw, publish or get."
    )]
    pub offer_data: Option<Value>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct GetListingFeesParams {
    #[schemars(description = "Unpublished offer IDs to price (1-250)")]
    pub offer_ids: Vec<String>,
}

pub struct OfferTools<S> {
    executor: SharedExecutor<S>,
    settings: Arc<Settings>,
}

impl<S> Clone for OfferTools<S> {
    fn clone(&self) -> Self {
        Self {
            executor: Arc::clone(&self.executor),
            settings: Arc::clone(&self.settings),
        }
    }
}

impl<S: CredentialStore + 'static> OfferTools<S> {
    pub fn new(executor: SharedExecutor<S>, settings: Arc<Settings>) -> Self {
        Self { executor, settings }
    }

    pub async fn manage_offer(
        &self,
        params: Parameters<ManageOfferParams>,
    ) -> Result<CallToolResult, McpError> {
        let Parameters(params) = params;
        let operation = format!("manage_offer({})", params.action.as_str());
        let result = self.run_offer_action(&operation, params).await;
        tool_result(&operation, result)
    }

    async fn run_offer_action(
        &self,
        operation: &str,
        params: ManageOfferParams,
    ) -> ApiResult<ActionOutcome> {
        let sku = validate::sku(&params.sku)?;
        let data = offer_data(params.action, params.offer_data)?;
        let defaults = &self.settings.offer_defaults;
        let marketplace_id = defaults.marketplace_id.as_str();

        match (params.action, data) {
            (OfferAction::Create, Some(data)) => {
                let data = &data;
                self.executor
                    .execute(operation, |token, client| async move {
                        offers::create_offer(&client, &token, sku, data, defaults).await
                    })
                    .await
            }
            (OfferAction::Modify, Some(changes)) => {
                let changes = &changes;
                self.executor
                    .execute(operation, |token, client| async move {
                        offers::modify_offer(&client, &token, sku, changes, defaults).await
                    })
                    .await
            }
            (OfferAction::Withdraw, _) => {
                self.executor
                    .execute(operation, |token, client| async move {
                        offers::withdraw_offer(&client, &token, sku, marketplace_id).await
                    })
                    .await
            }
            (OfferAction::Publish, _) => {
                self.executor
                    .execute(operation, |token, client| async move {
                        offers::publish_offer(&client, &token, sku, marketplace_id).await
                    })
                    .await
            }
            (OfferAction::Get, _) => {
                self.executor
                    .execute(operation, |token, client| async move {
                        offers::get_offer(&client, &token, sku, marketplace_id).await
                    })
                    .await
            }
            (OfferAction::Create | OfferAction::Modify, None) => {
                let action = params.action.as_str();
                Err(ApiError::validation(format!("offer_data is required for action '{action}'")))
            }
        }
    }

    pub async fn get_listing_fees(
        &self,
        params: Parameters<GetListingFeesParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = match listing_fee_ids(&params.0.offer_ids) {
            Ok(ids) => {
                let ids = &ids;
                self.executor
                    .execute("get_listing_fees", |token, client| async move {
                        client.get_listing_fees(&token, ids).await
                    })
                    .await
            }
            Err(e) => Err(e),
        };
        tool_result("get_listing_fees", result)
    }
}

/// Check `offer_data` against the action and the field limits.
fn offer_data(action: OfferAction, data: Option<Value>) -> ApiResult<Option<Value>> {
    let Some(data) = data.filter(|d| !d.is_null()) else {
        return Ok(None);
    };
    if !action.takes_data() {
        return Err(ApiError::validation(format!(
            "offer_data is only accepted for create and modify, not '{}'",
            action.as_str()
        )));
    }
    let data = validate::document("offer_data", data)?;
    validate::offer_fields(&data)?;
    Ok(Some(data))
}

fn listing_fee_ids(offer_ids: &[String]) -> ApiResult<Vec<String>> {
    if offer_ids.is_empty() || offer_ids.len() > validate::MAX_LISTING_FEE_OFFERS {
        return Err(ApiError::validation(format!(
            "offer_ids must hold between 1 and {} IDs, got {}",
            validate::MAX_LISTING_FEE_OFFERS,
            offer_ids.len()
        )));
    }
    offer_ids
        .iter()
        .map(|id| validate::non_empty("offer_ids entry", id).map(str::to_string))
        .collect()
}
