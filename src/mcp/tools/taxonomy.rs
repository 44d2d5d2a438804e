//! MCP tools for the Taxonomy API.

use std::sync::Arc;

use rmcp::{
    ErrorData as McpError, handler::server::wrapper::Parameters, model::*, schemars,
    schemars::JsonSchema,
};
use serde::{Deserialize, Serialize};

use crate::config::Settings;
use crate::credentials::CredentialStore;
use crate::ebay::SharedExecutor;
use crate::mcp::tools::{tool_result, validate};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct CategorySuggestionsParams {
    #[schemars(description = "Short description of the item, e.g. 'vintage camera lens'")]
    pub query: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ItemAspectsParams {
    #[schemars(
        description = "Leaf category ID, usually taken from get_category_suggestions"
    )]
    pub category_id: String,
}

pub struct TaxonomyTools<S> {
    executor: SharedExecutor<S>,
    settings: Arc<Settings>,
}

impl<S> Clone for TaxonomyTools<S> {
    fn clone(&self) -> Self {
        Self {
            executor: Arc::clone(&self.executor),
            settings: Arc::clone(&self.settings),
        }
    }
}

impl<S: CredentialStore + 'static> TaxonomyTools<S> {
    pub fn new(executor: SharedExecutor<S>, settings: Arc<Settings>) -> Self {
        Self { executor, settings }
    }

    pub async fn get_category_suggestions(
        &self,
        params: Parameters<CategorySuggestionsParams>,
    ) -> Result<CallToolResult, McpError> {
        let tree_id = self.settings.category_tree_id.as_str();
        let result = match validate::non_empty("query", &params.0.query) {
            Ok(query) => {
                self.executor
                    .execute("get_category_suggestions", |token, client| async move {
                        client.category_suggestions(&token, tree_id, query).await
                    })
                    .await
            }
            Err(e) => Err(e),
        };
        tool_result("get_category_suggestions", result)
    }

    pub async fn get_item_aspects_for_category(
        &self,
        params: Parameters<ItemAspectsParams>,
    ) -> Result<CallToolResult, McpError> {
        let tree_id = self.settings.category_tree_id.as_str();
        let result = match validate::non_empty("category_id", &params.0.category_id) {
            Ok(category_id) => {
                self.executor
                    .execute("get_item_aspects_for_category", |token, client| async move {
                        client
                            .item_aspects_for_category(&token, tree_id, category_id)
                            .await
                    })
                    .await
            }
            Err(e) => Err(e),
        };
        tool_result("get_item_aspects_for_category", result)
    }
}
