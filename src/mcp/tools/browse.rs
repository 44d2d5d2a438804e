//! MCP tools for the Browse API.

use rmcp::{
    ErrorData as McpError, handler::server::wrapper::Parameters, model::*, schemars,
    schemars::JsonSchema,
};
use serde::{Deserialize, Serialize};

use crate::credentials::CredentialStore;
use crate::ebay::SharedExecutor;
use crate::mcp::tools::{tool_result, validate};

pub const DEFAULT_SEARCH_LIMIT: u32 = 10;
pub const MAX_SEARCH_LIMIT: u32 = 200;

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct SearchItemsParams {
    #[schemars(description = "Keywords to search eBay listings for")]
    pub query: String,
    #[schemars(description = "Maximum number of results (default: 10, range: 1-200)")]
    pub limit: Option<u32>,
}

pub struct BrowseTools<S> {
    executor: SharedExecutor<S>,
}

impl<S> Clone for BrowseTools<S> {
    fn clone(&self) -> Self {
        Self {
            executor: self.executor.clone(),
        }
    }
}

impl<S: CredentialStore + 'static> BrowseTools<S> {
    pub fn new(executor: SharedExecutor<S>) -> Self {
        Self { executor }
    }

    pub async fn search_ebay_items(
        &self,
        params: Parameters<SearchItemsParams>,
    ) -> Result<CallToolResult, McpError> {
        let Parameters(params) = params;
        let checked = validate::non_empty("query", &params.query).and_then(|query| {
            validate::bounded(
                "limit",
                params.limit,
                DEFAULT_SEARCH_LIMIT,
                1,
                MAX_SEARCH_LIMIT,
            )
            .map(|limit| (query, limit))
        });
        let result = match checked {
            Ok((query, limit)) => {
                self.executor
                    .execute("search_ebay_items", |token, client| async move {
                        client.search_items(&token, query, limit).await
                    })
                    .await
            }
            Err(e) => Err(e),
        };
        tool_result("search_ebay_items", result)
    }
}
