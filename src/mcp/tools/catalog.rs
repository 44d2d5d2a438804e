//! MCP tools for the Catalog API.

use rmcp::{
    ErrorData as McpError, handler::server::wrapper::Parameters, model::*, schemars,
    schemars::JsonSchema,
};
use serde::{Deserialize, Serialize};

use crate::credentials::CredentialStore;
use crate::ebay::SharedExecutor;
use crate::mcp::tools::{tool_result, validate};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct SearchByGtinParams {
    #[schemars(description = "Global Trade Item Number: UPC, EAN or ISBN")]
    pub gtin: String,
}

pub struct CatalogTools<S> {
    executor: SharedExecutor<S>,
}

impl<S> Clone for CatalogTools<S> {
    fn clone(&self) -> Self {
        Self {
            executor: self.executor.clone(),
        }
    }
}

impl<S: CredentialStore + 'static> CatalogTools<S> {
    pub fn new(executor: SharedExecutor<S>) -> Self {
        Self { executor }
    }

    pub async fn search_by_gtin(
        &self,
        params: Parameters<SearchByGtinParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = match validate::non_empty("gtin", &params.0.gtin) {
            Ok(gtin) => {
                self.executor
                    .execute("search_by_gtin", |token, client| async move {
                        client.search_products_by_gtin(&token, gtin).await
                    })
                    .await
            }
            Err(e) => Err(e),
        };
        tool_result("search_by_gtin", result)
    }
}
