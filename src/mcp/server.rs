//! MCP server implementation
//!
//! The server registers every tool and delegates to the per-API tool
//! structs in [`super::tools`].

use std::sync::Arc;

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, ServerCapabilities, ServerInfo, Tool},
    tool, tool_handler, tool_router,
};

use crate::config::Settings;
use crate::credentials::CredentialStore;
use crate::ebay::SharedExecutor;

use super::tools::{
    AuthTools, BrowseTools, CatalogTools, CategorySuggestionsParams, GetInventoryItemsParams,
    GetListingFeesParams, InventoryItemTools, ItemAspectsParams, ManageInventoryItemParams,
    ManageOfferParams, OfferTools, SearchByGtinParams, SearchItemsParams, TaxonomyTools,
};

const INSTRUCTIONS: &str = "eBay seller tools. Search listings, look up categories, \
item aspects and catalog products, and manage inventory items and offers. Offer and \
inventory item updates are merged into the current eBay document, so pass only the \
fields that change. If a tool reports missing or rejected credentials, call \
trigger_ebay_login and retry.";

/// Main MCP server coordinator
///
/// Generic over the credential store so tests can run it on an in-memory
/// store.
pub struct McpServer<S: CredentialStore> {
    auth_tools: AuthTools<S>,
    browse_tools: BrowseTools<S>,
    taxonomy_tools: TaxonomyTools<S>,
    catalog_tools: CatalogTools<S>,
    offer_tools: OfferTools<S>,
    inventory_item_tools: InventoryItemTools<S>,
    tool_router: ToolRouter<Self>,
}

impl<S: CredentialStore> Clone for McpServer<S> {
    fn clone(&self) -> Self {
        Self {
            auth_tools: self.auth_tools.clone(),
            browse_tools: self.browse_tools.clone(),
            taxonomy_tools: self.taxonomy_tools.clone(),
            catalog_tools: self.catalog_tools.clone(),
            offer_tools: self.offer_tools.clone(),
            inventory_item_tools: self.inventory_item_tools.clone(),
            tool_router: self.tool_router.clone(),
        }
    }
}

#[tool_router]
impl<S: CredentialStore + 'static> McpServer<S> {
    pub fn new(executor: SharedExecutor<S>, settings: Arc<Settings>) -> Self {
        Self {
            auth_tools: AuthTools::new(Arc::clone(&executor), Arc::clone(&settings)),
            browse_tools: BrowseTools::new(Arc::clone(&executor)),
            taxonomy_tools: TaxonomyTools::new(Arc::clone(&executor), Arc::clone(&settings)),
            catalog_tools: CatalogTools::new(Arc::clone(&executor)),
            offer_tools: OfferTools::new(Arc::clone(&executor), Arc::clone(&settings)),
            inventory_item_tools: InventoryItemTools::new(executor, settings),
            tool_router: Self::tool_router(),
        }
    }

    /// Every registered tool, sorted by name.
    pub fn tools(&self) -> Vec<Tool> {
        let mut tools = self.tool_router.list_all();
        tools.sort_by(|a, b| a.name.cmp(&b.name));
        tools
    }

    #[tool(
        description = "Check that an eBay access token can be obtained. Reports whether it is a seller token or an application token, plus its prefix and length."
    )]
    pub async fn test_auth(&self) -> Result<CallToolResult, McpError> {
        self.auth_tools.test_auth().await
    }

    #[tool(
        description = "Sign the seller in to eBay. Opens the eBay consent page in a browser and waits for the redirect; the new tokens are stored and used immediately. Call this when another tool reports missing or rejected credentials."
    )]
    pub async fn trigger_ebay_login(&self) -> Result<CallToolResult, McpError> {
        self.auth_tools.trigger_ebay_login().await
    }

    #[tool(description = "Search active eBay listings by keywords.")]
    pub async fn search_ebay_items(
        &self,
        params: Parameters<SearchItemsParams>,
    ) -> Result<CallToolResult, McpError> {
        self.browse_tools.search_ebay_items(params).await
    }

    #[tool(
        description = "Suggest eBay leaf categories for an item description. Use the categoryId with get_item_aspects_for_category and in offer_data."
    )]
    pub async fn get_category_suggestions(
        &self,
        params: Parameters<CategorySuggestionsParams>,
    ) -> Result<CallToolResult, McpError> {
        self.taxonomy_tools.get_category_suggestions(params).await
    }

    #[tool(
        description = "List the item aspects (required and recommended item specifics) for a leaf category."
    )]
    pub async fn get_item_aspects_for_category(
        &self,
        params: Parameters<ItemAspectsParams>,
    ) -> Result<CallToolResult, McpError> {
        self.taxonomy_tools
            .get_item_aspects_for_category(params)
            .await
    }

    #[tool(description = "Find eBay catalog products by GTIN (UPC, EAN or ISBN).")]
    pub async fn search_by_gtin(
        &self,
        params: Parameters<SearchByGtinParams>,
    ) -> Result<CallToolResult, McpError> {
        self.catalog_tools.search_by_gtin(params).await
    }

    #[tool(description = "List the seller's inventory items, one page at a time.")]
    pub async fn get_inventory_items(
        &self,
        params: Parameters<GetInventoryItemsParams>,
    ) -> Result<CallToolResult, McpError> {
        self.inventory_item_tools.get_inventory_items(params).await
    }

    #[tool(
        description = "Create, modify, get or delete an inventory item by SKU. Modify fetches the current item and merges item_data over it, so only changed fields are needed. The result reports any field eBay stored differently from what was requested."
    )]
    pub async fn manage_inventory_item(
        &self,
        params: Parameters<ManageInventoryItemParams>,
    ) -> Result<CallToolResult, McpError> {
        self.inventory_item_tools
            .manage_inventory_item(params)
            .await
    }

    #[tool(
        description = "Create, modify, withdraw, publish or get the offer for a SKU. Modify fetches the current offer and merges offer_data over it, so only changed fields are needed. Create applies the configured marketplace, format, policies and location. The result reports any field eBay stored differently from what was requested."
    )]
    pub async fn manage_offer(
        &self,
        params: Parameters<ManageOfferParams>,
    ) -> Result<CallToolResult, McpError> {
        self.offer_tools.manage_offer(params).await
    }

    #[tool(description = "Estimate the listing fees for unpublished offers.")]
    pub async fn get_listing_fees(
        &self,
        params: Parameters<GetListingFeesParams>,
    ) -> Result<CallToolResult, McpError> {
        self.offer_tools.get_listing_fees(params).await
    }
}

#[tool_handler]
impl<S: CredentialStore + 'static> ServerHandler for McpServer<S> {
    fn get_info(&self) -> ServerInfo {
        let mut info = ServerInfo::default();
        info.capabilities = ServerCapabilities::builder().enable_tools().build();
        info.server_info.name = env!("CARGO_PKG_NAME").to_string();
        info.server_info.version = env!("CARGO_PKG_VERSION").to_string();
        info.instructions = Some(INSTRUCTIONS.to_string());
        info
    }
}
