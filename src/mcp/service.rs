//! MCP Streamable HTTP service creation
//!
//! This module provides the function that creates the MCP service so it
//! can be nested into an Axum router.

use std::sync::Arc;

use rmcp::transport::streamable_http_server::{
    StreamableHttpServerConfig, StreamableHttpService, session::local::LocalSessionManager,
};
use tokio_util::sync::CancellationToken;

use crate::config::Settings;
use crate::credentials::CredentialStore;
use crate::ebay::SharedExecutor;

use super::server::McpServer;

/// Create MCP Streamable HTTP service
///
/// Every session gets its own [`McpServer`]; all of them share one executor,
/// so credentials refreshed in one session are seen by the others.
///
/// # Example
/// ```no_run
/// use std::sync::Arc;
///
/// use axum::Router;
/// use tokio_util::sync::CancellationToken;
/// # use ebay_mcp::config::Settings;
/// # use ebay_mcp::credentials::EnvFileStore;
/// # use ebay_mcp::ebay::ApiExecutor;
/// # use ebay_mcp::mcp::create_mcp_service;
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let settings = Arc::new(Settings::default());
/// let store = Arc::new(EnvFileStore::open(".env")?);
/// let executor = Arc::new(ApiExecutor::from_settings(store, &settings)?);
///
/// let ct = CancellationToken::new();
/// let app: Router = Router::new()
///     .nest_service("/mcp", create_mcp_service(executor, settings, ct));
/// # Ok(())
/// # }
/// ```
pub fn create_mcp_service<S: CredentialStore + 'static>(
    executor: SharedExecutor<S>,
    settings: Arc<Settings>,
    cancellation_token: CancellationToken,
) -> StreamableHttpService<McpServer<S>, LocalSessionManager> {
    // rmcp expects the factory to fail with io::Error
    let service_factory = move || -> Result<McpServer<S>, std::io::Error> {
        Ok(McpServer::new(Arc::clone(&executor), Arc::clone(&settings)))
    };

    let mut config = StreamableHttpServerConfig::default();
    config.stateful_mode = true;
    config.cancellation_token = cancellation_token;

    StreamableHttpService::new(
        service_factory,
        LocalSessionManager::default().into(),
        config,
    )
}
