use std::net::IpAddr;
use std::sync::Arc;

use axum::{Json, Router, routing::get};
use rmcp::ServiceExt;
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::cli::error::{CliError, CliResult};
use crate::config::Settings;
use crate::credentials::CredentialStore;
use crate::ebay::SharedExecutor;
use crate::mcp::{McpServer, create_mcp_service};

/// HTTP router: the MCP endpoint at `/mcp` and a health check at `/health`.
pub fn router<S: CredentialStore + 'static>(
    executor: SharedExecutor<S>,
    settings: Arc<Settings>,
    cancellation_token: CancellationToken,
) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest_service(
            "/mcp",
            create_mcp_service(executor, settings, cancellation_token),
        )
        .layer(TraceLayer::new_for_http())
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Serve MCP over Streamable HTTP until Ctrl-C.
pub async fn serve_http<S: CredentialStore + 'static>(
    executor: SharedExecutor<S>,
    settings: Arc<Settings>,
    host: IpAddr,
    port: u16,
) -> CliResult<()> {
    let ct = CancellationToken::new();
    let app = router(executor, settings, ct.clone());

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| CliError::BindFailed {
            addr: addr.clone(),
            message: e.to_string(),
        })?;
    info!("MCP server listening on http://{}/mcp", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down");
            ct.cancel();
        })
        .await
        .map_err(|e| CliError::Server {
            message: e.to_string(),
        })
}

/// Serve MCP over stdin/stdout until the client disconnects.
pub async fn serve_stdio<S: CredentialStore + 'static>(
    executor: SharedExecutor<S>,
    settings: Arc<Settings>,
) -> CliResult<()> {
    info!("MCP server running on stdio");
    let service = McpServer::new(executor, settings)
        .serve(rmcp::transport::stdio())
        .await
        .map_err(|e| CliError::Server {
            message: e.to_string(),
        })?;

    let reason = service.waiting().await.map_err(|e| CliError::Server {
        message: e.to_string(),
    })?;
    info!(?reason, "MCP client disconnected");
    Ok(())
}
