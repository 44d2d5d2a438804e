//! Model Context Protocol (MCP) server implementation
//!
//! The server exposes eBay's Browse, Taxonomy, Catalog and Sell Inventory
//! APIs as MCP tools, over Streamable HTTP or stdio.
//!
//! - **server**: registers the tools and answers `initialize`
//! - **tools**: one handler struct per eBay API, plus input validation
//! - **service**: the Streamable HTTP service nested under `/mcp`
//!
//! Every handler is generic over `S: CredentialStore` and shares one
//! [`crate::ebay::ApiExecutor`], which injects tokens and handles the
//! refresh-on-401 retry.

pub mod server;
mod service;
pub mod tools;


pub use server::McpServer;
pub use service::create_mcp_service;
