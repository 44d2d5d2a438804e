pub mod auth;
pub mod cli;
pub mod config;
pub mod credentials;
pub mod ebay;
pub mod mcp;
pub mod replace;

#[cfg(test)]
pub(crate) mod test_support;
