use miette::Result;

#[tokio::main]
async fn main() -> Result<()> {
    ebay_mcp::cli::run().await
}
