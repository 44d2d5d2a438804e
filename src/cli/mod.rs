mod commands;
pub mod error;
mod utils;

#[cfg(test)]
mod utils_test;

use std::io;
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Settings;
use crate::credentials::{EnvFileStore, MemoryStore};
use crate::ebay::{ApiExecutor, SharedExecutor};
use crate::mcp::McpServer;
use error::CliResult;

#[derive(Parser)]
#[command(name = "ebay-mcp")]
#[command(author, version, about = "eBay seller tools for MCP clients", long_about = None)]
pub struct Cli {
    /// Env file holding credentials and settings
    #[arg(long, global = true, default_value = ".env")]
    pub env_file: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Transport {
    /// Streamable HTTP at /mcp
    Http,
    /// JSON-RPC over stdin/stdout
    Stdio,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the MCP server
    Serve {
        #[arg(long, value_enum, default_value = "stdio")]
        transport: Transport,
        /// Host address to bind to (http only)
        #[arg(long, default_value = "127.0.0.1")]
        host: IpAddr,
        /// Port to listen on (http only)
        #[arg(long, default_value = "8001")]
        port: u16,
    },
    /// Sign in to eBay in the browser and store the seller tokens
    Login {
        /// Print the sign-in URL instead of opening a browser
        #[arg(long)]
        no_browser: bool,
    },
    /// Refresh the stored access token
    Refresh,
    /// Show the stored eBay account
    Whoami {
        /// Output format (table or json)
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// List the MCP tools
    Tools {
        /// Output format (table or json)
        #[arg(long, default_value = "table")]
        format: String,
    },
}

/// Initialize tracing subscriber with env filter
///
/// Logs go to stderr; stdout belongs to the stdio transport.
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ebay_mcp=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

struct Context {
    settings: Arc<Settings>,
    executor: SharedExecutor<EnvFileStore>,
}

impl Context {
    fn load(env_file: &Path) -> CliResult<Self> {
        let settings = Arc::new(Settings::load(env_file)?);
        let store = Arc::new(EnvFileStore::open(env_file)?);
        let executor = Arc::new(ApiExecutor::from_settings(store, &settings)?);
        Ok(Self { settings, executor })
    }
}

async fn dispatch(env_file: &Path, command: Commands) -> CliResult<Option<String>> {
    match command {
        Commands::Serve {
            transport,
            host,
            port,
        } => {
            let ctx = Context::load(env_file)?;
            match transport {
                Transport::Http => {
                    commands::serve::serve_http(ctx.executor, ctx.settings, host, port).await?
                }
                Transport::Stdio => commands::serve::serve_stdio(ctx.executor, ctx.settings).await?,
            }
            Ok(None)
        }
        Commands::Login { no_browser } => {
            let ctx = Context::load(env_file)?;
            commands::account::login(&ctx.executor, &ctx.settings, !no_browser)
                .await
                .map(Some)
        }
        Commands::Refresh => {
            let ctx = Context::load(env_file)?;
            commands::account::refresh(&ctx.executor).await.map(Some)
        }
        Commands::Whoami { format } => {
            let store = EnvFileStore::open(env_file)?;
            commands::account::whoami(&store, &format).map(Some)
        }
        Commands::Tools { format } => {
            // Listing needs no credentials
            let settings = Arc::new(Settings::load(env_file)?);
            let store = Arc::new(MemoryStore::new());
            let executor = Arc::new(ApiExecutor::from_settings(store, &settings)?);
            let server = McpServer::new(executor, settings);
            commands::tools::list_tools(&server.tools(), &format).map(Some)
        }
    }
}

pub async fn run() -> miette::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let Some(command) = cli.command else {
        // Show help when no command provided
        let _ = Cli::parse_from(["ebay-mcp", "--help"]);
        return Ok(());
    };

    if let Some(output) = dispatch(&cli.env_file, command).await? {
        println!("{}", output);
    }
    Ok(())
}
