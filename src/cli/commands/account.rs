use serde::Serialize;
use tabled::{Table, Tabled};
use tracing::info;

use crate::auth::{LoginFlow, redact};
use crate::cli::error::CliResult;
use crate::cli::utils::{OutputFormat, apply_table_style, or_dash};
use crate::config::Settings;
use crate::credentials::{CredentialStore, Credentials};
use crate::ebay::ApiExecutor;

/// Stored account, with tokens reduced to a prefix.
#[derive(Debug, Serialize)]
pub(crate) struct AccountSummary {
    pub(crate) user_id: Option<String>,
    pub(crate) user_name: Option<String>,
    pub(crate) client_id: Option<String>,
    pub(crate) has_client_secret: bool,
    pub(crate) user_access_token: Option<String>,
    pub(crate) has_refresh_token: bool,
}

impl From<&Credentials> for AccountSummary {
    fn from(creds: &Credentials) -> Self {
        Self {
            user_id: creds.user_id.clone(),
            user_name: creds.user_name.clone(),
            client_id: creds.client_id.clone(),
            has_client_secret: creds.client_secret.is_some(),
            user_access_token: creds.user_access_token.as_deref().map(redact),
            has_refresh_token: creds.user_refresh_token.is_some(),
        }
    }
}

#[derive(Tabled)]
pub(crate) struct AccountRow {
    #[tabled(rename = "Field")]
    pub(crate) field: &'static str,
    #[tabled(rename = "Value")]
    pub(crate) value: String,
}

fn yes_no(flag: bool) -> String {
    if flag { "yes" } else { "no" }.to_string()
}

/// Show the stored account without touching the network.
pub fn whoami<S: CredentialStore>(store: &S, format: &str) -> CliResult<String> {
    let format = OutputFormat::parse(format)?;
    let summary = AccountSummary::from(&store.snapshot()?);

    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&summary)?),
        OutputFormat::Table => {
            let rows = vec![
                AccountRow {
                    field: "User",
                    value: or_dash(summary.user_name.as_deref()),
                },
                AccountRow {
                    field: "User ID",
                    value: or_dash(summary.user_id.as_deref()),
                },
                AccountRow {
                    field: "Client ID",
                    value: or_dash(summary.client_id.as_deref()),
                },
                AccountRow {
                    field: "Client secret",
                    value: yes_no(summary.has_client_secret),
                },
                AccountRow {
                    field: "Access token",
                    value: or_dash(summary.user_access_token.as_deref()),
                },
                AccountRow {
                    field: "Refresh token",
                    value: yes_no(summary.has_refresh_token),
                },
            ];
            let mut table = Table::new(rows);
            apply_table_style(&mut table);
            Ok(table.to_string())
        }
    }
}

/// Exchange the stored refresh token for a new access token.
pub async fn refresh<S: CredentialStore>(executor: &ApiExecutor<S>) -> CliResult<String> {
    let token = executor.tokens().refresh_access_token().await?;
    Ok(format!("Access token refreshed: {}", token.redacted()))
}

/// Run the browser sign-in and store the seller tokens.
pub async fn login<S: CredentialStore>(
    executor: &ApiExecutor<S>,
    settings: &Settings,
    open_browser: bool,
) -> CliResult<String> {
    let mut flow = LoginFlow::new(executor.tokens(), settings);
    if !open_browser {
        flow = flow.without_browser();
    }

    let outcome = flow
        .run(|url| {
            info!("Waiting for the eBay sign-in callback");
            eprintln!("Open this URL to sign in to eBay:\n\n  {}\n", url);
        })
        .await?;

    Ok(match outcome.identity {
        Some(identity) => format!(
            "Signed in as {} ({})",
            identity.username.as_deref().unwrap_or("unknown user"),
            identity.user_id
        ),
        None => "Signed in. Seller tokens saved.".to_string(),
    })
}
