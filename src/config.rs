//! Runtime settings.
//!
//! Settings are resolved from the env file next to the credentials, with
//! process environment variables taking precedence. Credentials themselves
//! are not part of the settings: they live in the credential store and are
//! rewritten at runtime.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use miette::Diagnostic;
use serde_json::{Map, Value, json};
use thiserror::Error;

pub const DEFAULT_API_BASE_URL: &str = "https://api.ebay.com";
pub const DEFAULT_AUTH_BASE_URL: &str = "https://auth.ebay.com";
pub const DEFAULT_IDENTITY_BASE_URL: &str = "https://apiz.ebay.com";
pub const DEFAULT_PLACEHOLDER_IMAGE_URL: &str =
    "https://ebayimages.s3.us-east-005.backblazeb2.com/ebay_images/awaiting_image_holding.png";

#[derive(Error, Diagnostic, Debug)]
pub enum ConfigError {
    #[error("Invalid value '{value}' for {key}: {reason}")]
    #[diagnostic(
        code(ebay_mcp::config::invalid),
        help("Fix or remove {key} in the env file or the process environment.")
    )]
    Invalid {
        key: String,
        value: String,
        reason: String,
    },

    #[error("Failed to read env file {path}: {message}")]
    #[diagnostic(code(ebay_mcp::config::env_file))]
    EnvFile { path: String, message: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Base URLs of the eBay services the crate talks to.
///
/// All three are overridable so tests can point them at a local mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// REST APIs and the OAuth token endpoint.
    pub api_base: String,
    /// User consent page.
    pub auth_base: String,
    /// Commerce Identity API.
    pub identity_base: String,
}

impl Endpoints {
    /// Point every service at the same base URL.
    pub fn single(base: impl Into<String>) -> Self {
        let base = base.into();
        Self {
            api_base: base.clone(),
            auth_base: base.clone(),
            identity_base: base,
        }
    }

    pub fn token_url(&self) -> String {
        format!("{}/identity/v1/oauth2/token", self.api_base)
    }

    pub fn authorize_url(&self) -> String {
        format!("{}/oauth2/authorize", self.auth_base)
    }

    pub fn identity_url(&self) -> String {
        format!("{}/commerce/identity/v1/user/", self.identity_base)
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE_URL.to_string(),
            auth_base: DEFAULT_AUTH_BASE_URL.to_string(),
            identity_base: DEFAULT_IDENTITY_BASE_URL.to_string(),
        }
    }
}

/// Seller account values applied to every new offer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfferDefaults {
    pub marketplace_id: String,
    pub format: String,
    pub listing_duration: String,
    pub include_catalog_product_details: bool,
    pub merchant_location_key: Option<String>,
    pub payment_policy_id: Option<String>,
    pub return_policy_id: Option<String>,
    pub fulfillment_policy_id: Option<String>,
}

impl OfferDefaults {
    /// Defaults as an offer document fragment.
    ///
    /// Unset policy ids and location keys are left out, so a create without
    /// them fails the required-field check instead of sending empty strings.
    pub fn to_document(&self) -> Value {
        let mut doc = json!({
            "marketplaceId": self.marketplace_id,
            "format": self.format,
            "listingDuration": self.listing_duration,
            "includeCatalogProductDetails": self.include_catalog_product_details,
        });

        if let Some(key) = &self.merchant_location_key {
            doc["merchantLocationKey"] = json!(key);
        }

        let mut policies = Map::new();
        for (field, id) in [
            ("paymentPolicyId", &self.payment_policy_id),
            ("returnPolicyId", &self.return_policy_id),
            ("fulfillmentPolicyId", &self.fulfillment_policy_id),
        ] {
            if let Some(id) = id {
                policies.insert(field.to_string(), json!(id));
            }
        }
        if !policies.is_empty() {
            doc["listingPolicies"] = Value::Object(policies);
        }

        doc
    }
}

impl Default for OfferDefaults {
    fn default() -> Self {
        Self {
            marketplace_id: "EBAY_GB".to_string(),
            format: "FIXED_PRICE".to_string(),
            listing_duration: "GTC".to_string(),
            include_catalog_product_details: true,
            merchant_location_key: None,
            payment_policy_id: None,
            return_policy_id: None,
            fulfillment_policy_id: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub endpoints: Endpoints,
    /// eBay RuName registered for the authorization-code grant.
    pub redirect_uri: Option<String>,
    pub callback_port: u16,
    pub category_tree_id: String,
    pub offer_defaults: OfferDefaults,
    pub placeholder_image_url: Option<String>,
    pub request_timeout: Duration,
    pub login_timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoints: Endpoints::default(),
            redirect_uri: None,
            callback_port: 9292,
            category_tree_id: "3".to_string(),
            offer_defaults: OfferDefaults::default(),
            placeholder_image_url: Some(DEFAULT_PLACEHOLDER_IMAGE_URL.to_string()),
            request_timeout: Duration::from_secs(30),
            login_timeout: Duration::from_secs(300),
        }
    }
}

impl Settings {
    /// Load settings from an env file overlaid by the process environment.
    ///
    /// A missing env file is not an error.
    pub fn load(env_file: &Path) -> ConfigResult<Self> {
        let file_vars = read_env_file(env_file)?;
        Self::from_lookup(|key| {
            std::env::var(key)
                .ok()
                .or_else(|| file_vars.get(key).cloned())
        })
    }

    /// Resolve settings through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let endpoints = Endpoints {
            api_base: trim_base(get("EBAY_API_BASE_URL"), defaults.endpoints.api_base),
            auth_base: trim_base(get("EBAY_AUTH_BASE_URL"), defaults.endpoints.auth_base),
            identity_base: trim_base(
                get("EBAY_IDENTITY_BASE_URL"),
                defaults.endpoints.identity_base,
            ),
        };

        let offer_defaults = OfferDefaults {
            marketplace_id: get("EBAY_MARKETPLACE_ID")
                .unwrap_or(defaults.offer_defaults.marketplace_id),
            format: get("EBAY_LISTING_FORMAT").unwrap_or(defaults.offer_defaults.format),
            listing_duration: get("EBAY_LISTING_DURATION")
                .unwrap_or(defaults.offer_defaults.listing_duration),
            include_catalog_product_details: parse_bool(
                "EBAY_LISTING_INCLUDE_CATALOG_PRODUCT_DETAILS",
                get("EBAY_LISTING_INCLUDE_CATALOG_PRODUCT_DETAILS"),
                defaults.offer_defaults.include_catalog_product_details,
            )?,
            merchant_location_key: get("EBAY_MERCHANT_LOCATION_KEY"),
            payment_policy_id: get("EBAY_PAYMENT_POLICY_ID"),
            return_policy_id: get("EBAY_RETURN_POLICY_ID"),
            fulfillment_policy_id: get("EBAY_FULFILLMENT_POLICY_ID"),
        };

        Ok(Self {
            endpoints,
            redirect_uri: get("EBAY_REDIRECT_URI"),
            callback_port: parse_number(
                "EBAY_OAUTH_CALLBACK_PORT",
                get("EBAY_OAUTH_CALLBACK_PORT"),
                defaults.callback_port,
            )?,
            category_tree_id: get("EBAY_CATEGORY_TREE_ID").unwrap_or(defaults.category_tree_id),
            offer_defaults,
            placeholder_image_url: match get("EBAY_PLACEHOLDER_IMAGE_URL") {
                Some(url) if url.eq_ignore_ascii_case("none") => None,
                Some(url) => Some(url),
                None => defaults.placeholder_image_url,
            },
            request_timeout: parse_timeout(
                "EBAY_REQUEST_TIMEOUT_SECS",
                get("EBAY_REQUEST_TIMEOUT_SECS"),
                defaults.request_timeout,
            )?,
            login_timeout: parse_timeout(
                "EBAY_LOGIN_TIMEOUT_SECS",
                get("EBAY_LOGIN_TIMEOUT_SECS"),
                defaults.login_timeout,
            )?,
        })
    }

    /// Settings with every endpoint pointed at `base`.
    pub fn for_base_url(base: impl Into<String>) -> Self {
        Self {
            endpoints: Endpoints::single(base),
            ..Self::default()
        }
    }
}

/// Parse an env file into a map, ignoring a missing file.
pub fn read_env_file(path: &Path) -> ConfigResult<HashMap<String, String>> {
    if !path.exists() {
        return Ok(HashMap::new());
    }

    let env_error = |message: String| ConfigError::EnvFile {
        path: path.display().to_string(),
        message,
    };

    let mut vars = HashMap::new();
    for item in dotenvy::from_path_iter(path).map_err(|e| env_error(e.to_string()))? {
        let (key, value) = item.map_err(|e| env_error(e.to_string()))?;
        vars.insert(key, value);
    }
    Ok(vars)
}

fn trim_base(value: Option<String>, default: String) -> String {
    value
        .map(|v| v.trim_end_matches('/').to_string())
        .unwrap_or(default)
}

fn parse_bool(key: &str, value: Option<String>, default: bool) -> ConfigResult<bool> {
    let Some(value) = value else {
        return Ok(default);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            key: key.to_string(),
            value,
            reason: "expected true or false".to_string(),
        }),
    }
}

fn parse_number<T>(key: &str, value: Option<String>, default: T) -> ConfigResult<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let Some(value) = value else {
        return Ok(default);
    };
    value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        key: key.to_string(),
        value,
        reason: e.to_string(),
    })
}

/// Whole seconds, at least one.
fn parse_timeout(key: &str, value: Option<String>, default: Duration) -> ConfigResult<Duration> {
    let raw = value.clone();
    let seconds: u64 = parse_number(key, value, default.as_secs())?;
    if seconds == 0 {
        return Err(ConfigError::Invalid {
            key: key.to_string(),
            value: raw.unwrap_or_default(),
            reason: "must be at least 1 second".to_string(),
        });
    }
    Ok(Duration::from_secs(seconds))
}
