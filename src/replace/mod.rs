//! Safe replacement of eBay offers and inventory items.
//!
//! eBay's offer and inventory item updates are full-document PUTs: any field
//! left out is reset. Every write here is a linear pipeline of fetch, merge,
//! submit and re-fetch:
//!
//! - modify: the current document is fetched and the requested changes are
//!   merged over it, so untouched fields are sent back unchanged
//! - create: the changes are laid over configured defaults and checked for
//!   required fields
//! - after either write the resource is fetched again and the requested
//!   fields are compared with what eBay stored
//!
//! Nothing is locked between the fetch and the write. Two concurrent
//! modifies of one resource race and the later PUT wins.

pub mod items;
mod merge;
pub mod offers;
mod verify;


pub use merge::{
    ReplacePolicy, merge_changes, missing_fields, prepare_replace_payload, prune_nulls,
};
pub use verify::{Discrepancy, find_discrepancies, summarize, values_match};

use serde::Serialize;
use serde_json::Value;
use tracing::warn;

/// Result of one offer or inventory item action.
#[derive(Debug, Clone, Serialize)]
pub struct ActionOutcome {
    pub success: bool,
    pub action: &'static str,
    pub sku: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offer_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub listing_id: Option<String>,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub discrepancies: Vec<Discrepancy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ActionOutcome {
    pub fn new(action: &'static str, sku: &str, message: impl Into<String>) -> Self {
        Self {
            success: true,
            action,
            sku: sku.to_string(),
            offer_id: None,
            listing_id: None,
            message: message.into(),
            discrepancies: Vec::new(),
            details: None,
        }
    }

    pub fn with_offer_id(mut self, offer_id: impl Into<String>) -> Self {
        self.offer_id = Some(offer_id.into());
        self
    }

    /// Attach eBay's response body, skipping empty ones.
    pub fn with_details(mut self, details: Value) -> Self {
        if !details.is_null() {
            self.details = Some(details);
        }
        self
    }

    /// Fold a verification result into the outcome.
    ///
    /// A failed re-fetch only adds a note: the write already went through and
    /// must not be repeated.
    pub(crate) fn verified(
        mut self,
        requested: &Value,
        refetched: crate::ebay::ApiResult<Value>,
    ) -> Self {
        match refetched {
            Ok(stored) => {
                self.discrepancies = find_discrepancies(requested, &stored);
                if let Some(summary) = summarize(&self.discrepancies) {
                    warn!(sku = %self.sku, action = self.action, %summary, "Stored values differ");
                    self.message = format!("{} {summary}", self.message);
                } else {
                    self.message = format!("{} Verified against eBay.", self.message);
                }
            }
            Err(e) => {
                warn!(sku = %self.sku, action = self.action, error = %e, "Verification fetch failed");
                self.message = format!("{} Could not re-fetch for verification: {e}", self.message);
            }
        }
        self
    }
}
