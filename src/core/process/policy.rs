//! Resolution strictness per reference
//!
//! Each record type treats an unresolved reference differently. The rule
//! is named here and can be changed in the `[policy]` configuration
//! section.

use crate::domain::{LedgerError, Result};
use serde::{Deserialize, Serialize};

/// What to do when a reference cannot be resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionPolicy {
    /// The record fails
    Required,
    /// The record proceeds without the identifier
    Optional,
}

impl ResolutionPolicy {
    /// Apply the policy to a missing reference
    ///
    /// `Required` turns the miss into a [`LedgerError::Resolution`];
    /// `Optional` logs it and returns `Ok(())`.
    pub fn on_missing(self, reference: &str, detail: impl FnOnce() -> String) -> Result<()> {
        match self {
            ResolutionPolicy::Required => Err(LedgerError::Resolution(detail())),
            ResolutionPolicy::Optional => {
                tracing::debug!(reference, detail = %detail(), "Optional reference not resolved");
                Ok(())
            }
        }
    }
}

/// Policies for every reference the pipelines resolve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionPolicies {
    /// Invoice customer looked up by `customer_name`
    #[serde(default = "required")]
    pub invoice_customer: ResolutionPolicy,

    /// Invoice line item looked up by `name`
    #[serde(default = "optional")]
    pub invoice_line_item: ResolutionPolicy,

    /// Bill vendor looked up by `vendor_name`
    #[serde(default = "optional")]
    pub bill_vendor: ResolutionPolicy,

    /// Purchase order vendor looked up by `supplier_name`
    #[serde(default = "required")]
    pub purchase_order_vendor: ResolutionPolicy,
}

impl Default for ResolutionPolicies {
    fn default() -> Self {
        Self {
            invoice_customer: required(),
            invoice_line_item: optional(),
            bill_vendor: optional(),
            purchase_order_vendor: required(),
        }
    }
}

fn required() -> ResolutionPolicy {
    ResolutionPolicy::Required
}

fn optional() -> ResolutionPolicy {
    ResolutionPolicy::Optional
}
