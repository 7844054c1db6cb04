//! Invoice pipeline

use super::dates::{normalize_fields, parse_iso_utc};
use super::policy::ResolutionPolicies;
use crate::core::mapping::Payload;
use crate::core::resolve::{EntityCollection, EntityResolver};
use crate::domain::Result;
use serde_json::Value;

const DATE_FIELDS: &[&str] = &["date", "last_modified_time", "due_date"];

/// Fill in status, dates, item ids and the customer id
pub(super) async fn prepare(
    resolver: &EntityResolver<'_>,
    policies: &ResolutionPolicies,
    line_items: Option<&str>,
    mut payload: Payload,
) -> Result<Payload> {
    if payload.contains_key("payment_expected_date") {
        payload.insert("status".to_string(), Value::from("paid"));
    }

    normalize_fields(&mut payload, DATE_FIELDS, parse_iso_utc)?;

    let items = line_items.and_then(|key| payload.get_mut(key));
    if let Some(Value::Array(items)) = items {
        for item in items.iter_mut().filter_map(Value::as_object_mut) {
            if item.contains_key("item_id") {
                continue;
            }
            let name = item.get("name").and_then(Value::as_str).map(str::to_string);
            let reference = match &name {
                Some(name) => resolver.resolve_id(EntityCollection::Items, name).await?,
                None => None,
            };
            match reference {
                Some(reference) => {
                    item.insert("item_id".to_string(), Value::from(reference.canonical_id));
                }
                None => policies.invoice_line_item.on_missing("invoice_line_item", || {
                    format!("Item '{}' not found", name.as_deref().unwrap_or_default())
                })?,
            }
        }
    }

    if !payload.contains_key("customer_id") {
        let name = payload
            .get("customer_name")
            .and_then(Value::as_str)
            .map(str::to_string);
        let reference = match &name {
            Some(name) => resolver.resolve_id(EntityCollection::Contacts, name).await?,
            None => None,
        };
        match reference {
            Some(reference) => {
                payload.insert("customer_id".to_string(), Value::from(reference.canonical_id));
            }
            None => policies.invoice_customer.on_missing("invoice_customer", || match &name {
                Some(name) => format!("Customer '{name}' not found"),
                None => "Invoice has neither customer_id nor customer_name".to_string(),
            })?,
        }
    }

    Ok(payload)
}
