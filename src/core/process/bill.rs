//! Bill pipeline

use super::dates::{normalize_fields, parse_flexible};
use super::policy::ResolutionPolicies;
use crate::core::mapping::{MappingSpec, Payload};
use crate::core::resolve::{EntityCollection, EntityResolver};
use crate::domain::{InputRecord, Result};
use serde_json::Value;

const DATE_FIELDS: &[&str] = &["due_date", "date"];

/// Keys a line item may carry its purchase order id under
const PURCHASE_ORDER_KEYS: &[&str] = &["purchaseOrderId", "purchaseorder_id"];

/// Attach vendor and purchase orders, normalize dates
pub(super) async fn prepare(
    resolver: &EntityResolver<'_>,
    policies: &ResolutionPolicies,
    record: &InputRecord,
    spec: &MappingSpec<'_>,
    mut payload: Payload,
) -> Result<Payload> {
    if !payload.contains_key("vendor_id") {
        let vendor_name = payload
            .get("vendor_name")
            .and_then(Value::as_str)
            .filter(|name| !name.is_empty())
            .map(str::to_string);
        let reference = match &vendor_name {
            Some(name) => resolver.resolve_id(EntityCollection::Contacts, name).await?,
            None => None,
        };
        match reference {
            Some(reference) => {
                payload.insert("vendor_id".to_string(), Value::from(reference.canonical_id));
            }
            None => policies.bill_vendor.on_missing("bill_vendor", || match &vendor_name {
                Some(name) => format!("Vendor '{name}' not found"),
                None => "Bill has no vendor_name".to_string(),
            })?,
        }
    }

    let source = spec.record.line_items.as_ref().map(|li| li.source.as_str());
    let purchase_orders = source
        .and_then(|source| record.get(source))
        .map(purchase_order_ids)
        .unwrap_or_default();
    if !purchase_orders.is_empty() {
        payload.insert("purchaseorder_ids".to_string(), Value::from(purchase_orders));
    }

    normalize_fields(&mut payload, DATE_FIELDS, parse_flexible)?;
    Ok(payload)
}

/// Purchase order ids referenced by raw line items, first occurrence order
///
/// Line items may arrive already decoded or as a JSON-encoded string.
fn purchase_order_ids(line_items: &Value) -> Vec<String> {
    let decoded;
    let items = match line_items {
        Value::Array(items) => items,
        Value::String(encoded) => match serde_json::from_str::<Value>(encoded) {
            Ok(Value::Array(items)) => {
                decoded = items;
                &decoded
            }
            _ => {
                tracing::debug!("Bill line items are not a JSON array, no purchase orders");
                return Vec::new();
            }
        },
        _ => return Vec::new(),
    };

    let mut ids: Vec<String> = Vec::new();
    for item in items {
        let id = PURCHASE_ORDER_KEYS
            .iter()
            .find_map(|key| item.get(*key))
            .and_then(|id| match id {
                Value::String(s) if !s.is_empty() => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            });
        if let Some(id) = id {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
    }
    ids
}
