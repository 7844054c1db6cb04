//! Purchase order pipeline

use super::policy::ResolutionPolicies;
use super::Prepared;
use crate::core::mapping::Payload;
use crate::core::resolve::{EntityCollection, EntityResolver};
use crate::domain::{InputRecord, Result, SkipReason};
use serde_json::Value;

/// Keep resolvable line items and attach the supplier
///
/// The supplier name is read from the raw record since the mapping does not
/// carry it into the payload.
pub(super) async fn prepare(
    resolver: &EntityResolver<'_>,
    policies: &ResolutionPolicies,
    line_items_key: Option<&str>,
    record: &InputRecord,
    mut payload: Payload,
) -> Result<Prepared> {
    let Some(key) = line_items_key else {
        return Ok(Prepared::Skip(SkipReason::NoResolvableLineItems, payload));
    };
    let line_items: Vec<Value> = match payload.remove(key) {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter(|item| item.get("item_id").is_some_and(|id| !id.is_null()))
            .collect(),
        _ => Vec::new(),
    };
    if line_items.is_empty() {
        return Ok(Prepared::Skip(SkipReason::NoResolvableLineItems, payload));
    }
    payload.insert(key.to_string(), Value::Array(line_items));

    let supplier = record
        .get("supplier_name")
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty());
    let reference = match supplier {
        Some(name) => resolver.resolve_id(EntityCollection::Contacts, name).await?,
        None => None,
    };
    match reference {
        Some(reference) => {
            payload.insert("vendor_id".to_string(), Value::from(reference.canonical_id));
        }
        None => policies
            .purchase_order_vendor
            .on_missing("purchase_order_vendor", || match supplier {
                Some(name) => format!("Supplier with name={name} does not exist"),
                None => "Purchase order has no supplier_name".to_string(),
            })?,
    }

    Ok(Prepared::Submit(payload))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::resolve::fake::FakeApi;
    use crate::domain::LedgerError;
    use serde_json::json;

    const LINE_ITEMS: Option<&str> = Some("line_items");

    fn object(value: Value) -> Payload {
        value.as_object().unwrap().clone()
    }

    #[tokio::test]
    async fn test_unresolvable_line_items_dropped() {
        let api = FakeApi::new().with_entity("contacts", "Acme Supply", json!({"contact_id": "8"}));
        let resolver = EntityResolver::new(&api);
        let record = object(json!({"supplier_name": "Acme Supply"}));

        let prepared = prepare(
            &resolver,
            &ResolutionPolicies::default(),
            LINE_ITEMS,
            &record,
            object(json!({"line_items": [
                {"item_id": "1", "quantity": 2},
                {"name": "Loose part", "quantity": 1}
            ]})),
        )
        .await
        .unwrap();

        match prepared {
            Prepared::Submit(payload) => {
                assert_eq!(payload["line_items"], json!([{"item_id": "1", "quantity": 2}]));
                assert_eq!(payload["vendor_id"], "8");
            }
            Prepared::Skip(reason, _) => panic!("unexpected skip: {reason:?}"),
        }
    }

    #[tokio::test]
    async fn test_no_item_ids_skips_without_lookup() {
        let api = FakeApi::new();
        let resolver = EntityResolver::new(&api);
        let record = object(json!({"supplier_name": "Acme Supply"}));

        let prepared = prepare(
            &resolver,
            &ResolutionPolicies::default(),
            LINE_ITEMS,
            &record,
            object(json!({"line_items": [{"name": "Loose part", "quantity": 1}]})),
        )
        .await
        .unwrap();

        assert!(matches!(
            prepared,
            Prepared::Skip(SkipReason::NoResolvableLineItems, _)
        ));
        assert_eq!(api.search_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_supplier_name_is_fatal() {
        let api = FakeApi::new();
        let resolver = EntityResolver::new(&api);

        let err = prepare(
            &resolver,
            &ResolutionPolicies::default(),
            LINE_ITEMS,
            &InputRecord::new(),
            object(json!({"line_items": [{"item_id": "1", "quantity": 1}]})),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, LedgerError::Resolution(_)));
        assert!(err.to_string().contains("supplier_name"));
    }
}
