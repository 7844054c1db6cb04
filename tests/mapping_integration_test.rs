//! Integration tests for mapping documents and payload building

use ledgerbridge::config::MappingConfig;
use ledgerbridge::core::mapping::{build_payload, MappingStore};
use ledgerbridge::domain::StreamKind;
use serde_json::{json, Value};
use std::io::Write;
use test_case::test_case;

fn record(value: Value) -> serde_json::Map<String, Value> {
    value.as_object().unwrap().clone()
}

#[test_case(StreamKind::Invoices, "invoice_number", "INV-1" ; "invoices")]
#[test_case(StreamKind::Bills, "bill_number", "BILL-1" ; "bills")]
#[test_case(StreamKind::BuyOrders, "purchaseorder_number", "PO-1" ; "buy orders")]
fn test_builtin_mapping_covers_every_stream(kind: StreamKind, number_field: &str, number: &str) {
    let store = MappingStore::builtin().unwrap();
    let spec = store.get(kind.mapping_key()).unwrap();

    let payload = build_payload(
        &record(json!({
            number_field: number,
            "created_at": "2024-01-01T00:00:00Z",
            "address": {"line1": "1 Main St", "city": "Springfield"},
            "lineItems": [{"name": "Widget", "quantity": 1}]
        })),
        &spec,
    )
    .unwrap();

    assert_eq!(payload[number_field], number);
    assert!(!payload.contains_key("created_time"));
    assert_eq!(payload["billing_address"]["address"], "1 Main St");
    assert_eq!(payload["line_items"][0]["quantity"], 1);
}

#[test_case(json!(2), 2 ; "integer")]
#[test_case(json!(2.9), 2 ; "float truncated")]
#[test_case(json!(" 7 "), 7 ; "numeric string")]
fn test_quantity_forms_accepted(quantity: Value, expected: i64) {
    let store = MappingStore::builtin().unwrap();
    let spec = store.get("invoices").unwrap();

    let payload = build_payload(
        &record(json!({"lineItems": [{"name": "Widget", "quantity": quantity}]})),
        &spec,
    )
    .unwrap();

    assert_eq!(payload["line_items"][0]["quantity"], expected);
}

#[test_case(json!("two") ; "word")]
#[test_case(json!(0) ; "zero")]
#[test_case(Value::Null ; "null")]
fn test_quantity_forms_rejected(quantity: Value) {
    let store = MappingStore::builtin().unwrap();
    let spec = store.get("bills").unwrap();

    let err = build_payload(
        &record(json!({"lineItems": [{"item_id": "I-1", "quantity": quantity}]})),
        &spec,
    )
    .unwrap_err();

    assert_eq!(err.kind(), "mapping");
    assert!(err.to_string().contains("Line item 0"));
}

#[test]
fn test_custom_mapping_document_from_config() {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    write!(
        file,
        r#"{{
            "ignore": ["internal_ref"],
            "invoices": {{
                "fields": {{"number": "invoice_number", "ref": "internal_ref"}},
                "line_items": {{
                    "source": "rows",
                    "target": "items",
                    "fields": {{"sku": "item_id", "qty": "quantity"}}
                }}
            }}
        }}"#
    )
    .unwrap();

    let config = MappingConfig {
        path: Some(file.path().to_string_lossy().to_string()),
    };
    let store = MappingStore::load(&config).unwrap();
    assert_eq!(store.record_types().collect::<Vec<_>>(), vec!["invoices"]);

    let spec = store.get("invoices").unwrap();
    let payload = build_payload(
        &record(json!({
            "number": "INV-9",
            "ref": "hidden",
            "rows": [{"sku": "S-1", "qty": "4"}]
        })),
        &spec,
    )
    .unwrap();

    assert_eq!(payload["invoice_number"], "INV-9");
    assert!(!payload.contains_key("internal_ref"));
    assert_eq!(payload["items"], json!([{"item_id": "S-1", "quantity": 4}]));
    assert!(store.get("bills").is_none());
}

#[test]
fn test_invalid_mapping_document_is_configuration_error() {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    write!(file, r#"{{"invoices": {{"fields": {{"a": "x", "b": "x"}}}}}}"#).unwrap();

    let err = MappingStore::from_file(file.path()).unwrap_err();
    assert_eq!(err.kind(), "configuration");
}
