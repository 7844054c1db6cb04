//! Payload construction
//!
//! Applies a [`MappingSpec`] to one input record. Sections run in a fixed
//! order: flat fields, nested objects, line items, ignore filter.
//!
//! The three sections filter differently:
//! - flat fields are sparse: absent or falsy values are left out so the
//!   remote API's defaults apply
//! - nested objects are always emitted, and copy every listed key the
//!   source has, falsy or not
//! - line-item fields are sparse within each element, and `quantity` must
//!   coerce to an integer

use super::spec::{LineItemMapping, MappingSpec, NestedMapping};
use crate::domain::{InputRecord, LedgerError, Result};
use serde_json::{Map, Number, Value};

/// Target-shaped request body
pub type Payload = Map<String, Value>;

/// Line-item field that must hold an integer
pub const QUANTITY_FIELD: &str = "quantity";

/// Build the payload for one record
///
/// # Errors
///
/// Returns [`LedgerError::Mapping`] if a line item has no usable quantity.
///
/// # Examples
///
/// ```
/// use ledgerbridge::core::mapping::{build_payload, MappingStore};
/// use serde_json::json;
///
/// # fn example() -> ledgerbridge::domain::Result<()> {
/// let store = MappingStore::from_json(r#"{
///     "invoices": {
///         "fields": {"customer_name": "customer_name", "notes": "notes"},
///         "line_items": {"source": "lineItems", "fields": {"name": "name", "quantity": "quantity"}}
///     }
/// }"#)?;
/// let record = json!({
///     "customer_name": "Acme",
///     "notes": "",
///     "lineItems": [{"name": "Widget", "quantity": "3"}]
/// });
///
/// let spec = store.get("invoices").unwrap();
/// let payload = build_payload(record.as_object().unwrap(), &spec)?;
///
/// assert_eq!(payload["customer_name"], "Acme");
/// assert!(!payload.contains_key("notes"));
/// assert_eq!(payload["line_items"], json!([{"name": "Widget", "quantity": 3}]));
/// # Ok(())
/// # }
/// ```
pub fn build_payload(record: &InputRecord, spec: &MappingSpec<'_>) -> Result<Payload> {
    let mut payload = Payload::new();

    for (source, target) in &spec.record.fields {
        if let Some(value) = record.get(source).filter(|v| is_truthy(v)) {
            payload.insert(target.clone(), value.clone());
        }
    }

    for nested in &spec.record.nested {
        payload.insert(nested.target.clone(), Value::Object(build_nested(record, nested)));
    }

    if let Some(line_items) = &spec.record.line_items {
        let items = build_line_items(record, line_items)?;
        payload.insert(line_items.target.clone(), Value::Array(items));
    }

    payload.retain(|key, _| !spec.ignore.contains(key));
    Ok(payload)
}

fn build_nested(record: &InputRecord, nested: &NestedMapping) -> Payload {
    let mut object = Payload::new();
    if let Some(source) = record.get(&nested.source).and_then(Value::as_object) {
        for (from, to) in &nested.fields {
            if let Some(value) = source.get(from) {
                object.insert(to.clone(), value.clone());
            }
        }
    }
    object
}

fn build_line_items(record: &InputRecord, mapping: &LineItemMapping) -> Result<Vec<Value>> {
    let elements = match record.get(&mapping.source) {
        Some(Value::Array(elements)) => elements,
        _ => return Ok(Vec::new()),
    };

    elements
        .iter()
        .enumerate()
        .map(|(index, element)| {
            let mut item = Payload::new();
            if let Some(element) = element.as_object() {
                for (from, to) in &mapping.fields {
                    if let Some(value) = element.get(from).filter(|v| is_truthy(v)) {
                        item.insert(to.clone(), value.clone());
                    }
                }
            }

            let quantity = coerce_quantity(item.get(QUANTITY_FIELD)).map_err(|reason| {
                LedgerError::Mapping(format!("Line item {index}: {reason}"))
            })?;
            item.insert(QUANTITY_FIELD.to_string(), Value::Number(Number::from(quantity)));
            Ok(Value::Object(item))
        })
        .collect()
}

/// Whether a value counts as present for sparse copying
///
/// `null`, `false`, numeric zero, `""`, `[]` and `{}` are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Coerce a line-item quantity to an integer
///
/// Accepts JSON integers, floats (truncated toward zero) and strings
/// holding an integer. Returns a description of the problem otherwise.
pub fn coerce_quantity(value: Option<&Value>) -> std::result::Result<i64, String> {
    match value {
        None => Err("quantity is missing".to_string()),
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| {
                // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive
                n.as_f64()
                    .map(f64::trunc)
                    .filter(|f| *f >= i64::MIN as f64 && *f < i64::MAX as f64)
                    .map(|f| f as i64)
            })
            .ok_or_else(|| format!("quantity {n} is out of range")),
        Some(Value::String(s)) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| format!("quantity '{s}' is not an integer")),
        Some(other) => Err(format!("quantity {other} is not numeric")),
    }
}
