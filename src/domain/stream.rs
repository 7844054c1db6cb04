//! Record streams handled by the sink
//!
//! The upstream pipeline tags every record with a stream name. Each known
//! stream selects a mapping table and a create endpoint.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Input record as delivered by the pipeline
pub type InputRecord = serde_json::Map<String, serde_json::Value>;

/// Record types the sink knows how to submit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StreamKind {
    /// `Invoices` stream, submitted as Books invoices
    Invoices,
    /// `Bills` stream, submitted as Books bills
    Bills,
    /// `BuyOrders` stream, submitted as Books purchase orders
    BuyOrders,
}

impl StreamKind {
    /// All known streams
    pub const ALL: [StreamKind; 3] = [
        StreamKind::Invoices,
        StreamKind::Bills,
        StreamKind::BuyOrders,
    ];

    /// Stream name as it appears in pipeline messages
    pub fn stream_name(&self) -> &'static str {
        match self {
            StreamKind::Invoices => "Invoices",
            StreamKind::Bills => "Bills",
            StreamKind::BuyOrders => "BuyOrders",
        }
    }

    /// Key of this record type in the mapping document
    pub fn mapping_key(&self) -> &'static str {
        match self {
            StreamKind::Invoices => "invoices",
            StreamKind::Bills => "bills",
            StreamKind::BuyOrders => "buy_orders",
        }
    }

    /// Books collection the payload is posted to
    pub fn endpoint(&self) -> &'static str {
        match self {
            StreamKind::Invoices => "invoices",
            StreamKind::Bills => "bills",
            StreamKind::BuyOrders => "purchaseorders",
        }
    }
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.stream_name())
    }
}

impl FromStr for StreamKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StreamKind::ALL
            .into_iter()
            .find(|kind| kind.stream_name() == s)
            .ok_or_else(|| format!("Unknown stream: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_round_trip_names() {
        for kind in StreamKind::ALL {
            assert_eq!(StreamKind::from_str(kind.stream_name()).unwrap(), kind);
        }
    }

    #[test]
    fn test_stream_names_are_case_sensitive() {
        assert!(StreamKind::from_str("invoices").is_err());
        assert!(StreamKind::from_str("Contacts").is_err());
    }

    #[test]
    fn test_buy_orders_post_to_purchaseorders() {
        assert_eq!(StreamKind::BuyOrders.endpoint(), "purchaseorders");
        assert_eq!(StreamKind::BuyOrders.mapping_key(), "buy_orders");
    }
}
