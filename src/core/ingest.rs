//! Pipeline message parsing
//!
//! Upstream tooling emits one JSON message per line. `RECORD` messages
//! carry the records to process; `SCHEMA` and `STATE` messages are
//! acknowledged and otherwise ignored.

use crate::domain::context::ResultExt;
use crate::domain::{InputRecord, LedgerError, Result};
use serde::Deserialize;
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// One line of pipeline input
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum StreamMessage {
    /// A record for a stream
    Record {
        /// Stream name, e.g. `Invoices`
        stream: String,
        /// The record itself
        record: InputRecord,
    },
    /// Stream schema declaration
    Schema {
        /// Stream name
        stream: String,
        /// JSON schema of the stream's records
        #[serde(default)]
        schema: Value,
    },
    /// Checkpoint state
    State {
        /// Opaque state value
        #[serde(default)]
        value: Value,
    },
}

impl StreamMessage {
    /// Parse one line
    ///
    /// # Errors
    ///
    /// Returns a serialization error for invalid JSON or unknown message
    /// types.
    pub fn parse(line: &str) -> Result<Self> {
        serde_json::from_str(line).map_err(LedgerError::from)
    }
}

/// Reads messages line by line, skipping blank lines
pub struct MessageReader<R> {
    reader: R,
    buffer: Vec<u8>,
    line_number: usize,
}

impl<R: AsyncBufRead + Unpin> MessageReader<R> {
    /// Wrap a buffered reader
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: Vec::new(),
            line_number: 0,
        }
    }

    /// Line number of the last message returned (1-based)
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Next message, or `None` at end of input
    ///
    /// # Errors
    ///
    /// Read failures are returned as I/O errors. Lines that are not UTF-8
    /// or not a valid message are returned as serialization errors with the
    /// line number, and the reader can continue past them.
    pub async fn next_message(&mut self) -> Result<Option<StreamMessage>> {
        loop {
            self.buffer.clear();
            let read = self
                .reader
                .read_until(b'\n', &mut self.buffer)
                .await
                .with_context(|| format!("Failed to read input line {}", self.line_number + 1))?;
            if read == 0 {
                return Ok(None);
            }
            self.line_number += 1;
            let number = self.line_number;

            let line = std::str::from_utf8(&self.buffer).map_err(|e| {
                LedgerError::Serialization(format!(
                    "Invalid message on line {number}: not valid UTF-8 ({e})"
                ))
            })?;
            let line = line.trim_end_matches(&['\n', '\r'][..]);

            if line.trim().is_empty() {
                continue;
            }
            return StreamMessage::parse(line)
                .with_context(|| format!("Invalid message on line {number}"))
                .map(Some);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_record() {
        let message = StreamMessage::parse(
            r#"{"type": "RECORD", "stream": "Invoices", "record": {"customer_name": "Acme"}}"#,
        )
        .unwrap();

        match message {
            StreamMessage::Record { stream, record } => {
                assert_eq!(stream, "Invoices");
                assert_eq!(record["customer_name"], "Acme");
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn test_parse_schema_and_state() {
        let schema = StreamMessage::parse(
            r#"{"type": "SCHEMA", "stream": "Bills", "schema": {"type": "object"}, "key_properties": ["id"]}"#,
        )
        .unwrap();
        assert!(matches!(schema, StreamMessage::Schema { ref stream, .. } if stream == "Bills"));

        let state = StreamMessage::parse(r#"{"type": "STATE", "value": {"bookmarks": {}}}"#).unwrap();
        assert_eq!(
            state,
            StreamMessage::State {
                value: json!({"bookmarks": {}})
            }
        );
    }

    #[test]
    fn test_parse_rejects_unknown_type_and_non_object_record() {
        assert!(StreamMessage::parse(r#"{"type": "ACTIVATE_VERSION", "stream": "x"}"#).is_err());
        assert!(StreamMessage::parse(r#"{"type": "RECORD", "stream": "x", "record": [1]}"#).is_err());
        assert!(StreamMessage::parse("not json").is_err());
    }

    #[tokio::test]
    async fn test_reader_skips_blank_lines_and_tracks_numbers() {
        let input = concat!(
            r#"{"type": "SCHEMA", "stream": "Invoices", "schema": {}}"#,
            "\n\n",
            "garbage\n",
            r#"{"type": "RECORD", "stream": "Invoices", "record": {}}"#,
            "\n"
        );
        let mut reader = MessageReader::new(input.as_bytes());

        assert!(matches!(
            reader.next_message().await.unwrap(),
            Some(StreamMessage::Schema { .. })
        ));
        assert_eq!(reader.line_number(), 1);

        let err = reader.next_message().await.unwrap_err();
        assert!(err.to_string().contains("line 3"));
        assert_eq!(err.kind(), "serialization");

        assert!(matches!(
            reader.next_message().await.unwrap(),
            Some(StreamMessage::Record { .. })
        ));
        assert_eq!(reader.line_number(), 4);
        assert!(reader.next_message().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_reader_continues_after_invalid_utf8() {
        let mut input = b"\xff\xfe\n".to_vec();
        input.extend_from_slice(br#"{"type": "STATE", "value": 1}"#);
        input.extend_from_slice(b"\r\n");
        let mut reader = MessageReader::new(input.as_slice());

        let err = reader.next_message().await.unwrap_err();
        assert_eq!(err.kind(), "serialization");
        assert!(err.to_string().contains("line 1"));

        assert_eq!(
            reader.next_message().await.unwrap(),
            Some(StreamMessage::State { value: json!(1) })
        );
        assert_eq!(reader.line_number(), 2);
        assert!(reader.next_message().await.unwrap().is_none());
    }
}
