// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Response payload decoding and row extraction

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::debug;

use crate::error::TransportError;
use crate::proxy::RelayMode;

/// Envelope shape returned by the wrapping relay family.
#[derive(Debug, Deserialize)]
struct RelayEnvelope {
    contents: Option<String>,
}

/// The sentinel returned when every strategy fails or upstream has no data.
///
/// Callers treat this identically to a genuinely empty collection.
pub fn empty_result() -> Value {
    json!({"count": 0, "data": []})
}

/// Decode a strategy's response body according to its relay mode.
pub(crate) fn decode_payload(body: &str, mode: RelayMode) -> Result<Value, TransportError> {
    match mode {
        RelayMode::Raw => Ok(serde_json::from_str(body)?),
        RelayMode::Enveloped => {
            let envelope: RelayEnvelope = serde_json::from_str(body)?;
            let contents = envelope.contents.ok_or(TransportError::EmptyEnvelope)?;
            Ok(serde_json::from_str(&contents)?)
        }
    }
}

/// Extract typed rows from an upstream response value.
///
/// The API returns either a bare array or `{data: [...]}`; anything else
/// (including the empty-result sentinel) yields no rows. Rows that fail to
/// decode are dropped individually so one malformed record cannot take the
/// whole collection down with it.
pub fn extract_rows<T: DeserializeOwned>(response: &Value) -> Vec<T> {
    let rows = match response {
        Value::Array(items) => items.as_slice(),
        Value::Object(map) => match map.get("data") {
            Some(Value::Array(items)) => items.as_slice(),
            _ => return Vec::new(),
        },
        _ => return Vec::new(),
    };

    rows.iter()
        .filter_map(|row| match serde_json::from_value(row.clone()) {
            Ok(decoded) => Some(decoded),
            Err(error) => {
                debug!(%error, "dropping undecodable row");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Row {
        id: i64,
    }

    #[test]
    fn extracts_bare_array() {
        let rows: Vec<Row> = extract_rows(&json!([{"id": 1}, {"id": 2}]));
        assert_eq!(rows, vec![Row { id: 1 }, Row { id: 2 }]);
    }

    #[test]
    fn extracts_data_wrapped_array() {
        let rows: Vec<Row> = extract_rows(&json!({"count": 1, "data": [{"id": 7}]}));
        assert_eq!(rows, vec![Row { id: 7 }]);
    }

    #[test]
    fn sentinel_and_scalars_yield_nothing() {
        let rows: Vec<Row> = extract_rows(&empty_result());
        assert!(rows.is_empty());

        let rows: Vec<Row> = extract_rows(&json!("not a collection"));
        assert!(rows.is_empty());
    }

    #[test]
    fn malformed_rows_are_dropped_individually() {
        let rows: Vec<Row> = extract_rows(&json!([{"id": 1}, {"id": "NaN"}, {"id": 3}]));
        assert_eq!(rows, vec![Row { id: 1 }, Row { id: 3 }]);
    }

    #[test]
    fn enveloped_payload_needs_second_parse() {
        let inner = json!([{"id": 5}]).to_string();
        let body = json!({"contents": inner, "status": {"http_code": 200}}).to_string();
        let decoded = decode_payload(&body, RelayMode::Enveloped).expect("decoded");
        let rows: Vec<Row> = extract_rows(&decoded);
        assert_eq!(rows, vec![Row { id: 5 }]);
    }

    #[test]
    fn envelope_without_contents_is_an_error() {
        let body = json!({"status": {"http_code": 502}}).to_string();
        let result = decode_payload(&body, RelayMode::Enveloped);
        assert!(matches!(result, Err(TransportError::EmptyEnvelope)));
    }
}
