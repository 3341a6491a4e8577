//! # Response Envelope
//!
//! Every response, success or failure, is the same wire shape:
//!
//! ```json
//! { "status": "success" | "error", "message": "...", "data": ... }
//! { "status": "success" | "error", "message": "...", "error": ... }
//! ```
//!
//! Exactly one of `data` / `error` is present. Validation failures carry an
//! ordered list of messages; on the wire that list is re-keyed into an object
//! mapping each index (as a string key) to its message, so clients always see
//! an object under `error`, never an array.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::{json, Map, Value};

/// Message used when a success handler does not provide its own.
pub const DEFAULT_SUCCESS_MESSAGE: &str = "Operación exitosa";

/// Message used when an error path does not provide its own.
pub const DEFAULT_ERROR_MESSAGE: &str = "Operación fallida";

/// The error half of the envelope: either a single message string or an
/// ordered sequence of validation messages.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorPayload {
    Message(String),
    Messages(Vec<String>),
}

impl ErrorPayload {
    /// Wire form of the payload. Sequences become an index-keyed object,
    /// preserving order through key ordinality.
    pub fn into_value(self) -> Value {
        match self {
            Self::Message(message) => Value::String(message),
            Self::Messages(messages) => {
                let mut keyed = Map::new();
                for (index, message) in messages.into_iter().enumerate() {
                    keyed.insert(index.to_string(), Value::String(message));
                }
                Value::Object(keyed)
            }
        }
    }
}

/// Render a success envelope at the given status code.
pub fn success<T: Serialize>(data: T, status: StatusCode, message: &str) -> Response {
    let body = json!({
        "status": "success",
        "message": message,
        "data": data,
    });
    (status, Json(body)).into_response()
}

/// Render an error envelope at the given status code.
pub fn error(payload: ErrorPayload, status: StatusCode, message: &str) -> Response {
    let body = json!({
        "status": "error",
        "message": message,
        "error": payload.into_value(),
    });
    (status, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_payload_stays_a_string() {
        let value = ErrorPayload::Message("Not Found".to_string()).into_value();
        assert_eq!(value, Value::String("Not Found".to_string()));
    }

    #[test]
    fn sequence_payload_is_rekeyed_by_index() {
        let value = ErrorPayload::Messages(vec![
            "first".to_string(),
            "second".to_string(),
            "third".to_string(),
        ])
        .into_value();

        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 3);
        assert_eq!(object["0"], "first");
        assert_eq!(object["1"], "second");
        assert_eq!(object["2"], "third");
        // insertion order survives serialization
        let keys: Vec<&String> = object.keys().collect();
        assert_eq!(keys, ["0", "1", "2"]);
    }

    #[test]
    fn empty_sequence_becomes_empty_object() {
        let value = ErrorPayload::Messages(Vec::new()).into_value();
        assert_eq!(value, Value::Object(Map::new()));
    }
}
