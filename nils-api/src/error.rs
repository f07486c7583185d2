//! Error types and error-body normalization for the NILS API client.
//!
//! NILS error responses are wildly inconsistent: some fields arrive as plain
//! strings, some as JSON double-encoded inside strings, some as numbers.
//! [`ErrorBody::normalize`] flattens whatever the server sent into one
//! uniform shape via [`lenient_decode`].

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Errors that can occur when talking to a NILS installation.
#[derive(Debug, Error)]
pub enum NilsError {
    /// The host could not be reached at all (connection refused, timeout).
    #[error("can not connect to: {host}")]
    Connect {
        /// The configured NILS host.
        host: String,
    },

    /// Any other HTTP transport failure (TLS handshake, protocol error, etc.).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered 401/403/500 with a usable error body.
    #[error("{0}")]
    Api(ErrorBody),

    /// The server answered 401/403/500 without a message in the body.
    #[error("Unknown NILS error")]
    Unknown,

    /// An operation could not establish a session. The underlying login
    /// failure has already been reported to the [`ErrorSink`].
    #[error("could not retrieve user or login")]
    NotLoggedIn,

    /// A success response carried a body that is not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias for `Result<T, NilsError>`.
pub type Result<T> = std::result::Result<T, NilsError>;

/// Side-effect-only observer for every error the client produces.
///
/// Invoked before the error is returned to the caller; implementations must
/// not assume they can change control flow. Replaces the ad hoc `onError`
/// callback style with an injectable seam.
pub trait ErrorSink: Send + Sync {
    /// Called once per produced error.
    fn report(&self, error: &NilsError);
}

/// Uniform error shape built from a 401/403/500 response body.
///
/// Wire field names are camelCase (`externalServicesErrorMsg`,
/// `validationErrors`). Every field except `status` and `detail` goes
/// through [`lenient_decode`]; `detail` is passed through unparsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    /// Status reported in the body, falling back to the HTTP status.
    pub status: u16,
    /// Application error code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<Value>,
    /// Human-readable message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Value>,
    /// Free-form detail, passed through without decoding.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<Value>,
    /// Message relayed from a downstream system NILS talks to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_services_error_msg: Option<Value>,
    /// Per-field validation failures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_errors: Option<Value>,
}

impl ErrorBody {
    /// Build a normalized error from a raw response body.
    ///
    /// `http_status` seeds `status` when the body carries none of its own.
    pub fn normalize(http_status: u16, body: &Value) -> Self {
        let status = match body.get("status") {
            Some(Value::Number(n)) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
            Some(Value::String(s)) => s.trim().parse().ok(),
            _ => None,
        }
        .unwrap_or(http_status);

        Self {
            status,
            code: body.get("code").and_then(lenient_decode),
            message: body.get("message").and_then(lenient_decode),
            detail: body.get("detail").filter(|v| !v.is_null()).cloned(),
            external_services_error_msg: body
                .get("externalServicesErrorMsg")
                .and_then(lenient_decode),
            validation_errors: body.get("validationErrors").and_then(lenient_decode),
        }
    }
}

impl fmt::Display for ErrorBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NILS error (status {})", self.status)?;
        match &self.message {
            Some(Value::String(s)) => write!(f, ": {s}"),
            Some(other) => write!(f, ": {other}"),
            None => Ok(()),
        }
    }
}

/// Best-effort decode of one error-body field.
///
/// Fallback order:
/// 1. a string that itself parses as JSON yields the parsed value
///    (the server double-encodes JSON inside strings on some paths),
/// 2. a string that does not parse is kept as-is,
/// 3. numbers and booleans are kept as-is,
/// 4. objects, arrays and null are dropped.
pub fn lenient_decode(value: &Value) -> Option<Value> {
    match value {
        Value::String(s) => match serde_json::from_str(s) {
            Ok(inner) => Some(inner),
            Err(_) => Some(Value::String(s.clone())),
        },
        Value::Number(_) | Value::Bool(_) => Some(value.clone()),
        Value::Object(_) | Value::Array(_) | Value::Null => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn lenient_decode_unwraps_double_encoded_json() {
        let decoded = lenient_decode(&json!("\"Session expired\"")).unwrap();
        assert_eq!(decoded, json!("Session expired"));

        let decoded = lenient_decode(&json!("[\"f1\",\"f2\"]")).unwrap();
        assert_eq!(decoded, json!(["f1", "f2"]));
    }

    #[test]
    fn lenient_decode_keeps_plain_strings() {
        let decoded = lenient_decode(&json!("plain message")).unwrap();
        assert_eq!(decoded, json!("plain message"));
    }

    #[test]
    fn lenient_decode_keeps_primitives_and_drops_structures() {
        assert_eq!(lenient_decode(&json!(42)), Some(json!(42)));
        assert_eq!(lenient_decode(&json!(true)), Some(json!(true)));
        assert_eq!(lenient_decode(&json!({"a": 1})), None);
        assert_eq!(lenient_decode(&json!([1, 2])), None);
        assert_eq!(lenient_decode(&Value::Null), None);
    }

    #[test]
    fn normalize_reads_status_from_body() {
        let body = json!({
            "status": "503",
            "code": "\"E42\"",
            "message": "boom",
            "detail": {"trace": "t-1"},
            "externalServicesErrorMsg": "\"remote down\"",
            "validationErrors": "[\"jobNo is required\"]"
        });
        let err = ErrorBody::normalize(500, &body);
        assert_eq!(err.status, 503);
        assert_eq!(err.code, Some(json!("E42")));
        assert_eq!(err.message, Some(json!("boom")));
        assert_eq!(err.detail, Some(json!({"trace": "t-1"})));
        assert_eq!(err.external_services_error_msg, Some(json!("remote down")));
        assert_eq!(err.validation_errors, Some(json!(["jobNo is required"])));
    }

    #[test]
    fn normalize_falls_back_to_http_status() {
        let err = ErrorBody::normalize(403, &json!({"message": "denied"}));
        assert_eq!(err.status, 403);
        assert_eq!(err.message, Some(json!("denied")));
    }

    #[test]
    fn display_includes_status_and_message() {
        let err = ErrorBody::normalize(500, &json!({"message": "X"}));
        assert_eq!(err.to_string(), "NILS error (status 500): X");
    }

    #[test]
    fn unknown_error_display_is_stable() {
        assert_eq!(NilsError::Unknown.to_string(), "Unknown NILS error");
    }

    #[test]
    fn connect_error_names_host() {
        let err = NilsError::Connect {
            host: "https://nils.example.com".into(),
        };
        assert!(err.to_string().contains("https://nils.example.com"));
    }
}
