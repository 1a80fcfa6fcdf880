//! Error types for the glossary client.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

/// Result type for glossary client operations.
pub type Result<T> = std::result::Result<T, GlossaryError>;

/// Field-keyed validation messages, as returned by the API on a 422.
///
/// The body looks like `{ "message": "...", "errors": { "explanation":
/// ["The explanation field is required."] } }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
pub struct ValidationErrors {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub errors: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    /// Single-field failure, used for client-side checks that never reach
    /// the network.
    pub fn field(name: &str, message: &str) -> Self {
        let mut errors = BTreeMap::new();
        errors.insert(name.to_string(), vec![message.to_string()]);
        Self {
            message: message.to_string(),
            errors,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Messages for one field, if any.
    pub fn for_field(&self, name: &str) -> &[String] {
        self.errors.get(name).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.errors.is_empty() {
            return write!(f, "{}", self.message);
        }
        let mut first = true;
        for (field, messages) in &self.errors {
            for message in messages {
                if !first {
                    write!(f, "; ")?;
                }
                write!(f, "{}: {}", field, message)?;
                first = false;
            }
        }
        Ok(())
    }
}

/// Glossary client errors.
#[derive(Debug, Error)]
pub enum GlossaryError {
    /// Configuration error (missing env var, invalid base URL)
    #[error("Configuration error: {0}")]
    Config(String),

    /// No valid session (401). Local session state must be cleared and the
    /// caller routed to login; the request is never retried.
    #[error("Authentication required")]
    AuthRequired,

    /// Caller is not the owner / not an admin (403)
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Target record no longer exists (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Request body rejected field-by-field (422)
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// Any other non-2xx response
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Transport failure (connection refused, timeout)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Response body did not decode
    #[error("Parse error: {0}")]
    Parse(String),
}

impl GlossaryError {
    /// Map a non-success status and its raw body to the error taxonomy.
    pub(crate) fn from_response(status: u16, body: &str) -> Self {
        match status {
            401 => Self::AuthRequired,
            403 => Self::PermissionDenied(extract_message(body)),
            404 => Self::NotFound(extract_message(body)),
            422 => match serde_json::from_str::<ValidationErrors>(body) {
                Ok(errors) => Self::Validation(errors),
                Err(_) => Self::Api {
                    status,
                    message: body.to_string(),
                },
            },
            _ => Self::Api {
                status,
                message: extract_message(body),
            },
        }
    }
}

/// Pull the `message` field out of an error body, falling back to the raw
/// text when the body is not the usual `{ "message": ... }` shape.
fn extract_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
        .unwrap_or_else(|| body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_401_maps_to_auth_required() {
        let err = GlossaryError::from_response(401, r#"{"message":"Unauthenticated."}"#);
        assert!(matches!(err, GlossaryError::AuthRequired));
    }

    #[test]
    fn status_403_carries_server_message() {
        let err = GlossaryError::from_response(403, r#"{"message":"This action is unauthorized."}"#);
        match err {
            GlossaryError::PermissionDenied(msg) => {
                assert_eq!(msg, "This action is unauthorized.");
            }
            other => panic!("expected PermissionDenied, got {other:?}"),
        }
    }

    #[test]
    fn status_422_parses_field_errors() {
        let body = r#"{
            "message": "The given data was invalid.",
            "errors": { "explanation": ["The explanation field is required."] }
        }"#;
        let err = GlossaryError::from_response(422, body);
        match err {
            GlossaryError::Validation(v) => {
                assert_eq!(
                    v.for_field("explanation"),
                    ["The explanation field is required."]
                );
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn unknown_status_falls_back_to_api_error() {
        let err = GlossaryError::from_response(500, "boom");
        match err {
            GlossaryError::Api { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "boom");
            }
            other => panic!("expected Api, got {other:?}"),
        }
    }
}
