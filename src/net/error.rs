//! Uniform error shape for every backend call.
//!
//! ERROR HANDLING
//! ==============
//! Transport failures, HTTP error statuses and bodies that do not match their
//! schema all become an [`ApiError`]. Callers never see raw `reqwest` errors;
//! they get a display message plus, for validation failures, the backend's
//! per-field messages.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::session::SessionError;

/// Field name to ordered validation messages.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Keys that carry the overall message rather than a field error.
const MESSAGE_KEYS: [&str; 2] = ["message", "detail"];

/// Errors produced by backend operations.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never produced an HTTP response.
    #[error("unable to reach the server: {0}")]
    Network(String),

    /// The backend rejected the input (400/422).
    #[error("{message}")]
    Validation { message: String, fields: FieldErrors },

    /// Missing or invalid credential (401/403).
    #[error("{message}")]
    Unauthorized { status: u16, message: String },

    /// The post, comment or category does not exist (404).
    #[error("{message}")]
    NotFound { message: String },

    /// Any other status, or a body that does not match its schema.
    #[error("{message}")]
    Unexpected { status: Option<u16>, message: String },

    /// The session credential could not be persisted.
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl ApiError {
    /// Classify a non-success response and pull a message out of its body.
    #[must_use]
    pub fn from_response(status: u16, body: &str) -> Self {
        let object = match serde_json::from_str::<Value>(body) {
            Ok(Value::Object(map)) => Some(map),
            _ => None,
        };
        let fields = object.as_ref().map(extract_field_errors).unwrap_or_default();
        let message = object
            .as_ref()
            .and_then(|map| extract_message(map, &fields))
            .unwrap_or_else(|| default_message(status));

        match status {
            400 | 422 => Self::Validation { message, fields },
            401 | 403 => Self::Unauthorized { status, message },
            404 => Self::NotFound { message },
            _ => Self::Unexpected { status: Some(status), message },
        }
    }

    pub(crate) fn from_transport(error: &reqwest::Error) -> Self {
        if error.is_decode() {
            return Self::unexpected_shape(error);
        }
        Self::Network(error.to_string())
    }

    pub(crate) fn unexpected_shape(error: impl std::fmt::Display) -> Self {
        Self::Unexpected { status: None, message: format!("unexpected response from server: {error}") }
    }

    /// Human-readable text suitable for showing next to a form or page.
    #[must_use]
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Per-field validation messages, when the backend sent any.
    #[must_use]
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Validation { fields, .. } if !fields.is_empty() => Some(fields),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Network(_) => "E_NETWORK",
            Self::Validation { .. } => "E_VALIDATION",
            Self::Unauthorized { .. } => "E_UNAUTHORIZED",
            Self::NotFound { .. } => "E_NOT_FOUND",
            Self::Unexpected { .. } => "E_UNEXPECTED",
            Self::Session(_) => "E_SESSION",
        }
    }
}

fn extract_field_errors(map: &Map<String, Value>) -> FieldErrors {
    map.iter()
        .filter(|(key, _)| !MESSAGE_KEYS.contains(&key.as_str()))
        .filter_map(|(key, value)| {
            let messages: Vec<String> = match value {
                Value::String(s) => vec![s.clone()],
                Value::Array(items) => items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_owned)
                    .collect(),
                _ => Vec::new(),
            };
            (!messages.is_empty()).then(|| (key.clone(), messages))
        })
        .collect()
}

/// `message`, then `detail`, then `non_field_errors`, then the first field
/// error (alphabetical by field).
fn extract_message(map: &Map<String, Value>, fields: &FieldErrors) -> Option<String> {
    for key in MESSAGE_KEYS {
        if let Some(text) = map.get(key).and_then(Value::as_str).filter(|s| !s.trim().is_empty()) {
            return Some(text.to_owned());
        }
    }
    if let Some(first) = fields.get("non_field_errors").and_then(|msgs| msgs.first()) {
        return Some(first.clone());
    }
    fields
        .iter()
        .find_map(|(field, msgs)| msgs.first().map(|msg| format!("{field}: {msg}")))
}

fn default_message(status: u16) -> String {
    match status {
        400 | 422 => "The request was invalid.".to_owned(),
        401 => "Authentication credentials were not provided or are invalid.".to_owned(),
        403 => "You do not have permission to perform this action.".to_owned(),
        404 => "The requested resource was not found.".to_owned(),
        500..=599 => format!("The server encountered an error (status {status})."),
        _ => format!("Unexpected response from server (status {status})."),
    }
}
