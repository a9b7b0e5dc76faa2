//! Normalization of upstream failures into one error shape.
//!
//! The Instasent API does not return errors in a single format: depending on
//! the endpoint the body can be plain text, `{"message": ..}`,
//! `{"error": ..}`, `{"errors": [..]}` or arbitrary JSON. [`normalize`]
//! collapses all of them into an [`ApiError`] carrying one message string
//! (which always embeds the status code) plus the status itself.

use serde_json::Value;
use std::fmt;

/// A failed call to the upstream API.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// No response was received (connection refused, DNS, TLS, body read...).
    Transport { message: String },
    /// A response was received with a failure status.
    Http {
        status: u16,
        message: String,
        body: Option<Value>,
    },
}

impl ApiError {
    /// Status code of the failed response, absent for transport failures.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Transport { .. } => None,
            ApiError::Http { status, .. } => Some(*status),
        }
    }

    /// Human-readable message (`HTTP <status>: ...` for HTTP failures).
    pub fn message(&self) -> &str {
        match self {
            ApiError::Transport { message } | ApiError::Http { message, .. } => message,
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        ApiError::Transport {
            message: message.into(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        ApiError::transport(e.to_string())
    }
}

/// Builds an [`ApiError`] from a failed response's status and raw body text.
///
/// Bodies that parse as JSON go through [`normalize_value`]; anything else is
/// treated as a plain string body. An empty body counts as no body.
pub fn normalize(status: u16, body: Option<&str>) -> ApiError {
    let value = body
        .filter(|text| !text.trim().is_empty())
        .map(|text| serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string())));
    normalize_value(status, value)
}

/// Builds an [`ApiError`] from a failed response's status and parsed body.
///
/// The first matching rule wins:
/// 1. string body
/// 2. `message` field
/// 3. `error` field
/// 4. `errors` array, joined with `", "`
/// 5. the whole body serialized as JSON
///
/// Every message is prefixed with `HTTP <status>: `. Without a body the
/// message is just `HTTP <status>`.
pub fn normalize_value(status: u16, body: Option<Value>) -> ApiError {
    let prefix = format!("HTTP {}", status);
    let message = match &body {
        None | Some(Value::Null) => prefix,
        Some(body) => format!("{}: {}", prefix, body_message(body)),
    };
    ApiError::Http {
        status,
        message,
        body,
    }
}

fn body_message(body: &Value) -> String {
    if let Value::String(text) = body {
        return text.clone();
    }
    if let Some(message) = body.get("message").filter(|v| is_truthy(v)) {
        return display_value(message);
    }
    if let Some(error) = body.get("error").filter(|v| is_truthy(v)) {
        return display_value(error);
    }
    if let Some(Value::Array(errors)) = body.get("errors") {
        return errors
            .iter()
            .map(display_value)
            .collect::<Vec<_>>()
            .join(", ");
    }
    body.to_string()
}

/// Strings are used raw, everything else as compact JSON.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Matches the upstream's own notion of a populated field: null, false, 0
/// and "" count as absent.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
