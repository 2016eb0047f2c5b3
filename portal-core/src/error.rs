use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Message shown when neither the backend nor the caller has anything better.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong.";

/// Error body returned by the portal backend.
///
/// Shape: `{ "message": "...", "errors": { "field": ["msg", ...] } }`. Both
/// members are optional and `errors` keeps the order the server sent.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ErrorEnvelope {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub errors: Option<Value>,
}

impl ErrorEnvelope {
    /// Parse an error body, tolerating empty or non-JSON payloads.
    pub fn from_bytes(body: &[u8]) -> Self {
        serde_json::from_slice(body).unwrap_or_default()
    }

    /// First message of the first field, in server order.
    pub fn first_field_error(&self) -> Option<&str> {
        let errors = self.errors.as_ref()?.as_object()?;
        let (_, messages) = errors.iter().next()?;
        messages.as_array()?.first()?.as_str()
    }

    /// All field errors, keeping only string messages.
    pub fn field_errors(&self) -> Vec<(String, Vec<String>)> {
        let Some(errors) = self.errors.as_ref().and_then(Value::as_object) else {
            return Vec::new();
        };

        errors
            .iter()
            .map(|(field, messages)| {
                let messages = messages
                    .as_array()
                    .map(|list| {
                        list.iter()
                            .filter_map(Value::as_str)
                            .map(str::to_string)
                            .collect()
                    })
                    .unwrap_or_default();
                (field.clone(), messages)
            })
            .collect()
    }

    fn top_level_message(&self) -> Option<&str> {
        self.message.as_deref().filter(|m| !m.trim().is_empty())
    }

    /// First field error, else the top-level message, else `fallback`.
    pub fn message_or(&self, fallback: &str) -> String {
        self.first_field_error()
            .or_else(|| self.top_level_message())
            .unwrap_or(fallback)
            .to_string()
    }
}

impl fmt::Display for ErrorEnvelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message_or("no details"))
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized: {envelope}")]
    Unauthorized { envelope: ErrorEnvelope },

    #[error("Validation error: {envelope}")]
    Validation { envelope: ErrorEnvelope },

    #[error("Not found: {envelope}")]
    NotFound { envelope: ErrorEnvelope },

    #[error("Request failed with status {status}: {envelope}")]
    Status {
        status: StatusCode,
        envelope: ErrorEnvelope,
    },

    #[error("HTTP request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Classify a non-success response from its status and raw body.
    pub fn from_response_parts(status: StatusCode, body: &[u8]) -> Self {
        let envelope = ErrorEnvelope::from_bytes(body);
        match status {
            StatusCode::UNAUTHORIZED => ApiError::Unauthorized { envelope },
            StatusCode::UNPROCESSABLE_ENTITY => ApiError::Validation { envelope },
            StatusCode::NOT_FOUND => ApiError::NotFound { envelope },
            _ => ApiError::Status { status, envelope },
        }
    }

    /// Read the body of a failed response and classify it.
    pub async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status();
        match response.bytes().await {
            Ok(body) => Self::from_response_parts(status, &body),
            Err(e) => {
                tracing::warn!(status = %status, error = %e, "Failed to read error body");
                Self::from_response_parts(status, &[])
            }
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Unauthorized { .. } => Some(StatusCode::UNAUTHORIZED),
            ApiError::Validation { .. } => Some(StatusCode::UNPROCESSABLE_ENTITY),
            ApiError::NotFound { .. } => Some(StatusCode::NOT_FOUND),
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Network(e) => e.status(),
            ApiError::Decode(_) => None,
        }
    }

    pub fn envelope(&self) -> Option<&ErrorEnvelope> {
        match self {
            ApiError::Unauthorized { envelope }
            | ApiError::Validation { envelope }
            | ApiError::NotFound { envelope }
            | ApiError::Status { envelope, .. } => Some(envelope),
            ApiError::Network(_) | ApiError::Decode(_) => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound { .. })
    }

    /// Message to surface to the user for this failure. Transport failures
    /// describe themselves; a backend error body is preferred otherwise.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Network(e) if e.status().is_none() => transport_message(e),
            _ => match self.envelope() {
                Some(envelope) => envelope.message_or(fallback),
                None => fallback.to_string(),
            },
        }
    }
}

fn transport_message(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        "The request timed out.".to_string()
    } else if error.is_connect() {
        "Could not reach the server.".to_string()
    } else {
        format!("Network error: {}", error)
    }
}
