//! Defines the custom error types for the bounceban-bridge application.

use crate::core::models::{Envelope, OutcomeStatus};
use serde_json::{json, Map, Value};
use std::{io, net::AddrParseError};
use thiserror::Error;
use url::ParseError as UrlParseError;

/// A rejected inbound payload, reported before any provider call is made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Short human-readable reason, surfaced as `data.error`.
    pub error: String,
    /// Optional hint, surfaced as `data.message`.
    pub message: Option<String>,
}

impl ValidationError {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.message {
            Some(message) => write!(f, "{} ({})", self.error, message),
            None => f.write_str(&self.error),
        }
    }
}

impl std::error::Error for ValidationError {}

/// The primary error type for the bridge.
#[derive(Error, Debug)]
pub enum AppError {
    /// Error occurring during configuration loading or validation.
    #[error("Configuration Error: {0}")]
    Config(String),

    /// Error initializing necessary components (e.g., the HTTP client or listener).
    #[error("Initialization Error: {0}")]
    Initialization(String),

    /// Error related to file input/output operations.
    #[error("IO Error: {0}")]
    Io(#[from] io::Error),

    /// Error during JSON serialization or deserialization.
    #[error("JSON Error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error parsing a URL.
    #[error("URL Parsing Error: {0}")]
    UrlParse(#[from] UrlParseError),

    /// Error parsing a socket address.
    #[error("Address Parsing Error: {0}")]
    AddrParse(#[from] AddrParseError),

    /// The inbound payload failed validation.
    #[error("Validation Error: {0}")]
    Validation(#[from] ValidationError),

    /// Neither the connection object nor the environment supplied an API key.
    #[error("API key is required.")]
    MissingCredential,

    /// The provider call exceeded its timeout.
    #[error("Request timeout")]
    ProviderTimeout,

    /// The provider answered with a non-2xx status.
    #[error("API request failed: {status}{}", .message.as_deref().map(|m| format!(" - {m}")).unwrap_or_default())]
    ProviderHttp {
        /// HTTP status code returned by the provider.
        status: u16,
        /// Error text extracted from the provider's body, if any.
        message: Option<String>,
    },

    /// The provider reported that the bulk task does not exist.
    #[error("Task not found")]
    TaskNotFound,

    /// Error making HTTP requests via reqwest.
    #[error("API request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider replied with something that could not be interpreted.
    #[error("Unexpected error: {0}")]
    Unexpected(String),

    /// An underlying error that doesn't fit other categories, using anyhow.
    #[error("Generic Error: {0}")]
    Generic(#[from] anyhow::Error),
}

impl AppError {
    /// Renders the error as the failed response envelope returned to the workflow host.
    pub fn into_envelope(self) -> Envelope {
        let mut data = Map::new();
        match self {
            AppError::Validation(ValidationError { error, message }) => {
                data.insert("error".into(), Value::String(error));
                if let Some(message) = message {
                    data.insert("message".into(), Value::String(message));
                }
            }
            AppError::TaskNotFound => {
                data.insert("error".into(), json!("Task not found"));
                data.insert(
                    "message".into(),
                    json!("The specified task ID does not exist or has already been deleted"),
                );
            }
            AppError::MissingCredential
            | AppError::ProviderTimeout
            | AppError::ProviderHttp { .. }
            | AppError::Request(_)
            | AppError::Unexpected(_) => {
                data.insert("error".into(), Value::String(self.to_string()));
            }
            other => {
                data.insert(
                    "error".into(),
                    Value::String(format!("Unexpected error: {other}")),
                );
            }
        }
        Envelope::from_value(Value::Object(data), OutcomeStatus::Failed)
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_carries_optional_message() {
        let envelope = AppError::from(
            ValidationError::new("Deletion not confirmed")
                .with_message("Set confirm_delete to true to proceed with deletion"),
        )
        .into_envelope();

        assert_eq!(envelope.metadata.status, OutcomeStatus::Failed);
        assert_eq!(envelope.data["error"], "Deletion not confirmed");
        assert_eq!(
            envelope.data["message"],
            "Set confirm_delete to true to proceed with deletion"
        );
    }

    #[test]
    fn timeout_renders_fixed_text() {
        let envelope = AppError::ProviderTimeout.into_envelope();
        assert_eq!(envelope.data["error"], "Request timeout");
        assert!(envelope.data.get("message").is_none());
    }

    #[test]
    fn provider_http_error_includes_provider_message() {
        let envelope = AppError::ProviderHttp {
            status: 402,
            message: Some("Insufficient credits".into()),
        }
        .into_envelope();
        assert_eq!(
            envelope.data["error"],
            "API request failed: 402 - Insufficient credits"
        );
    }

    #[test]
    fn uncategorised_errors_are_reported_as_unexpected() {
        let envelope = AppError::Config("bad".into()).into_envelope();
        assert_eq!(
            envelope.data["error"],
            "Unexpected error: Configuration Error: bad"
        );
    }
}
