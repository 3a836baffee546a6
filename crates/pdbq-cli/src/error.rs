//! Error types for pdbq CLI
//!
//! Every remote call reports failure through [`CliError`]; nothing is retried
//! and nothing is printed from library code. The binary decides how to show it.

use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Error type for client, parser and command failures
#[derive(Error, Debug)]
pub enum CliError {
    /// The service answered with a non-success status
    #[error("Request to {url} failed with status {status} ({reason})")]
    Transport {
        url: String,
        status: u16,
        reason: String,
    },

    /// Zero-length or zero-record body
    #[error("Empty response from {0}")]
    EmptyResponse(String),

    /// Body did not have the expected structure
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Caller supplied unusable arguments
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Identifier or query validation failed
    #[error(transparent)]
    Model(#[from] pdbq_common::PdbqError),

    /// HTTP request could not be completed
    #[error("Network request failed: {0}. Check your internet connection and endpoint URLs.")]
    Http(#[from] reqwest::Error),

    /// Custom report CSV could not be decoded
    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Configuration is missing or invalid
    #[error("Configuration error: {0}. Check your environment variables or config file.")]
    Config(String),

    #[error("Failed to parse TOML config: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Failed to write JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("File operation failed: {0}")]
    Io(#[from] std::io::Error),

    /// Search form has no control with this id
    #[error("Form control '{0}' not found on page")]
    FormControlNotFound(String),

    /// Control never became interactable
    #[error("Timed out after {waited_ms} ms waiting for form control '{control}'")]
    WaitTimeout { control: String, waited_ms: u64 },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CliError {
    pub fn transport(url: impl Into<String>, status: reqwest::StatusCode) -> Self {
        Self::Transport {
            url: url.into(),
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("unknown").to_string(),
        }
    }

    pub fn empty_response(what: impl Into<String>) -> Self {
        Self::EmptyResponse(what.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// HTTP status of a transport failure, if this is one
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => Some(*status),
            _ => None,
        }
    }
}
