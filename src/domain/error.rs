//! Application error taxonomy.
//!
//! Every request-scoped failure funnels into [`AppError`]; the API layer maps
//! it onto an HTTP status in its `IntoResponse` implementation.

use thiserror::Error;

/// Top-level application error
#[derive(Debug, Error)]
pub enum AppError {
    /// Client-input errors (malformed or missing fields)
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// API key missing or mismatched
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Startup or runtime configuration problems
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Failures talking to Horizon or assembling a transaction
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// Anything else
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Client-input validation failures
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    MissingField { field: String },

    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },

    #[error("{0}")]
    Multiple(String),
}

impl ValidationError {
    pub fn missing(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }
}

/// Configuration errors, fatal at startup
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    MissingVar(&'static str),

    #[error("invalid signing seed: {0}")]
    InvalidSigningSeed(String),

    #[error("invalid value for {name}: {message}")]
    InvalidVar { name: &'static str, message: String },
}

/// Failures in the ledger client: Horizon calls and transaction assembly
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("cannot reach Horizon: {0}")]
    Connection(String),

    #[error("cannot load account {account_id}: {message}")]
    AccountLoad { account_id: String, message: String },

    #[error("transaction build failed: {0}")]
    Build(String),

    #[error("transaction signing failed: {0}")]
    Signing(String),

    #[error("transaction submission rejected: {0}")]
    SubmissionRejected(String),

    #[error("unexpected Horizon response: {0}")]
    MalformedResponse(String),
}
