//! Error types for catalog searches.
//!
//! Only [`SearchError::Transport`] and [`SearchError::Protocol`] ever reach a caller,
//! and then only as `on_complete(false)`. Everything else is absorbed where it occurs.

use thiserror::Error;

/// Everything that can go wrong between building a query and publishing results.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The request was superseded by a newer search or explicitly cancelled.
    #[error("Search request was cancelled")]
    Cancelled,

    /// Network, DNS or timeout failure.
    #[error("Transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The catalog answered with something other than HTTP 200.
    #[error("Catalog returned HTTP {status}")]
    Protocol { status: u16 },

    /// The response body is not a JSON object.
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    /// A single element of `results` could not be turned into a record.
    #[error("Malformed {shape} item: {reason}")]
    MalformedItem { shape: &'static str, reason: String },

    #[error("Unknown category index {0}")]
    UnknownCategory(i64),

    #[error("Configuration error: {0}")]
    InvalidConfig(String),
}

impl From<reqwest::Error> for SearchError {
    fn from(err: reqwest::Error) -> Self {
        SearchError::Transport(Box::new(err))
    }
}

pub type Result<T> = std::result::Result<T, SearchError>;
