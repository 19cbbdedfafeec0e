//! Error types for the innertube scraper
//!
//! Only transport construction and caller mistakes surface as errors.
//! Missing or malformed upstream data degrades to absent values instead.

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Error type for all scraper operations
///
/// Implements Display for human-readable messages and Serialize
/// so frontends can receive the message as a plain string.
#[derive(Error, Debug)]
pub enum TubeError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Response body was not a JSON document
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Rate limited by server (HTTP 429)
    #[error("Rate limited - too many requests")]
    RateLimited,

    /// Endpoint answered 404
    #[error("Not found: {0}")]
    NotFound(String),

    /// Empty or unusable video/playlist identifier
    #[error("Invalid ID: {0}")]
    InvalidId(String),

    /// Empty or whitespace-only search query
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// Page numbers start at 1
    #[error("Invalid page number: {0} (pages start at 1)")]
    InvalidPage(usize),
}

impl Serialize for TubeError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// Result type alias for scraper operations
pub type Result<T> = std::result::Result<T, TubeError>;
