//! Citation sources.
//!
//! A [`CitationSource`] turns one [`CitationRequest`] into a formatted
//! citation string. [`CrossCiteSource`] talks to the public CrossCite
//! formatting API; [`MockSource`] serves canned responses for tests.

mod crosscite;
mod mock;

pub use crosscite::{CrossCiteSource, CROSSCITE_API_BASE, DEFAULT_LANG};
pub use mock::MockSource;

use async_trait::async_trait;

use crate::models::CitationRequest;

/// A service that formats DOIs as citations
#[async_trait]
pub trait CitationSource: Send + Sync + std::fmt::Debug {
    /// Short machine identifier
    fn id(&self) -> &str;

    /// Human readable name
    fn name(&self) -> &str;

    /// Format a single request
    ///
    /// Returns the citation text exactly as delivered by the service.
    async fn format_citation(&self, request: &CitationRequest) -> Result<String, SourceError>;
}

/// Errors that can occur when interacting with a source
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Network or HTTP transport error
    #[error("Network error: {0}")]
    Network(String),

    /// The request did not complete in time
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// The service answered with a non-success status
    #[error("API error: status {status} for {doi}")]
    Api { status: u16, doi: String },

    /// Invalid request parameters
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SourceError::Timeout(err.to_string())
        } else {
            SourceError::Network(err.to_string())
        }
    }
}
