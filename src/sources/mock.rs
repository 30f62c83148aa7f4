//! Mock source for testing purposes.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::models::CitationRequest;
use crate::sources::{CitationSource, SourceError};

/// A mock source that returns predefined citations and records every call.
///
/// DOIs without a configured response answer with a 404 API error.
#[derive(Debug, Default)]
pub struct MockSource {
    responses: Mutex<HashMap<String, Result<String, u16>>>,
    calls: Mutex<Vec<CitationRequest>>,
}

impl MockSource {
    /// Create a new mock source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `doi` with `citation` and status 200.
    pub fn with_citation(self, doi: &str, citation: &str) -> Self {
        self.set_response(doi, Ok(citation.to_string()));
        self
    }

    /// Answer `doi` with a non-success status.
    pub fn with_status(self, doi: &str, status: u16) -> Self {
        self.set_response(doi, Err(status));
        self
    }

    fn set_response(&self, doi: &str, response: Result<String, u16>) {
        let mut guard = self.responses.lock().unwrap_or_else(|e| e.into_inner());
        guard.insert(doi.to_string(), response);
    }

    /// Requests received so far, in call order.
    pub fn calls(&self) -> Vec<CitationRequest> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Number of requests received so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

#[async_trait]
impl CitationSource for MockSource {
    fn id(&self) -> &str {
        "mock"
    }

    fn name(&self) -> &str {
        "Mock Source"
    }

    async fn format_citation(&self, request: &CitationRequest) -> Result<String, SourceError> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request.clone());

        let guard = self.responses.lock().unwrap_or_else(|e| e.into_inner());
        match guard.get(&request.identifier) {
            Some(Ok(citation)) => Ok(citation.clone()),
            Some(Err(status)) => Err(SourceError::Api {
                status: *status,
                doi: request.identifier.clone(),
            }),
            None => Err(SourceError::Api {
                status: 404,
                doi: request.identifier.clone(),
            }),
        }
    }
}
