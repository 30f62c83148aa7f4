//! CrossCite citation formatting source.

use async_trait::async_trait;
use std::sync::Arc;

use crate::models::CitationRequest;
use crate::pipeline::decode_dropping_invalid;
use crate::sources::{CitationSource, SourceError};
use crate::utils::HttpClient;

/// Public CrossCite endpoint
pub const CROSSCITE_API_BASE: &str = "https://citation.crosscite.org";

/// Locale requested from CrossCite
pub const DEFAULT_LANG: &str = "en-US";

/// CrossCite citation source
///
/// Uses the `format` endpoint, which renders a DOI in a CSL style.
#[derive(Debug, Clone)]
pub struct CrossCiteSource {
    client: Arc<HttpClient>,
    base_url: String,
    lang: String,
}

impl CrossCiteSource {
    pub fn new() -> Result<Self, SourceError> {
        let client = HttpClient::new()?;
        Ok(Self::with_client(Arc::new(client)))
    }

    /// Create a source that shares an existing client
    pub fn with_client(client: Arc<HttpClient>) -> Self {
        Self {
            client,
            base_url: CROSSCITE_API_BASE.to_string(),
            lang: DEFAULT_LANG.to_string(),
        }
    }

    /// Point the source at another server (a mirror, or a mock in tests)
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the citation locale
    pub fn lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = lang.into();
        self
    }

    /// Build the request URL for a citation request
    pub fn request_url(&self, request: &CitationRequest) -> String {
        format!(
            "{}/format?doi={}&style={}&lang={}",
            self.base_url,
            urlencoding::encode(request.identifier.trim()),
            request.style.id(),
            urlencoding::encode(&self.lang)
        )
    }
}

#[async_trait]
impl CitationSource for CrossCiteSource {
    fn id(&self) -> &str {
        "crosscite"
    }

    fn name(&self) -> &str {
        "CrossCite"
    }

    async fn format_citation(&self, request: &CitationRequest) -> Result<String, SourceError> {
        if request.is_blank() {
            return Err(SourceError::InvalidRequest("empty DOI".to_string()));
        }

        let url = self.request_url(request);
        tracing::debug!("GET {}", url);

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(SourceError::Api {
                status: status.as_u16(),
                doi: request.identifier.clone(),
            });
        }

        let body = response.bytes().await?;

        Ok(decode_dropping_invalid(&body))
    }
}
