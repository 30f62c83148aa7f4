//! Citation request and result models.

use serde::{Deserialize, Serialize};

use super::CitationStyle;

/// Marker that turns a DOI row into a comment
pub const COMMENT_MARKER: char = '#';

/// Name of the single column of an exported citation table
pub const CITATION_COLUMN: &str = "Citation";

/// A request to format one DOI in one style
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitationRequest {
    /// The DOI to format
    pub identifier: String,

    /// Style to format it in
    pub style: CitationStyle,
}

impl CitationRequest {
    /// Create a new citation request
    pub fn new(identifier: impl Into<String>, style: CitationStyle) -> Self {
        Self {
            identifier: identifier.into(),
            style,
        }
    }

    /// Build one request per DOI, all sharing the same style
    pub fn batch<I, S>(dois: I, style: CitationStyle) -> Vec<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        dois.into_iter().map(|doi| Self::new(doi, style)).collect()
    }

    /// Whether the identifier is commented out and must not be fetched
    pub fn is_comment(&self) -> bool {
        self.identifier.starts_with(COMMENT_MARKER)
    }

    /// Whether the identifier is empty once surrounding whitespace is removed
    pub fn is_blank(&self) -> bool {
        self.identifier.trim().is_empty()
    }
}

/// Normalized citations, one per successful request, in retrieval order
///
/// Failed requests leave no row behind, so rows do not line up with the
/// input DOI list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitationTable {
    citations: Vec<String>,
}

impl CitationTable {
    /// Create a table from already normalized citations
    pub fn new(citations: Vec<String>) -> Self {
        Self { citations }
    }

    /// Column header used when the table is exported
    pub fn column(&self) -> &'static str {
        CITATION_COLUMN
    }

    /// Citation rows
    pub fn citations(&self) -> &[String] {
        &self.citations
    }

    /// Consume the table, returning its rows
    pub fn into_citations(self) -> Vec<String> {
        self.citations
    }

    pub fn len(&self) -> usize {
        self.citations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.citations.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.citations.iter()
    }
}

impl From<Vec<String>> for CitationTable {
    fn from(citations: Vec<String>) -> Self {
        Self::new(citations)
    }
}

impl<'a> IntoIterator for &'a CitationTable {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
