//! Core data models for citation requests and results.

mod citation;
mod style;

pub use citation::{CitationRequest, CitationTable, CITATION_COLUMN, COMMENT_MARKER};
pub use style::{CitationStyle, ParseStyleError};
