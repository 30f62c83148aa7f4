//! # Citation Fetcher
//!
//! Fetch formatted citations for a list of DOIs from the CrossCite
//! formatting service, repair mis-decoded characters, and export the result
//! as a single-column CSV.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`models`]: Core data structures (CitationStyle, CitationRequest, CitationTable)
//! - [`sources`]: Citation sources behind the [`CitationSource`] trait
//! - [`pipeline`]: Sequential retrieval and text normalization
//! - [`io`]: DOI list input and CSV export
//! - [`utils`]: HTTP client and progress reporting
//! - [`config`]: Configuration management

pub mod config;
pub mod io;
pub mod models;
pub mod pipeline;
pub mod sources;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use models::{CitationRequest, CitationStyle, CitationTable};
pub use pipeline::{collect_citations, fetch_citations, normalize};
pub use sources::{CitationSource, CrossCiteSource};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
