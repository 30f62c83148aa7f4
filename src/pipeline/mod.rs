//! The citation pipeline: retrieve, then normalize.
//!
//! ```rust
//! use citation_fetcher::models::CitationStyle;
//! use citation_fetcher::pipeline::{collect_citations, DuplicateKeyPolicy};
//! use citation_fetcher::sources::MockSource;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let source = MockSource::new().with_citation("10.1000/abc", "Doe, J. (2020). Title.");
//! let dois = vec!["10.1000/abc".to_string(), "#10.1000/skip".to_string()];
//!
//! let table = collect_citations(
//!     &source,
//!     &dois,
//!     CitationStyle::Apa,
//!     DuplicateKeyPolicy::LastWins,
//!     |_| {},
//! )
//! .await;
//! assert_eq!(table.len(), 1);
//! # }
//! ```

mod normalizer;
mod retriever;

pub use normalizer::{
    decode_dropping_invalid, normalize, normalize_citation, DuplicateKeyPolicy, Normalizer,
    SUBSTITUTIONS,
};
pub use retriever::{fetch_citations, fetch_citations_with_stats, FetchStats};

use crate::models::{CitationRequest, CitationStyle, CitationTable};
use crate::sources::CitationSource;

/// Fetch and normalize citations for `dois`, all in `style`.
pub async fn collect_citations<S, F>(
    source: &S,
    dois: &[String],
    style: CitationStyle,
    policy: DuplicateKeyPolicy,
    on_progress: F,
) -> CitationTable
where
    S: CitationSource + ?Sized,
    F: FnMut(f64),
{
    collect_citations_with_stats(source, dois, style, policy, on_progress)
        .await
        .0
}

/// Same as [`collect_citations`], also returning run counters.
pub async fn collect_citations_with_stats<S, F>(
    source: &S,
    dois: &[String],
    style: CitationStyle,
    policy: DuplicateKeyPolicy,
    on_progress: F,
) -> (CitationTable, FetchStats)
where
    S: CitationSource + ?Sized,
    F: FnMut(f64),
{
    let requests = CitationRequest::batch(dois.iter().cloned(), style);
    let (raw, stats) = fetch_citations_with_stats(source, &requests, on_progress).await;
    let normalized = Normalizer::new(policy).normalize(&raw);
    (CitationTable::new(normalized), stats)
}
