//! Sequential citation retrieval.

use crate::models::CitationRequest;
use crate::sources::CitationSource;

/// Counters describing one retrieval run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchStats {
    /// Requests handed to the retriever
    pub requested: usize,
    /// Commented-out or blank identifiers, never sent
    pub skipped: usize,
    /// Requests that were sent and failed
    pub failed: usize,
    /// Requests that produced a citation
    pub succeeded: usize,
}

/// Fetch one citation per request, in order.
///
/// `on_progress` is called exactly once per request with `(i + 1) / n`,
/// whether or not a network call was made. Commented-out (`#`) and blank
/// identifiers are skipped. Failed requests are logged and dropped, so the
/// result may be shorter than `requests`.
pub async fn fetch_citations<S, F>(
    source: &S,
    requests: &[CitationRequest],
    on_progress: F,
) -> Vec<String>
where
    S: CitationSource + ?Sized,
    F: FnMut(f64),
{
    fetch_citations_with_stats(source, requests, on_progress)
        .await
        .0
}

/// Same as [`fetch_citations`], also returning run counters.
pub async fn fetch_citations_with_stats<S, F>(
    source: &S,
    requests: &[CitationRequest],
    mut on_progress: F,
) -> (Vec<String>, FetchStats)
where
    S: CitationSource + ?Sized,
    F: FnMut(f64),
{
    let total = requests.len();
    let mut citations = Vec::with_capacity(total);
    let mut stats = FetchStats {
        requested: total,
        ..FetchStats::default()
    };

    for (index, request) in requests.iter().enumerate() {
        if request.is_comment() || request.is_blank() {
            tracing::debug!("Skipping '{}'", request.identifier);
            stats.skipped += 1;
        } else {
            match source.format_citation(request).await {
                Ok(citation) => {
                    tracing::debug!(
                        "Fetched {} citation for {}",
                        request.style,
                        request.identifier
                    );
                    citations.push(citation);
                    stats.succeeded += 1;
                }
                Err(e) => {
                    tracing::warn!(
                        "Dropping {} from {}: {}",
                        request.identifier,
                        source.name(),
                        e
                    );
                    stats.failed += 1;
                }
            }
        }

        on_progress((index + 1) as f64 / total as f64);
    }

    tracing::info!(
        "Fetched {} of {} citations ({} skipped, {} failed)",
        stats.succeeded,
        stats.requested,
        stats.skipped,
        stats.failed
    );

    (citations, stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CitationStyle;
    use crate::sources::MockSource;

    #[tokio::test]
    async fn test_comment_is_skipped_but_ticks() {
        let source = MockSource::new()
            .with_citation("10.1000/abc", "ABC.")
            .with_citation("10.1000/def", "DEF.");
        let requests =
            CitationRequest::batch(["10.1000/abc", "#skip-me", "10.1000/def"], CitationStyle::Apa);

        let mut progress = Vec::new();
        let citations = fetch_citations(&source, &requests, |f| progress.push(f)).await;

        assert_eq!(citations, vec!["ABC.", "DEF."]);
        assert_eq!(source.call_count(), 2);
        let called: Vec<String> = source.calls().into_iter().map(|r| r.identifier).collect();
        assert_eq!(called, vec!["10.1000/abc", "10.1000/def"]);
        assert_eq!(progress.len(), 3);
        assert_eq!(progress[2], 1.0);
    }

    #[tokio::test]
    async fn test_failures_are_dropped_in_order() {
        let source = MockSource::new()
            .with_citation("a", "first")
            .with_status("b", 500)
            .with_citation("c", "third");
        let requests = CitationRequest::batch(["a", "b", "c", "d"], CitationStyle::Ieee);

        let (citations, stats) = fetch_citations_with_stats(&source, &requests, |_| {}).await;

        assert_eq!(citations, vec!["first", "third"]);
        assert_eq!(
            stats,
            FetchStats {
                requested: 4,
                skipped: 0,
                failed: 2,
                succeeded: 2,
            }
        );
    }

    #[tokio::test]
    async fn test_progress_fractions() {
        let source = MockSource::new();
        let requests = CitationRequest::batch(["#a", "#b", "#c", "#d"], CitationStyle::Ieee);

        let mut progress = Vec::new();
        fetch_citations(&source, &requests, |f| progress.push(f)).await;

        assert_eq!(progress, vec![0.25, 0.5, 0.75, 1.0]);
        assert_eq!(source.call_count(), 0);
    }

    #[tokio::test]
    async fn test_blank_identifier_is_skipped() {
        let source = MockSource::new().with_citation("x", "X.");
        let requests = CitationRequest::batch(["", "x", "   "], CitationStyle::Apa);

        let (citations, stats) = fetch_citations_with_stats(&source, &requests, |_| {}).await;

        assert_eq!(citations, vec!["X."]);
        assert_eq!(stats.skipped, 2);
        assert_eq!(source.call_count(), 1);
    }

    #[tokio::test]
    async fn test_empty_input() {
        let source = MockSource::new();
        let mut calls = 0;
        let citations = fetch_citations(&source, &[], |_| calls += 1).await;
        assert!(citations.is_empty());
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_style_is_forwarded() {
        let source = MockSource::new().with_citation("10.1/x", "X.");
        let requests = CitationRequest::batch(["10.1/x"], CitationStyle::Vancouver);

        let citations = tokio_test::block_on(fetch_citations(&source, &requests, |_| {}));

        assert_eq!(citations.len(), 1);
        assert_eq!(source.calls()[0].style, CitationStyle::Vancouver);
    }
}
