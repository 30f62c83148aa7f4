//! Integration tests for Citation Fetcher
//!
//! These tests drive the full DOI list -> citations -> CSV path through the
//! public library API, against the mock source and a local mock server.

use citation_fetcher::io::{data_uri, parse_dois, read_csv, read_dois, to_csv, write_csv, InputFormat};
use citation_fetcher::models::CitationStyle;
use citation_fetcher::pipeline::{collect_citations, collect_citations_with_stats, DuplicateKeyPolicy};
use citation_fetcher::sources::{CitationSource, CrossCiteSource, MockSource};
use citation_fetcher::utils::HttpClient;
use mockito::Matcher;
use std::sync::Arc;
use std::time::Duration;

fn dois(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn crosscite_for(server: &mockito::ServerGuard) -> CrossCiteSource {
    let client = HttpClient::builder()
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap();
    CrossCiteSource::with_client(Arc::new(client)).base_url(server.url())
}

#[tokio::test]
async fn test_comment_rows_are_skipped_end_to_end() {
    let source = MockSource::new()
        .with_citation("10.1000/a", "A. Author, \u{E2}\u{80}\u{9C}Title,\u{E2}\u{80}\u{9D} 2020.")
        .with_citation("10.1000/b", "B. Author, Another Title, 2021.");

    let mut fractions = Vec::new();
    let table = collect_citations(
        &source,
        &dois(&["10.1000/a", "#skip-me", "10.1000/b"]),
        CitationStyle::Ieee,
        DuplicateKeyPolicy::LastWins,
        |f| fractions.push(f),
    )
    .await;

    assert_eq!(table.len(), 2);
    assert_eq!(table.citations()[0], "A. Author, \"Title,\" 2020.");
    assert_eq!(table.citations()[1], "B. Author, Another Title, 2021.");
    assert_eq!(source.call_count(), 2);
    assert_eq!(fractions.len(), 3);
    assert_eq!(fractions.last().copied(), Some(1.0));
}

#[tokio::test]
async fn test_table_never_exceeds_input() {
    let source = MockSource::new()
        .with_citation("10.1/ok", "Fine.")
        .with_status("10.1/gone", 404)
        .with_status("10.1/broken", 500);

    let input = dois(&["10.1/ok", "10.1/gone", "10.1/broken", "10.1/unknown", ""]);
    let (table, stats) = collect_citations_with_stats(
        &source,
        &input,
        CitationStyle::Apa,
        DuplicateKeyPolicy::LastWins,
        |_| {},
    )
    .await;

    assert!(table.len() <= input.len());
    assert_eq!(table.len(), 1);
    assert_eq!(stats.requested, 5);
    assert_eq!(stats.skipped, 1);
    assert_eq!(stats.failed, 3);
    assert_eq!(stats.succeeded, 1);
}

#[tokio::test]
async fn test_progress_is_monotonic() {
    let source = MockSource::new();
    let input = dois(&["10.1/a", "#c", "10.1/b", "10.1/c", "10.1/d", "10.1/e", "10.1/f"]);

    let mut fractions = Vec::new();
    collect_citations(
        &source,
        &input,
        CitationStyle::Vancouver,
        DuplicateKeyPolicy::LastWins,
        |f| fractions.push(f),
    )
    .await;

    assert_eq!(fractions.len(), input.len());
    assert!(fractions.windows(2).all(|w| w[0] < w[1]));
    assert!(fractions.iter().all(|f| *f > 0.0 && *f <= 1.0));
    assert_eq!(fractions.last().copied(), Some(1.0));
}

#[tokio::test]
async fn test_style_applies_to_every_request() {
    let source = MockSource::new();
    collect_citations(
        &source,
        &dois(&["10.1/a", "10.1/b"]),
        CitationStyle::ModernLanguageAssociation,
        DuplicateKeyPolicy::LastWins,
        |_| {},
    )
    .await;

    let calls = source.calls();
    assert_eq!(calls.len(), 2);
    assert!(calls
        .iter()
        .all(|c| c.style == CitationStyle::ModernLanguageAssociation));
}

#[tokio::test]
async fn test_file_to_csv_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let input_path = dir.path().join("dois.csv");
    std::fs::write(&input_path, "Title,DOI\nFirst,10.1/a\nSecond,10.1/b\n").unwrap();

    let source = MockSource::new()
        .with_citation("10.1/a", "Smith, J. (2020). First, with comma.")
        .with_citation("10.1/b", "Jones, K. (2021). Second.");

    let input = read_dois(&input_path).unwrap();
    let table = collect_citations(
        &source,
        &input,
        CitationStyle::Apa,
        DuplicateKeyPolicy::LastWins,
        |_| {},
    )
    .await;

    let out_path = dir.path().join("citations.csv");
    write_csv(&out_path, table.citations()).unwrap();

    let written = std::fs::read_to_string(&out_path).unwrap();
    assert!(written.starts_with("Citation\n"));
    assert_eq!(read_csv(&written).unwrap(), table.citations());
}

#[test]
fn test_data_uri_embeds_export() {
    let csv = to_csv(&["A".to_string()]).unwrap();
    assert_eq!(data_uri(&csv), "data:file/csv;base64,Q2l0YXRpb24KQQo=");
}

#[test]
fn test_json_and_tsv_inputs_agree() {
    let from_json = parse_dois(r#"[{"DOI": "10.1/a"}, {"DOI": "10.1/b"}]"#, InputFormat::Json).unwrap();
    let from_tsv = parse_dois("DOI\tTitle\n10.1/a\tx\n10.1/b\ty\n", InputFormat::Tsv).unwrap();
    assert_eq!(from_json, from_tsv);
}

#[tokio::test]
async fn test_crosscite_end_to_end() {
    let mut server = mockito::Server::new_async().await;

    let found = server
        .mock("GET", "/format")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("doi".into(), "10.1000/found".into()),
            Matcher::UrlEncoded("style".into(), "ieee".into()),
            Matcher::UrlEncoded("lang".into(), "en-US".into()),
        ]))
        .with_status(200)
        .with_body("J. Doe, \u{C3}\u{A2}\u{C2}\u{20AC}\u{C2}\u{153}A study,\u{C3}\u{A2}\u{C2}\u{20AC}\u{C2}\u{9D} 2019.")
        .expect(1)
        .create_async()
        .await;

    let missing = server
        .mock("GET", "/format")
        .match_query(Matcher::UrlEncoded("doi".into(), "10.1000/missing".into()))
        .with_status(404)
        .expect(1)
        .create_async()
        .await;

    let source = crosscite_for(&server);
    assert_eq!(source.id(), "crosscite");

    let (table, stats) = collect_citations_with_stats(
        &source,
        &dois(&["10.1000/found", "# 10.1000/commented", "10.1000/missing"]),
        CitationStyle::Ieee,
        DuplicateKeyPolicy::LastWins,
        |_| {},
    )
    .await;

    found.assert_async().await;
    missing.assert_async().await;

    assert_eq!(table.citations(), ["J. Doe, \"A study,\" 2019.".to_string()]);
    assert_eq!(stats.skipped, 1);
    assert_eq!(stats.failed, 1);
}

#[tokio::test]
async fn test_crosscite_invalid_bytes_are_dropped() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/format")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(b"Caf\xe9 Title.".to_vec())
        .create_async()
        .await;

    let source = crosscite_for(&server);
    let table = collect_citations(
        &source,
        &dois(&["10.1/x"]),
        CitationStyle::Apa,
        DuplicateKeyPolicy::LastWins,
        |_| {},
    )
    .await;

    assert_eq!(table.citations(), ["Caf Title.".to_string()]);
}

#[tokio::test]
async fn test_unreachable_service_is_skipped_like_a_failed_status() {
    let client = HttpClient::builder()
        .timeout(Duration::from_secs(2))
        .connect_timeout(Duration::from_secs(1))
        .build()
        .unwrap();
    let source = CrossCiteSource::with_client(Arc::new(client)).base_url("http://127.0.0.1:1");

    let mut fractions = Vec::new();
    let (table, stats) = collect_citations_with_stats(
        &source,
        &dois(&["10.1/a", "#x"]),
        CitationStyle::Apa,
        DuplicateKeyPolicy::default(),
        |f| fractions.push(f),
    )
    .await;

    assert!(table.is_empty());
    assert_eq!(stats.failed, 1);
    assert_eq!(stats.skipped, 1);
    assert_eq!(fractions, vec![0.5, 1.0]);
}

#[tokio::test]
async fn test_default_policy_turns_corrupted_dash_into_hyphen() {
    let source = MockSource::new().with_citation(
        "10.1/pages",
        "Journal, 4, pp. 10\u{C3}\u{A2}\u{C2}\u{20AC}\u{C2}\u{201C}20.",
    );

    let table = collect_citations(
        &source,
        &dois(&["10.1/pages"]),
        CitationStyle::Ieee,
        DuplicateKeyPolicy::default(),
        |_| {},
    )
    .await;

    assert_eq!(table.citations(), ["Journal, 4, pp. 10-20.".to_string()]);
}
