//! Repair of mis-decoded characters in citation text.
//!
//! CrossCite sometimes delivers text whose UTF-8 was decoded as a legacy
//! code page and re-encoded, so a single character arrives as a run of
//! Latin-1 looking characters ("mojibake"). The repair is a fixed, ordered
//! table of literal replacements. Bytes that are not UTF-8 at all are
//! dropped when the response is decoded, see [`decode_dropping_invalid`].

use serde::{Deserialize, Serialize};

/// Known corrupted sequences and their intended text, in application order.
///
/// Entry 6 and entry 8 share a key. How that is resolved depends on
/// [`DuplicateKeyPolicy`].
pub const SUBSTITUTIONS: [(&str, &str); 14] = [
    // left double quotation mark
    ("\u{C3}\u{A2}\u{C2}\u{20AC}\u{C2}\u{153}", "\""),
    // right double quotation mark
    ("\u{C3}\u{A2}\u{C2}\u{20AC}\u{C2}\u{9D}", "\""),
    ("\u{E2}\u{80}\u{9C}", "\""),
    ("\u{E2}\u{80}\u{9D}", "\""),
    // apostrophe
    ("\u{C3}\u{A2}\u{C2}\u{20AC}\u{C2}\u{2122}", "'"),
    // en dash
    ("\u{C3}\u{A2}\u{C2}\u{20AC}\u{C2}\u{201C}", "\u{2013}"),
    // ellipsis
    ("\u{C3}\u{A2}\u{C2}\u{20AC}\u{C2}\u{A6}", "..."),
    // hyphen, same key as the en dash
    ("\u{C3}\u{A2}\u{C2}\u{20AC}\u{C2}\u{201C}", "-"),
    // ó
    ("\u{C3}\u{192}\u{C2}\u{B3}", "\u{F3}"),
    // à
    ("\u{C3}\u{192}\u{C2}", "\u{E0}"),
    // ś
    ("\u{C3}\u{2026}\u{C2}\u{203A}", "\u{15B}"),
    // ź
    ("\u{C3}\u{2026}\u{C2}\u{BA}", "\u{17A}"),
    // stray Â
    ("\u{C3}\u{201A}\u{C2}", "\u{C2}"),
    // ş
    ("\u{C3}\u{2026}\u{C2}\u{178}", "\u{15F}"),
];

/// How repeated keys in [`SUBSTITUTIONS`] are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicateKeyPolicy {
    /// Apply every entry in order; a repeated key runs again on text the
    /// earlier entry already rewrote, so its first replacement sticks.
    Sequential,
    /// Keyed-map semantics: a repeated key keeps the position of its first
    /// occurrence and the replacement of its last.
    #[default]
    LastWins,
}

impl std::str::FromStr for DuplicateKeyPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sequential" => Ok(DuplicateKeyPolicy::Sequential),
            "last-wins" | "last_wins" => Ok(DuplicateKeyPolicy::LastWins),
            other => Err(format!(
                "unknown duplicate key policy '{other}' (expected 'sequential' or 'last-wins')"
            )),
        }
    }
}

/// Citation text normalizer
#[derive(Debug, Clone)]
pub struct Normalizer {
    table: Vec<(&'static str, &'static str)>,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(DuplicateKeyPolicy::default())
    }
}

impl Normalizer {
    /// Build a normalizer over [`SUBSTITUTIONS`]
    pub fn new(policy: DuplicateKeyPolicy) -> Self {
        let table = match policy {
            DuplicateKeyPolicy::Sequential => SUBSTITUTIONS.to_vec(),
            DuplicateKeyPolicy::LastWins => collapse_duplicate_keys(&SUBSTITUTIONS),
        };
        Self { table }
    }

    /// The effective substitution table
    pub fn table(&self) -> &[(&'static str, &'static str)] {
        &self.table
    }

    /// Normalize one citation
    pub fn normalize_citation(&self, citation: &str) -> String {
        let mut text = citation.to_string();
        for (corrupted, replacement) in &self.table {
            if text.contains(corrupted) {
                text = text.replace(corrupted, replacement);
            }
        }
        text
    }

    /// Normalize every citation, keeping order
    pub fn normalize(&self, citations: &[String]) -> Vec<String> {
        citations
            .iter()
            .map(|citation| self.normalize_citation(citation))
            .collect()
    }
}

/// Normalize citations with the default policy
pub fn normalize(citations: &[String]) -> Vec<String> {
    Normalizer::default().normalize(citations)
}

/// Normalize one citation with the default policy
pub fn normalize_citation(citation: &str) -> String {
    Normalizer::default().normalize_citation(citation)
}

/// Decode raw bytes, dropping sequences that are not valid UTF-8
///
/// A U+FFFD that was actually sent as text is kept.
pub fn decode_dropping_invalid(bytes: &[u8]) -> String {
    let mut text = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        text.push_str(chunk.valid());
    }
    text
}

fn collapse_duplicate_keys(
    table: &[(&'static str, &'static str)],
) -> Vec<(&'static str, &'static str)> {
    let mut collapsed: Vec<(&'static str, &'static str)> = Vec::with_capacity(table.len());
    for &(key, value) in table {
        match collapsed.iter_mut().find(|(existing, _)| *existing == key) {
            Some(entry) => entry.1 = value,
            None => collapsed.push((key, value)),
        }
    }
    collapsed
}
