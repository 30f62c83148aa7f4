//! Exporting citation tables as CSV.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::path::Path;

use crate::models::CITATION_COLUMN;

/// File name offered for downloads
pub const DEFAULT_FILENAME: &str = "citations.csv";

/// Errors raised while writing or re-reading an export
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Export has no 'Citation' column")]
    MissingCitationColumn,
}

/// Render citations as a one-column CSV document
pub fn to_csv(citations: &[String]) -> Result<String, ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record([CITATION_COLUMN])?;
    for citation in citations {
        writer.write_record([citation.as_str()])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Io(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Write citations to `path` as CSV
pub fn write_csv(path: &Path, citations: &[String]) -> Result<(), ExportError> {
    let document = to_csv(citations)?;
    std::fs::write(path, document)?;
    tracing::info!("Wrote {} citations to {}", citations.len(), path.display());
    Ok(())
}

/// Parse an exported CSV back into citations
pub fn read_csv(content: &str) -> Result<Vec<String>, ExportError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(content.as_bytes());

    let column = reader
        .headers()?
        .iter()
        .position(|h| h == CITATION_COLUMN)
        .ok_or(ExportError::MissingCitationColumn)?;

    let mut citations = Vec::new();
    for record in reader.records() {
        let record = record?;
        citations.push(record.get(column).unwrap_or_default().to_string());
    }
    Ok(citations)
}

/// Read an exported CSV file
pub fn read_csv_file(path: &Path) -> Result<Vec<String>, ExportError> {
    let content = std::fs::read_to_string(path)?;
    read_csv(&content)
}

/// Encode a CSV document as a `data:` URI
pub fn data_uri(csv: &str) -> String {
    format!("data:file/csv;base64,{}", STANDARD.encode(csv.as_bytes()))
}

/// HTML anchor that downloads `csv` as [`DEFAULT_FILENAME`]
pub fn download_link(csv: &str) -> String {
    format!(
        "<a href=\"{}\" download=\"{}\">Download CSV File</a>",
        data_uri(csv),
        DEFAULT_FILENAME
    )
}
