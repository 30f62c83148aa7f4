//! Reading DOI lists from tabular files.

use serde_json::Value;
use std::path::Path;

/// Column that holds the DOIs
pub const DOI_COLUMN: &str = "DOI";

/// File formats a DOI list can arrive in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// Comma separated values
    Csv,
    /// Tab separated values
    Tsv,
    /// Plain text, read as comma separated with a header row
    Text,
    /// JSON array of records
    Json,
    /// Excel workbooks (recognised, not readable)
    Excel,
}

impl InputFormat {
    /// Pick a format from the file extension
    pub fn from_path(path: &Path) -> Result<Self, InputError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "csv" => Ok(InputFormat::Csv),
            "tsv" => Ok(InputFormat::Tsv),
            "txt" => Ok(InputFormat::Text),
            "json" => Ok(InputFormat::Json),
            "xls" | "xlsx" => Ok(InputFormat::Excel),
            _ => Err(InputError::UnsupportedFormat(path.display().to_string())),
        }
    }

    fn delimiter(&self) -> u8 {
        match self {
            InputFormat::Tsv => b'\t',
            _ => b',',
        }
    }
}

/// Errors raised while reading a DOI list
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported input format: {0}")]
    UnsupportedFormat(String),

    #[error("Input has no 'DOI' column")]
    MissingDoiColumn,

    #[error("Malformed input: {0}")]
    Malformed(String),
}

/// Read the DOI column of the file at `path`
pub fn read_dois(path: &Path) -> Result<Vec<String>, InputError> {
    let format = InputFormat::from_path(path)?;
    if format == InputFormat::Excel {
        return Err(InputError::UnsupportedFormat(format!(
            "{} (save the sheet as CSV)",
            path.display()
        )));
    }

    let bytes = std::fs::read(path)?;
    let content = String::from_utf8_lossy(&bytes);
    let dois = parse_dois(&content, format)?;
    tracing::debug!("Read {} DOIs from {}", dois.len(), path.display());
    Ok(dois)
}

/// Extract the DOI column from `content` in the given format
///
/// Values are trimmed; row order is preserved.
pub fn parse_dois(content: &str, format: InputFormat) -> Result<Vec<String>, InputError> {
    match format {
        InputFormat::Csv | InputFormat::Tsv | InputFormat::Text => {
            parse_delimited(content, format.delimiter())
        }
        InputFormat::Json => parse_json(content),
        InputFormat::Excel => Err(InputError::UnsupportedFormat("excel".to_string())),
    }
}

fn parse_delimited(content: &str, delimiter: u8) -> Result<Vec<String>, InputError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| InputError::Malformed(e.to_string()))?;
    let column = headers
        .iter()
        .position(|h| h.trim_start_matches('\u{FEFF}').trim() == DOI_COLUMN)
        .ok_or(InputError::MissingDoiColumn)?;

    let mut dois = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| InputError::Malformed(e.to_string()))?;
        dois.push(record.get(column).unwrap_or_default().trim().to_string());
    }
    Ok(dois)
}

fn parse_json(content: &str) -> Result<Vec<String>, InputError> {
    let value: Value =
        serde_json::from_str(content).map_err(|e| InputError::Malformed(e.to_string()))?;
    let rows = value
        .as_array()
        .ok_or_else(|| InputError::Malformed("expected a JSON array of records".to_string()))?;

    let mut dois = Vec::with_capacity(rows.len());
    for row in rows {
        let record = row
            .as_object()
            .ok_or_else(|| InputError::Malformed("expected a JSON object per row".to_string()))?;
        let doi = match record.get(DOI_COLUMN) {
            Some(Value::String(s)) => s.trim().to_string(),
            Some(Value::Null) => String::new(),
            Some(other) => other.to_string(),
            None => return Err(InputError::MissingDoiColumn),
        };
        dois.push(doi);
    }
    Ok(dois)
}
