//! File input and output.
//!
//! - [`read_dois`]: read the `DOI` column of a CSV, TSV, text or JSON file
//! - [`to_csv`] / [`write_csv`]: export citations as a single `Citation` column
//! - [`data_uri`] / [`download_link`]: embed an export in a link

mod export;
mod input;

pub use export::{
    data_uri, download_link, read_csv, read_csv_file, to_csv, write_csv, ExportError,
    DEFAULT_FILENAME,
};
pub use input::{parse_dois, read_dois, InputError, InputFormat, DOI_COLUMN};
