//! Utility modules supporting citation runs.
//!
//! - [`HttpClient`]: HTTP client with bounded timeouts
//! - [`ProgressReporter`]: fraction-based progress with an optional terminal bar
//!
//! # HTTP Client
//!
//! ```rust,no_run
//! use citation_fetcher::utils::HttpClient;
//! use std::time::Duration;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpClient::builder()
//!     .timeout(Duration::from_secs(10))
//!     .build()?;
//! let response = client.get("https://citation.crosscite.org").send().await?;
//! # Ok(())
//! # }
//! ```

mod http;
mod progress;

pub use http::{
    default_user_agent, HttpClient, HttpClientBuilder, DEFAULT_CONNECT_TIMEOUT, DEFAULT_TIMEOUT,
};
pub use progress::ProgressReporter;
