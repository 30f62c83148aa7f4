//! Progress tracking for citation runs.
//!
//! The retriever reports progress as a fraction in `0.0..=1.0`. A
//! [`ProgressReporter`] turns those fractions into an indicatif bar on the
//! terminal, or tracks them silently when quiet.
//!
//! # Usage
//!
//! ```ignore
//! use citation_fetcher::utils::ProgressReporter;
//!
//! let reporter = ProgressReporter::new("Fetching citations", 3);
//! reporter.update(1.0 / 3.0);
//! reporter.update(2.0 / 3.0);
//! reporter.update(1.0);
//! reporter.finish();
//! ```

use indicatif::{ProgressBar, ProgressStyle};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Progress reporter with optional terminal output
///
/// Uses atomic counters so clones can be moved into progress callbacks.
#[derive(Debug, Clone)]
pub struct ProgressReporter {
    /// Name of the operation being tracked
    name: String,

    /// Total units of work
    total: usize,

    /// Number of progress updates received
    ticks: Arc<AtomicUsize>,

    /// Latest reported fraction, in thousandths
    permille: Arc<AtomicUsize>,

    /// Start time for the final rate line
    start_time: Instant,

    bar: ProgressBar,
}

impl ProgressReporter {
    /// Create a reporter that draws a progress bar
    ///
    /// - `name`: Description of the operation
    /// - `total`: Total number of units of work
    pub fn new(name: &str, total: usize) -> Self {
        let bar = ProgressBar::new(total as u64);
        if let Ok(style) = ProgressStyle::with_template(
            "{msg}: {bar:40.cyan/blue} {pos}/{len} ({percent}%) [{elapsed_precise}]",
        ) {
            bar.set_style(style.progress_chars("█▓▒░ "));
        }
        bar.set_message(name.to_string());
        Self::with_bar(name, total, bar)
    }

    /// Create a quiet reporter that doesn't output anything
    pub fn quiet(name: &str, total: usize) -> Self {
        Self::with_bar(name, total, ProgressBar::hidden())
    }

    fn with_bar(name: &str, total: usize, bar: ProgressBar) -> Self {
        Self {
            name: name.to_string(),
            total,
            ticks: Arc::new(AtomicUsize::new(0)),
            permille: Arc::new(AtomicUsize::new(0)),
            start_time: Instant::now(),
            bar,
        }
    }

    /// Record a progress fraction
    ///
    /// Values outside `0.0..=1.0` are clamped.
    pub fn update(&self, fraction: f64) {
        let fraction = fraction.clamp(0.0, 1.0);
        self.ticks.fetch_add(1, Ordering::SeqCst);
        self.permille
            .store((fraction * 1000.0).round() as usize, Ordering::SeqCst);

        let position = (fraction * self.total as f64).round() as u64;
        self.bar.set_position(position);
    }

    /// Finish the bar and log the final stats
    pub fn finish(&self) {
        self.bar.finish_and_clear();
        let elapsed = self.start_time.elapsed();
        tracing::debug!(
            "{}: {} updates over {} items, {:.0}% done in {:?}",
            self.name,
            self.ticks(),
            self.total,
            self.fraction() * 100.0,
            elapsed
        );
    }

    /// Number of updates received so far
    pub fn ticks(&self) -> usize {
        self.ticks.load(Ordering::SeqCst)
    }

    /// Latest reported fraction
    pub fn fraction(&self) -> f64 {
        self.permille.load(Ordering::SeqCst) as f64 / 1000.0
    }

    /// Returns a callback suitable for the retriever
    pub fn callback(&self) -> impl FnMut(f64) + Send + 'static {
        let reporter = self.clone();
        move |fraction| reporter.update(fraction)
    }
}
