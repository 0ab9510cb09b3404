//! Progress-callback trait for per-document crawl events.
//!
//! Inject an [`Arc<dyn CrawlProgressCallback>`] via
//! [`crate::config::CrawlConfigBuilder::progress_callback`] to receive
//! events as the crawler discovers and processes documents. This is the only
//! user-facing output channel of the library; nothing writes to stdout.
//!
//! # Example
//!
//! ```rust
//! use pdref::{CrawlConfig, CrawlProgressCallback};
//! use std::path::Path;
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     seen: AtomicUsize,
//! }
//!
//! impl CrawlProgressCallback for CountingCallback {
//!     fn on_document_start(&self, path: &Path) {
//!         self.seen.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("{}", path.display());
//!     }
//! }
//!
//! let config = CrawlConfig::builder("refs", "notes")
//!     .progress_callback(Arc::new(CountingCallback { seen: AtomicUsize::new(0) }))
//!     .build()
//!     .unwrap();
//! ```

use crate::output::{CrawlReport, DocumentReport};
use std::path::Path;
use std::sync::Arc;

/// Called by the crawler as it walks the source folder.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Events arrive sequentially from the calling thread.
pub trait CrawlProgressCallback: Send + Sync {
    /// Called once before the walk starts.
    fn on_crawl_start(&self, source_dir: &Path, output_dir: &Path) {
        let _ = (source_dir, output_dir);
    }

    /// Called instead of any document events when the source folder is absent.
    fn on_source_missing(&self, source_dir: &Path) {
        let _ = source_dir;
    }

    /// Called when a PDF passes the filters, before it is copied or opened.
    fn on_document_start(&self, path: &Path) {
        let _ = path;
    }

    /// Called when a document's notes were written.
    fn on_document_complete(&self, report: &DocumentReport) {
        let _ = report;
    }

    /// Called when a document failed; the crawl continues with the next one.
    ///
    /// # Arguments
    /// * `path` : source PDF
    /// * `error`: human-readable error description
    fn on_document_error(&self, path: &Path, error: &str) {
        let _ = (path, error);
    }

    /// Called once after the walk finished.
    fn on_crawl_complete(&self, report: &CrawlReport) {
        let _ = report;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl CrawlProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::CrawlConfig`].
pub type ProgressCallback = Arc<dyn CrawlProgressCallback>;
