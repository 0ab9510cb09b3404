//! Configuration for a crawl.
//!
//! Every recognised option lives in [`CrawlConfig`], built via its
//! [`CrawlConfigBuilder`]. There are deliberately few knobs: where to look,
//! where to write, an optional modification-time cutoff, an optional image
//! size hint and a debug switch.

use crate::error::PdrefError;
use crate::progress::ProgressCallback;
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Configuration for a crawl over a folder of PDFs.
///
/// # Example
/// ```rust
/// use pdref::CrawlConfig;
///
/// let config = CrawlConfig::builder("refs", "notes")
///     .modified_after_str("2024-01-31")
///     .image_size_hint(64 * 64)
///     .build()
///     .unwrap();
/// assert!(config.modified_after.is_some());
/// ```
#[derive(Clone, Serialize)]
pub struct CrawlConfig {
    /// Folder walked recursively for `*.pdf` files.
    pub source_dir: PathBuf,

    /// Folder receiving one sub-folder per document. Created (one level) if
    /// missing.
    pub output_dir: PathBuf,

    /// Only documents modified strictly after this local time are processed.
    /// `None` processes everything.
    pub modified_after: Option<NaiveDateTime>,

    /// Minimum image area in pixels. Smaller images are not exported; they
    /// are usually bullets, logos or rules rather than figures. `None`
    /// exports every image.
    pub image_size_hint: Option<u64>,

    /// Write a description block (dimensions, colorspace, …) above every
    /// exported image in `_index.md`. Default: false.
    pub debug: bool,

    /// Receives per-document progress events. Default: none.
    #[serde(skip)]
    pub progress_callback: Option<ProgressCallback>,
}

impl fmt::Debug for CrawlConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CrawlConfig")
            .field("source_dir", &self.source_dir)
            .field("output_dir", &self.output_dir)
            .field("modified_after", &self.modified_after)
            .field("image_size_hint", &self.image_size_hint)
            .field("debug", &self.debug)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn CrawlProgressCallback>"),
            )
            .finish()
    }
}

impl CrawlConfig {
    /// Create a new builder for `CrawlConfig`.
    pub fn builder(
        source_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
    ) -> CrawlConfigBuilder {
        CrawlConfigBuilder {
            config: Self {
                source_dir: source_dir.into(),
                output_dir: output_dir.into(),
                modified_after: None,
                image_size_hint: None,
                debug: false,
                progress_callback: None,
            },
        }
    }

    /// Whether a file modified at `mtime` passes the cutoff.
    pub fn accepts_mtime(&self, mtime: NaiveDateTime) -> bool {
        match self.modified_after {
            Some(cutoff) => mtime > cutoff,
            None => true,
        }
    }
}

/// Builder for [`CrawlConfig`].
pub struct CrawlConfigBuilder {
    config: CrawlConfig,
}

impl fmt::Debug for CrawlConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CrawlConfigBuilder")
            .field("config", &self.config)
            .finish()
    }
}

impl CrawlConfigBuilder {
    pub fn modified_after(mut self, cutoff: Option<NaiveDateTime>) -> Self {
        self.config.modified_after = cutoff;
        self
    }

    /// Set the cutoff from user input. Malformed input disables the filter.
    pub fn modified_after_str(mut self, input: &str) -> Self {
        self.config.modified_after = parse_cutoff(input);
        self
    }

    pub fn image_size_hint(mut self, min_pixels: u64) -> Self {
        self.config.image_size_hint = Some(min_pixels);
        self
    }

    pub fn debug(mut self, v: bool) -> Self {
        self.config.debug = v;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<CrawlConfig, PdrefError> {
        let c = &self.config;
        if is_blank(&c.source_dir) {
            return Err(PdrefError::InvalidConfig(
                "Please select a folder to look for references".into(),
            ));
        }
        if is_blank(&c.output_dir) {
            return Err(PdrefError::InvalidConfig(
                "Please set an output folder".into(),
            ));
        }
        Ok(self.config)
    }
}

fn is_blank(path: &Path) -> bool {
    path.as_os_str().to_string_lossy().trim().is_empty()
}

/// Parse an ISO-8601 date or date-time as a local naive timestamp.
///
/// Accepts `YYYY-MM-DD` (midnight), `YYYY-MM-DD[T ]HH:MM[:SS[.fff]]` and
/// RFC 3339 with an offset (converted to local time). Anything else yields
/// `None`, which callers treat as "no cutoff".
pub fn parse_cutoff(input: &str) -> Option<NaiveDateTime> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Local).naive_local());
    }

    const FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ];
    for fmt in FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn ymd_hms(y: i32, m: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_time(NaiveTime::from_hms_opt(h, mi, s).unwrap())
    }

    #[test]
    fn parses_date_only_as_midnight() {
        assert_eq!(parse_cutoff("2023-04-05"), Some(ymd_hms(2023, 4, 5, 0, 0, 0)));
    }

    #[test]
    fn parses_date_time_variants() {
        let want = ymd_hms(2023, 4, 5, 13, 30, 0);
        assert_eq!(parse_cutoff("2023-04-05T13:30:00"), Some(want));
        assert_eq!(parse_cutoff("2023-04-05 13:30"), Some(want));
        assert_eq!(parse_cutoff("  2023-04-05T13:30  "), Some(want));
    }

    #[test]
    fn malformed_cutoff_is_none() {
        assert_eq!(parse_cutoff(""), None);
        assert_eq!(parse_cutoff("yesterday"), None);
        assert_eq!(parse_cutoff("2023-13-45"), None);
        assert_eq!(parse_cutoff("05/04/2023"), None);
    }

    #[test]
    fn builder_disables_filter_on_bad_input() {
        let config = CrawlConfig::builder("refs", "notes")
            .modified_after_str("not a date")
            .build()
            .unwrap();
        assert!(config.modified_after.is_none());
        assert!(config.accepts_mtime(ymd_hms(1999, 1, 1, 0, 0, 0)));
    }

    #[test]
    fn cutoff_is_strict() {
        let cutoff = ymd_hms(2023, 4, 5, 0, 0, 0);
        let config = CrawlConfig::builder("refs", "notes")
            .modified_after(Some(cutoff))
            .build()
            .unwrap();
        assert!(!config.accepts_mtime(cutoff));
        assert!(config.accepts_mtime(ymd_hms(2023, 4, 5, 0, 0, 1)));
        assert!(!config.accepts_mtime(ymd_hms(2023, 4, 4, 23, 59, 59)));
    }

    #[test]
    fn empty_paths_are_rejected() {
        assert!(matches!(
            CrawlConfig::builder("", "notes").build(),
            Err(PdrefError::InvalidConfig(_))
        ));
        assert!(matches!(
            CrawlConfig::builder("refs", "  ").build(),
            Err(PdrefError::InvalidConfig(_))
        ));
    }

    #[test]
    fn defaults() {
        let config = CrawlConfig::builder("refs", "notes").build().unwrap();
        assert!(!config.debug);
        assert!(config.image_size_hint.is_none());
        assert!(config.progress_callback.is_none());
    }
}
