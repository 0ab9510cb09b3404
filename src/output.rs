//! Run results returned by [`crate::crawl::crawl`].
//!
//! Reports are plain data: the notes themselves live on disk, these structs
//! only say what happened so a caller (or `pdref --json`) can summarise a
//! run without re-reading the output folder.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// What happened to one source document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentReport {
    /// Absolute path of the source PDF.
    pub source: PathBuf,
    /// Slug derived from the file stem; names the folder and the PDF copy.
    pub slug: String,
    /// `<output_dir>/<slug>`.
    pub folder: PathBuf,
    /// `true` when this run created the PDF copy.
    pub copied: bool,
    /// `true` when this run wrote `_index.md`; `false` when it already existed.
    pub index_created: bool,
    /// Notes file appended to by this run.
    pub notes_path: PathBuf,
    /// Pages in the document.
    pub pages: usize,
    /// Annotations visited across all pages.
    pub annotations: usize,
    /// Blockquote excerpts written for markup annotations.
    pub excerpts: usize,
    /// Excerpts dropped because they could not be written.
    pub excerpts_failed: usize,
    /// Images written as PNG (index creation runs only).
    pub images_saved: usize,
    /// Images below the size hint.
    pub images_skipped: usize,
    /// Images that failed to decode, convert or write.
    pub images_failed: usize,
}

/// Outcome of one [`crate::crawl::crawl`] call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CrawlReport {
    /// `true` when the source folder did not exist; nothing else ran.
    pub source_missing: bool,
    /// PDF files found by the walk, before date filtering.
    pub discovered: usize,
    /// Documents excluded by the modification-time cutoff.
    pub skipped_by_date: usize,
    /// Documents that failed; each failure was logged and skipped.
    pub failed: usize,
    /// Reports for successfully processed documents, in walk order.
    pub documents: Vec<DocumentReport>,
}

impl CrawlReport {
    /// Number of documents processed successfully.
    pub fn processed(&self) -> usize {
        self.documents.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_serialises_to_json() {
        let report = CrawlReport {
            discovered: 2,
            skipped_by_date: 1,
            documents: vec![DocumentReport {
                slug: "paper".into(),
                pages: 3,
                ..Default::default()
            }],
            ..Default::default()
        };
        let json = serde_json::to_string(&report).expect("serialise");
        assert!(json.contains("\"slug\":\"paper\""), "got: {json}");
        assert_eq!(report.processed(), 1);
    }
}
