//! Source discovery: every `*.pdf` below the source folder.
//!
//! Entries are visited sorted by file name so two runs over the same tree
//! process documents in the same order. Symlinks are not followed.

use chrono::{DateTime, Local, NaiveDateTime};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Whether `path` names a PDF. The extension must be exactly `pdf`.
pub fn is_pdf(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "pdf")
}

/// Absolute paths of all PDF files below `source_dir`, in walk order.
///
/// Unreadable entries are logged and skipped.
pub fn discover(source_dir: &Path) -> Vec<PathBuf> {
    let mut found = Vec::new();

    for entry in WalkDir::new(source_dir)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };

        if !entry.file_type().is_file() || !is_pdf(entry.path()) {
            continue;
        }

        let path = std::path::absolute(entry.path()).unwrap_or_else(|_| entry.path().to_path_buf());
        debug!("Found {}", path.display());
        found.push(path);
    }

    found
}

/// The file's modification time in local wall-clock time.
pub fn modified_local(path: &Path) -> io::Result<NaiveDateTime> {
    let modified = std::fs::metadata(path)?.modified()?;
    Ok(DateTime::<Local>::from(modified).naive_local())
}
