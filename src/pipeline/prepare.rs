//! Per-document folder layout: `<output>/<slug>/` holding a copy of the PDF.

use crate::error::PdrefError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A document folder ready for notes.
#[derive(Debug, Clone)]
pub struct Prepared {
    pub folder: PathBuf,
    pub pdf_copy: PathBuf,
    /// Whether the copy was made by this call.
    pub copied: bool,
}

/// Create `<output_dir>/<slug>` (one level) and copy `source` into it as
/// `<slug>.pdf`. Existing folders and copies are left untouched.
pub fn prepare_document(output_dir: &Path, slug: &str, source: &Path) -> Result<Prepared, PdrefError> {
    let folder = output_dir.join(slug);
    if !folder.exists() {
        std::fs::create_dir(&folder).map_err(|e| PdrefError::FolderCreateFailed {
            path: folder.clone(),
            source: e,
        })?;
        debug!("Created {}", folder.display());
    }

    let pdf_copy = folder.join(format!("{}.pdf", slug));
    let copied = if pdf_copy.exists() {
        false
    } else {
        std::fs::copy(source, &pdf_copy).map_err(|e| PdrefError::CopyFailed {
            from: source.to_path_buf(),
            to: pdf_copy.clone(),
            source: e,
        })?;
        true
    };

    Ok(Prepared {
        folder,
        pdf_copy,
        copied,
    })
}
