//! `_index.md`: the entry page of a document folder.
//!
//! Written once, on the first run that sees the document; later runs leave it
//! alone so hand edits survive. The file is assembled under a temporary
//! name and only moved into place once complete, so a run that fails midway
//! leaves no `_index.md` behind. It holds the frontmatter, a link to the PDF
//! copy and, per page, links to the images exported from that page.

use crate::decoder::PdfSource;
use crate::error::PdrefError;
use crate::frontmatter::Frontmatter;
use crate::pipeline::images::{write_page_images, ImageOptions, ImageSummary};
use chrono::NaiveDate;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

pub const INDEX_FILE: &str = "_index.md";

/// Write `<folder>/_index.md` unless it already exists.
///
/// Returns the image counters when the file was written, `None` when an
/// existing index was kept.
pub fn write_index(
    source: &dyn PdfSource,
    folder: &Path,
    slug: &str,
    options: ImageOptions,
    today: NaiveDate,
) -> Result<Option<ImageSummary>, PdrefError> {
    let path = folder.join(INDEX_FILE);
    let write_failed = |source: io::Error| PdrefError::WriteFailed {
        path: path.clone(),
        source,
    };

    if path.exists() {
        debug!("{} exists, keeping it", path.display());
        return Ok(None);
    }

    // Dropped (and deleted) on any early return below.
    let partial = NamedTempFile::new_in(folder).map_err(write_failed)?;
    let mut out = BufWriter::new(partial);

    let meta = source.metadata();
    let title = meta.title.clone().unwrap_or_else(|| slug.to_string());
    let frontmatter = Frontmatter::new(title, today)
        .author(meta.author.clone().unwrap_or_default())
        .keys(meta.keys())
        .top_level(true);

    out.write_all(frontmatter.render().as_bytes())
        .map_err(write_failed)?;
    write!(out, "\n\n[PDF]({}.pdf)\n", slug).map_err(write_failed)?;

    let mut summary = ImageSummary::default();
    for index in 0..source.page_count() {
        let page = index + 1;
        write!(out, "\n## Page {}\n", page).map_err(write_failed)?;

        let images = source.images(index)?;
        summary += write_page_images(&mut out, folder, slug, page, images, options)
            .map_err(write_failed)?;
    }

    let partial = out
        .into_inner()
        .map_err(|e| write_failed(e.into_error()))?;
    match partial.persist_noclobber(&path) {
        Ok(_) => {}
        Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => {
            debug!("{} appeared meanwhile, keeping it", path.display());
            return Ok(None);
        }
        Err(e) => return Err(write_failed(e.error)),
    }

    debug!(
        "Wrote {} ({} images saved)",
        path.display(),
        summary.saved
    );
    Ok(Some(summary))
}
