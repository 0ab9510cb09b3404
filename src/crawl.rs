//! Crawl entry points: a source folder of PDFs → a folder of Markdown notes.
//!
//! Documents are handled one at a time in walk order. A document that fails
//! (cannot be copied, opened or written) is logged, reported through the
//! progress callback and counted; the crawl then moves on. Only problems that
//! affect every document, like an output folder that cannot be created,
//! end the run with an error.

use crate::config::CrawlConfig;
use crate::decoder::PdfDecoder;
use crate::error::PdrefError;
use crate::output::{CrawlReport, DocumentReport};
use crate::pipeline::images::ImageOptions;
use crate::pipeline::{index, notes, prepare, walk};
use crate::slug::slugify;
use chrono::{DateTime, Local};
use std::path::Path;
use tracing::{debug, info, warn};

/// Slug used when a file name has no slug-able characters at all.
const FALLBACK_SLUG: &str = "untitled";

/// Crawl `config.source_dir` and write notes under `config.output_dir`.
///
/// # Returns
/// `Ok(CrawlReport)` even when individual documents failed (see
/// `report.failed`) or the source folder does not exist (see
/// `report.source_missing`).
///
/// # Errors
/// Returns `Err(PdrefError::OutputDirFailed)` when the output folder is
/// missing and cannot be created.
pub fn crawl(config: &CrawlConfig, decoder: &dyn PdfDecoder) -> Result<CrawlReport, PdrefError> {
    crawl_at(config, decoder, Local::now())
}

/// [`crawl`] with an explicit run timestamp, which names the notes files.
pub fn crawl_at(
    config: &CrawlConfig,
    decoder: &dyn PdfDecoder,
    now: DateTime<Local>,
) -> Result<CrawlReport, PdrefError> {
    let cb = config.progress_callback.as_ref();
    let mut report = CrawlReport::default();

    info!(
        "Crawling {} into {}",
        config.source_dir.display(),
        config.output_dir.display()
    );
    if let Some(cb) = cb {
        cb.on_crawl_start(&config.source_dir, &config.output_dir);
    }

    // ── Step 1: Output folder ────────────────────────────────────────────
    if !config.output_dir.exists() {
        std::fs::create_dir(&config.output_dir).map_err(|e| PdrefError::OutputDirFailed {
            path: config.output_dir.clone(),
            source: e,
        })?;
        debug!("Created {}", config.output_dir.display());
    }

    // ── Step 2: Source folder ────────────────────────────────────────────
    if !config.source_dir.exists() {
        warn!(
            "The PDFs folder {} does not exist",
            config.source_dir.display()
        );
        report.source_missing = true;
        if let Some(cb) = cb {
            cb.on_source_missing(&config.source_dir);
            cb.on_crawl_complete(&report);
        }
        return Ok(report);
    }

    // ── Step 3: Walk, filter, process ────────────────────────────────────
    for path in walk::discover(&config.source_dir) {
        report.discovered += 1;

        if config.modified_after.is_some() {
            match walk::modified_local(&path) {
                Ok(mtime) if config.accepts_mtime(mtime) => {}
                Ok(mtime) => {
                    debug!("Skipping {} (modified {})", path.display(), mtime);
                    report.skipped_by_date += 1;
                    continue;
                }
                Err(e) => {
                    let msg = format!("cannot read modification time: {}", e);
                    warn!("{}: {}", path.display(), msg);
                    report.failed += 1;
                    if let Some(cb) = cb {
                        cb.on_document_error(&path, &msg);
                    }
                    continue;
                }
            }
        }

        if let Some(cb) = cb {
            cb.on_document_start(&path);
        }

        match process_document(config, decoder, &path, now) {
            Ok(doc) => {
                if let Some(cb) = cb {
                    cb.on_document_complete(&doc);
                }
                report.documents.push(doc);
            }
            Err(e) => {
                warn!("Failed to process {}: {}", path.display(), e);
                report.failed += 1;
                if let Some(cb) = cb {
                    cb.on_document_error(&path, &e.to_string());
                }
            }
        }
    }

    info!(
        "Crawl complete: {} processed, {} skipped by date, {} failed",
        report.processed(),
        report.skipped_by_date,
        report.failed
    );
    if let Some(cb) = cb {
        cb.on_crawl_complete(&report);
    }

    Ok(report)
}

/// Produce the notes folder for a single PDF.
///
/// Creates `<output>/<slug>/`, copies the PDF there, writes `_index.md` if
/// it is missing and appends this run's notes file. The decoder reads the
/// original file, not the copy.
pub fn process_document(
    config: &CrawlConfig,
    decoder: &dyn PdfDecoder,
    source: &Path,
    now: DateTime<Local>,
) -> Result<DocumentReport, PdrefError> {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let slug = match slugify(&stem) {
        s if s.is_empty() => FALLBACK_SLUG.to_string(),
        s => s,
    };
    info!("Processing {} as '{}'", source.display(), slug);

    // ── Step 1: Folder and copy ──────────────────────────────────────────
    let prepared = prepare::prepare_document(&config.output_dir, &slug, source)?;

    // ── Step 2: Open ─────────────────────────────────────────────────────
    let document = decoder.open(source)?;
    let pages = document.page_count();
    debug!("{} has {} pages", source.display(), pages);

    // ── Step 3: Index, first run only ────────────────────────────────────
    let options = ImageOptions {
        min_pixels: config.image_size_hint,
        debug: config.debug,
    };
    let images = index::write_index(
        &*document,
        &prepared.folder,
        &slug,
        options,
        now.date_naive(),
    )?;

    // ── Step 4: Dated notes ──────────────────────────────────────────────
    let notes = notes::write_notes(&*document, &prepared.folder, now)?;

    let index_created = images.is_some();
    let images = images.unwrap_or_default();
    Ok(DocumentReport {
        source: source.to_path_buf(),
        slug,
        folder: prepared.folder,
        copied: prepared.copied,
        index_created,
        notes_path: notes.path,
        pages,
        annotations: notes.annotations,
        excerpts: notes.excerpts,
        excerpts_failed: notes.excerpts_failed,
        images_saved: images.saved,
        images_skipped: images.skipped,
        images_failed: images.failed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::{MemoryDecoder, MemoryDocument, MemoryPage};
    use chrono::TimeZone;
    use std::fs;

    fn now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 2, 3, 4, 5, 6).unwrap()
    }

    #[test]
    fn unsluggable_name_uses_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("!!!.pdf");
        fs::write(&src, b"%PDF").unwrap();
        let out = dir.path().join("out");
        fs::create_dir(&out).unwrap();

        let config = CrawlConfig::builder(dir.path(), &out).build().unwrap();
        let decoder = MemoryDecoder::new().with("!!!.pdf", MemoryDocument::new().page(MemoryPage::new()));

        let doc = process_document(&config, &decoder, &src, now()).unwrap();
        assert_eq!(doc.slug, FALLBACK_SLUG);
        assert!(out.join("untitled/untitled.pdf").exists());
        assert!(doc.index_created);
        assert_eq!(doc.notes_path, out.join("untitled/notes/20240203-040506.md"));
    }

    #[test]
    fn open_failure_leaves_the_copy() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("Broken File.pdf");
        fs::write(&src, b"not a pdf").unwrap();
        let out = dir.path().join("out");
        fs::create_dir(&out).unwrap();

        let config = CrawlConfig::builder(dir.path(), &out).build().unwrap();
        let err = process_document(&config, &MemoryDecoder::new(), &src, now()).unwrap_err();

        assert!(matches!(err, PdrefError::CorruptPdf { .. }));
        assert!(out.join("broken-file/broken-file.pdf").exists());
        assert!(!out.join("broken-file/_index.md").exists());
    }

    #[test]
    fn uncreatable_output_dir_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let config = CrawlConfig::builder(dir.path(), dir.path().join("a/b/c"))
            .build()
            .unwrap();
        let err = crawl_at(&config, &MemoryDecoder::new(), now()).unwrap_err();
        assert!(matches!(err, PdrefError::OutputDirFailed { .. }));
    }
}
