//! Dated notes file: one per run, `notes/<YYYYmmdd-HHMMSS>.md`.
//!
//! Every page gets a `## Page N` heading followed by what the annotation
//! correlator made of it. The file is opened in append mode, so two
//! documents sharing a folder and a timestamp end up in the same file
//! rather than overwriting each other.

use crate::decoder::PdfSource;
use crate::error::PdrefError;
use crate::frontmatter::Frontmatter;
use crate::pipeline::annotations::{write_page_annotations, PageSummary};
use chrono::{DateTime, Local};
use std::fs::OpenOptions;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const NOTES_DIR: &str = "notes";

/// What [`write_notes`] produced.
#[derive(Debug, Clone, Default)]
pub struct NotesSummary {
    pub path: PathBuf,
    pub annotations: usize,
    pub excerpts: usize,
    pub excerpts_failed: usize,
}

/// File stem of the notes file for a run started at `now`.
pub fn notes_stem(now: &DateTime<Local>) -> String {
    now.format("%Y%m%d-%H%M%S").to_string()
}

/// Append this run's notes for `source` to `<folder>/notes/<stem>.md`.
pub fn write_notes(
    source: &dyn PdfSource,
    folder: &Path,
    now: DateTime<Local>,
) -> Result<NotesSummary, PdrefError> {
    let dir = folder.join(NOTES_DIR);
    if !dir.exists() {
        std::fs::create_dir(&dir).map_err(|e| PdrefError::FolderCreateFailed {
            path: dir.clone(),
            source: e,
        })?;
    }

    let stem = notes_stem(&now);
    let path = dir.join(format!("{}.md", stem));
    let write_failed = |source: io::Error| PdrefError::WriteFailed {
        path: path.clone(),
        source,
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(write_failed)?;
    let mut out = BufWriter::new(file);

    let meta = source.metadata();
    let frontmatter = Frontmatter::new(format!("Notes - {}", stem), now.date_naive())
        .author(meta.author.unwrap_or_default());
    out.write_all(frontmatter.render().as_bytes())
        .map_err(write_failed)?;
    write!(out, "\n\n# {}\n\n", now.format("%Y%m%d %H:%M:%S")).map_err(write_failed)?;

    let mut totals = PageSummary::default();
    for index in 0..source.page_count() {
        let page = index + 1;
        write!(out, "\n## Page {}\n", page).map_err(write_failed)?;

        let annotations = source.annotations(index)?;
        let words = if annotations.is_empty() {
            Vec::new()
        } else {
            source.words(index)?
        };

        let summary =
            write_page_annotations(&mut out, page, &words, &annotations).map_err(write_failed)?;
        totals.annotations += summary.annotations;
        totals.excerpts += summary.excerpts;
        totals.excerpts_failed += summary.excerpts_failed;
    }

    out.write_all(b"\n\n---").map_err(write_failed)?;
    out.flush().map_err(write_failed)?;
    debug!(
        "Wrote {} ({} annotations)",
        path.display(),
        totals.annotations
    );

    Ok(NotesSummary {
        path,
        annotations: totals.annotations,
        excerpts: totals.excerpts,
        excerpts_failed: totals.excerpts_failed,
    })
}
