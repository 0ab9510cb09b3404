//! Error types for the pdref library.
//!
//! Three error types reflect three distinct failure scopes:
//!
//! * [`PdrefError`]: **Fatal for its scope**: either the whole run cannot
//!   proceed (output folder cannot be created, pdfium cannot be bound, bad
//!   configuration) or a single document cannot be processed (cannot be
//!   opened, copied or written). The crawler contains document-scoped
//!   errors, logs them and moves on to the next document.
//!
//! * [`ImageError`]: **Non-fatal**: one embedded image could not be
//!   decoded, converted or written. Logged and counted in the
//!   [`crate::output::DocumentReport`]; the remaining images and the rest of
//!   the document are unaffected.
//!
//! * [`ExcerptError`]: **Non-fatal**: the quoted excerpt of one annotation
//!   could not be written. The annotation's bullet line stays in the notes
//!   file without its excerpt and the page continues.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors returned by the pdref library.
#[derive(Debug, Error)]
pub enum PdrefError {
    // ── Run-scoped errors ─────────────────────────────────────────────────
    /// The notes output folder does not exist and could not be created.
    #[error("Cannot create output folder '{path}': {source}\nCheck that its parent folder exists and is writable.")]
    OutputDirFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
You can:\n\
  • Set PDFIUM_LIB_PATH=/path/to/libpdfium to use an existing copy.\n\
  • Place libpdfium next to the working directory.\n\
  • Install pdfium as a system library.\n"
    )]
    PdfiumBindingFailed(String),

    // ── Document-scoped errors ────────────────────────────────────────────
    /// PDF header/trailer/xref is corrupt, or the file is not a PDF at all.
    #[error("PDF '{path}' could not be opened: {detail}")]
    CorruptPdf { path: PathBuf, detail: String },

    /// The per-document notes folder could not be created.
    #[error("Cannot create notes folder '{path}': {source}")]
    FolderCreateFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The source PDF could not be copied into its notes folder.
    #[error("Failed to copy '{from}' to '{to}': {source}")]
    CopyFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not create or write a Markdown file.
    #[error("Failed to write '{path}': {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The decoder returned an error for a specific page.
    #[error("Extraction failed for page {page}: {detail}")]
    PageExtractionFailed { page: usize, detail: String },
}

/// A non-fatal error for a single embedded image.
///
/// `xref` is the decoder's identifier for the image on its page.
#[derive(Debug, Error)]
pub enum ImageError {
    /// The decoder could not produce pixel data for the image.
    #[error("Image {xref}: decode failed: {detail}")]
    Decode { xref: u32, detail: String },

    /// The pixel data uses a colorspace that cannot be turned into PNG.
    #[error("Image {xref}: unsupported colorspace '{colorspace}'")]
    UnsupportedColorspace { xref: u32, colorspace: String },

    /// The sample buffer does not match the declared dimensions.
    #[error("Image {xref}: {len} sample bytes do not fit {width}x{height} {colorspace}")]
    BadSamples {
        xref: u32,
        width: u32,
        height: u32,
        colorspace: String,
        len: usize,
    },

    /// PNG encoding or the file write failed.
    #[error("Image {xref}: failed to write '{path}': {source}")]
    Write {
        xref: u32,
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// A non-fatal error for the excerpt of a single annotation.
#[derive(Debug, Error)]
pub enum ExcerptError {
    /// The excerpt text could not be written to the notes file.
    #[error("Excerpt for annotation {index} on page {page} could not be written: {source}")]
    Write {
        page: usize,
        index: usize,
        #[source]
        source: std::io::Error,
    },
}
