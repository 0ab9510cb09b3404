//! The seam between the notes pipeline and a PDF decoding library.
//!
//! The pipeline only needs a handful of read-only queries per document:
//! metadata, page count, and per page the positioned words, the embedded
//! images and the annotation chain. [`PdfDecoder`] opens documents,
//! [`PdfSource`] answers those queries. [`pdfium::PdfiumDecoder`] is the
//! production implementation; [`memory::MemoryDecoder`] serves content that
//! was extracted elsewhere.

pub mod memory;
pub mod pdfium;

use crate::error::{ImageError, PdrefError};
use crate::model::{Annotation, DocumentMetadata, Pixmap, Word};
use std::path::Path;

pub use self::memory::{MemoryDecoder, MemoryDocument, MemoryPage};
pub use self::pdfium::PdfiumDecoder;

/// One embedded image on a page.
#[derive(Debug)]
pub struct PageImage {
    /// Decoder-specific identifier, stable within the page.
    pub xref: u32,
    /// Decoded samples, or why they could not be produced.
    pub pixmap: Result<Pixmap, ImageError>,
}

/// Opens PDF files.
pub trait PdfDecoder {
    /// Open the document at `path`.
    fn open(&self, path: &Path) -> Result<Box<dyn PdfSource + '_>, PdrefError>;
}

/// Read-only access to one open document. Page indices are 0-based.
pub trait PdfSource {
    fn metadata(&self) -> DocumentMetadata;

    fn page_count(&self) -> usize;

    /// Positioned words of a page, top-left origin.
    fn words(&self, page: usize) -> Result<Vec<Word>, PdrefError>;

    /// Embedded images of a page, in content order.
    fn images(&self, page: usize) -> Result<Vec<PageImage>, PdrefError>;

    /// Annotations of a page, in chain order.
    fn annotations(&self, page: usize) -> Result<Vec<Annotation>, PdrefError>;
}
