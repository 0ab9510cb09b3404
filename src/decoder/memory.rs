//! In-memory [`PdfDecoder`] for already extracted content.
//!
//! Documents are registered by file name; opening any path whose file name
//! matches returns the registered pages. Anything else fails like a corrupt
//! file would. Used by the test suites and handy for driving the notes
//! pipeline from another extractor.

use super::{PageImage, PdfDecoder, PdfSource};
use crate::error::{ImageError, PdrefError};
use crate::model::{Annotation, DocumentMetadata, Pixmap, Word};
use std::collections::HashMap;
use std::path::Path;

/// One page of a [`MemoryDocument`].
#[derive(Debug, Clone, Default)]
pub struct MemoryPage {
    pub words: Vec<Word>,
    pub annotations: Vec<Annotation>,
    /// `(xref, pixmap or decode failure)`.
    pub images: Vec<(u32, Result<Pixmap, String>)>,
}

impl MemoryPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn word(mut self, word: Word) -> Self {
        self.words.push(word);
        self
    }

    pub fn annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn image(mut self, xref: u32, pixmap: Pixmap) -> Self {
        self.images.push((xref, Ok(pixmap)));
        self
    }

    pub fn broken_image(mut self, xref: u32, detail: impl Into<String>) -> Self {
        self.images.push((xref, Err(detail.into())));
        self
    }
}

/// A registered document.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocument {
    pub title: Option<String>,
    pub author: Option<String>,
    pub keywords: Option<String>,
    pub pages: Vec<MemoryPage>,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn keywords(mut self, keywords: impl Into<String>) -> Self {
        self.keywords = Some(keywords.into());
        self
    }

    pub fn page(mut self, page: MemoryPage) -> Self {
        self.pages.push(page);
        self
    }
}

/// Decoder over registered [`MemoryDocument`]s.
#[derive(Debug, Clone, Default)]
pub struct MemoryDecoder {
    documents: HashMap<String, MemoryDocument>,
}

impl MemoryDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `document` under `file_name` (e.g. `"paper.pdf"`).
    pub fn with(mut self, file_name: impl Into<String>, document: MemoryDocument) -> Self {
        self.documents.insert(file_name.into(), document);
        self
    }
}

impl PdfDecoder for MemoryDecoder {
    fn open(&self, path: &Path) -> Result<Box<dyn PdfSource + '_>, PdrefError> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        match self.documents.get(&name) {
            Some(document) => Ok(Box::new(document)),
            None => Err(PdrefError::CorruptPdf {
                path: path.to_path_buf(),
                detail: "not a registered document".into(),
            }),
        }
    }
}

impl MemoryDocument {
    fn get(&self, index: usize) -> Result<&MemoryPage, PdrefError> {
        self.pages
            .get(index)
            .ok_or_else(|| PdrefError::PageExtractionFailed {
                page: index + 1,
                detail: format!("document has {} pages", self.pages.len()),
            })
    }
}

impl PdfSource for &MemoryDocument {
    fn metadata(&self) -> DocumentMetadata {
        DocumentMetadata {
            title: self.title.clone(),
            author: self.author.clone(),
            keywords: self.keywords.clone(),
            page_count: self.pages.len(),
        }
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn words(&self, page: usize) -> Result<Vec<Word>, PdrefError> {
        Ok(self.get(page)?.words.clone())
    }

    fn images(&self, page: usize) -> Result<Vec<PageImage>, PdrefError> {
        let images = self
            .get(page)?
            .images
            .iter()
            .map(|(xref, pixmap)| PageImage {
                xref: *xref,
                pixmap: pixmap.clone().map_err(|detail| ImageError::Decode {
                    xref: *xref,
                    detail,
                }),
            })
            .collect();
        Ok(images)
    }

    fn annotations(&self, page: usize) -> Result<Vec<Annotation>, PdrefError> {
        Ok(self.get(page)?.annotations.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AnnotationKind, Rect};

    #[test]
    fn opens_by_file_name() {
        let decoder = MemoryDecoder::new().with(
            "paper.pdf",
            MemoryDocument::new()
                .title("Paper")
                .page(MemoryPage::new().annotation(Annotation::new(
                    AnnotationKind::Highlight,
                    Rect::default(),
                ))),
        );

        let source = decoder.open(Path::new("/any/where/paper.pdf")).unwrap();
        assert_eq!(source.page_count(), 1);
        assert_eq!(source.metadata().title.as_deref(), Some("Paper"));
        assert_eq!(source.annotations(0).unwrap().len(), 1);
        assert!(source.words(3).is_err());
    }

    #[test]
    fn unknown_files_are_corrupt() {
        let decoder = MemoryDecoder::new();
        assert!(matches!(
            decoder.open(Path::new("x.pdf")),
            Err(PdrefError::CorruptPdf { .. })
        ));
    }

    #[test]
    fn broken_images_surface_as_decode_errors() {
        let decoder = MemoryDecoder::new().with(
            "a.pdf",
            MemoryDocument::new().page(MemoryPage::new().broken_image(4, "bad filter")),
        );
        let source = decoder.open(Path::new("a.pdf")).unwrap();
        let images = source.images(0).unwrap();
        assert!(matches!(images[0].pixmap, Err(ImageError::Decode { xref: 4, .. })));
    }
}
