//! [`PdfDecoder`] over pdfium via `pdfium-render`.
//!
//! pdfium reports geometry with a bottom-left origin; every rectangle is
//! flipped against the page height here so the rest of the crate works in
//! top-left coordinates. pdfium has no word API, so words are rebuilt from
//! the character stream: whitespace ends a word, a generated line break
//! also starts a new line number.

use super::{PageImage, PdfDecoder, PdfSource};
use crate::error::{ImageError, PdrefError};
use crate::model::{Annotation, AnnotationKind, Colorspace, DocumentMetadata, Pixmap, Rect, Word};
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Decoder backed by a bound pdfium library.
pub struct PdfiumDecoder {
    pdfium: Pdfium,
}

impl PdfiumDecoder {
    /// Bind pdfium, trying in order:
    ///
    /// 1. `PDFIUM_LIB_PATH` (a library file),
    /// 2. the platform library name in the working directory,
    /// 3. the system library search path.
    pub fn new() -> Result<Self, PdrefError> {
        let from_env = std::env::var("PDFIUM_LIB_PATH")
            .ok()
            .filter(|p| !p.is_empty())
            .map(PathBuf::from);

        let bindings = match from_env {
            Some(path) => Pdfium::bind_to_library(&path),
            None => Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
                .or_else(|_| Pdfium::bind_to_system_library()),
        }
        .map_err(|e| PdrefError::PdfiumBindingFailed(format!("{:?}", e)))?;

        Ok(Self::from_pdfium(Pdfium::new(bindings)))
    }

    /// Wrap an already bound pdfium instance.
    pub fn from_pdfium(pdfium: Pdfium) -> Self {
        Self { pdfium }
    }
}

impl PdfDecoder for PdfiumDecoder {
    fn open(&self, path: &Path) -> Result<Box<dyn PdfSource + '_>, PdrefError> {
        let document =
            self.pdfium
                .load_pdf_from_file(path, None)
                .map_err(|e| PdrefError::CorruptPdf {
                    path: path.to_path_buf(),
                    detail: format!("{:?}", e),
                })?;
        debug!("Opened {} with pdfium", path.display());
        Ok(Box::new(PdfiumSource { document }))
    }
}

struct PdfiumSource<'a> {
    document: PdfDocument<'a>,
}

impl PdfiumSource<'_> {
    fn page(&self, index: usize) -> Result<PdfPage<'_>, PdrefError> {
        self.document
            .pages()
            .get(index as u16)
            .map_err(|e| extraction_failed(index, e))
    }
}

impl PdfSource for PdfiumSource<'_> {
    fn metadata(&self) -> DocumentMetadata {
        let metadata = self.document.metadata();

        let get_meta = |tag: PdfDocumentMetadataTagType| -> Option<String> {
            metadata.get(tag).and_then(|t| {
                let v = t.value().to_string();
                if v.is_empty() {
                    None
                } else {
                    Some(v)
                }
            })
        };

        DocumentMetadata {
            title: get_meta(PdfDocumentMetadataTagType::Title),
            author: get_meta(PdfDocumentMetadataTagType::Author),
            keywords: get_meta(PdfDocumentMetadataTagType::Keywords),
            page_count: self.page_count(),
        }
    }

    fn page_count(&self) -> usize {
        self.document.pages().len() as usize
    }

    fn words(&self, index: usize) -> Result<Vec<Word>, PdrefError> {
        let page = self.page(index)?;
        let height = f64::from(page.height().value);
        let text = page.text().map_err(|e| extraction_failed(index, e))?;

        let chars = text.chars();
        let positioned = chars.iter().filter_map(|ch| {
            let c = ch.unicode_char()?;
            let bounds = ch.loose_bounds().ok()?;
            Some((c, flip(&bounds, height)))
        });

        Ok(words_from_chars(positioned))
    }

    fn images(&self, index: usize) -> Result<Vec<PageImage>, PdrefError> {
        let page = self.page(index)?;

        let images = page
            .objects()
            .iter()
            .enumerate()
            .filter_map(|(i, object)| {
                let image = object.as_image_object()?;
                let xref = i as u32;
                let pixmap = image
                    .get_raw_image()
                    .map(pixmap_from_image)
                    .map_err(|e| ImageError::Decode {
                        xref,
                        detail: format!("{:?}", e),
                    });
                Some(PageImage { xref, pixmap })
            })
            .collect();

        Ok(images)
    }

    fn annotations(&self, index: usize) -> Result<Vec<Annotation>, PdrefError> {
        let page = self.page(index)?;
        let height = f64::from(page.height().value);

        let mut out = Vec::new();
        for annotation in page.annotations().iter() {
            if !in_chain(annotation.annotation_type()) {
                continue;
            }
            let rect = annotation
                .bounds()
                .map(|b| flip(&b, height))
                .map_err(|e| extraction_failed(index, e))?;
            out.push(Annotation {
                kind: kind_of(annotation.annotation_type()),
                rect,
                content: annotation.contents(),
            });
        }
        Ok(out)
    }
}

fn extraction_failed(index: usize, e: PdfiumError) -> PdrefError {
    PdrefError::PageExtractionFailed {
        page: index + 1,
        detail: format!("{:?}", e),
    }
}

/// Bottom-left pdfium rectangle → top-left page rectangle.
fn flip(rect: &PdfRect, page_height: f64) -> Rect {
    Rect::new(
        f64::from(rect.left().value),
        page_height - f64::from(rect.top().value),
        f64::from(rect.right().value),
        page_height - f64::from(rect.bottom().value),
    )
}

/// Links and popups are page plumbing, not reader annotations.
fn in_chain(t: PdfPageAnnotationType) -> bool {
    !matches!(
        t,
        PdfPageAnnotationType::Link | PdfPageAnnotationType::Popup
    )
}

fn kind_of(t: PdfPageAnnotationType) -> AnnotationKind {
    match t {
        PdfPageAnnotationType::Text => AnnotationKind::Text,
        PdfPageAnnotationType::FreeText => AnnotationKind::FreeText,
        PdfPageAnnotationType::Highlight => AnnotationKind::Highlight,
        PdfPageAnnotationType::Underline => AnnotationKind::Underline,
        PdfPageAnnotationType::Strikeout => AnnotationKind::StrikeOut,
        PdfPageAnnotationType::Squiggly => AnnotationKind::Squiggly,
        _ => AnnotationKind::Other,
    }
}

fn pixmap_from_image(image: DynamicImage) -> Pixmap {
    let (width, height) = (image.width(), image.height());
    match image {
        DynamicImage::ImageLuma8(gray) => Pixmap {
            width,
            height,
            colorspace: Colorspace::Gray,
            samples: gray.into_raw(),
        },
        other => Pixmap {
            width,
            height,
            colorspace: Colorspace::Rgb,
            samples: other.to_rgb8().into_raw(),
        },
    }
}

/// Group positioned characters into words.
///
/// Whitespace ends the current word; `'\n'` additionally advances the line
/// number and restarts word numbering. A word's rectangle is the union of
/// its characters' rectangles.
pub(crate) fn words_from_chars<I>(chars: I) -> Vec<Word>
where
    I: IntoIterator<Item = (char, Rect)>,
{
    let mut words = Vec::new();
    let mut text = String::new();
    let mut bounds: Option<Rect> = None;
    let mut line_no = 0u32;
    let mut word_no = 0u32;

    let mut flush = |text: &mut String, bounds: &mut Option<Rect>, line_no: u32, word_no: &mut u32| {
        if let Some(rect) = bounds.take() {
            if !text.is_empty() {
                words.push(Word::new(std::mem::take(text), rect, line_no, *word_no));
                *word_no += 1;
            }
        }
        text.clear();
    };

    for (c, rect) in chars {
        if c.is_whitespace() {
            flush(&mut text, &mut bounds, line_no, &mut word_no);
            if c == '\n' {
                line_no += 1;
                word_no = 0;
            }
            continue;
        }
        text.push(c);
        bounds = Some(match bounds {
            Some(existing) => existing.union(&rect),
            None => rect,
        });
    }
    flush(&mut text, &mut bounds, line_no, &mut word_no);

    words
}
