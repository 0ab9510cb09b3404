//! Page-level data handed over by a [`crate::decoder::PdfSource`].
//!
//! All coordinates use a top-left origin with `y` growing downward, the
//! convention of most document decoders. Adapters for decoders with a
//! bottom-left origin (pdfium) flip the vertical axis before building these
//! values, so the reading-order code never has to care.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An axis-aligned rectangle in page space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl Rect {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// A rectangle is empty when it is inverted on either axis.
    pub fn is_empty(&self) -> bool {
        self.x0 > self.x1 || self.y0 > self.y1
    }

    /// Whether the two rectangles overlap on both axes. Touching edges count.
    pub fn intersects(&self, other: &Rect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.x0 <= other.x1
            && other.x0 <= self.x1
            && self.y0 <= other.y1
            && other.y0 <= self.y1
    }

    /// Smallest rectangle containing both.
    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }
}

/// A positioned text token on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    /// Bottom edge; the line-grouping coordinate.
    pub y1: f64,
    pub text: String,
    pub block_no: u32,
    pub line_no: u32,
    pub word_no: u32,
}

impl Word {
    /// Convenience constructor for a word in block 0.
    pub fn new(text: impl Into<String>, rect: Rect, line_no: u32, word_no: u32) -> Self {
        Self {
            x0: rect.x0,
            y0: rect.y0,
            x1: rect.x1,
            y1: rect.y1,
            text: text.into(),
            block_no: 0,
            line_no,
            word_no,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x0, self.y0, self.x1, self.y1)
    }
}

/// Annotation subtypes the correlator distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationKind {
    /// Sticky note.
    Text,
    FreeText,
    Highlight,
    Underline,
    StrikeOut,
    Squiggly,
    /// Any subtype without dedicated handling (links, ink, stamps, …).
    Other,
}

impl AnnotationKind {
    /// Notes carry author text only; no words are correlated.
    pub fn is_note(self) -> bool {
        matches!(self, AnnotationKind::Text | AnnotationKind::FreeText)
    }

    /// Text markup subtypes whose rectangle covers page words.
    pub fn is_markup(self) -> bool {
        matches!(
            self,
            AnnotationKind::Highlight
                | AnnotationKind::Underline
                | AnnotationKind::StrikeOut
                | AnnotationKind::Squiggly
        )
    }
}

/// A region of interest on a page, read-only once decoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub kind: AnnotationKind,
    pub rect: Rect,
    pub content: Option<String>,
}

impl Annotation {
    pub fn new(kind: AnnotationKind, rect: Rect) -> Self {
        Self {
            kind,
            rect,
            content: None,
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Author text, with empty strings treated as absent.
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref().filter(|c| !c.is_empty())
    }
}

/// Document-level metadata from the PDF info dictionary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    /// Raw comma-separated keyword string.
    pub keywords: Option<String>,
    pub page_count: usize,
}

impl DocumentMetadata {
    /// Keywords split on commas, trimmed, empties dropped.
    ///
    /// Deliberately not a raw split: `"a, b"` gives `["a", "b"]` rather than
    /// `["a", " b"]`, and a blank or missing keyword string gives no keys at
    /// all (so no `keys:` block) instead of a single empty key.
    pub fn keys(&self) -> Vec<String> {
        self.keywords
            .as_deref()
            .unwrap_or("")
            .split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Colour model of a [`Pixmap`]'s samples.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Colorspace {
    /// One byte per pixel.
    Gray,
    /// Three bytes per pixel.
    Rgb,
    /// Four bytes per pixel, subtractive.
    Cmyk,
    /// Anything the image exporter cannot encode.
    Other(String),
}

impl Colorspace {
    /// Bytes per pixel, `None` for unknown colorspaces.
    pub fn components(&self) -> Option<usize> {
        match self {
            Colorspace::Gray => Some(1),
            Colorspace::Rgb => Some(3),
            Colorspace::Cmyk => Some(4),
            Colorspace::Other(_) => None,
        }
    }
}

impl fmt::Display for Colorspace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Colorspace::Gray => f.write_str("DeviceGray"),
            Colorspace::Rgb => f.write_str("DeviceRGB"),
            Colorspace::Cmyk => f.write_str("DeviceCMYK"),
            Colorspace::Other(name) => f.write_str(name),
        }
    }
}

/// Decoded image samples, row-major, no padding.
#[derive(Debug, Clone, PartialEq)]
pub struct Pixmap {
    pub width: u32,
    pub height: u32,
    pub colorspace: Colorspace,
    pub samples: Vec<u8>,
}

impl Pixmap {
    /// Pixel count, the unit of the image size hint.
    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlapping_rects_intersect() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 15.0, 15.0);
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
    }

    #[test]
    fn touching_edges_intersect() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 20.0, 10.0);
        assert!(a.intersects(&b));
    }

    #[test]
    fn disjoint_rects_do_not_intersect() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(0.0, 10.5, 10.0, 20.0);
        assert!(!a.intersects(&b));
    }

    #[test]
    fn inverted_rect_never_intersects() {
        let a = Rect::new(10.0, 0.0, 0.0, 10.0);
        assert!(a.is_empty());
        assert!(!a.intersects(&Rect::new(-100.0, -100.0, 100.0, 100.0)));
    }

    #[test]
    fn union_spans_both() {
        let u = Rect::new(0.0, 2.0, 4.0, 6.0).union(&Rect::new(3.0, 1.0, 9.0, 5.0));
        assert_eq!(u, Rect::new(0.0, 1.0, 9.0, 6.0));
    }

    #[test]
    fn keys_are_trimmed_and_non_empty() {
        let meta = DocumentMetadata {
            keywords: Some(" rust, pdf ,, notes ".into()),
            ..Default::default()
        };
        assert_eq!(meta.keys(), vec!["rust", "pdf", "notes"]);
        assert!(DocumentMetadata::default().keys().is_empty());
    }

    #[test]
    fn blank_keywords_yield_no_keys_instead_of_one_empty_key() {
        for raw in ["", " ", ",", " , ,"] {
            let meta = DocumentMetadata {
                keywords: Some(raw.into()),
                ..Default::default()
            };
            assert!(meta.keys().is_empty(), "{raw:?} gave {:?}", meta.keys());
        }
    }

    #[test]
    fn empty_content_is_absent() {
        let a = Annotation::new(AnnotationKind::Highlight, Rect::default()).with_content("");
        assert_eq!(a.content(), None);
        let b = Annotation::new(AnnotationKind::Text, Rect::default()).with_content("see §2");
        assert_eq!(b.content(), Some("see §2"));
    }

    #[test]
    fn kind_classification() {
        assert!(AnnotationKind::Text.is_note());
        assert!(AnnotationKind::FreeText.is_note());
        assert!(AnnotationKind::Squiggly.is_markup());
        assert!(!AnnotationKind::Other.is_markup());
        assert!(!AnnotationKind::Other.is_note());
    }
}
