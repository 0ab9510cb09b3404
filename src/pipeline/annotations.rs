//! Annotation correlation: one page's annotations → Markdown bullets and
//! quoted excerpts.
//!
//! Annotations are visited strictly in the page's chain order. Each visit is
//! classified into an [`AnnotationState`]; the page starts in
//! `NoAnnotations` (empty chain) or in the state of its first annotation and
//! ends in `Done` after the last one.
//!
//! ```text
//!   NoAnnotations ──────────────────────────────────────────▶ Done
//!   first ─▶ HasText | HasMarkup | HasOther ─▶ next … ─────▶ Done
//! ```
//!
//! For markup annotations the words whose rectangles intersect the
//! annotation rectangle are collected from the page's word list, in page
//! order, and rendered with [`make_text`]. Intersection, not containment: a word
//! whose corner is clipped by the highlight is quoted in full.

use crate::error::ExcerptError;
use crate::model::{Annotation, Rect, Word};
use crate::pipeline::reading_order::make_text;
use std::io::{self, Write};
use tracing::{debug, warn};

/// Bullet label for markup annotations without author text.
pub const HIGHLIGHT_PLACEHOLDER: &str = "Highlighted text: ";

/// Line written for pages without annotations.
pub const NO_ANNOTATIONS_LINE: &str = "\n- No annotations on this page\n";

/// Where the correlator is in a page's annotation chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationState {
    /// The page has no first annotation.
    NoAnnotations,
    /// Visiting a sticky note or free-text annotation.
    HasTextAnnotation,
    /// Visiting a highlight, underline, strike-out or squiggly.
    HasMarkupAnnotation,
    /// Visiting a subtype without dedicated handling.
    HasOtherAnnotation,
    /// The chain is exhausted.
    Done,
}

impl AnnotationState {
    fn visiting(annotation: &Annotation) -> Self {
        if annotation.kind.is_note() {
            AnnotationState::HasTextAnnotation
        } else if annotation.kind.is_markup() {
            AnnotationState::HasMarkupAnnotation
        } else {
            AnnotationState::HasOtherAnnotation
        }
    }
}

/// Counters for one page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageSummary {
    pub annotations: usize,
    pub excerpts: usize,
    pub excerpts_failed: usize,
}

/// Words of the page whose rectangles intersect `rect`, in page order.
pub fn covered_words<'a>(words: &'a [Word], rect: &Rect) -> Vec<&'a Word> {
    words.iter().filter(|w| w.rect().intersects(rect)).collect()
}

/// The reading-order excerpt under `rect`; empty when no word is covered.
pub fn excerpt(words: &[Word], rect: &Rect) -> String {
    make_text(covered_words(words, rect))
}

/// Write the notes for one page (1-indexed `page`) to `out`.
///
/// Errors writing bullets propagate; a failed excerpt is logged, counted and
/// skipped.
pub fn write_page_annotations<W: Write>(
    out: &mut W,
    page: usize,
    words: &[Word],
    annotations: &[Annotation],
) -> io::Result<PageSummary> {
    let mut summary = PageSummary::default();
    let mut chain = annotations.iter().enumerate();

    let mut current = chain.next();
    let mut state = match current {
        None => AnnotationState::NoAnnotations,
        Some((_, a)) => AnnotationState::visiting(a),
    };

    if state == AnnotationState::NoAnnotations {
        out.write_all(NO_ANNOTATIONS_LINE.as_bytes())?;
        debug!("Page {}: no annotations", page);
        return Ok(summary);
    }

    while let Some((i, annotation)) = current {
        summary.annotations += 1;

        if state == AnnotationState::HasTextAnnotation {
            write!(out, "\n- {}", annotation.content().unwrap_or(""))?;
        }

        out.write_all(b"\n")?;

        if state == AnnotationState::HasMarkupAnnotation {
            let label = annotation.content().unwrap_or(HIGHLIGHT_PLACEHOLDER);
            write!(out, "\n- {}", label)?;

            let text = excerpt(words, &annotation.rect);
            match write_excerpt(out, page, i, &text) {
                Ok(()) => summary.excerpts += 1,
                Err(e) => {
                    warn!("{}", e);
                    summary.excerpts_failed += 1;
                }
            }
        }

        current = chain.next();
        state = match current {
            None => AnnotationState::Done,
            Some((_, a)) => AnnotationState::visiting(a),
        };
    }

    debug_assert_eq!(state, AnnotationState::Done);
    debug!(
        "Page {}: {} annotations, {} excerpts",
        page, summary.annotations, summary.excerpts
    );
    Ok(summary)
}

fn write_excerpt<W: Write>(
    out: &mut W,
    page: usize,
    index: usize,
    text: &str,
) -> Result<(), ExcerptError> {
    let line = format!("\n\n    > {}\n", text);
    out.write_all(line.as_bytes())
        .map_err(|source| ExcerptError::Write {
            page,
            index,
            source,
        })
}
