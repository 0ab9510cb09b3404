//! # pdref
//!
//! Turn a folder of annotated PDFs into a folder of Markdown notes.
//!
//! Every PDF found below the source folder gets its own notes folder holding
//! a copy of the PDF, an `_index.md` with links to the images extracted from
//! each page, and one dated notes file per run listing the annotations of
//! every page. Highlights, underlines, strike-outs and squiggles are quoted
//! with the words they cover, in reading order.
//!
//! ## Pipeline Overview
//!
//! ```text
//! source/
//!  │
//!  ├─ 1. Walk      *.pdf, sorted, optional modification-time cutoff
//!  ├─ 2. Prepare   <output>/<slug>/ + <slug>.pdf copy
//!  ├─ 3. Index     _index.md + <slug>-p<page>-<xref>.png (first run only)
//!  └─ 4. Notes     notes/<YYYYmmdd-HHMMSS>.md
//!                   └─ per annotation: bullet + quoted covered words
//! ```
//!
//! ## Output Layout
//!
//! ```text
//! <output>/<slug>/<slug>.pdf
//! <output>/<slug>/_index.md
//! <output>/<slug>/<slug>-p001-12.png
//! <output>/<slug>/notes/20240501-143000.md
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdref::{crawl, CrawlConfig, PdfiumDecoder};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let decoder = PdfiumDecoder::new()?;
//!     let config = CrawlConfig::builder("papers", "notes")
//!         .modified_after_str("2024-01-01")
//!         .build()?;
//!     let report = crawl(&config, &decoder)?;
//!     eprintln!("{} documents, {} failed", report.processed(), report.failed);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdref` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! pdref = { version = "0.2", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod crawl;
pub mod decoder;
pub mod error;
pub mod frontmatter;
pub mod model;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod slug;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{parse_cutoff, CrawlConfig, CrawlConfigBuilder};
pub use crawl::{crawl, crawl_at, process_document};
pub use decoder::{MemoryDecoder, MemoryDocument, MemoryPage, PageImage, PdfDecoder, PdfSource, PdfiumDecoder};
pub use error::{ExcerptError, ImageError, PdrefError};
pub use model::{Annotation, AnnotationKind, Colorspace, DocumentMetadata, Pixmap, Rect, Word};
pub use output::{CrawlReport, DocumentReport};
pub use pipeline::reading_order::make_text;
pub use pipeline::word_index::OrderedWordIndex;
pub use progress::{CrawlProgressCallback, NoopProgressCallback, ProgressCallback};
pub use slug::slugify;
