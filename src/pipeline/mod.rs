//! Pipeline stages for turning one PDF into a notes folder.
//!
//! Each submodule implements exactly one step and is testable on its own.
//!
//! ## Data Flow
//!
//! ```text
//! walk ──▶ prepare ──▶ index ─────────────▶ notes
//! (*.pdf)  (folder,    (_index.md, images)   (notes/<ts>.md)
//!           copy)          │                    │
//!                        images            annotations
//!                                         ├─ word_index
//!                                         └─ reading_order
//! ```
//!
//! 1. [`walk`]: find `*.pdf` files below the source folder
//! 2. [`prepare`]: create the document folder and copy the PDF into it
//! 3. [`index`]: write `_index.md` once, exporting page images through
//!    [`images`]
//! 4. [`notes`]: write the dated notes file; each page's annotation chain
//!    goes through [`annotations`], which quotes covered words using
//!    [`word_index`] and [`reading_order`]

pub mod annotations;
pub mod images;
pub mod index;
pub mod notes;
pub mod prepare;
pub mod reading_order;
pub mod walk;
pub mod word_index;
