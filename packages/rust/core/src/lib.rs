//! Notebook annotation for chulo.
//!
//! Scans markdown cells for headings, anchors them, and prepends a linked
//! table of contents. [`pipeline`] wraps the pass with file I/O and palette
//! resolution.

pub mod annotate;
pub mod contents;
pub mod palette;
pub mod pipeline;
