//! Table of contents cell builder.
//!
//! Renders a [`HeadingTable`] as a markdown cell of nested, linked bullets:
//!
//! ```text
//!  # Table of Contents
//! + [Intro](#Intro_0)
//! 	+ [Details](#Details_1)
//! ```

use chulo_shared::{Cell, CellId, Heading, HeadingTable};

/// First line of every generated contents cell.
pub const TOC_HEADER: &str = " # Table of Contents\n";

/// Build the contents cell for `headings`, with a fresh random id.
pub fn contents_cell(headings: &HeadingTable) -> Cell {
    let mut lines = Vec::with_capacity(headings.len() + 1);
    lines.push(TOC_HEADER.to_string());
    lines.extend(headings.iter().map(contents_line));

    Cell::markdown(CellId::generate(), lines)
}

/// One bullet: `level` tabs, then `+ [title](#anchor)` and a newline.
pub fn contents_line(heading: &Heading) -> String {
    let indent = "\t".repeat(heading.level);
    format!("{indent}+ [{}]{}\n", heading.title, link_target(&heading.anchor))
}

/// Wrap an anchor as a fragment link, escaping regex metacharacters.
///
/// CommonMark treats a backslash before ASCII punctuation as the literal
/// character, so the rendered link still points at the raw anchor while
/// parentheses and brackets cannot end the link early. The bytes differ from
/// an unescaped `(#anchor)` link whenever the anchor has metacharacters, but
/// both render to the same target.
fn link_target(anchor: &str) -> String {
    format!("(#{})", regex::escape(anchor))
}
