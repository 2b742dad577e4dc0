//! Heading scanner and anchor injection.
//!
//! Walks the cells of a notebook once, collecting every heading of each
//! qualifying markdown cell into a [`HeadingTable`] and rewriting the cell
//! source so the heading carries an HTML anchor (and optional color).
//!
//! A markdown cell qualifies only when its *first* line is a heading.

use tracing::{debug, instrument};

use chulo_shared::{Cell, ChuloError, Color, Heading, HeadingTable, Notebook, Result, Source};

use crate::contents::{TOC_HEADER, contents_cell};

/// Opening of the anchor tag inserted above a heading.
pub const ANCHOR_TAG_PREFIX: &str = "<a class=\"anchor\" id=\"";

/// Closing of the anchor tag, including its line break.
const ANCHOR_TAG_SUFFIX: &str = "\"></a>\n";

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// How headings inside one markdown cell receive anchors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HeadingMode {
    /// One anchor per cell, built from the cell's *last* heading, and the
    /// cell's first line is rewritten with that heading's level and title.
    /// Earlier headings in the same cell still get ordinals and contents
    /// entries, but their links have no target.
    #[default]
    LastOnly,
    /// Every heading line gets its own anchor and rewrite.
    Each,
}

/// Result of annotating a notebook.
#[derive(Debug, Clone)]
pub struct Annotated {
    /// Contents cell followed by the annotated cells.
    pub notebook: Notebook,
    /// Every heading found, in scan order.
    pub headings: HeadingTable,
}

// ---------------------------------------------------------------------------
// Annotator
// ---------------------------------------------------------------------------

/// Annotate headings and prepend a table-of-contents cell.
///
/// `colors`, when present and non-empty, wraps each rewritten title in a
/// color span chosen by `level % colors.len()`.
///
/// Fails with a validation error when a markdown cell has no `source`.
#[instrument(skip_all, fields(cells = notebook.cells.len(), mode = ?mode))]
pub fn annotate(
    notebook: Notebook,
    colors: Option<&[Color]>,
    mode: HeadingMode,
) -> Result<Annotated> {
    let colors = colors.filter(|c| !c.is_empty());
    let Notebook { cells, extra } = notebook;

    let (headings, annotated) = annotate_cells(cells, colors, mode)?;

    let mut cells = Vec::with_capacity(annotated.len() + 1);
    cells.push(contents_cell(&headings));
    cells.extend(annotated);

    debug!(headings = headings.len(), "annotation complete");

    Ok(Annotated {
        notebook: Notebook { cells, extra },
        headings,
    })
}

/// Whether `notebook` starts with a contents cell from a previous [`annotate`] run.
///
/// Annotating twice is not idempotent: already-anchored cells no longer
/// start with `#`, so a second pass only stacks another contents cell.
/// Anchor tags elsewhere are not a signal; notebooks often carry hand-written ones.
pub fn is_annotated(notebook: &Notebook) -> bool {
    notebook
        .cells
        .first()
        .filter(|cell| cell.is_markdown())
        .and_then(Cell::first_line)
        .is_some_and(|line| line == TOC_HEADER)
}

fn annotate_cells(
    cells: Vec<Cell>,
    colors: Option<&[Color]>,
    mode: HeadingMode,
) -> Result<(HeadingTable, Vec<Cell>)> {
    let mut table = HeadingTable::new();
    let mut out = Vec::with_capacity(cells.len());

    for (index, mut cell) in cells.into_iter().enumerate() {
        if !cell.is_markdown() {
            out.push(cell);
            continue;
        }

        let lines = match &cell.source {
            Some(source) => source.lines(),
            None => {
                return Err(ChuloError::validation(format!(
                    "markdown cell {index} has no source"
                )));
            }
        };

        if !lines.first().is_some_and(|line| is_heading_line(line)) {
            out.push(cell);
            continue;
        }

        let (next, found) = scan_headings(&lines, table);
        table = next;

        let rewritten = match mode {
            HeadingMode::LastOnly => match table.last() {
                Some(heading) => anchor_last_heading(lines, heading, colors),
                None => lines,
            },
            HeadingMode::Each => anchor_each_heading(lines, &found, &table, colors),
        };

        debug!(index, found = found.len(), "annotated markdown cell");
        cell.source = Some(Source::Lines(rewritten));
        out.push(cell);
    }

    Ok((table, out))
}

// ---------------------------------------------------------------------------
// Scanning
// ---------------------------------------------------------------------------

/// Scan every line of a cell for headings.
///
/// Takes the table built so far and hands it back with the new headings
/// appended, along with `(line index, ordinal)` pairs for the headings found.
fn scan_headings(
    lines: &[String],
    mut table: HeadingTable,
) -> (HeadingTable, Vec<(usize, usize)>) {
    let mut found = Vec::new();

    for (line_index, line) in lines.iter().enumerate() {
        if !is_heading_line(line) {
            continue;
        }
        let heading = parse_heading(line, table.next_ordinal());
        debug!(
            ordinal = heading.ordinal,
            level = heading.level,
            anchor = %heading.anchor,
            "heading found"
        );
        found.push((line_index, heading.ordinal));
        table.push(heading);
    }

    (table, found)
}

fn is_heading_line(line: &str) -> bool {
    line.starts_with('#')
}

/// Parse a heading line (`## Title\n`) into a [`Heading`] with the given ordinal.
pub fn parse_heading(line: &str, ordinal: usize) -> Heading {
    let hashes = line.chars().take_while(|&c| c == '#').count();
    let rest = &line[hashes..];
    let rest = rest.strip_prefix(' ').unwrap_or(rest);
    let title = rest.trim().to_string();

    Heading {
        ordinal,
        level: hashes.saturating_sub(1),
        anchor: anchor_id(&title, ordinal),
        title,
    }
}

/// Build an anchor id: whitespace runs become `_`, then `_<ordinal>`.
pub fn anchor_id(title: &str, ordinal: usize) -> String {
    let slug = title.split_whitespace().collect::<Vec<_>>().join("_");
    format!("{slug}_{ordinal}")
}

// ---------------------------------------------------------------------------
// Rewriting
// ---------------------------------------------------------------------------

fn anchor_last_heading(
    lines: Vec<String>,
    heading: &Heading,
    colors: Option<&[Color]>,
) -> Vec<String> {
    let mut out = Vec::with_capacity(lines.len() + 1);
    out.push(anchor_tag(&heading.anchor));
    out.extend(lines);
    let rewritten = heading_line(&out[1], heading, colors);
    out[1] = rewritten;
    out
}

fn anchor_each_heading(
    lines: Vec<String>,
    found: &[(usize, usize)],
    table: &HeadingTable,
    colors: Option<&[Color]>,
) -> Vec<String> {
    let mut out = Vec::with_capacity(lines.len() + found.len());
    let mut pending = found.iter().peekable();

    for (line_index, line) in lines.into_iter().enumerate() {
        let heading = pending
            .next_if(|(at, _)| *at == line_index)
            .and_then(|&(_, ordinal)| table.get(ordinal));

        match heading {
            Some(heading) => {
                out.push(anchor_tag(&heading.anchor));
                out.push(heading_line(&line, heading, colors));
            }
            None => out.push(line),
        }
    }

    out
}

fn anchor_tag(anchor: &str) -> String {
    format!("{ANCHOR_TAG_PREFIX}{anchor}{ANCHOR_TAG_SUFFIX}")
}

/// Render `heading` in place of `line`, keeping the line's trailing newline.
fn heading_line(line: &str, heading: &Heading, colors: Option<&[Color]>) -> String {
    let title = match colors {
        Some(colors) => colorize(&heading.title, heading.level, colors),
        None => heading.title.clone(),
    };
    let newline = if line.ends_with('\n') { "\n" } else { "" };
    format!("{} {title}{newline}", "#".repeat(heading.level + 1))
}

/// Wrap `title` in a color span picked by nesting level. `colors` must be non-empty.
pub fn colorize(title: &str, level: usize, colors: &[Color]) -> String {
    let color = &colors[level % colors.len()];
    format!("<span style=\"color: {color}\">{title}</span>")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
