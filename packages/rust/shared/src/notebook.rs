//! Notebook document model.
//!
//! Only the fields chulo reads are typed. Everything else (`nbformat`,
//! `outputs`, `execution_count`, ...) rides along in `extra` maps so a
//! notebook survives a load/save round trip.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// `cell_type` value for markdown cells.
pub const MARKDOWN_CELL: &str = "markdown";

// ---------------------------------------------------------------------------
// Notebook
// ---------------------------------------------------------------------------

/// A notebook document: an ordered list of cells plus opaque top-level fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notebook {
    /// Cells in display order.
    pub cells: Vec<Cell>,
    /// Top-level fields chulo does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Notebook {
    /// Build a notebook from cells with no other top-level fields.
    pub fn from_cells(cells: Vec<Cell>) -> Self {
        Self {
            cells,
            extra: Map::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Cell
// ---------------------------------------------------------------------------

/// A single notebook cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    /// `"markdown"`, `"code"`, `"raw"`, ...
    pub cell_type: String,
    /// Cell identifier (absent in notebooks older than nbformat 4.5).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Source>,
    /// Cell fields chulo does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Cell {
    /// Create a markdown cell with the given id, empty metadata and source lines.
    pub fn markdown(id: impl Into<String>, lines: Vec<String>) -> Self {
        Self {
            cell_type: MARKDOWN_CELL.to_string(),
            id: Some(id.into()),
            metadata: Some(Map::new()),
            source: Some(Source::Lines(lines)),
            extra: Map::new(),
        }
    }

    /// Create a cell of any type with just a source.
    pub fn with_source(cell_type: impl Into<String>, lines: Vec<String>) -> Self {
        Self {
            cell_type: cell_type.into(),
            id: None,
            metadata: None,
            source: Some(Source::Lines(lines)),
            extra: Map::new(),
        }
    }

    pub fn is_markdown(&self) -> bool {
        self.cell_type == MARKDOWN_CELL
    }

    /// Source split into lines, each keeping its trailing newline.
    /// A cell without a source yields no lines.
    pub fn lines(&self) -> Vec<String> {
        self.source.as_ref().map(Source::lines).unwrap_or_default()
    }

    /// First source line, if any.
    pub fn first_line(&self) -> Option<String> {
        self.lines().into_iter().next()
    }
}

// ---------------------------------------------------------------------------
// Source
// ---------------------------------------------------------------------------

/// Cell source text. nbformat allows both a list of lines and a single string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Source {
    Lines(Vec<String>),
    Text(String),
}

impl Source {
    /// Normalize to a list of lines, each keeping its trailing `\n`.
    pub fn lines(&self) -> Vec<String> {
        match self {
            Self::Lines(lines) => lines.clone(),
            Self::Text(text) => text.split_inclusive('\n').map(String::from).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Lines(lines) => lines.is_empty(),
            Self::Text(text) => text.is_empty(),
        }
    }
}

// ---------------------------------------------------------------------------
// CellId
// ---------------------------------------------------------------------------

/// An 8-character lowercase hex cell identifier drawn from a random UUID.
///
/// Uniqueness against ids already present in a notebook is not checked.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CellId(String);

impl CellId {
    /// Length of a generated identifier.
    pub const LEN: usize = 8;

    /// Generate a fresh random identifier.
    pub fn generate() -> Self {
        let hex = Uuid::new_v4().simple().to_string();
        Self(hex[..Self::LEN].to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CellId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<CellId> for String {
    fn from(id: CellId) -> Self {
        id.0
    }
}
