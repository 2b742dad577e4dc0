//! Heading metadata collected while scanning markdown cells.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Heading
// ---------------------------------------------------------------------------

/// A markdown heading found in a notebook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    /// Zero-based position in document scan order.
    pub ordinal: usize,
    /// Nesting level: number of leading `#` minus one.
    pub level: usize,
    /// Heading text without the `#` run or surrounding whitespace.
    pub title: String,
    /// HTML anchor id, unique within the notebook.
    pub anchor: String,
}

// ---------------------------------------------------------------------------
// HeadingTable
// ---------------------------------------------------------------------------

/// Headings keyed by ordinal, in encounter order.
///
/// Ordinals are dense: the next ordinal is always the current length.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HeadingTable {
    entries: Vec<Heading>,
}

impl HeadingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ordinal the next pushed heading will receive.
    pub fn next_ordinal(&self) -> usize {
        self.entries.len()
    }

    /// Append a heading. Its ordinal must equal [`Self::next_ordinal`].
    pub fn push(&mut self, heading: Heading) {
        debug_assert_eq!(heading.ordinal, self.next_ordinal());
        self.entries.push(heading);
    }

    pub fn get(&self, ordinal: usize) -> Option<&Heading> {
        self.entries.get(ordinal)
    }

    pub fn last(&self) -> Option<&Heading> {
        self.entries.last()
    }

    /// Headings in ascending ordinal order.
    pub fn iter(&self) -> impl Iterator<Item = &Heading> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Color
// ---------------------------------------------------------------------------

/// A CSS color token (`"red"`, `"#4C72B0"`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(pub String);

impl Color {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Color {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Color {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn heading(ordinal: usize, title: &str) -> Heading {
        Heading {
            ordinal,
            level: 0,
            title: title.into(),
            anchor: format!("{title}_{ordinal}"),
        }
    }

    #[test]
    fn ordinals_follow_insertion_order() {
        let mut table = HeadingTable::new();
        assert_eq!(table.next_ordinal(), 0);

        table.push(heading(0, "Intro"));
        table.push(heading(1, "Details"));

        assert_eq!(table.next_ordinal(), 2);
        assert_eq!(table.last().map(|h| h.title.as_str()), Some("Details"));
        let titles: Vec<_> = table.iter().map(|h| h.title.as_str()).collect();
        assert_eq!(titles, ["Intro", "Details"]);
    }

    #[test]
    fn color_serializes_as_plain_string() {
        let colors: Vec<Color> = vec!["red".into(), "#00ff00".into()];
        let json = serde_json::to_string(&colors).expect("serialize");
        assert_eq!(json, r##"["red","#00ff00"]"##);
    }
}
