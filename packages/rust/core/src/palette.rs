//! Named color palettes.
//!
//! The annotator only consumes an ordered list of colors; turning a palette
//! name into that list goes through [`PaletteResolver`] so callers can inject
//! their own source of palettes.

use std::collections::BTreeMap;

use tracing::debug;

use chulo_shared::{ChuloError, Color, Result};

/// Resolves a palette name to an ordered, non-empty list of colors.
pub trait PaletteResolver {
    fn resolve(&self, name: &str) -> Result<Vec<Color>>;

    /// Palette names this resolver knows, sorted.
    fn names(&self) -> Vec<String>;
}

// ---------------------------------------------------------------------------
// Built-in palettes
// ---------------------------------------------------------------------------

/// The qualitative seaborn palettes, ten colors each.
const BUILTIN: &[(&str, [&str; 10])] = &[
    (
        "bright",
        [
            "#023EFF", "#FF7C00", "#1AC938", "#E8000B", "#8B2BE2", "#9F4800", "#F14CC1",
            "#A3A3A3", "#FFC400", "#00D7FF",
        ],
    ),
    (
        "colorblind",
        [
            "#0173B2", "#DE8F05", "#029E73", "#D55E00", "#CC78BC", "#CA9161", "#FBAFE4",
            "#949494", "#ECE133", "#56B4E9",
        ],
    ),
    (
        "dark",
        [
            "#001C7F", "#B1400D", "#12711C", "#8C0800", "#591E71", "#592F0D", "#A23582",
            "#3C3C3C", "#B8850A", "#006374",
        ],
    ),
    (
        "deep",
        [
            "#4C72B0", "#DD8452", "#55A868", "#C44E52", "#8172B3", "#937860", "#DA8BC3",
            "#8C8C8C", "#CCB974", "#64B5CD",
        ],
    ),
    (
        "muted",
        [
            "#4878D0", "#EE854A", "#6ACC64", "#D65F5F", "#956CB4", "#8C613C", "#DC7EC0",
            "#797979", "#D5BB67", "#82C6E2",
        ],
    ),
    (
        "pastel",
        [
            "#A1C9F4", "#FFB482", "#8DE5A1", "#FF9F9B", "#D0BBFF", "#DEBB9B", "#FAB0E4",
            "#CFCFCF", "#FFFEA3", "#B9F2F0",
        ],
    ),
];

/// Palettes compiled into the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinPalettes;

impl PaletteResolver for BuiltinPalettes {
    fn resolve(&self, name: &str) -> Result<Vec<Color>> {
        let wanted = name.trim().to_lowercase();
        BUILTIN
            .iter()
            .find(|(n, _)| *n == wanted)
            .map(|(_, colors)| colors.iter().map(|&c| Color::from(c)).collect())
            .ok_or_else(|| ChuloError::Palette { name: name.into() })
    }

    fn names(&self) -> Vec<String> {
        BUILTIN.iter().map(|(n, _)| n.to_string()).collect()
    }
}

// ---------------------------------------------------------------------------
// Config palettes
// ---------------------------------------------------------------------------

/// User palettes from the config file, falling back to the built-ins.
#[derive(Debug, Clone, Default)]
pub struct ConfiguredPalettes {
    palettes: BTreeMap<String, Vec<Color>>,
}

impl ConfiguredPalettes {
    pub fn new(palettes: BTreeMap<String, Vec<Color>>) -> Self {
        Self { palettes }
    }
}

impl PaletteResolver for ConfiguredPalettes {
    fn resolve(&self, name: &str) -> Result<Vec<Color>> {
        match self.palettes.get(name) {
            Some(colors) if !colors.is_empty() => {
                debug!(name, count = colors.len(), "using configured palette");
                Ok(colors.clone())
            }
            Some(_) => Err(ChuloError::config(format!("palette '{name}' has no colors"))),
            None => BuiltinPalettes.resolve(name),
        }
    }

    fn names(&self) -> Vec<String> {
        let mut names = BuiltinPalettes.names();
        names.extend(self.palettes.keys().cloned());
        names.sort();
        names.dedup();
        names
    }
}
