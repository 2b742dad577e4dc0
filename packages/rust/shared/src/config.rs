//! Application configuration for chulo.
//!
//! User config lives at `~/.chulo/chulo.toml`.
//! CLI flags override config file values, which override defaults.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ChuloError, Result};
use crate::heading::Color;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "chulo.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".chulo";

/// Suffix appended to the notebook stem when no other is configured.
pub const DEFAULT_OUTPUT_SUFFIX: &str = "_chulo";

// ---------------------------------------------------------------------------
// Config structs (matching chulo.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Global defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// User-defined named palettes.
    #[serde(default)]
    pub palettes: BTreeMap<String, Vec<Color>>,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Appended to the input stem to name the output notebook.
    #[serde(default = "default_output_suffix")]
    pub output_suffix: String,

    /// Pretty-print the output JSON.
    #[serde(default)]
    pub pretty: bool,

    /// Insert an anchor before every heading line instead of only the last one per cell.
    #[serde(default)]
    pub anchor_each: bool,

    /// Palette used when none is given on the command line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub palette: Option<String>,

    /// Explicit heading colors, cycled by level.
    #[serde(default)]
    pub colors: Vec<Color>,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            output_suffix: default_output_suffix(),
            pretty: false,
            anchor_each: false,
            palette: None,
            colors: Vec::new(),
        }
    }
}

fn default_output_suffix() -> String {
    DEFAULT_OUTPUT_SUFFIX.into()
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.chulo/`).
pub fn config_dir() -> Result<PathBuf> {
    let home =
        dirs::home_dir().ok_or_else(|| ChuloError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.chulo/chulo.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| ChuloError::io(path, e))?;

    let config: AppConfig = toml::from_str(&content)
        .map_err(|e| ChuloError::config(format!("failed to parse {}: {e}", path.display())))?;

    validate_config(&config)?;
    Ok(config)
}

/// Reject config values that would produce unusable output paths.
pub fn validate_config(config: &AppConfig) -> Result<()> {
    let suffix = &config.defaults.output_suffix;
    if suffix.is_empty() {
        return Err(ChuloError::config(
            "output_suffix must not be empty (the input notebook would be overwritten)",
        ));
    }
    if suffix.contains(['/', '\\']) {
        return Err(ChuloError::config(format!(
            "output_suffix '{suffix}' must not contain path separators"
        )));
    }
    if let Some((name, _)) = config.palettes.iter().find(|(_, colors)| colors.is_empty()) {
        return Err(ChuloError::config(format!("palette '{name}' has no colors")));
    }
    Ok(())
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| ChuloError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| ChuloError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| ChuloError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("output_suffix"));
        assert!(toml_str.contains("_chulo"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.defaults.output_suffix, DEFAULT_OUTPUT_SUFFIX);
        assert!(!parsed.defaults.pretty);
        assert!(parsed.defaults.palette.is_none());
    }

    #[test]
    fn config_with_palettes() {
        let toml_str = r##"
[defaults]
palette = "sunset"
pretty = true

[palettes]
sunset = ["#ff5e3a", "#ff2a68"]
"##;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.defaults.palette.as_deref(), Some("sunset"));
        assert!(config.defaults.pretty);
        assert_eq!(config.palettes["sunset"].len(), 2);
        assert_eq!(config.palettes["sunset"][0].as_str(), "#ff5e3a");
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn empty_suffix_rejected() {
        let mut config = AppConfig::default();
        config.defaults.output_suffix = String::new();
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("output_suffix"));
    }

    #[test]
    fn empty_palette_rejected() {
        let mut config = AppConfig::default();
        config.palettes.insert("nothing".into(), vec![]);
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("nothing"));
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let path = std::env::temp_dir().join("chulo-no-such-dir/chulo.toml");
        let err = load_config_from(&path).unwrap_err();
        assert!(matches!(err, ChuloError::Io { .. }));
    }
}
