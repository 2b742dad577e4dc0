//! Shared types, error model, and configuration for chulo.
//!
//! This crate is the foundation depended on by the other chulo crates.
//! It provides:
//! - [`ChuloError`] — the unified error type
//! - The notebook model ([`Notebook`], [`Cell`], [`Source`], [`CellId`])
//! - Heading metadata ([`Heading`], [`HeadingTable`], [`Color`])
//! - Configuration ([`AppConfig`], config loading)

pub mod config;
pub mod error;
pub mod heading;
pub mod notebook;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DEFAULT_OUTPUT_SUFFIX, DefaultsConfig, config_dir, config_file_path, init_config,
    load_config, load_config_from, validate_config,
};
pub use error::{ChuloError, Result};
pub use heading::{Color, Heading, HeadingTable};
pub use notebook::{Cell, CellId, MARKDOWN_CELL, Notebook, Source};
