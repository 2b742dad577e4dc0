//! chulo CLI — table of contents and heading anchors for notebooks.
//!
//! Reads a notebook, anchors its markdown headings, prepends a linked
//! contents cell, and writes `<name>_chulo.ipynb` next to the input.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli)
}
