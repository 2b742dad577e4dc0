//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use chulo_core::annotate::HeadingMode;
use chulo_core::palette::{ConfiguredPalettes, PaletteResolver};
use chulo_core::pipeline::{
    TransformOptions, TransformRequest, render_notebook, transform_and_save,
};
use chulo_shared::{AppConfig, Color, init_config, load_config, load_config_from};
use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// chulo — dress up notebooks with a table of contents.
#[derive(Parser)]
#[command(
    name = "chulo",
    version,
    about = "Add heading anchors, colors, and a linked table of contents to notebooks.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file to use instead of ~/.chulo/chulo.toml.
    #[arg(long = "config", global = true, env = "CHULO_CONFIG")]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Annotate a notebook and write `<name>_chulo.ipynb`.
    Annotate(AnnotateArgs),

    /// List available color palettes.
    Palettes,

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Arguments for `chulo annotate`.
#[derive(clap::Args)]
pub(crate) struct AnnotateArgs {
    /// Notebook to annotate.
    pub file: PathBuf,

    /// Named color palette (overrides --color).
    #[arg(short, long)]
    pub palette: Option<String>,

    /// Heading color, repeatable; cycled by heading level.
    #[arg(short, long = "color", value_name = "COLOR")]
    pub colors: Vec<String>,

    /// Anchor every heading in a cell instead of only the last one.
    #[arg(long)]
    pub anchor_each: bool,

    /// Annotate even if the notebook already has a contents cell.
    #[arg(long)]
    pub force: bool,

    /// Do not write the output file.
    #[arg(long)]
    pub no_save: bool,

    /// Print the annotated notebook to stdout.
    #[arg(long)]
    pub stdout: bool,

    /// Output path (defaults to <name><suffix>.ipynb next to the input).
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Pretty-print the output JSON.
    #[arg(long)]
    pub pretty: bool,
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
///
/// Logs go to stderr so `--stdout` output stays clean.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "chulo=info",
        1 => "chulo=debug",
        _ => "chulo=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<()> {
    let config = resolve_config(cli.config_file.as_deref())?;

    match cli.command {
        Command::Annotate(args) => cmd_annotate(args, &config),
        Command::Palettes => cmd_palettes(&config),
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(&config),
        },
    }
}

fn resolve_config(path: Option<&Path>) -> Result<AppConfig> {
    let config = match path {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };
    Ok(config)
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

fn cmd_annotate(args: AnnotateArgs, config: &AppConfig) -> Result<()> {
    if !args.file.is_file() {
        return Err(eyre!("notebook '{}' not found", args.file.display()));
    }

    let request = build_request(&args, config);
    let resolver = ConfiguredPalettes::new(config.palettes.clone());

    info!(
        file = %request.path.display(),
        palette = request.palette.as_deref().unwrap_or("none"),
        "annotating notebook"
    );

    let outcome = transform_and_save(&request, &resolver)?;

    if args.stdout {
        println!("{}", render_notebook(&outcome.notebook, request.pretty)?);
    }

    info!(headings = outcome.heading_count, "contents built");

    if let Some(path) = &outcome.output_path {
        if args.stdout {
            eprintln!("Saved as {}", path.display());
        } else {
            println!("Saved as {}", path.display());
        }
    }

    Ok(())
}

/// Merge CLI flags over config defaults.
fn build_request(args: &AnnotateArgs, config: &AppConfig) -> TransformRequest {
    let defaults = &config.defaults;

    let colors: Vec<Color> = if args.colors.is_empty() {
        defaults.colors.clone()
    } else {
        args.colors.iter().map(|c| Color::from(c.as_str())).collect()
    };

    // A color given on the command line beats a palette from the config file.
    let palette = args
        .palette
        .clone()
        .or_else(|| args.colors.is_empty().then(|| defaults.palette.clone()).flatten());

    let mode = if args.anchor_each || defaults.anchor_each {
        HeadingMode::Each
    } else {
        HeadingMode::LastOnly
    };

    TransformRequest {
        path: args.file.clone(),
        palette,
        colors: (!colors.is_empty()).then_some(colors),
        options: TransformOptions {
            mode,
            force: args.force,
        },
        save: !args.no_save,
        output: args.out.clone(),
        output_suffix: defaults.output_suffix.clone(),
        pretty: args.pretty || defaults.pretty,
    }
}

fn cmd_palettes(config: &AppConfig) -> Result<()> {
    let resolver = ConfiguredPalettes::new(config.palettes.clone());

    for name in resolver.names() {
        let colors = resolver.resolve(&name)?;
        let listed: Vec<&str> = colors.iter().map(Color::as_str).collect();
        println!("{name:<12} {}", listed.join(" "));
    }

    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(config: &AppConfig) -> Result<()> {
    let toml_str = toml::to_string_pretty(config)?;
    println!("{toml_str}");
    Ok(())
}
