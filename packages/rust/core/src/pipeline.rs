//! Load → annotate → save pipeline.
//!
//! Ties the annotator to the filesystem and to palette resolution. All I/O
//! happens here, before and after the single annotation pass.

use std::path::{Path, PathBuf};

use tracing::{info, instrument};

use chulo_shared::{ChuloError, Color, DEFAULT_OUTPUT_SUFFIX, Notebook, Result};

use crate::annotate::{Annotated, HeadingMode, annotate, is_annotated};
use crate::palette::PaletteResolver;

/// Notebook file extension.
const NOTEBOOK_EXT: &str = ".ipynb";

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Options controlling one transformation.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransformOptions {
    /// How multi-heading cells are anchored.
    pub mode: HeadingMode,
    /// Annotate even if the notebook was annotated before.
    pub force: bool,
}

/// Everything needed to transform one notebook file.
#[derive(Debug, Clone)]
pub struct TransformRequest {
    /// Input notebook path.
    pub path: PathBuf,
    /// Palette name; when set it overrides `colors`.
    pub palette: Option<String>,
    /// Explicit heading colors.
    pub colors: Option<Vec<Color>>,
    pub options: TransformOptions,
    /// Write the result to disk.
    pub save: bool,
    /// Output path override (defaults to [`output_path`]).
    pub output: Option<PathBuf>,
    /// Suffix used to derive the output path.
    pub output_suffix: String,
    /// Pretty-print the written JSON.
    pub pretty: bool,
}

impl TransformRequest {
    /// A request with default options that saves next to the input.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            palette: None,
            colors: None,
            options: TransformOptions::default(),
            save: true,
            output: None,
            output_suffix: DEFAULT_OUTPUT_SUFFIX.to_string(),
            pretty: false,
        }
    }
}

/// Output of [`transform_and_save`].
#[derive(Debug, Clone)]
pub struct TransformOutcome {
    /// The annotated notebook.
    pub notebook: Notebook,
    /// Number of headings listed in the contents cell.
    pub heading_count: usize,
    /// Where the notebook was written, if it was saved.
    pub output_path: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Transform
// ---------------------------------------------------------------------------

/// Annotate an in-memory notebook.
///
/// A `palette` name is resolved through `resolver` and replaces `colors`.
/// Refuses notebooks that were already annotated unless `options.force`.
#[instrument(skip(notebook, colors, resolver), fields(cells = notebook.cells.len()))]
pub fn transform(
    notebook: Notebook,
    palette: Option<&str>,
    colors: Option<Vec<Color>>,
    resolver: &dyn PaletteResolver,
    options: TransformOptions,
) -> Result<Annotated> {
    if !options.force && is_annotated(&notebook) {
        return Err(ChuloError::AlreadyAnnotated);
    }

    let colors = match palette {
        Some(name) => Some(resolver.resolve(name)?),
        None => colors,
    };

    annotate(notebook, colors.as_deref(), options.mode)
}

/// Load a notebook, transform it, and optionally save it.
#[instrument(skip_all, fields(path = %request.path.display(), save = request.save))]
pub fn transform_and_save(
    request: &TransformRequest,
    resolver: &dyn PaletteResolver,
) -> Result<TransformOutcome> {
    let notebook = load_notebook(&request.path)?;

    let annotated = transform(
        notebook,
        request.palette.as_deref(),
        request.colors.clone(),
        resolver,
        request.options,
    )?;

    let output_path = if request.save {
        let target = request
            .output
            .clone()
            .unwrap_or_else(|| output_path(&request.path, &request.output_suffix));
        save_notebook(&annotated.notebook, &target, request.pretty)?;
        Some(target)
    } else {
        None
    };

    Ok(TransformOutcome {
        heading_count: annotated.headings.len(),
        notebook: annotated.notebook,
        output_path,
    })
}

// ---------------------------------------------------------------------------
// Persistence
// ---------------------------------------------------------------------------

/// Read and parse a notebook file.
pub fn load_notebook(path: &Path) -> Result<Notebook> {
    let content = std::fs::read_to_string(path).map_err(|e| ChuloError::io(path, e))?;
    let notebook = parse_notebook(&content)
        .map_err(|e| ChuloError::parse(format!("failed to parse {}: {e}", path.display())))?;

    info!(path = %path.display(), cells = notebook.cells.len(), "loaded notebook");
    Ok(notebook)
}

/// Parse notebook JSON text.
pub fn parse_notebook(json: &str) -> std::result::Result<Notebook, serde_json::Error> {
    serde_json::from_str(json)
}

/// Serialize a notebook to JSON text.
pub fn render_notebook(notebook: &Notebook, pretty: bool) -> Result<String> {
    let rendered = if pretty {
        serde_json::to_string_pretty(notebook)
    } else {
        serde_json::to_string(notebook)
    };
    rendered.map_err(|e| ChuloError::parse(format!("failed to serialize notebook: {e}")))
}

/// Write a notebook as JSON.
pub fn save_notebook(notebook: &Notebook, path: &Path, pretty: bool) -> Result<()> {
    let content = render_notebook(notebook, pretty)?;
    std::fs::write(path, content).map_err(|e| ChuloError::io(path, e))?;

    info!(path = %path.display(), "saved notebook");
    Ok(())
}

/// Derive the output path: `dir/lesson.ipynb` → `dir/lesson{suffix}.ipynb`.
pub fn output_path(input: &Path, suffix: &str) -> PathBuf {
    let file_name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = file_name.strip_suffix(NOTEBOOK_EXT).unwrap_or(&file_name);

    input.with_file_name(format!("{stem}{suffix}{NOTEBOOK_EXT}"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contents::TOC_HEADER;
    use crate::palette::BuiltinPalettes;
    use chulo_shared::Cell;
    use uuid::Uuid;

    const FIXTURE: &str = "../../../fixtures/notebooks/lesson.ipynb";

    fn tmp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("chulo-{tag}-{}", Uuid::now_v7()));
        std::fs::create_dir_all(&dir).expect("create temp dir");
        dir
    }

    fn heading_notebook() -> Notebook {
        Notebook::from_cells(vec![Cell::with_source("markdown", vec!["# Intro\n".into()])])
    }

    #[test]
    fn output_path_appends_suffix() {
        assert_eq!(
            output_path(Path::new("notes/lesson.ipynb"), "_chulo"),
            PathBuf::from("notes/lesson_chulo.ipynb")
        );
        assert_eq!(
            output_path(Path::new("lesson.ipynb"), "_toc"),
            PathBuf::from("lesson_toc.ipynb")
        );
        assert_eq!(
            output_path(Path::new("a.b/raw"), "_chulo"),
            PathBuf::from("a.b/raw_chulo.ipynb")
        );
    }

    #[test]
    fn palette_overrides_colors() {
        let annotated = transform(
            heading_notebook(),
            Some("deep"),
            Some(vec![Color::from("red")]),
            &BuiltinPalettes,
            TransformOptions::default(),
        )
        .expect("transform");

        assert_eq!(
            annotated.notebook.cells[1].lines()[1],
            "# <span style=\"color: #4C72B0\">Intro</span>\n"
        );
    }

    #[test]
    fn explicit_colors_used_without_palette() {
        let annotated = transform(
            heading_notebook(),
            None,
            Some(vec![Color::from("red")]),
            &BuiltinPalettes,
            TransformOptions::default(),
        )
        .expect("transform");

        assert_eq!(
            annotated.notebook.cells[1].lines()[1],
            "# <span style=\"color: red\">Intro</span>\n"
        );
    }

    #[test]
    fn unknown_palette_aborts() {
        let err = transform(
            heading_notebook(),
            Some("rainbow"),
            None,
            &BuiltinPalettes,
            TransformOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ChuloError::Palette { .. }));
    }

    #[test]
    fn already_annotated_refused_unless_forced() {
        let once = transform(
            heading_notebook(),
            None,
            None,
            &BuiltinPalettes,
            TransformOptions::default(),
        )
        .expect("first pass");

        let err = transform(
            once.notebook.clone(),
            None,
            None,
            &BuiltinPalettes,
            TransformOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ChuloError::AlreadyAnnotated));

        let forced = TransformOptions {
            force: true,
            ..TransformOptions::default()
        };
        let twice = transform(once.notebook.clone(), None, None, &BuiltinPalettes, forced)
            .expect("forced pass");
        assert_ne!(twice.notebook, once.notebook);
    }

    #[test]
    fn hand_written_anchor_transforms_without_force() {
        let hand_anchored = Cell::with_source(
            "markdown",
            vec!["<a class=\"anchor\" id=\"intro\"></a>\n".into(), "Some prose\n".into()],
        );
        let notebook = Notebook::from_cells(vec![
            hand_anchored.clone(),
            Cell::with_source("markdown", vec!["# Real\n".into()]),
        ]);

        let annotated = transform(
            notebook,
            None,
            None,
            &BuiltinPalettes,
            TransformOptions::default(),
        )
        .expect("transform");

        assert_eq!(annotated.notebook.cells[1], hand_anchored);
        assert_eq!(
            annotated.notebook.cells[0].lines(),
            vec![TOC_HEADER, "+ [Real](#Real_0)\n"]
        );
    }

    #[test]
    fn fixture_transforms_and_saves() {
        let dir = tmp_dir("fixture");
        let input = dir.join("lesson.ipynb");
        std::fs::copy(FIXTURE, &input).expect("copy fixture");

        let outcome =
            transform_and_save(&TransformRequest::new(&input), &BuiltinPalettes).expect("run");

        let written = outcome.output_path.clone().expect("saved");
        assert_eq!(written, dir.join("lesson_chulo.ipynb"));
        assert_eq!(outcome.heading_count, 4);

        let reloaded = load_notebook(&written).expect("reload");
        assert_eq!(reloaded, outcome.notebook);
        assert_eq!(reloaded.cells[0].first_line().as_deref(), Some(TOC_HEADER));
        assert_eq!(reloaded.extra["nbformat"], 4);

        // Input left untouched.
        let original = load_notebook(&input).expect("original");
        assert!(!is_annotated(&original));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn fixture_contents_lines() {
        let notebook = load_notebook(Path::new(FIXTURE)).expect("load fixture");
        let annotated = transform(
            notebook,
            None,
            None,
            &BuiltinPalettes,
            TransformOptions::default(),
        )
        .expect("transform");

        assert_eq!(
            annotated.notebook.cells[0].lines(),
            vec![
                TOC_HEADER,
                "+ [Linear Regression](#Linear_Regression_0)\n",
                "\t+ [Loading the data](#Loading_the_data_1)\n",
                "\t+ [Fitting a model](#Fitting_a_model_2)\n",
                "\t\t+ [Residuals](#Residuals_3)\n",
            ]
        );
    }

    #[test]
    fn no_save_skips_write() {
        let dir = tmp_dir("nosave");
        let input = dir.join("nb.ipynb");
        save_notebook(&heading_notebook(), &input, false).expect("write input");

        let request = TransformRequest {
            save: false,
            ..TransformRequest::new(&input)
        };
        let outcome = transform_and_save(&request, &BuiltinPalettes).expect("run");

        assert!(outcome.output_path.is_none());
        assert!(!dir.join("nb_chulo.ipynb").exists());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn explicit_output_and_pretty() {
        let dir = tmp_dir("out");
        let input = dir.join("nb.ipynb");
        save_notebook(&heading_notebook(), &input, false).expect("write input");

        let target = dir.join("custom.ipynb");
        let request = TransformRequest {
            output: Some(target.clone()),
            pretty: true,
            ..TransformRequest::new(&input)
        };
        transform_and_save(&request, &BuiltinPalettes).expect("run");

        let text = std::fs::read_to_string(&target).expect("read output");
        assert!(text.contains("\n  \"cells\""));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_notebook(Path::new("/definitely/not/here.ipynb")).unwrap_err();
        assert!(matches!(err, ChuloError::Io { .. }));
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let dir = tmp_dir("bad");
        let input = dir.join("bad.ipynb");
        std::fs::write(&input, "{ not json").expect("write");

        let err = load_notebook(&input).unwrap_err();
        assert!(matches!(err, ChuloError::Parse { .. }));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
