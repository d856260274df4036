//! Command-line front ends for the generator, the batch driver and the
//! preview generator.

use crate::batch::{run_catalog, SubprocessRunner, EXAMPLE_CATALOG};
use crate::generate::{GenerateError, SheetOptions};
use crate::preview::{collect_documents, generate_previews, Pdftoppm, PreviewOptions, Rasterizer};
use crate::source::BuiltinMarkerSource;
#[cfg(feature = "tracing")]
use aruco_laser_core::init_tracing;
#[cfg(not(feature = "tracing"))]
use aruco_laser_core::init_with_level;
use aruco_laser_core::{ArucoDictionary, MarkerSelection, PageSize};
use clap::{Parser, ValueEnum};
#[cfg(not(feature = "tracing"))]
use log::LevelFilter;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "verbatim")]
pub enum PageSizeArg {
    A4,
    #[value(name = "letter")]
    Letter,
}

impl From<PageSizeArg> for PageSize {
    fn from(arg: PageSizeArg) -> Self {
        match arg {
            PageSizeArg::A4 => PageSize::A4,
            PageSizeArg::Letter => PageSize::Letter,
        }
    }
}

/// Generate ArUco markers as a laser-ready PDF (blue = engrave, red = cut).
#[derive(Parser, Debug)]
#[command(name = "aruco-laser", version, about, long_about = None)]
pub struct GenerateArgs {
    /// ArUco dictionary, e.g. 4X4_50, 5X5_100, 6X6_250, 7X7_1000.
    #[arg(long = "dict", visible_alias = "dictionary", value_name = "DICT", default_value = "4X4_50")]
    pub dictionary: ArucoDictionary,

    /// Output PDF file.
    #[arg(short, long, value_name = "PATH", default_value = "aruco_markers.pdf")]
    pub output: PathBuf,

    /// Marker size in mm.
    #[arg(short = 's', long = "size", value_name = "MM", default_value_t = 10.0)]
    pub size: f64,

    /// White border between marker and cut line, in mm.
    #[arg(short, long, value_name = "MM", default_value_t = 0.5)]
    pub border: f64,

    /// Spacing between markers in mm.
    #[arg(long, value_name = "MM", default_value_t = 20.0)]
    pub spacing: f64,

    /// Specific marker IDs to generate.
    #[arg(
        short,
        long,
        value_name = "ID",
        num_args = 1..,
        allow_negative_numbers = true,
        conflicts_with = "range"
    )]
    pub ids: Option<Vec<i64>>,

    /// Inclusive range of marker IDs.
    #[arg(
        short,
        long,
        num_args = 2,
        value_names = ["START", "END"],
        allow_negative_numbers = true
    )]
    pub range: Option<Vec<i64>>,

    /// Markers per page when no explicit grid is given.
    #[arg(short = 'p', long = "per-page", value_name = "N", default_value_t = 20)]
    pub per_page: u32,

    /// Number of rows per page.
    #[arg(long, value_name = "N")]
    pub nrows: Option<u32>,

    /// Number of columns per page.
    #[arg(long, value_name = "N")]
    pub ncols: Option<u32>,

    /// Page size.
    #[arg(long = "page-size", value_enum, ignore_case = true, default_value = "A4")]
    pub page_size: PageSizeArg,

    /// Hide marker ID labels.
    #[arg(long = "no-labels")]
    pub no_labels: bool,

    /// Also write a JSON report of the generated sheet.
    #[arg(long, value_name = "PATH")]
    pub report: Option<PathBuf>,

    /// Verbose logging.
    #[arg(short, long)]
    pub verbose: bool,
}

impl GenerateArgs {
    pub fn selection(&self) -> MarkerSelection {
        match (&self.ids, self.range.as_deref()) {
            (Some(ids), _) => MarkerSelection::Ids(ids.clone()),
            (None, Some([start, end])) => MarkerSelection::Range {
                start: *start,
                end: *end,
            },
            _ => MarkerSelection::All,
        }
    }

    pub fn sheet_options(&self) -> SheetOptions {
        SheetOptions {
            dictionary: self.dictionary,
            selection: self.selection(),
            output: self.output.clone(),
            marker_size_mm: self.size,
            border_mm: self.border,
            spacing_mm: self.spacing,
            page: self.page_size.into(),
            markers_per_page: self.per_page,
            rows: self.nrows,
            cols: self.ncols,
            show_labels: !self.no_labels,
        }
    }
}

fn init_logging(verbose: bool) {
    #[cfg(not(feature = "tracing"))]
    {
        let level = if verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        };
        let _ = init_with_level(level);
    }

    // RUST_LOG drives the filter here; -v only affects the plain logger.
    #[cfg(feature = "tracing")]
    {
        let _ = verbose;
        init_tracing();
    }
}

pub fn run_generate(args: GenerateArgs) -> ExitCode {
    init_logging(args.verbose);

    let options = args.sheet_options();
    let plan = match options.prepare() {
        Ok(plan) => plan,
        Err(err @ GenerateError::InvalidMarkerId(_)) => {
            println!("Error: {err}");
            return ExitCode::FAILURE;
        }
        Err(err) => {
            eprintln!("Error: {err}");
            return ExitCode::FAILURE;
        }
    };

    println!("{}", plan.summary());
    let report = match plan.write_pdf(&BuiltinMarkerSource) {
        Ok(report) => report,
        Err(err) => {
            eprintln!("Error: {err}");
            return ExitCode::FAILURE;
        }
    };
    println!(
        "\n✓ Generated {} markers in {}",
        report.marker_count,
        options.output.display()
    );

    if let Some(path) = &args.report {
        if let Err(err) = report.write_json(path) {
            eprintln!("Error: failed to write report {}: {err}", path.display());
            return ExitCode::FAILURE;
        }
        log::info!("report written to {}", path.display());
    }
    ExitCode::SUCCESS
}

/// Regenerate the standard set of example sheets.
#[derive(Parser, Debug)]
#[command(name = "aruco-laser-examples", version, about, long_about = None)]
pub struct ExamplesArgs {
    /// Directory for the generated sheets.
    #[arg(long = "output-dir", value_name = "DIR", default_value = "examples_out")]
    pub output_dir: PathBuf,

    /// Generator binary; defaults to the one installed next to this tool.
    #[arg(long, value_name = "PATH")]
    pub generator: Option<PathBuf>,

    /// Verbose logging.
    #[arg(short, long)]
    pub verbose: bool,
}

pub fn run_examples(args: ExamplesArgs) -> ExitCode {
    init_logging(args.verbose);

    if let Err(err) = std::fs::create_dir_all(&args.output_dir) {
        eprintln!(
            "Error: cannot create {}: {err}",
            args.output_dir.display()
        );
        return ExitCode::FAILURE;
    }

    let mut runner = match &args.generator {
        Some(program) => SubprocessRunner::new(program, &args.output_dir),
        None => match SubprocessRunner::sibling_generator(&args.output_dir) {
            Ok(runner) => runner,
            Err(err) => {
                eprintln!("Error: cannot locate the generator binary: {err}");
                return ExitCode::FAILURE;
            }
        },
    };
    log::debug!("generator: {}", runner.program().display());

    println!("Generating {} example sheets", EXAMPLE_CATALOG.len());
    println!("Output directory: {}", args.output_dir.display());
    let summary = run_catalog(&EXAMPLE_CATALOG, &mut runner);

    println!("{}", "=".repeat(60));
    println!(
        "Completed: {}/{} successful",
        summary.succeeded,
        summary.total()
    );
    if summary.is_success() {
        ExitCode::SUCCESS
    } else {
        println!("Failed: {}", summary.failed.join(", "));
        ExitCode::FAILURE
    }
}

/// Render first-page PNG previews of generated sheets.
#[derive(Parser, Debug)]
#[command(name = "aruco-laser-previews", version, about, long_about = None)]
pub struct PreviewArgs {
    /// Directory containing the PDF sheets.
    #[arg(long = "input-dir", value_name = "DIR", default_value = "examples_out")]
    pub input_dir: PathBuf,

    /// Directory for previews; defaults to `<input-dir>/previews`.
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    #[arg(long, default_value_t = 150)]
    pub dpi: u32,

    #[arg(long = "max-width", default_value_t = 800)]
    pub max_width: u32,

    #[arg(long = "max-height", default_value_t = 600)]
    pub max_height: u32,

    /// Verbose logging.
    #[arg(short, long)]
    pub verbose: bool,
}

pub fn run_previews(args: PreviewArgs) -> ExitCode {
    init_logging(args.verbose);

    let documents = match collect_documents(&args.input_dir) {
        Ok(docs) if !docs.is_empty() => docs,
        Ok(_) => {
            eprintln!("Error: no PDF files in {}", args.input_dir.display());
            return ExitCode::FAILURE;
        }
        Err(err) => {
            eprintln!("Error: cannot read {}: {err}", args.input_dir.display());
            return ExitCode::FAILURE;
        }
    };

    let rasterizer = Pdftoppm::default();
    if !rasterizer.is_available() {
        eprintln!("Error: pdftoppm not found; install poppler-utils");
        return ExitCode::FAILURE;
    }

    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| args.input_dir.join("previews"));
    let options = PreviewOptions {
        dpi: args.dpi,
        max_width: args.max_width,
        max_height: args.max_height,
    };

    println!("Generating previews for {} PDF files", documents.len());
    let summary = generate_previews(&rasterizer, &documents, &output_dir, &options);
    println!(
        "Created {}/{} previews in {}",
        summary.created.len(),
        documents.len(),
        output_dir.display()
    );
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let args = GenerateArgs::try_parse_from(["aruco-laser"]).unwrap();
        let options = args.sheet_options();
        assert_eq!(options, SheetOptions::default());
    }

    #[test]
    fn range_and_ids_are_exclusive() {
        let err = GenerateArgs::try_parse_from(["aruco-laser", "-i", "1", "-r", "0", "3"]);
        assert!(err.is_err());
    }

    #[test]
    fn range_takes_two_values() {
        let args = GenerateArgs::try_parse_from(["aruco-laser", "-r", "3", "7"]).unwrap();
        assert_eq!(
            args.selection(),
            MarkerSelection::Range { start: 3, end: 7 }
        );
        assert!(GenerateArgs::try_parse_from(["aruco-laser", "-r", "3"]).is_err());
    }

    #[test]
    fn negative_ids_reach_validation() {
        let args = GenerateArgs::try_parse_from(["aruco-laser", "-i", "0", "-1"]).unwrap();
        assert_eq!(args.selection(), MarkerSelection::Ids(vec![0, -1]));
    }

    #[test]
    fn dictionary_and_page_size_parse_loosely() {
        let args = GenerateArgs::try_parse_from([
            "aruco-laser",
            "--dictionary",
            "dict_6x6_250",
            "--page-size",
            "LETTER",
            "--nrows",
            "4",
            "--no-labels",
        ])
        .unwrap();
        let options = args.sheet_options();
        assert_eq!(options.dictionary, ArucoDictionary::Dict6x6_250);
        assert_eq!(options.page, PageSize::Letter);
        assert_eq!(options.rows, Some(4));
        assert!(!options.show_labels);
    }

    #[test]
    fn logging_init_is_repeatable() {
        // Installs the tracing subscriber when built with `tracing`.
        init_logging(false);
        init_logging(true);
        log::debug!("logger installed");
    }

    #[test]
    fn preview_output_defaults_under_input() {
        let args = PreviewArgs::try_parse_from(["aruco-laser-previews", "--input-dir", "sheets"])
            .unwrap();
        assert_eq!(args.output_dir, None);
        assert_eq!(args.dpi, 150);
        assert_eq!((args.max_width, args.max_height), (800, 600));
    }
}
