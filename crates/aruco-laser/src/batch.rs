//! Regenerate the standard set of example sheets.
//!
//! Each catalog entry is one generator invocation. Entries run one after
//! another in separate processes; a failing entry is recorded and the batch
//! moves on.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

/// One named example sheet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExampleSpec {
    /// Output file name, also used as the entry's identity.
    pub name: &'static str,
    pub description: &'static str,
    /// Generator arguments, without the output path.
    pub args: &'static [&'static str],
}

const fn example(
    name: &'static str,
    description: &'static str,
    args: &'static [&'static str],
) -> ExampleSpec {
    ExampleSpec {
        name,
        description,
        args,
    }
}

/// The standard example set.
pub static EXAMPLE_CATALOG: [ExampleSpec; 25] = [
    // labels
    example(
        "01_standard_10mm_with_labels.pdf",
        "Standard 10mm markers with labels - all 50 markers, 25 per page",
        &["--dict", "4X4_50", "-r", "0", "49", "-s", "10", "--spacing", "15", "-p", "25"],
    ),
    example(
        "02_standard_10mm_no_labels.pdf",
        "Standard 10mm markers without labels - clean production look",
        &["--dict", "4X4_50", "-r", "0", "49", "-s", "10", "--spacing", "15", "--no-labels", "-p", "25"],
    ),
    // page sizes
    example(
        "03_letter_page_size.pdf",
        "Letter page size - 30 markers per page",
        &["--dict", "4X4_50", "-r", "0", "49", "-s", "10", "--spacing", "15", "--page-size", "letter", "-p", "30", "--no-labels"],
    ),
    example(
        "04_a4_page_size.pdf",
        "A4 page size - 25 markers per page",
        &["--dict", "4X4_50", "-r", "0", "49", "-s", "10", "--spacing", "15", "--page-size", "A4", "-p", "25", "--no-labels"],
    ),
    // marker sizes
    example(
        "05_compact_3mm_dense.pdf",
        "Compact 3mm markers - maximum density, 50 per page",
        &["--dict", "4X4_50", "-r", "0", "49", "-s", "3", "--spacing", "2", "--no-labels", "-p", "50"],
    ),
    example(
        "06_medium_15mm_standard.pdf",
        "Medium 15mm markers - standard production size",
        &["--dict", "4X4_50", "-r", "0", "49", "-s", "15", "--spacing", "20", "--no-labels", "-p", "16"],
    ),
    example(
        "07_large_25mm_high_visibility.pdf",
        "Large 25mm markers - high visibility, long-range detection",
        &["--dict", "4X4_50", "-r", "0", "24", "-s", "25", "--spacing", "30", "-p", "9", "--no-labels"],
    ),
    // border widths
    example(
        "08_minimal_border_0.5mm.pdf",
        "Minimal 0.5mm border - most compact",
        &["--dict", "4X4_50", "-r", "0", "49", "-s", "10", "-b", "0.5", "--spacing", "15", "--no-labels", "-p", "25"],
    ),
    example(
        "09_standard_border_1mm.pdf",
        "Standard 1mm border - recommended",
        &["--dict", "4X4_50", "-r", "0", "49", "-s", "10", "-b", "1.0", "--spacing", "15", "--no-labels", "-p", "25"],
    ),
    example(
        "10_thick_border_3mm.pdf",
        "Thick 3mm border - high contrast, easy detection",
        &["--dict", "4X4_50", "-r", "0", "24", "-s", "15", "-b", "3.0", "--spacing", "25", "--no-labels", "-p", "12"],
    ),
    // spacing
    example(
        "11_tight_spacing_5mm.pdf",
        "Tight 5mm spacing - maximum density",
        &["--dict", "4X4_50", "-r", "0", "49", "-s", "10", "--spacing", "5", "--no-labels", "-p", "30"],
    ),
    example(
        "12_standard_spacing_20mm.pdf",
        "Standard 20mm spacing - easy cutting",
        &["--dict", "4X4_50", "-r", "0", "49", "-s", "10", "--spacing", "20", "--no-labels", "-p", "20"],
    ),
    example(
        "13_generous_spacing_40mm.pdf",
        "Generous 40mm spacing - large markers, easy handling",
        &["--dict", "4X4_50", "-r", "0", "24", "-s", "12", "--spacing", "40", "--no-labels", "-p", "9"],
    ),
    // dictionaries
    example(
        "14_4x4_dictionary_50_markers.pdf",
        "4x4 dictionary - 50 markers, compact",
        &["--dict", "4X4_50", "-r", "0", "49", "-s", "10", "--spacing", "15", "--no-labels", "-p", "25"],
    ),
    example(
        "15_5x5_dictionary_100_markers.pdf",
        "5x5 dictionary - 100 markers, better reliability",
        &["--dict", "5X5_100", "-r", "0", "99", "-s", "10", "--spacing", "15", "--no-labels", "-p", "25"],
    ),
    example(
        "16_6x6_dictionary_250_markers.pdf",
        "6x6 dictionary - maximum reliability, 100 markers shown",
        &["--dict", "6X6_250", "-r", "0", "99", "-s", "10", "--spacing", "15", "--no-labels", "-p", "25"],
    ),
    example(
        "17_7x7_dictionary_sample.pdf",
        "7x7 dictionary - extreme conditions, 25 markers",
        &["--dict", "7X7_1000", "-r", "0", "24", "-s", "10", "--spacing", "15", "--no-labels", "-p", "25"],
    ),
    // explicit grids
    example(
        "18_custom_grid_5x5.pdf",
        "Custom 5x5 grid layout - 25 markers",
        &["--dict", "4X4_50", "-r", "0", "24", "--nrows", "5", "--ncols", "5", "-s", "10", "--spacing", "15", "--no-labels"],
    ),
    example(
        "19_custom_grid_4x6.pdf",
        "Custom 4x6 grid layout - 24 markers",
        &["--dict", "4X4_50", "-r", "0", "23", "--nrows", "4", "--ncols", "6", "-s", "10", "--spacing", "15", "--no-labels"],
    ),
    example(
        "20_custom_grid_10x2.pdf",
        "Custom 10x2 grid layout - 20 markers, vertical strip",
        &["--dict", "4X4_50", "-r", "0", "19", "--nrows", "10", "--ncols", "2", "-s", "10", "--spacing", "15", "--no-labels"],
    ),
    example(
        "21_custom_grid_2x10.pdf",
        "Custom 2x10 grid layout - 20 markers, horizontal strip",
        &["--dict", "4X4_50", "-r", "0", "19", "--nrows", "2", "--ncols", "10", "-s", "10", "--spacing", "15", "--no-labels"],
    ),
    // id selection
    example(
        "22_specific_markers_selected.pdf",
        "Specific marker IDs selected",
        &["--dict", "4X4_50", "-i", "0", "5", "10", "15", "20", "25", "30", "35", "40", "45", "-s", "12", "--spacing", "20", "-p", "12"],
    ),
    example(
        "23_single_marker_large.pdf",
        "Single large marker - 50mm, for testing/calibration",
        &["-i", "0", "-s", "50", "-b", "3", "--spacing", "10"],
    ),
    // production presets
    example(
        "24_production_standard.pdf",
        "Production standard - 12mm markers, 1.5mm border, 25mm spacing",
        &["--dict", "4X4_50", "-r", "0", "49", "-s", "12", "-b", "1.5", "--spacing", "25", "--no-labels", "-p", "20"],
    ),
    example(
        "25_production_compact.pdf",
        "Production compact - 8mm markers, optimized for space",
        &["--dict", "4X4_50", "-r", "0", "49", "-s", "8", "-b", "1.0", "--spacing", "12", "--no-labels", "-p", "30"],
    ),
];

/// A single catalog entry could not be generated.
#[derive(thiserror::Error, Debug)]
pub enum SubprocessFailure {
    #[error("failed to launch {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("generator exited with {status}: {stderr}")]
    Exit { status: String, stderr: String },
}

/// Runs one catalog entry in isolation.
pub trait ExampleRunner {
    fn run(&mut self, spec: &ExampleSpec) -> Result<(), SubprocessFailure>;
}

/// Runs the generator binary as a child process per entry.
#[derive(Clone, Debug)]
pub struct SubprocessRunner {
    program: PathBuf,
    output_dir: PathBuf,
}

/// Bytes of child stderr kept in a failure.
const STDERR_HEAD: usize = 200;

impl SubprocessRunner {
    pub fn new(program: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            output_dir: output_dir.into(),
        }
    }

    /// The generator binary installed next to the running executable.
    pub fn sibling_generator(output_dir: impl Into<PathBuf>) -> std::io::Result<Self> {
        let exe = std::env::current_exe()?;
        let dir = exe.parent().unwrap_or_else(|| Path::new("."));
        let program = dir.join(format!("aruco-laser{}", std::env::consts::EXE_SUFFIX));
        Ok(Self::new(program, output_dir))
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn output_path(&self, spec: &ExampleSpec) -> PathBuf {
        self.output_dir.join(spec.name)
    }

    /// Full argument list for `spec`, output path included.
    pub fn args(&self, spec: &ExampleSpec) -> Vec<OsString> {
        let mut args: Vec<OsString> = spec.args.iter().map(OsString::from).collect();
        args.push("-o".into());
        args.push(self.output_path(spec).into_os_string());
        args
    }
}

impl ExampleRunner for SubprocessRunner {
    fn run(&mut self, spec: &ExampleSpec) -> Result<(), SubprocessFailure> {
        let output = Command::new(&self.program)
            .args(self.args(spec))
            .output()
            .map_err(|source| SubprocessFailure::Launch {
                program: self.program.display().to_string(),
                source,
            })?;

        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let stdout = String::from_utf8_lossy(&output.stdout);
        // The generator reports id errors on stdout.
        let message = if stderr.trim().is_empty() { stdout } else { stderr };
        Err(SubprocessFailure::Exit {
            status: output.status.to_string(),
            stderr: message.trim().chars().take(STDERR_HEAD).collect(),
        })
    }
}

/// Outcome of a batch run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub succeeded: usize,
    /// Names of failed entries, in catalog order.
    pub failed: Vec<String>,
}

impl BatchSummary {
    pub fn total(&self) -> usize {
        self.succeeded + self.failed.len()
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Run every entry in order.
pub fn run_catalog<R>(specs: &[ExampleSpec], runner: &mut R) -> BatchSummary
where
    R: ExampleRunner + ?Sized,
{
    let mut summary = BatchSummary::default();
    for (idx, spec) in specs.iter().enumerate() {
        log::info!("[{}/{}] Generating {}...", idx + 1, specs.len(), spec.name);
        log::info!("  Description: {}", spec.description);
        match runner.run(spec) {
            Ok(()) => {
                log::info!("  ✓ Success");
                summary.succeeded += 1;
            }
            Err(err) => {
                log::error!("  ✗ Failed: {err}");
                summary.failed.push(spec.name.to_string());
            }
        }
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    struct Scripted {
        fail: &'static [&'static str],
        seen: Vec<&'static str>,
    }

    impl ExampleRunner for Scripted {
        fn run(&mut self, spec: &ExampleSpec) -> Result<(), SubprocessFailure> {
            self.seen.push(spec.name);
            if self.fail.contains(&spec.name) {
                Err(SubprocessFailure::Exit {
                    status: "exit status: 1".into(),
                    stderr: "boom".into(),
                })
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn catalog_names_are_unique_and_ordered() {
        let names: HashSet<&str> = EXAMPLE_CATALOG.iter().map(|s| s.name).collect();
        assert_eq!(names.len(), EXAMPLE_CATALOG.len());
        for (idx, spec) in EXAMPLE_CATALOG.iter().enumerate() {
            assert!(spec.name.starts_with(&format!("{:02}_", idx + 1)));
            assert!(spec.name.ends_with(".pdf"));
            assert!(!spec.args.contains(&"-o"));
        }
    }

    #[test]
    fn failures_do_not_stop_the_batch() {
        let mut runner = Scripted {
            fail: &["02_standard_10mm_no_labels.pdf", "17_7x7_dictionary_sample.pdf"],
            seen: Vec::new(),
        };
        let summary = run_catalog(&EXAMPLE_CATALOG, &mut runner);
        assert_eq!(runner.seen.len(), 25);
        assert_eq!(summary.succeeded, 23);
        assert_eq!(
            summary.failed,
            vec!["02_standard_10mm_no_labels.pdf", "17_7x7_dictionary_sample.pdf"]
        );
        assert_eq!(summary.total(), 25);
        assert!(!summary.is_success());
    }

    #[test]
    fn missing_program_is_a_launch_failure() {
        let dir = tempfile::tempdir().unwrap();
        let mut runner = SubprocessRunner::new(dir.path().join("no-such-generator"), dir.path());
        let summary = run_catalog(&EXAMPLE_CATALOG[..2], &mut runner);
        assert_eq!(summary.succeeded, 0);
        assert_eq!(summary.failed.len(), 2);

        let err = runner.run(&EXAMPLE_CATALOG[0]).unwrap_err();
        assert!(matches!(err, SubprocessFailure::Launch { .. }));
    }

    #[test]
    fn output_path_is_appended() {
        let runner = SubprocessRunner::new("aruco-laser", "out");
        let args = runner.args(&EXAMPLE_CATALOG[22]);
        let tail: Vec<_> = args[args.len() - 2..].to_vec();
        assert_eq!(
            tail,
            vec![
                OsString::from("-o"),
                Path::new("out").join("23_single_marker_large.pdf").into_os_string()
            ]
        );
    }
}
