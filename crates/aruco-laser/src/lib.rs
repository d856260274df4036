//! Printable ArUco marker sheets for laser cutting and engraving.
//!
//! Every marker on a generated sheet is drawn as blue filled squares (engrave)
//! inside a red square outline (cut), optionally with its id printed below.
//! Markers are laid out on a centred grid and paginated.
//!
//! This crate ties the pieces together:
//! - [`source`] looks up marker bit patterns in the OpenCV-compatible
//!   dictionaries shipped by `calib-targets-aruco`,
//! - [`generate`] validates options and renders a sheet into a PDF,
//! - [`batch`] regenerates the standard example sheets,
//! - [`preview`] renders PNG thumbnails of generated sheets.
//!
//! The geometry lives in [`aruco_laser_core`] and the PDF writer in
//! [`aruco_laser_pdf`]; both are re-exported.
//!
//! ## Quickstart
//!
//! ```no_run
//! use aruco_laser::aruco_laser_core::MarkerSelection;
//! use aruco_laser::{generate_sheet, BuiltinMarkerSource, SheetOptions};
//!
//! let options = SheetOptions {
//!     selection: MarkerSelection::Range { start: 0, end: 24 },
//!     markers_per_page: 25,
//!     output: "markers.pdf".into(),
//!     ..SheetOptions::default()
//! };
//! let report = generate_sheet(&options, &BuiltinMarkerSource)?;
//! println!("{} markers on {} page(s)", report.marker_count, report.pages);
//! # Ok::<(), aruco_laser::GenerateError>(())
//! ```

pub use aruco_laser_core;
pub use aruco_laser_pdf;

pub mod batch;
#[cfg(feature = "cli")]
pub mod cli;
pub mod generate;
pub mod preview;
pub mod source;

pub use generate::{
    format_ids, generate_sheet, render_layout, GenerateError, GenerationReport, SheetOptions,
    SheetPlan,
};
pub use source::{BuiltinMarkerSource, MarkerSource, MarkerSourceError};
