//! Core layout and rendering for laser-cut ArUco marker sheets.
//!
//! This crate is purely geometric. It does *not* know where marker bit
//! patterns come from nor how draw commands end up in a file:
//! - [`layout`] resolves the page grid and places markers on pages,
//! - [`render_marker`] turns one [`BitGrid`] into engrave/cut/label commands,
//! - [`DrawCommandSink`] is the seam to an output backend.
//!
//! Coordinates are PDF points with the origin at the bottom-left of the page.

mod draw;
mod error;
pub mod font_metrics;
pub mod layout;
mod logger;
mod marker;
mod render;
mod sink;
mod units;

pub use draw::{DrawCommand, Rect, Rgb};
pub use error::{
    InvalidLayoutError, InvalidLengthError, InvalidMarkerIdError, UnknownDictionaryError,
};
pub use layout::{
    compute_grid_dimensions, page_count, place_markers, GridDimensions, LayoutConfig,
    PageGeometry, Placement, Placements,
};
pub use marker::{ArucoDictionary, BitGrid, MarkerSelection, MarkerSpec, BACKGROUND, MARK};
pub use render::{render_marker, LABEL_FONT_SIZE, LABEL_OFFSET, LINE_WIDTH};
pub use sink::{DrawCommandSink, RecordingSink};
pub use units::{mm_to_pt, pt_to_mm, PageSize, POINTS_PER_MM};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::init_with_level;
