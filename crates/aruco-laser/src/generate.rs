//! Sheet generation: options -> validated plan -> draw commands -> PDF.

use crate::source::{MarkerSource, MarkerSourceError};
use aruco_laser_core::{
    mm_to_pt, place_markers, render_marker, ArucoDictionary, DrawCommandSink, GridDimensions,
    InvalidLayoutError, InvalidLengthError, InvalidMarkerIdError, LayoutConfig, MarkerSelection, MarkerSpec,
    PageSize,
};
use aruco_laser_pdf::{PdfError, PdfSink};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Errors produced while generating a sheet.
#[derive(thiserror::Error, Debug)]
pub enum GenerateError {
    #[error(transparent)]
    InvalidMarkerId(#[from] InvalidMarkerIdError),
    #[error(transparent)]
    InvalidLayout(#[from] InvalidLayoutError),
    #[error(transparent)]
    InvalidLength(#[from] InvalidLengthError),
    #[error(transparent)]
    MarkerSource(#[from] MarkerSourceError),
    #[error(transparent)]
    Pdf(#[from] PdfError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl From<Infallible> for GenerateError {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}

fn default_output() -> PathBuf {
    PathBuf::from("aruco_markers.pdf")
}

/// User-facing sheet options. Lengths are in millimetres.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SheetOptions {
    #[serde(default)]
    pub dictionary: ArucoDictionary,
    #[serde(default)]
    pub selection: MarkerSelection,
    #[serde(default = "default_output")]
    pub output: PathBuf,
    /// Side of the marker pattern (quiet border included).
    pub marker_size_mm: f64,
    /// White margin between the pattern and the cut line.
    pub border_mm: f64,
    pub spacing_mm: f64,
    #[serde(default)]
    pub page: PageSize,
    pub markers_per_page: u32,
    #[serde(default)]
    pub rows: Option<u32>,
    #[serde(default)]
    pub cols: Option<u32>,
    pub show_labels: bool,
}

impl Default for SheetOptions {
    fn default() -> Self {
        Self {
            dictionary: ArucoDictionary::Dict4x4_50,
            selection: MarkerSelection::All,
            output: default_output(),
            marker_size_mm: 10.0,
            border_mm: 0.5,
            spacing_mm: 20.0,
            page: PageSize::A4,
            markers_per_page: 20,
            rows: None,
            cols: None,
            show_labels: true,
        }
    }
}

impl SheetOptions {
    /// Layout in points.
    pub fn layout(&self) -> LayoutConfig {
        LayoutConfig {
            cell_size: mm_to_pt(self.marker_size_mm),
            border: mm_to_pt(self.border_mm),
            spacing: mm_to_pt(self.spacing_mm),
            page: self.page,
            rows: self.rows,
            cols: self.cols,
            markers_per_page_hint: self.markers_per_page,
            show_labels: self.show_labels,
        }
    }

    /// Validate lengths, ids and layout. Nothing is written.
    pub fn prepare(&self) -> Result<SheetPlan, GenerateError> {
        InvalidLengthError::check("marker size", self.marker_size_mm)?;
        InvalidLengthError::check("border", self.border_mm)?;
        InvalidLengthError::check("spacing", self.spacing_mm)?;
        let markers = self.selection.resolve(self.dictionary)?;
        let layout = self.layout();
        let grid = layout.grid()?;
        Ok(SheetPlan {
            options: self.clone(),
            markers,
            layout,
            grid,
        })
    }
}

/// Validated sheet, ready to render.
#[derive(Clone, Debug)]
pub struct SheetPlan {
    options: SheetOptions,
    markers: Vec<MarkerSpec>,
    layout: LayoutConfig,
    grid: GridDimensions,
}

impl SheetPlan {
    pub fn options(&self) -> &SheetOptions {
        &self.options
    }

    pub fn markers(&self) -> &[MarkerSpec] {
        &self.markers
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    pub fn grid(&self) -> GridDimensions {
        self.grid
    }

    pub fn ids(&self) -> Vec<u32> {
        self.markers.iter().map(MarkerSpec::id).collect()
    }

    /// Draw every marker into `sink`; returns the number of pages used.
    pub fn render<M, S>(&self, source: &M, sink: &mut S) -> Result<usize, GenerateError>
    where
        M: MarkerSource + ?Sized,
        S: DrawCommandSink,
        GenerateError: From<S::Error>,
    {
        render_layout(&self.markers, &self.layout, source, sink)
    }

    /// Render into a PDF and save it to the configured output path.
    pub fn write_pdf<M>(&self, source: &M) -> Result<GenerationReport, GenerateError>
    where
        M: MarkerSource + ?Sized,
    {
        let mut sink = PdfSink::for_page(self.layout.page).with_title(format!(
            "ArUco {} markers",
            self.options.dictionary
        ));
        let pages = self.render(source, &mut sink)?;
        let output = &self.options.output;
        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        sink.save(output)?;
        log::info!(
            "wrote {} markers on {} page(s) to {}",
            self.markers.len(),
            pages,
            output.display()
        );

        Ok(GenerationReport {
            dictionary: self.options.dictionary,
            marker_count: self.markers.len(),
            pages,
            grid: self.grid,
            layout: self.layout,
            output: output.to_string_lossy().into_owned(),
            ids: self.ids(),
        })
    }

    /// Human-readable generation summary.
    pub fn summary(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SheetPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let o = &self.options;
        let rule = "=".repeat(50);
        writeln!(f, "Generating ArUco Markers")?;
        writeln!(f, "{rule}")?;
        writeln!(f, "Dictionary:       {}", o.dictionary)?;
        writeln!(f, "Marker count:     {}", self.markers.len())?;
        writeln!(
            f,
            "Marker size:      {:?}mm × {:?}mm",
            o.marker_size_mm, o.marker_size_mm
        )?;
        writeln!(f, "Border:           {:?}mm", o.border_mm)?;
        writeln!(f, "Spacing:          {:?}mm", o.spacing_mm)?;
        writeln!(f, "Page size:        {}", o.page)?;
        if o.rows.is_some() || o.cols.is_some() {
            writeln!(
                f,
                "Layout:           {} rows × {} cols ({} markers per page)",
                self.grid.rows, self.grid.cols, self.grid.markers_per_page
            )?;
        } else {
            writeln!(f, "Markers per page: {}", o.markers_per_page)?;
        }
        writeln!(
            f,
            "Show labels:      {}",
            if o.show_labels { "Yes" } else { "No" }
        )?;
        writeln!(f, "Output:           {}", o.output.display())?;
        writeln!(f, "IDs:              {}", format_ids(&self.ids()))?;
        write!(f, "{rule}")
    }
}

/// Show every id for short lists, otherwise the first and last ten.
pub fn format_ids(ids: &[u32]) -> String {
    fn list(ids: &[u32]) -> String {
        let items: Vec<String> = ids.iter().map(u32::to_string).collect();
        format!("[{}]", items.join(", "))
    }

    if ids.len() <= 20 {
        list(ids)
    } else {
        format!("{}...{}", list(&ids[..10]), list(&ids[ids.len() - 10..]))
    }
}

/// Walk the placements, render each marker and forward it to `sink`.
///
/// Returns the number of pages used (at least one: an empty sheet is still a
/// page).
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip_all, fields(markers = markers.len()))
)]
pub fn render_layout<M, S>(
    markers: &[MarkerSpec],
    layout: &LayoutConfig,
    source: &M,
    sink: &mut S,
) -> Result<usize, GenerateError>
where
    M: MarkerSource + ?Sized,
    S: DrawCommandSink,
    GenerateError: From<S::Error>,
{
    let placements = place_markers(markers, layout)?;
    let pages = placements.page_count().max(1);
    log::debug!(
        "placing {} markers on {} page(s), grid {}x{}",
        markers.len(),
        pages,
        placements.geometry().grid.rows,
        placements.geometry().grid.cols
    );

    for placement in placements {
        let marker = placement.marker;
        let grid = source.bit_grid(marker.dictionary(), marker.id())?;
        let label = layout.show_labels.then(|| marker.id().to_string());
        let commands = render_marker(
            &grid,
            (placement.origin_x, placement.origin_y),
            layout.cell_size,
            layout.border,
            label.as_deref(),
        );
        sink.draw_all(&commands)?;
        if placement.page_break_after {
            sink.page_break()?;
        }
    }

    Ok(pages)
}

/// Validate, render and save in one call.
pub fn generate_sheet<M>(options: &SheetOptions, source: &M) -> Result<GenerationReport, GenerateError>
where
    M: MarkerSource + ?Sized,
{
    options.prepare()?.write_pdf(source)
}

/// Machine-readable record of a generated sheet.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GenerationReport {
    pub dictionary: ArucoDictionary,
    pub marker_count: usize,
    pub pages: usize,
    pub grid: GridDimensions,
    pub layout: LayoutConfig,
    pub output: String,
    pub ids: Vec<u32>,
}

impl GenerationReport {
    /// Write this report to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), GenerateError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}
