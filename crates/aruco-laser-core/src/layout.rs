//! Page grid resolution and per-marker placement.
//!
//! Markers are laid out row-major on a fixed `rows × cols` grid per page. The
//! whole grid is centred on the page; coordinates are PDF points with the
//! origin at the bottom-left of the page. A placement's origin is the
//! *top-left* corner of the marker footprint.

use crate::{InvalidLayoutError, MarkerSpec, PageSize};
use serde::{Deserialize, Serialize};

/// Resolved page grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridDimensions {
    pub rows: u32,
    pub cols: u32,
    pub markers_per_page: u32,
}

/// Resolve the page grid from a markers-per-page hint and optional overrides.
///
/// - both `rows` and `cols` given: the hint is ignored;
/// - only `rows`: `cols = hint / rows`;
/// - only `cols`: `rows = hint / cols`;
/// - neither: `rows = floor(sqrt(hint))`, `cols = hint / rows`.
///
/// `markers_per_page` is always `rows * cols`. A zero row or column count is
/// rejected instead of producing an empty grid.
pub fn compute_grid_dimensions(
    hint: u32,
    rows: Option<u32>,
    cols: Option<u32>,
) -> Result<GridDimensions, InvalidLayoutError> {
    let invalid = |rows, cols| InvalidLayoutError { rows, cols, hint };

    let (rows, cols) = match (rows, cols) {
        (Some(r), Some(c)) => (r, c),
        (Some(r), None) => {
            if r == 0 {
                return Err(invalid(0, 0));
            }
            (r, hint / r)
        }
        (None, Some(c)) => {
            if c == 0 {
                return Err(invalid(0, 0));
            }
            (hint / c, c)
        }
        (None, None) => {
            let r = hint.isqrt();
            if r == 0 {
                return Err(invalid(0, 0));
            }
            (r, hint / r)
        }
    };

    if rows == 0 || cols == 0 {
        return Err(invalid(rows, cols));
    }
    let markers_per_page = rows.checked_mul(cols).ok_or(invalid(rows, cols))?;

    Ok(GridDimensions {
        rows,
        cols,
        markers_per_page,
    })
}

/// Sheet layout parameters. Lengths are in points.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Side of the marker pattern including its black quiet border.
    pub cell_size: f64,
    /// White margin between the pattern and the cut line, on every side.
    pub border: f64,
    /// Gap between neighbouring footprints.
    pub spacing: f64,
    pub page: PageSize,
    #[serde(default)]
    pub rows: Option<u32>,
    #[serde(default)]
    pub cols: Option<u32>,
    pub markers_per_page_hint: u32,
    pub show_labels: bool,
}

impl LayoutConfig {
    #[inline]
    pub fn page_width(&self) -> f64 {
        self.page.width()
    }

    #[inline]
    pub fn page_height(&self) -> f64 {
        self.page.height()
    }

    /// Side of one marker slot including its border (spacing excluded).
    #[inline]
    pub fn footprint(&self) -> f64 {
        self.cell_size + 2.0 * self.border
    }

    pub fn grid(&self) -> Result<GridDimensions, InvalidLayoutError> {
        compute_grid_dimensions(self.markers_per_page_hint, self.rows, self.cols)
    }

    /// Grid extents and the centred start position on the page.
    pub fn geometry(&self) -> Result<PageGeometry, InvalidLayoutError> {
        Ok(PageGeometry::new(self, self.grid()?))
    }
}

/// Page-level geometry shared by every placement on a sheet.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PageGeometry {
    pub grid: GridDimensions,
    pub footprint: f64,
    pub pitch: f64,
    pub total_width: f64,
    pub total_height: f64,
    /// Left edge of the grid. May be negative when the grid overflows the page.
    pub start_x: f64,
    /// Distance from the top of the page to the top of the grid. May be negative.
    pub start_y: f64,
    pub page_height: f64,
}

impl PageGeometry {
    fn new(cfg: &LayoutConfig, grid: GridDimensions) -> Self {
        let footprint = cfg.footprint();
        let cols = f64::from(grid.cols);
        let rows = f64::from(grid.rows);
        let total_width = cols * footprint + (cols - 1.0) * cfg.spacing;
        let total_height = rows * footprint + (rows - 1.0) * cfg.spacing;
        Self {
            grid,
            footprint,
            pitch: footprint + cfg.spacing,
            total_width,
            total_height,
            start_x: (cfg.page_width() - total_width) / 2.0,
            start_y: (cfg.page_height() - total_height) / 2.0,
            page_height: cfg.page_height(),
        }
    }

    /// Top-left corner of the footprint at `(row, col)`.
    #[inline]
    pub fn origin(&self, row: u32, col: u32) -> (f64, f64) {
        let x = self.start_x + f64::from(col) * self.pitch;
        let y = self.page_height - (self.start_y + f64::from(row) * self.pitch);
        (x, y)
    }
}

/// Where a single marker lands.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Placement {
    pub marker: MarkerSpec,
    pub page_index: u32,
    pub row: u32,
    pub col: u32,
    pub origin_x: f64,
    pub origin_y: f64,
    /// The caller must start a new page after drawing this marker.
    pub page_break_after: bool,
}

impl Placement {
    #[inline]
    pub fn marker_id(&self) -> u32 {
        self.marker.id()
    }
}

/// Number of pages needed for `count` markers.
pub fn page_count(count: usize, markers_per_page: u32) -> usize {
    if count == 0 {
        return 0;
    }
    count.div_ceil(markers_per_page.max(1) as usize)
}

/// Lazily place `markers` in input order.
///
/// Every call starts from scratch; the returned iterator holds no state beyond
/// its own cursor and can be cloned to replay the sequence.
pub fn place_markers<'a>(
    markers: &'a [MarkerSpec],
    cfg: &LayoutConfig,
) -> Result<Placements<'a>, InvalidLayoutError> {
    Ok(Placements {
        markers,
        geometry: cfg.geometry()?,
        next: 0,
    })
}

/// Iterator returned by [`place_markers`].
#[derive(Clone, Debug)]
pub struct Placements<'a> {
    markers: &'a [MarkerSpec],
    geometry: PageGeometry,
    next: usize,
}

impl Placements<'_> {
    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    /// Total pages the full sequence occupies.
    pub fn page_count(&self) -> usize {
        page_count(self.markers.len(), self.geometry.grid.markers_per_page)
    }
}

impl Iterator for Placements<'_> {
    type Item = Placement;

    fn next(&mut self) -> Option<Placement> {
        let n = self.next;
        let marker = *self.markers.get(n)?;
        self.next += 1;

        let per_page = self.geometry.grid.markers_per_page as usize;
        let cols = self.geometry.grid.cols as usize;
        let position = n % per_page;
        let row = (position / cols) as u32;
        let col = (position % cols) as u32;
        let (origin_x, origin_y) = self.geometry.origin(row, col);

        Some(Placement {
            marker,
            page_index: (n / per_page) as u32,
            row,
            col,
            origin_x,
            origin_y,
            page_break_after: (n + 1) % per_page == 0 && n + 1 < self.markers.len(),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let rest = self.markers.len() - self.next;
        (rest, Some(rest))
    }
}

impl ExactSizeIterator for Placements<'_> {}

impl std::iter::FusedIterator for Placements<'_> {}
