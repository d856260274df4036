//! Marker bit grid -> draw commands.

use crate::font_metrics::helvetica_string_width;
use crate::{BitGrid, DrawCommand, Rect, Rgb};

/// Stroke width for both engrave and cut geometry, in points.
pub const LINE_WIDTH: f64 = 0.1;
/// Label font size in points.
pub const LABEL_FONT_SIZE: f64 = 6.0;
/// Distance from the bottom of the cut square down to the label baseline.
pub const LABEL_OFFSET: f64 = 8.0;

/// Emit the draw commands for one marker.
///
/// `origin` is the top-left corner of the cut square, `cell_area_size` the
/// side of the bit grid (quiet border included) and `border` the white margin
/// between the grid and the cut line. Row `i` of `grid` is drawn from the top
/// down so the printed marker is not mirrored.
///
/// Commands come out as: one engrave square per mark cell in row-major order,
/// then the cut square, then the optional label.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(level = "trace", skip(grid, label), fields(side = grid.side()))
)]
pub fn render_marker(
    grid: &BitGrid,
    origin: (f64, f64),
    cell_area_size: f64,
    border: f64,
    label: Option<&str>,
) -> Vec<DrawCommand> {
    let (ox, oy) = origin;
    let side = grid.side();
    let cell = cell_area_size / side as f64;

    let mut out = Vec::with_capacity(grid.mark_count() + 2);
    for i in 0..side {
        for j in 0..side {
            if !grid.is_mark(i, j) {
                continue;
            }
            let x = ox + j as f64 * cell + border;
            let y = oy - (i + 1) as f64 * cell - border;
            out.push(DrawCommand::FilledRect {
                rect: Rect::square(x, y, cell),
                color: Rgb::ENGRAVE,
                line_width: LINE_WIDTH,
            });
        }
    }

    let total = cell_area_size + 2.0 * border;
    out.push(DrawCommand::StrokedRect {
        rect: Rect::square(ox, oy - total, total),
        color: Rgb::CUT,
        line_width: LINE_WIDTH,
    });

    if let Some(text) = label {
        let width = helvetica_string_width(text, LABEL_FONT_SIZE);
        out.push(DrawCommand::Text {
            x: ox + (total - width) / 2.0,
            y: oy - total - LABEL_OFFSET,
            text: text.to_string(),
            font_size: LABEL_FONT_SIZE,
            color: Rgb::LABEL,
        });
    }

    out
}
