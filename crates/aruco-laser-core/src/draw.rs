//! Backend-independent drawing primitives.

use serde::{Deserialize, Serialize};

/// RGB color with components in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Engrave layer (marker cells).
    pub const ENGRAVE: Rgb = Rgb::new(0.0, 0.0, 1.0);
    /// Cut layer (outer square).
    pub const CUT: Rgb = Rgb::new(1.0, 0.0, 0.0);
    /// Label text.
    pub const LABEL: Rgb = Rgb::new(0.0, 0.0, 0.0);
}

/// Axis-aligned rectangle anchored at its bottom-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Square with side `size` and bottom-left corner `(x, y)`.
    pub const fn square(x: f64, y: f64, size: f64) -> Self {
        Self::new(x, y, size, size)
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// One drawing instruction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DrawCommand {
    /// Rectangle filled and stroked in the same color.
    FilledRect {
        rect: Rect,
        color: Rgb,
        line_width: f64,
    },
    /// Rectangle outline only.
    StrokedRect {
        rect: Rect,
        color: Rgb,
        line_width: f64,
    },
    /// Single line of text; `(x, y)` is the left end of the baseline.
    Text {
        x: f64,
        y: f64,
        text: String,
        font_size: f64,
        color: Rgb,
    },
}

impl DrawCommand {
    pub fn color(&self) -> Rgb {
        match self {
            DrawCommand::FilledRect { color, .. }
            | DrawCommand::StrokedRect { color, .. }
            | DrawCommand::Text { color, .. } => *color,
        }
    }

    pub fn is_filled_rect(&self) -> bool {
        matches!(self, DrawCommand::FilledRect { .. })
    }

    pub fn is_stroked_rect(&self) -> bool {
        matches!(self, DrawCommand::StrokedRect { .. })
    }

    pub fn is_text(&self) -> bool {
        matches!(self, DrawCommand::Text { .. })
    }
}
