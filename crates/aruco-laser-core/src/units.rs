//! Physical units and page presets.
//!
//! All layout math is done in PDF points (1/72 inch) with the origin at the
//! bottom-left corner of the page and y growing upward.

use serde::{Deserialize, Serialize};

/// Points per millimetre (1 inch = 72 pt = 25.4 mm).
pub const POINTS_PER_MM: f64 = 72.0 / 25.4;

/// Convert millimetres to points.
#[inline]
pub fn mm_to_pt(mm: f64) -> f64 {
    mm * POINTS_PER_MM
}

/// Convert points to millimetres.
#[inline]
pub fn pt_to_mm(pt: f64) -> f64 {
    pt / POINTS_PER_MM
}

/// Supported page presets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PageSize {
    /// ISO A4, 210 × 297 mm.
    #[default]
    A4,
    /// US Letter, 8.5 × 11 in.
    #[serde(rename = "letter", alias = "Letter")]
    Letter,
}

impl PageSize {
    /// Page width in points.
    pub fn width(self) -> f64 {
        match self {
            PageSize::A4 => mm_to_pt(210.0),
            PageSize::Letter => 612.0,
        }
    }

    /// Page height in points.
    pub fn height(self) -> f64 {
        match self {
            PageSize::A4 => mm_to_pt(297.0),
            PageSize::Letter => 792.0,
        }
    }

    /// Name as shown to users (`A4`, `letter`).
    pub fn name(self) -> &'static str {
        match self {
            PageSize::A4 => "A4",
            PageSize::Letter => "letter",
        }
    }
}

impl std::fmt::Display for PageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
