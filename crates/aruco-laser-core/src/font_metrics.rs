//! Glyph widths for the built-in Helvetica face.
//!
//! Widths come from the standard Helvetica AFM in 1/1000 em and cover ASCII
//! 0x20..=0x7E. Index = `(char as usize) - 32`. Labels only ever contain
//! digits, but the full table keeps the width function total.

/// PostScript name of the label font.
pub const LABEL_FONT: &str = "Helvetica";

#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    // space ! " # $ % & ' ( ) * + , - . /
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    // 0-9
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    // : ; < = > ? @
    278, 278, 584, 584, 584, 556, 1015,
    // A-Z
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    // [ \ ] ^ _ `
    278, 278, 278, 469, 556, 333,
    // a-z
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
    // { | } ~
    334, 260, 334, 584,
];

/// Width used for characters outside the table.
const FALLBACK_WIDTH: u16 = 556;

/// Advance width of `c` in 1/1000 em.
#[inline]
pub fn helvetica_char_width(c: char) -> u16 {
    let code = c as usize;
    if (0x20..=0x7E).contains(&code) {
        HELVETICA_WIDTHS[code - 0x20]
    } else {
        FALLBACK_WIDTH
    }
}

/// Rendered width of `text` at `font_size` points.
pub fn helvetica_string_width(text: &str, font_size: f64) -> f64 {
    let units: u32 = text.chars().map(|c| u32::from(helvetica_char_width(c))).sum();
    f64::from(units) * font_size / 1000.0
}
