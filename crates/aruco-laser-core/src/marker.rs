//! Supported ArUco dictionaries, marker ids and bit grids.

use crate::{InvalidMarkerIdError, UnknownDictionaryError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Predefined ArUco dictionaries (inner bit size × catalog capacity).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ArucoDictionary {
    #[default]
    #[serde(rename = "4X4_50")]
    Dict4x4_50,
    #[serde(rename = "4X4_100")]
    Dict4x4_100,
    #[serde(rename = "4X4_250")]
    Dict4x4_250,
    #[serde(rename = "4X4_1000")]
    Dict4x4_1000,
    #[serde(rename = "5X5_50")]
    Dict5x5_50,
    #[serde(rename = "5X5_100")]
    Dict5x5_100,
    #[serde(rename = "5X5_250")]
    Dict5x5_250,
    #[serde(rename = "5X5_1000")]
    Dict5x5_1000,
    #[serde(rename = "6X6_50")]
    Dict6x6_50,
    #[serde(rename = "6X6_100")]
    Dict6x6_100,
    #[serde(rename = "6X6_250")]
    Dict6x6_250,
    #[serde(rename = "6X6_1000")]
    Dict6x6_1000,
    #[serde(rename = "7X7_50")]
    Dict7x7_50,
    #[serde(rename = "7X7_100")]
    Dict7x7_100,
    #[serde(rename = "7X7_250")]
    Dict7x7_250,
    #[serde(rename = "7X7_1000")]
    Dict7x7_1000,
}

struct DictionaryInfo {
    dictionary: ArucoDictionary,
    name: &'static str,
    marker_bits: usize,
    capacity: u32,
}

const fn info(
    dictionary: ArucoDictionary,
    name: &'static str,
    marker_bits: usize,
    capacity: u32,
) -> DictionaryInfo {
    DictionaryInfo {
        dictionary,
        name,
        marker_bits,
        capacity,
    }
}

static DICTIONARY_TABLE: [DictionaryInfo; 16] = [
    info(ArucoDictionary::Dict4x4_50, "4X4_50", 4, 50),
    info(ArucoDictionary::Dict4x4_100, "4X4_100", 4, 100),
    info(ArucoDictionary::Dict4x4_250, "4X4_250", 4, 250),
    info(ArucoDictionary::Dict4x4_1000, "4X4_1000", 4, 1000),
    info(ArucoDictionary::Dict5x5_50, "5X5_50", 5, 50),
    info(ArucoDictionary::Dict5x5_100, "5X5_100", 5, 100),
    info(ArucoDictionary::Dict5x5_250, "5X5_250", 5, 250),
    info(ArucoDictionary::Dict5x5_1000, "5X5_1000", 5, 1000),
    info(ArucoDictionary::Dict6x6_50, "6X6_50", 6, 50),
    info(ArucoDictionary::Dict6x6_100, "6X6_100", 6, 100),
    info(ArucoDictionary::Dict6x6_250, "6X6_250", 6, 250),
    info(ArucoDictionary::Dict6x6_1000, "6X6_1000", 6, 1000),
    info(ArucoDictionary::Dict7x7_50, "7X7_50", 7, 50),
    info(ArucoDictionary::Dict7x7_100, "7X7_100", 7, 100),
    info(ArucoDictionary::Dict7x7_250, "7X7_250", 7, 250),
    info(ArucoDictionary::Dict7x7_1000, "7X7_1000", 7, 1000),
];

impl ArucoDictionary {
    /// Every supported dictionary, smallest marker size first.
    pub const ALL: [ArucoDictionary; 16] = [
        ArucoDictionary::Dict4x4_50,
        ArucoDictionary::Dict4x4_100,
        ArucoDictionary::Dict4x4_250,
        ArucoDictionary::Dict4x4_1000,
        ArucoDictionary::Dict5x5_50,
        ArucoDictionary::Dict5x5_100,
        ArucoDictionary::Dict5x5_250,
        ArucoDictionary::Dict5x5_1000,
        ArucoDictionary::Dict6x6_50,
        ArucoDictionary::Dict6x6_100,
        ArucoDictionary::Dict6x6_250,
        ArucoDictionary::Dict6x6_1000,
        ArucoDictionary::Dict7x7_50,
        ArucoDictionary::Dict7x7_100,
        ArucoDictionary::Dict7x7_250,
        ArucoDictionary::Dict7x7_1000,
    ];

    fn info(self) -> &'static DictionaryInfo {
        // Table order matches the enum declaration order.
        &DICTIONARY_TABLE[self as usize]
    }

    /// Short name, e.g. `4X4_50`.
    pub fn name(self) -> &'static str {
        self.info().name
    }

    /// Name used by OpenCV-compatible dictionary tables, e.g. `DICT_4X4_50`.
    pub fn opencv_name(self) -> String {
        format!("DICT_{}", self.name())
    }

    /// Inner bits per marker side.
    pub fn marker_bits(self) -> usize {
        self.info().marker_bits
    }

    /// Number of markers in the dictionary; valid ids are `0..capacity`.
    pub fn capacity(self) -> u32 {
        self.info().capacity
    }

    /// Side length of the rendered bit grid including the one-cell black border.
    pub fn grid_side(self) -> usize {
        self.marker_bits() + 2
    }

    /// Check a raw id against the catalog capacity.
    pub fn check_id(self, id: i64) -> Result<u32, InvalidMarkerIdError> {
        match u32::try_from(id) {
            Ok(v) if v < self.capacity() => Ok(v),
            _ => Err(InvalidMarkerIdError::new(id, self)),
        }
    }
}

impl fmt::Display for ArucoDictionary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ArucoDictionary {
    type Err = UnknownDictionaryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        let short = upper.strip_prefix("DICT_").unwrap_or(&upper);
        DICTIONARY_TABLE
            .iter()
            .find(|d| d.name == short)
            .map(|d| d.dictionary)
            .ok_or_else(|| UnknownDictionaryError(s.to_string()))
    }
}

/// A validated marker reference: `id < dictionary.capacity()`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct MarkerSpec {
    id: u32,
    dictionary: ArucoDictionary,
}

impl MarkerSpec {
    pub fn new(dictionary: ArucoDictionary, id: i64) -> Result<Self, InvalidMarkerIdError> {
        let id = dictionary.check_id(id)?;
        Ok(Self { id, dictionary })
    }

    #[inline]
    pub fn id(&self) -> u32 {
        self.id
    }

    #[inline]
    pub fn dictionary(&self) -> ArucoDictionary {
        self.dictionary
    }
}

/// Which marker ids a sheet should contain.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerSelection {
    /// Explicit ids in the given order (duplicates are kept).
    Ids(Vec<i64>),
    /// Inclusive id range.
    Range { start: i64, end: i64 },
    /// Every id in the dictionary.
    #[default]
    All,
}

impl MarkerSelection {
    /// Raw ids requested, before validation.
    pub fn raw_ids(&self, dictionary: ArucoDictionary) -> Vec<i64> {
        match self {
            MarkerSelection::Ids(ids) => ids.clone(),
            MarkerSelection::Range { start, end } => (*start..=*end).collect(),
            MarkerSelection::All => (0..i64::from(dictionary.capacity())).collect(),
        }
    }

    /// Validate every requested id up front.
    ///
    /// Fails on the first id outside `[0, capacity)` so that nothing is drawn
    /// for a partially valid request.
    pub fn resolve(
        &self,
        dictionary: ArucoDictionary,
    ) -> Result<Vec<MarkerSpec>, InvalidMarkerIdError> {
        if let MarkerSelection::Range { start, end } = *self {
            if start <= end {
                dictionary.check_id(start)?;
                dictionary.check_id(end)?;
            }
        }
        self.raw_ids(dictionary)
            .into_iter()
            .map(|id| MarkerSpec::new(dictionary, id))
            .collect()
    }
}

/// Square bit matrix of one marker, row-major, `0` = mark (black).
///
/// Row 0 is the top edge of the marker as printed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BitGrid {
    side: usize,
    cells: Vec<u8>,
}

/// Cell value for a black (engraved) cell.
pub const MARK: u8 = 0;
/// Cell value for a white (background) cell.
pub const BACKGROUND: u8 = 255;

impl BitGrid {
    /// Build from row-major cells. Returns `None` unless `cells.len() == side * side`.
    pub fn from_cells(side: usize, cells: Vec<u8>) -> Option<Self> {
        if side == 0 || cells.len() != side * side {
            return None;
        }
        Some(Self { side, cells })
    }

    /// Build a grid for a packed inner code with a one-cell black quiet border.
    ///
    /// `code` stores `bits × bits` inner cells in row-major order with bit
    /// index `y * bits + x` and black = 1.
    pub fn from_code(code: u64, bits: usize) -> Option<Self> {
        if bits == 0 || bits * bits > 64 {
            return None;
        }
        let side = bits + 2;
        let mut cells = vec![MARK; side * side];
        for y in 0..bits {
            for x in 0..bits {
                let black = (code >> (y * bits + x)) & 1 == 1;
                if !black {
                    cells[(y + 1) * side + (x + 1)] = BACKGROUND;
                }
            }
        }
        Some(Self { side, cells })
    }

    #[inline]
    pub fn side(&self) -> usize {
        self.side
    }

    /// Cell value at row `i`, column `j`.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> u8 {
        self.cells[i * self.side + j]
    }

    #[inline]
    pub fn is_mark(&self, i: usize, j: usize) -> bool {
        self.get(i, j) == MARK
    }

    /// Number of mark cells.
    pub fn mark_count(&self) -> usize {
        self.cells.iter().filter(|&&v| v == MARK).count()
    }
}
