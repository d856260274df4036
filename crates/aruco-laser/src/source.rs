//! Marker bit patterns.

use aruco_laser_core::{ArucoDictionary, BitGrid};
use calib_targets_aruco::builtins;

/// Errors returned by a [`MarkerSource`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MarkerSourceError {
    #[error("dictionary {0} is not available")]
    UnknownDictionary(String),
    #[error("marker id {id} not in {dictionary} ({available} codes)")]
    IdOutOfRange {
        dictionary: ArucoDictionary,
        id: u32,
        available: usize,
    },
    #[error("{dictionary}: expected {expected}x{expected} bits, table has {found}x{found}")]
    MarkerSizeMismatch {
        dictionary: ArucoDictionary,
        expected: usize,
        found: usize,
    },
}

/// Produces the bit grid of a marker.
pub trait MarkerSource {
    /// Bit grid for `id`, side `dictionary.grid_side()`, black quiet border included.
    fn bit_grid(&self, dictionary: ArucoDictionary, id: u32) -> Result<BitGrid, MarkerSourceError>;
}

/// Marker source backed by the OpenCV-compatible dictionaries embedded in
/// `calib-targets-aruco`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BuiltinMarkerSource;

impl MarkerSource for BuiltinMarkerSource {
    fn bit_grid(&self, dictionary: ArucoDictionary, id: u32) -> Result<BitGrid, MarkerSourceError> {
        let name = dictionary.opencv_name();
        let dict = builtins::builtin_dictionary(&name)
            .ok_or(MarkerSourceError::UnknownDictionary(name))?;

        if dict.marker_size != dictionary.marker_bits() {
            return Err(MarkerSourceError::MarkerSizeMismatch {
                dictionary,
                expected: dictionary.marker_bits(),
                found: dict.marker_size,
            });
        }

        let code = dict
            .codes
            .get(id as usize)
            .copied()
            .ok_or(MarkerSourceError::IdOutOfRange {
                dictionary,
                id,
                available: dict.codes.len(),
            })?;

        // from_code only fails for codes wider than 64 bits, which the size
        // check above already excludes for every supported dictionary.
        BitGrid::from_code(code, dict.marker_size).ok_or(MarkerSourceError::MarkerSizeMismatch {
            dictionary,
            expected: dictionary.marker_bits(),
            found: dict.marker_size,
        })
    }
}

impl<M: MarkerSource + ?Sized> MarkerSource for &M {
    fn bit_grid(&self, dictionary: ArucoDictionary, id: u32) -> Result<BitGrid, MarkerSourceError> {
        (**self).bit_grid(dictionary, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_grids_have_black_quiet_border() {
        let src = BuiltinMarkerSource;
        for dictionary in [
            ArucoDictionary::Dict4x4_50,
            ArucoDictionary::Dict5x5_100,
            ArucoDictionary::Dict6x6_250,
            ArucoDictionary::Dict7x7_1000,
        ] {
            let grid = src.bit_grid(dictionary, 0).expect("marker 0");
            let side = dictionary.grid_side();
            assert_eq!(grid.side(), side);
            for k in 0..side {
                assert!(grid.is_mark(0, k));
                assert!(grid.is_mark(side - 1, k));
                assert!(grid.is_mark(k, 0));
                assert!(grid.is_mark(k, side - 1));
            }
        }
    }

    #[test]
    fn inner_bits_follow_dictionary_code() {
        let dict = builtins::builtin_dictionary("DICT_4X4_50").expect("builtin dict");
        let code = dict.codes[7];
        let grid = BuiltinMarkerSource
            .bit_grid(ArucoDictionary::Dict4x4_50, 7)
            .unwrap();
        for y in 0..4 {
            for x in 0..4 {
                let black = (code >> (y * 4 + x)) & 1 == 1;
                assert_eq!(grid.is_mark(y + 1, x + 1), black, "cell ({x}, {y})");
            }
        }
    }

    #[test]
    fn distinct_ids_give_distinct_grids() {
        let a = BuiltinMarkerSource
            .bit_grid(ArucoDictionary::Dict4x4_50, 0)
            .unwrap();
        let b = BuiltinMarkerSource
            .bit_grid(ArucoDictionary::Dict4x4_50, 1)
            .unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn capacity_matches_table() {
        for dictionary in ArucoDictionary::ALL {
            let last = dictionary.capacity() - 1;
            assert!(BuiltinMarkerSource.bit_grid(dictionary, last).is_ok());
        }
    }
}
