use crate::ArucoDictionary;

/// A requested marker id does not exist in the selected dictionary.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Marker IDs must be between 0 and {max_id} for {dictionary} (got {id})")]
pub struct InvalidMarkerIdError {
    pub id: i64,
    pub dictionary: ArucoDictionary,
    /// Largest valid id, `capacity - 1`.
    pub max_id: u32,
}

impl InvalidMarkerIdError {
    pub fn new(id: i64, dictionary: ArucoDictionary) -> Self {
        Self {
            id,
            dictionary,
            max_id: dictionary.capacity() - 1,
        }
    }
}

/// The resolved page grid has no rows or no columns.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error(
    "layout resolves to {rows} rows × {cols} cols (markers per page hint {hint}); \
     rows and columns must both be >= 1"
)]
pub struct InvalidLayoutError {
    pub rows: u32,
    pub cols: u32,
    pub hint: u32,
}

/// A length (marker size, border, spacing) is negative or not finite.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
#[error("{name} must be a finite, non-negative length (got {value})")]
pub struct InvalidLengthError {
    pub name: &'static str,
    pub value: f64,
}

impl InvalidLengthError {
    /// Pass `value` through when it is a usable length.
    pub fn check(name: &'static str, value: f64) -> Result<f64, Self> {
        if value.is_finite() && value >= 0.0 {
            Ok(value)
        } else {
            Err(Self { name, value })
        }
    }
}

/// Dictionary name could not be parsed.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown dictionary `{0}` (expected one of 4X4_50 .. 7X7_1000)")]
pub struct UnknownDictionaryError(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lengths_must_be_finite_and_non_negative() {
        assert_eq!(InvalidLengthError::check("border", 0.0), Ok(0.0));
        assert_eq!(InvalidLengthError::check("border", 1.5), Ok(1.5));

        let err = InvalidLengthError::check("spacing", -3.0).unwrap_err();
        assert_eq!(err.name, "spacing");
        assert_eq!(
            err.to_string(),
            "spacing must be a finite, non-negative length (got -3)"
        );
        assert!(InvalidLengthError::check("marker size", f64::NAN).is_err());
        assert!(InvalidLengthError::check("marker size", f64::INFINITY).is_err());
    }
}
