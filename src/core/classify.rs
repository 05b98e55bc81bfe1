//! Numeric token classification for raw CSV cells.

use std::sync::LazyLock;

use regex::Regex;

/// Optionally signed integer or decimal with at least one digit.
/// The decimal point may have digits on one side only ("3.", ".5").
static NUMERIC_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[-+]?([0-9]+(\.[0-9]*)?|\.[0-9]+)$").expect("numeric pattern is a valid regex")
});

/// A single cell of a data row after classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    /// Token accepted by [`is_numeric`], kept verbatim until flattening.
    Numeric(String),
    /// Anything else, including cells missing from short rows.
    Empty,
}

impl Cell {
    /// Returns the numeric token, if any.
    #[inline]
    pub fn as_numeric(&self) -> Option<&str> {
        match self {
            Cell::Numeric(token) => Some(token),
            Cell::Empty => None,
        }
    }
}

/// Check whether a raw cell represents a number.
///
/// No trimming, no locale separators and no exponent notation.
pub fn is_numeric(token: &str) -> bool {
    NUMERIC_PATTERN.is_match(token)
}

/// Classify a raw token into a [`Cell`].
pub fn classify(token: &str) -> Cell {
    if is_numeric(token) {
        Cell::Numeric(token.to_string())
    } else {
        Cell::Empty
    }
}
