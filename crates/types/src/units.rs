use serde::{Deserialize, Serialize};
use std::fmt;

/// Unit of measure for document geometry.
///
/// All geometry inside a document is expressed in the page's unit; the
/// conversion factor to typographic points is fixed per unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    #[default]
    Point,
    Millimeter,
    Centimeter,
    Inch,
    Pixel,
}

impl Unit {
    /// Points per one of this unit (pixels assumed at 96 dpi).
    pub fn to_points(&self) -> f64 {
        match self {
            Unit::Point => 1.0,
            Unit::Millimeter => 72.0 / 25.4,
            Unit::Centimeter => 72.0 / 2.54,
            Unit::Inch => 72.0,
            Unit::Pixel => 72.0 / 96.0,
        }
    }

    pub fn abbreviation(&self) -> &'static str {
        match self {
            Unit::Point => "pt",
            Unit::Millimeter => "mm",
            Unit::Centimeter => "cm",
            Unit::Inch => "in",
            Unit::Pixel => "px",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_factors() {
        assert_eq!(Unit::Point.to_points(), 1.0);
        assert_eq!(Unit::Inch.to_points(), 72.0);
        assert!((Unit::Millimeter.to_points() * 25.4 - 72.0).abs() < 1e-9);
    }
}
