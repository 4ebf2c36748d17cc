use crate::error::ModelError;
use crate::node::Layer;
use quiver_types::{GeometryError, Point, Rect, Unit};
use serde::{Deserialize, Serialize};

/// A single page: geometry bounds, a unit of measure and an ordered stack
/// of layers (bottom to top).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub origin: Point,
    #[serde(default)]
    pub unit: Unit,
    pub layers: Vec<Layer>,
}

impl Page {
    /// Builds an empty page. Non-positive dimensions are rejected rather
    /// than clamped.
    pub fn new(width: f64, height: f64, unit: Unit) -> Result<Self, ModelError> {
        let page = Self {
            width,
            height,
            origin: Point::zero(),
            unit,
            layers: Vec::new(),
        };
        page.validate()?;
        Ok(page)
    }

    /// Re-checks the dimension invariant for pages that bypassed `new`,
    /// e.g. ones that arrived through deserialization.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.width <= 0.0
            || self.height <= 0.0
            || !self.width.is_finite()
            || !self.height.is_finite()
        {
            return Err(GeometryError::NegativeDimensions {
                width: self.width,
                height: self.height,
            }
            .into());
        }
        Ok(())
    }

    /// A4 portrait in millimeters, the default page of the native format.
    pub fn a4() -> Self {
        Self::new(210.0, 297.0, Unit::Millimeter).expect("static dimensions")
    }

    pub fn bounds(&self) -> Rect {
        Rect {
            x: self.origin.x,
            y: self.origin.y,
            width: self.width,
            height: self.height,
        }
    }

    /// Page size converted to typographic points.
    pub fn size_in_points(&self) -> (f64, f64) {
        let factor = self.unit.to_points();
        (self.width * factor, self.height * factor)
    }

    pub fn push_layer(&mut self, layer: Layer) -> usize {
        self.layers.push(layer);
        self.layers.len() - 1
    }

    pub fn layer(&self, index: usize) -> Result<&Layer, ModelError> {
        self.layers.get(index).ok_or(ModelError::LayerOutOfRange(index))
    }

    pub fn layer_mut(&mut self, index: usize) -> Result<&mut Layer, ModelError> {
        self.layers
            .get_mut(index)
            .ok_or(ModelError::LayerOutOfRange(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_positive_dimensions() {
        assert!(Page::new(-10.0, 20.0, Unit::Point).is_err());
        assert!(Page::new(10.0, 0.0, Unit::Point).is_err());
        assert!(Page::new(10.0, f64::INFINITY, Unit::Point).is_err());
    }

    #[test]
    fn test_a4_in_points() {
        let page = Page::a4();
        let (w, h) = page.size_in_points();
        assert!((w - 595.275).abs() < 0.01);
        assert!((h - 841.889).abs() < 0.01);
    }

    #[test]
    fn test_layer_index_errors() {
        let page = Page::a4();
        assert!(matches!(page.layer(0), Err(ModelError::LayerOutOfRange(0))));
    }
}
