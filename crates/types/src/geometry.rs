use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Determinant magnitude below which an affine matrix is considered degenerate.
const DEGENERACY_EPSILON: f64 = 1e-9;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("degenerate affine transform (determinant {0})")]
    DegenerateTransform(f64),
    #[error("negative dimensions: {width} x {height}")]
    NegativeDimensions { width: f64, height: f64 },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Builds a rectangle, rejecting negative or non-finite extents.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Result<Self, GeometryError> {
        let rect = Self { x, y, width, height };
        rect.validate()?;
        Ok(rect)
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Checks the extent invariant. Only needed for rectangles that
    /// bypassed `new`, e.g. ones that arrived through deserialization.
    pub fn validate(&self) -> Result<(), GeometryError> {
        if self.width < 0.0 || self.height < 0.0 || !self.width.is_finite() || !self.height.is_finite()
        {
            return Err(GeometryError::NegativeDimensions {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0.0 || self.height == 0.0
    }

    /// Smallest rectangle containing both `self` and `other`.
    pub fn union(&self, other: &Rect) -> Rect {
        let x0 = self.x.min(other.x);
        let y0 = self.y.min(other.y);
        let x1 = (self.x + self.width).max(other.x + other.width);
        let y1 = (self.y + self.height).max(other.y + other.height);
        Rect {
            x: x0,
            y: y0,
            width: x1 - x0,
            height: y1 - y0,
        }
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }
}

/// A 2D affine transform in row-vector form:
///
/// ```text
/// | m11 m12 0 |
/// | m21 m22 0 |
/// | dx  dy  1 |
/// ```
///
/// Construction is validated: a `Trafo` that exists is always invertible,
/// so downstream code never has to re-check for degenerate scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trafo {
    pub m11: f64,
    pub m12: f64,
    pub m21: f64,
    pub m22: f64,
    pub dx: f64,
    pub dy: f64,
}

impl Trafo {
    pub fn new(
        m11: f64,
        m12: f64,
        m21: f64,
        m22: f64,
        dx: f64,
        dy: f64,
    ) -> Result<Self, GeometryError> {
        let trafo = Self { m11, m12, m21, m22, dx, dy };
        let det = trafo.determinant();
        if !det.is_finite() || det.abs() < DEGENERACY_EPSILON {
            return Err(GeometryError::DegenerateTransform(det));
        }
        Ok(trafo)
    }

    pub fn identity() -> Self {
        Self {
            m11: 1.0,
            m12: 0.0,
            m21: 0.0,
            m22: 1.0,
            dx: 0.0,
            dy: 0.0,
        }
    }

    pub fn translate(dx: f64, dy: f64) -> Self {
        Self { dx, dy, ..Self::identity() }
    }

    pub fn scale(sx: f64, sy: f64) -> Result<Self, GeometryError> {
        Self::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    pub fn determinant(&self) -> f64 {
        self.m11 * self.m22 - self.m12 * self.m21
    }

    /// Checks the validity invariant. Only needed for transforms that
    /// bypassed `new`, e.g. ones that arrived through deserialization.
    pub fn validate(&self) -> Result<(), GeometryError> {
        let det = self.determinant();
        if !det.is_finite() || det.abs() < DEGENERACY_EPSILON {
            return Err(GeometryError::DegenerateTransform(det));
        }
        Ok(())
    }

    pub fn apply(&self, p: Point) -> Point {
        Point {
            x: p.x * self.m11 + p.y * self.m21 + self.dx,
            y: p.x * self.m12 + p.y * self.m22 + self.dy,
        }
    }

    /// Applies `other` after `self`.
    pub fn then(&self, other: &Trafo) -> Trafo {
        Trafo {
            m11: self.m11 * other.m11 + self.m12 * other.m21,
            m12: self.m11 * other.m12 + self.m12 * other.m22,
            m21: self.m21 * other.m11 + self.m22 * other.m21,
            m22: self.m21 * other.m12 + self.m22 * other.m22,
            dx: self.dx * other.m11 + self.dy * other.m21 + other.dx,
            dy: self.dx * other.m12 + self.dy * other.m22 + other.dy,
        }
    }

    pub fn invert(&self) -> Trafo {
        // Guaranteed non-degenerate by construction.
        let det = self.determinant();
        let inv = 1.0 / det;
        Trafo {
            m11: self.m22 * inv,
            m12: -self.m12 * inv,
            m21: -self.m21 * inv,
            m22: self.m11 * inv,
            dx: (self.m21 * self.dy - self.m22 * self.dx) * inv,
            dy: (self.m12 * self.dx - self.m11 * self.dy) * inv,
        }
    }
}

impl Default for Trafo {
    fn default() -> Self {
        Self::identity()
    }
}
