//! The drawable tree: layers, groups and primitives.

use crate::error::ModelError;
use quiver_types::{GeometryError, Point, Rect, StyleId, Trafo};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A reference-counted container for shared, immutable data like bitmaps.
pub type SharedData = Arc<Vec<u8>>;

/// One segment of a bezier path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PathSegment {
    MoveTo(Point),
    LineTo(Point),
    CurveTo { c1: Point, c2: Point, to: Point },
    Close,
}

/// The geometry variants a primitive can take.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Shape {
    Rectangle {
        rect: Rect,
        #[serde(default)]
        corner_radius: f64,
    },
    Ellipse {
        center: Point,
        rx: f64,
        ry: f64,
    },
    Polygon {
        points: Vec<Point>,
        #[serde(default)]
        closed: bool,
    },
    BezierPath {
        segments: Vec<PathSegment>,
    },
    Text {
        origin: Point,
        content: String,
    },
    /// Straight-alpha RGBA pixels, row-major, top-to-bottom, placed
    /// into `rect` in document units.
    Bitmap {
        rect: Rect,
        width: u32,
        height: u32,
        data: SharedData,
    },
}

impl Shape {
    /// Returns a string identifier for the shape variant, used in loss
    /// manifests and log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            Shape::Rectangle { .. } => "rectangle",
            Shape::Ellipse { .. } => "ellipse",
            Shape::Polygon { .. } => "polygon",
            Shape::BezierPath { .. } => "bezier-path",
            Shape::Text { .. } => "text",
            Shape::Bitmap { .. } => "bitmap",
        }
    }

    /// Structural check for variants that can carry inconsistent payloads
    /// or dimensions that bypassed a validating constructor.
    pub fn validate(&self) -> Result<(), ModelError> {
        match self {
            Shape::Rectangle { rect, .. } => Ok(rect.validate()?),
            Shape::Ellipse { rx, ry, .. } => {
                if *rx < 0.0 || *ry < 0.0 || !rx.is_finite() || !ry.is_finite() {
                    return Err(GeometryError::NegativeDimensions {
                        width: *rx,
                        height: *ry,
                    }
                    .into());
                }
                Ok(())
            }
            Shape::Bitmap { rect, width, height, data } => {
                rect.validate()?;
                let expected = *width as usize * *height as usize * 4;
                if data.len() != expected {
                    return Err(ModelError::BitmapSizeMismatch {
                        width: *width,
                        height: *height,
                        expected,
                        actual: data.len(),
                    });
                }
                Ok(())
            }
            Shape::Polygon { .. } | Shape::BezierPath { .. } | Shape::Text { .. } => Ok(()),
        }
    }
}

/// A drawable leaf of the document tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Primitive {
    pub shape: Shape,
    pub style: StyleId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trafo: Option<Trafo>,
}

impl Primitive {
    pub fn new(shape: Shape, style: StyleId) -> Self {
        Self { shape, style, trafo: None }
    }

    /// Attaches a transform. The `Trafo` type is already invertible by
    /// construction.
    pub fn with_trafo(mut self, trafo: Trafo) -> Self {
        self.trafo = Some(trafo);
        self
    }
}

/// A node of a layer's child tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Node {
    Group(Group),
    Primitive(Primitive),
}

impl Node {
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Group(_) => "group",
            Node::Primitive(p) => p.shape.kind(),
        }
    }

    /// Depth-first visit of every primitive under this node, in
    /// insertion order.
    pub fn for_each_primitive<'a>(&'a self, f: &mut impl FnMut(&'a Primitive)) {
        match self {
            Node::Primitive(p) => f(p),
            Node::Group(g) => {
                for child in &g.children {
                    child.for_each_primitive(f);
                }
            }
        }
    }

    pub fn primitive_count(&self) -> usize {
        let mut count = 0;
        self.for_each_primitive(&mut |_| count += 1);
        count
    }
}

/// A recursive container of child nodes with an optional transform.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trafo: Option<Trafo>,
    pub children: Vec<Node>,
}

impl Group {
    pub fn new(children: Vec<Node>) -> Self {
        Self { trafo: None, children }
    }

    pub fn with_trafo(mut self, trafo: Trafo) -> Self {
        self.trafo = Some(trafo);
        self
    }
}

/// A named top-level group with visibility and lock flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layer {
    pub name: String,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub locked: bool,
    pub children: Vec<Node>,
}

fn default_true() -> bool {
    true
}

impl Layer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            visible: true,
            locked: false,
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn for_each_primitive<'a>(&'a self, f: &mut impl FnMut(&'a Primitive)) {
        for child in &self.children {
            child.for_each_primitive(f);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect_primitive(style: &str) -> Primitive {
        Primitive::new(
            Shape::Rectangle {
                rect: Rect::new(0.0, 0.0, 10.0, 10.0).unwrap(),
                corner_radius: 0.0,
            },
            StyleId::new(style),
        )
    }

    #[test]
    fn test_nested_primitive_visit_order() {
        let layer = Layer::new("base").with_children(vec![
            Node::Primitive(rect_primitive("a")),
            Node::Group(Group::new(vec![
                Node::Primitive(rect_primitive("b")),
                Node::Primitive(rect_primitive("c")),
            ])),
        ]);

        let mut seen = Vec::new();
        layer.for_each_primitive(&mut |p| seen.push(p.style.as_str().to_string()));
        assert_eq!(seen, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_bitmap_size_validation() {
        let bad = Shape::Bitmap {
            rect: Rect::new(0.0, 0.0, 4.0, 4.0).unwrap(),
            width: 2,
            height: 2,
            data: Arc::new(vec![0u8; 3]),
        };
        assert!(matches!(
            bad.validate(),
            Err(ModelError::BitmapSizeMismatch { expected: 16, actual: 3, .. })
        ));

        let good = Shape::Bitmap {
            rect: Rect::new(0.0, 0.0, 4.0, 4.0).unwrap(),
            width: 2,
            height: 2,
            data: Arc::new(vec![0u8; 16]),
        };
        assert!(good.validate().is_ok());
    }

    #[test]
    fn test_default_layer_flags() {
        let layer = Layer::new("art");
        assert!(layer.visible);
        assert!(!layer.locked);
    }
}
