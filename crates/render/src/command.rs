use quiver_doc::{LineCap, LineJoin, PathSegment, Point, Rect, SharedData};

/// A resolved straight-alpha RGBA color, components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Rgba {
    pub fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Quantized 8-bit channels, in RGBA order.
    pub fn to_bytes(&self) -> [u8; 4] {
        let q = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }
}

/// Stroke parameters for a [`DrawCommand::StrokePath`].
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeSpec {
    pub color: Rgba,
    /// Width in device pixels.
    pub width: f64,
    pub cap: LineCap,
    pub join: LineJoin,
    pub dash: Vec<f64>,
}

/// A positioned piece of text with its resolved face and size.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub origin: Point,
    pub content: String,
    pub font_family: String,
    /// Size in device pixels.
    pub font_size: f64,
}

/// One backend drawing operation.
///
/// Geometry arrives fully transformed into device pixel coordinates
/// (y-down, origin at the top-left of the page); backends never see
/// document transforms or colorspaces.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    FillPath {
        segments: Vec<PathSegment>,
        color: Rgba,
    },
    StrokePath {
        segments: Vec<PathSegment>,
        stroke: StrokeSpec,
    },
    FillText {
        run: TextRun,
        color: Rgba,
    },
    /// Premultiplied-free RGBA8 pixels to composite into `rect`.
    DrawImage {
        rect: Rect,
        width: u32,
        height: u32,
        data: SharedData,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgba_quantization_clamps() {
        assert_eq!(Rgba::new(1.2, -0.1, 0.5, 1.0).to_bytes(), [255, 0, 128, 255]);
    }
}
