use crate::command::{DrawCommand, Rgba, StrokeSpec, TextRun};
use crate::error::RenderError;
use crate::raster::{PixelBuffer, Rasterizer};
use log::debug;
use quiver_cms::{ColorManager, RenderingIntent};
use quiver_doc::{
    ColorSpec, Colorspace, Document, Node, PathSegment, Point, Primitive, ProfileSet, Rect, Shape,
    Style, Trafo,
};
use quiver_types::CancelToken;

/// Circle-to-bezier approximation constant.
const KAPPA: f64 = 0.552_284_749_830_793_4;

#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    /// Device pixels per document point.
    pub scale: f64,
    pub intent: Option<RenderingIntent>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { scale: 1.0, intent: None }
    }
}

impl RenderOptions {
    pub fn with_scale(scale: f64) -> Self {
        Self { scale, ..Self::default() }
    }
}

/// Flattens document pages into backend draw commands.
///
/// Stateless across calls; the only held state is the color manager and
/// its transform cache, so one adapter can serve concurrent renders.
#[derive(Default)]
pub struct RenderAdapter {
    cms: ColorManager,
}

impl RenderAdapter {
    pub fn new(cms: ColorManager) -> Self {
        Self { cms }
    }

    /// Renders one page through the given backend.
    pub fn render(
        &self,
        doc: &Document,
        page_index: usize,
        options: RenderOptions,
        cancel: &CancelToken,
        backend: &dyn Rasterizer,
    ) -> Result<PixelBuffer, RenderError> {
        let (width, height) = self.pixel_size(doc, page_index, options)?;
        let commands = self.build_commands(doc, page_index, options, cancel)?;
        debug!(
            "rasterizing page {page_index} at {}x ({width}x{height}px, {} commands)",
            options.scale,
            commands.len()
        );
        backend.rasterize(&commands, width, height)
    }

    /// The device size of a page at the given options, in pixels.
    pub fn pixel_size(
        &self,
        doc: &Document,
        page_index: usize,
        options: RenderOptions,
    ) -> Result<(u32, u32), RenderError> {
        let page = self.page(doc, page_index)?;
        let scale = validated_scale(options.scale)?;
        let (w, h) = page.size_in_points();
        Ok(((w * scale).ceil() as u32, (h * scale).ceil() as u32))
    }

    /// Flattens one page into paint-ordered draw commands.
    ///
    /// Layers paint bottom-to-top in vector order; within a layer, nodes
    /// paint in insertion order. Hidden layers are skipped entirely. The
    /// cancellation token is checked between top-level nodes.
    pub fn build_commands(
        &self,
        doc: &Document,
        page_index: usize,
        options: RenderOptions,
        cancel: &CancelToken,
    ) -> Result<Vec<DrawCommand>, RenderError> {
        let page = self.page(doc, page_index)?;
        let scale = validated_scale(options.scale)?;
        let to_device = Trafo::scale(scale * page.unit.to_points(), scale * page.unit.to_points())
            .map_err(|_| RenderError::InvalidScale(options.scale))?;

        let mut commands = Vec::new();
        for layer in page.layers.iter().filter(|l| l.visible) {
            for node in &layer.children {
                if cancel.is_cancelled() {
                    return Err(RenderError::Cancelled);
                }
                self.emit_node(doc, node, &to_device, options.intent, &mut commands)?;
            }
        }
        Ok(commands)
    }

    fn emit_node(
        &self,
        doc: &Document,
        node: &Node,
        parent: &Trafo,
        intent: Option<RenderingIntent>,
        out: &mut Vec<DrawCommand>,
    ) -> Result<(), RenderError> {
        match node {
            Node::Group(group) => {
                let combined = compose(group.trafo.as_ref(), parent);
                for child in &group.children {
                    self.emit_node(doc, child, &combined, intent, out)?;
                }
                Ok(())
            }
            Node::Primitive(primitive) => {
                let combined = compose(primitive.trafo.as_ref(), parent);
                let style = doc.resolve_style(&primitive.style)?;
                self.emit_primitive(primitive, style, &doc.profiles, &combined, intent, out)
            }
        }
    }

    fn emit_primitive(
        &self,
        primitive: &Primitive,
        style: &Style,
        profiles: &ProfileSet,
        trafo: &Trafo,
        intent: Option<RenderingIntent>,
        out: &mut Vec<DrawCommand>,
    ) -> Result<(), RenderError> {
        match &primitive.shape {
            Shape::Text { origin, content } => {
                let Some(fill) = &style.fill else { return Ok(()) };
                let spec = style.text.clone().unwrap_or_default();
                out.push(DrawCommand::FillText {
                    run: TextRun {
                        origin: trafo.apply(*origin),
                        content: content.clone(),
                        font_family: spec.font_family,
                        font_size: spec.font_size * length_scale(trafo),
                    },
                    color: self.resolve(&fill.color, profiles, intent)?,
                });
                Ok(())
            }
            Shape::Bitmap { rect, width, height, data } => {
                out.push(DrawCommand::DrawImage {
                    rect: device_bounds(rect, trafo),
                    width: *width,
                    height: *height,
                    data: data.clone(),
                });
                Ok(())
            }
            shape => {
                let segments = transform_segments(outline(shape), trafo);
                if let Some(fill) = &style.fill {
                    out.push(DrawCommand::FillPath {
                        segments: segments.clone(),
                        color: self.resolve(&fill.color, profiles, intent)?,
                    });
                }
                if let Some(stroke) = &style.stroke {
                    out.push(DrawCommand::StrokePath {
                        segments,
                        stroke: StrokeSpec {
                            color: self.resolve(&stroke.color, profiles, intent)?,
                            width: stroke.width * length_scale(trafo),
                            cap: stroke.cap,
                            join: stroke.join,
                            dash: stroke.dash.iter().map(|d| d * length_scale(trafo)).collect(),
                        },
                    });
                }
                Ok(())
            }
        }
    }

    fn resolve(
        &self,
        spec: &ColorSpec,
        profiles: &ProfileSet,
        intent: Option<RenderingIntent>,
    ) -> Result<Rgba, RenderError> {
        let rgb = self.cms.convert(spec, profiles, Colorspace::Rgb, intent)?;
        let c = rgb.components();
        Ok(Rgba::new(c[0], c[1], c[2], rgb.alpha()))
    }

    fn page<'a>(
        &self,
        doc: &'a Document,
        index: usize,
    ) -> Result<&'a quiver_doc::Page, RenderError> {
        doc.pages.get(index).ok_or(RenderError::PageOutOfRange {
            index,
            pages: doc.pages.len(),
        })
    }
}

fn validated_scale(scale: f64) -> Result<f64, RenderError> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(RenderError::InvalidScale(scale));
    }
    Ok(scale)
}

fn compose(own: Option<&Trafo>, parent: &Trafo) -> Trafo {
    match own {
        Some(t) => t.then(parent),
        None => *parent,
    }
}

/// Isotropic length factor of a transform, for stroke widths and font
/// sizes under non-uniform scaling.
fn length_scale(trafo: &Trafo) -> f64 {
    trafo.determinant().abs().sqrt()
}

fn transform_segments(segments: Vec<PathSegment>, trafo: &Trafo) -> Vec<PathSegment> {
    segments
        .into_iter()
        .map(|s| match s {
            PathSegment::MoveTo(p) => PathSegment::MoveTo(trafo.apply(p)),
            PathSegment::LineTo(p) => PathSegment::LineTo(trafo.apply(p)),
            PathSegment::CurveTo { c1, c2, to } => PathSegment::CurveTo {
                c1: trafo.apply(c1),
                c2: trafo.apply(c2),
                to: trafo.apply(to),
            },
            PathSegment::Close => PathSegment::Close,
        })
        .collect()
}

/// Axis-aligned device bounds of a rect under an affine transform.
fn device_bounds(rect: &Rect, trafo: &Trafo) -> Rect {
    let corners = [
        trafo.apply(Point::new(rect.x, rect.y)),
        trafo.apply(Point::new(rect.x + rect.width, rect.y)),
        trafo.apply(Point::new(rect.x, rect.y + rect.height)),
        trafo.apply(Point::new(rect.x + rect.width, rect.y + rect.height)),
    ];
    let min_x = corners.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
    let min_y = corners.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
    let max_x = corners.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
    let max_y = corners.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);
    Rect {
        x: min_x,
        y: min_y,
        width: max_x - min_x,
        height: max_y - min_y,
    }
}

/// Outline of a fillable shape as path segments.
fn outline(shape: &Shape) -> Vec<PathSegment> {
    match shape {
        Shape::Rectangle { rect, corner_radius } => rect_outline(rect, *corner_radius),
        Shape::Ellipse { center, rx, ry } => ellipse_outline(*center, *rx, *ry),
        Shape::Polygon { points, closed } => {
            let mut segments = Vec::with_capacity(points.len() + 1);
            let mut iter = points.iter();
            if let Some(first) = iter.next() {
                segments.push(PathSegment::MoveTo(*first));
                segments.extend(iter.map(|p| PathSegment::LineTo(*p)));
                if *closed {
                    segments.push(PathSegment::Close);
                }
            }
            segments
        }
        Shape::BezierPath { segments } => segments.clone(),
        Shape::Text { .. } | Shape::Bitmap { .. } => Vec::new(),
    }
}

fn rect_outline(rect: &Rect, radius: f64) -> Vec<PathSegment> {
    let (x, y, w, h) = (rect.x, rect.y, rect.width, rect.height);
    if radius <= 0.0 {
        return vec![
            PathSegment::MoveTo(Point::new(x, y)),
            PathSegment::LineTo(Point::new(x + w, y)),
            PathSegment::LineTo(Point::new(x + w, y + h)),
            PathSegment::LineTo(Point::new(x, y + h)),
            PathSegment::Close,
        ];
    }
    let r = radius.min(w / 2.0).min(h / 2.0);
    let k = r * KAPPA;
    vec![
        PathSegment::MoveTo(Point::new(x + r, y)),
        PathSegment::LineTo(Point::new(x + w - r, y)),
        PathSegment::CurveTo {
            c1: Point::new(x + w - r + k, y),
            c2: Point::new(x + w, y + r - k),
            to: Point::new(x + w, y + r),
        },
        PathSegment::LineTo(Point::new(x + w, y + h - r)),
        PathSegment::CurveTo {
            c1: Point::new(x + w, y + h - r + k),
            c2: Point::new(x + w - r + k, y + h),
            to: Point::new(x + w - r, y + h),
        },
        PathSegment::LineTo(Point::new(x + r, y + h)),
        PathSegment::CurveTo {
            c1: Point::new(x + r - k, y + h),
            c2: Point::new(x, y + h - r + k),
            to: Point::new(x, y + h - r),
        },
        PathSegment::LineTo(Point::new(x, y + r)),
        PathSegment::CurveTo {
            c1: Point::new(x, y + r - k),
            c2: Point::new(x + r - k, y),
            to: Point::new(x + r, y),
        },
        PathSegment::Close,
    ]
}

fn ellipse_outline(center: Point, rx: f64, ry: f64) -> Vec<PathSegment> {
    let (cx, cy) = (center.x, center.y);
    let (kx, ky) = (rx * KAPPA, ry * KAPPA);
    vec![
        PathSegment::MoveTo(Point::new(cx + rx, cy)),
        PathSegment::CurveTo {
            c1: Point::new(cx + rx, cy + ky),
            c2: Point::new(cx + kx, cy + ry),
            to: Point::new(cx, cy + ry),
        },
        PathSegment::CurveTo {
            c1: Point::new(cx - kx, cy + ry),
            c2: Point::new(cx - rx, cy + ky),
            to: Point::new(cx - rx, cy),
        },
        PathSegment::CurveTo {
            c1: Point::new(cx - rx, cy - ky),
            c2: Point::new(cx - kx, cy - ry),
            to: Point::new(cx, cy - ry),
        },
        PathSegment::CurveTo {
            c1: Point::new(cx + kx, cy - ry),
            c2: Point::new(cx + rx, cy - ky),
            to: Point::new(cx + rx, cy),
        },
        PathSegment::Close,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiver_doc::{Fill, Layer, StyleId, Unit};
    use std::sync::Mutex;

    /// Captures command lists instead of producing pixels.
    struct RecordingBackend {
        seen: Mutex<Vec<DrawCommand>>,
    }

    impl RecordingBackend {
        fn new() -> Self {
            Self { seen: Mutex::new(Vec::new()) }
        }
    }

    impl Rasterizer for RecordingBackend {
        fn rasterize(
            &self,
            commands: &[DrawCommand],
            width: u32,
            height: u32,
        ) -> Result<PixelBuffer, RenderError> {
            self.seen.lock().unwrap().extend_from_slice(commands);
            Ok(PixelBuffer::blank(width, height))
        }
    }

    fn rect_primitive(style: &str) -> Node {
        Node::Primitive(Primitive::new(
            Shape::Rectangle {
                rect: Rect::new(0.0, 0.0, 10.0, 10.0).unwrap(),
                corner_radius: 0.0,
            },
            StyleId::new(style),
        ))
    }

    fn two_layer_document() -> Document {
        let mut doc = Document::new();
        doc.add_page(quiver_doc::Page::new(100.0, 100.0, Unit::Point).unwrap());
        doc.define_style("red", Style::solid_fill(ColorSpec::rgb(1.0, 0.0, 0.0)))
            .unwrap();
        doc.define_style("blue", Style::solid_fill(ColorSpec::rgb(0.0, 0.0, 1.0)))
            .unwrap();
        doc.add_layer(0, Layer::new("bottom").with_children(vec![rect_primitive("red")]))
            .unwrap();
        doc.add_layer(0, Layer::new("top").with_children(vec![rect_primitive("blue")]))
            .unwrap();
        doc
    }

    fn fill_colors(commands: &[DrawCommand]) -> Vec<Rgba> {
        commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::FillPath { color, .. } => Some(*color),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_layers_paint_bottom_to_top() {
        let adapter = RenderAdapter::default();
        let commands = adapter
            .build_commands(
                &two_layer_document(),
                0,
                RenderOptions::default(),
                &CancelToken::new(),
            )
            .unwrap();
        let colors = fill_colors(&commands);
        assert_eq!(colors.len(), 2);
        assert_eq!(colors[0], Rgba::new(1.0, 0.0, 0.0, 1.0));
        assert_eq!(colors[1], Rgba::new(0.0, 0.0, 1.0, 1.0));
    }

    #[test]
    fn test_hidden_layer_is_skipped() {
        let mut doc = two_layer_document();
        doc.pages[0].layers[1].visible = false;
        let commands = RenderAdapter::default()
            .build_commands(&doc, 0, RenderOptions::default(), &CancelToken::new())
            .unwrap();
        assert_eq!(fill_colors(&commands), vec![Rgba::new(1.0, 0.0, 0.0, 1.0)]);
    }

    #[test]
    fn test_scale_changes_pixel_size_and_geometry() {
        let adapter = RenderAdapter::default();
        let doc = two_layer_document();
        assert_eq!(
            adapter.pixel_size(&doc, 0, RenderOptions::with_scale(2.0)).unwrap(),
            (200, 200)
        );
        let commands = adapter
            .build_commands(&doc, 0, RenderOptions::with_scale(2.0), &CancelToken::new())
            .unwrap();
        match &commands[0] {
            DrawCommand::FillPath { segments, .. } => match segments[2] {
                PathSegment::LineTo(p) => assert_eq!(p, Point::new(20.0, 20.0)),
                _ => panic!("unexpected segment"),
            },
            _ => panic!("unexpected command"),
        }
    }

    #[test]
    fn test_cancelled_token_stops_render() {
        let cancel = CancelToken::new();
        cancel.cancel();
        let err = RenderAdapter::default()
            .build_commands(&two_layer_document(), 0, RenderOptions::default(), &cancel)
            .unwrap_err();
        assert!(matches!(err, RenderError::Cancelled));
    }

    #[test]
    fn test_page_out_of_range() {
        let err = RenderAdapter::default()
            .build_commands(&two_layer_document(), 3, RenderOptions::default(), &CancelToken::new())
            .unwrap_err();
        assert!(matches!(err, RenderError::PageOutOfRange { index: 3, pages: 1 }));
    }

    #[test]
    fn test_invalid_scale_rejected() {
        let err = RenderAdapter::default()
            .pixel_size(&two_layer_document(), 0, RenderOptions::with_scale(0.0))
            .unwrap_err();
        assert!(matches!(err, RenderError::InvalidScale(_)));
    }

    #[test]
    fn test_group_transform_composes() {
        let mut doc = Document::new();
        doc.add_page(quiver_doc::Page::new(100.0, 100.0, Unit::Point).unwrap());
        doc.define_style("f", Style { fill: Some(Fill { color: ColorSpec::rgb(0.0, 0.0, 0.0) }), ..Default::default() })
            .unwrap();
        let group = quiver_doc::Group::new(vec![rect_primitive("f")])
            .with_trafo(Trafo::translate(5.0, 5.0));
        doc.add_layer(0, Layer::new("l").with_children(vec![Node::Group(group)]))
            .unwrap();
        let commands = RenderAdapter::default()
            .build_commands(&doc, 0, RenderOptions::default(), &CancelToken::new())
            .unwrap();
        match &commands[0] {
            DrawCommand::FillPath { segments, .. } => match segments[0] {
                PathSegment::MoveTo(p) => assert_eq!(p, Point::new(5.0, 5.0)),
                _ => panic!("unexpected segment"),
            },
            _ => panic!("unexpected command"),
        }
    }

    #[test]
    fn test_render_produces_buffer_of_page_size() {
        let backend = RecordingBackend::new();
        let buffer = RenderAdapter::default()
            .render(
                &two_layer_document(),
                0,
                RenderOptions::default(),
                &CancelToken::new(),
                &backend,
            )
            .unwrap();
        assert_eq!((buffer.width, buffer.height), (100, 100));
        assert_eq!(buffer.data.len(), 100 * 100 * 4);
        assert_eq!(backend.seen.lock().unwrap().len(), 2);
    }
}
