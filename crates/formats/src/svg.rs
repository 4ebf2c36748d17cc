//! SVG load and save.
//!
//! The loader covers the structural subset the canonical model can
//! express (groups, basic shapes, paths, text); the saver emits any
//! document, normalizing colors to RGB first and disclosing what SVG
//! cannot carry.

use crate::traits::{LoadError, Loader, SaveError, SaveOutput, Saver};
use quiver_cms::ColorManager;
use quiver_doc::{
    ColorSpec, Colorspace, Document, Layer, Node, Page, PathSegment, Point, Primitive, Rect, Shape,
    Style, StyleId, Trafo, Unit,
};
use quiver_types::LossManifest;
use std::fmt::Write as _;

const FORMAT: &str = "SVG";

// --- Saver ---

pub struct SvgSaver;

impl Saver for SvgSaver {
    fn save(&self, doc: &Document) -> Result<SaveOutput, SaveError> {
        if doc.pages.is_empty() {
            return Err(SaveError::Unrepresentable {
                format: FORMAT,
                message: "document has no pages".to_string(),
            });
        }

        let mut losses = LossManifest::new();

        // SVG carries RGB only; stragglers the pipeline did not already
        // normalize are converted here, with disclosure.
        let mut doc = doc.clone();
        ColorManager::default().normalize_document(&mut doc, Colorspace::Rgb, &mut losses)?;

        if doc.pages.len() > 1 {
            losses.record(
                format!("pages 2-{}", doc.pages.len()),
                "SVG is single-page; extra pages dropped",
            );
        }

        let page = &doc.pages[0];
        let unit = page.unit.abbreviation();
        let mut out = String::new();
        let _ = writeln!(out, r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        let _ = writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}{unit}" height="{h}{unit}" viewBox="0 0 {w} {h}">"#,
            w = page.width,
            h = page.height,
        );

        for layer in &page.layers {
            let display = if layer.visible { "" } else { r#" display="none""# };
            let _ = writeln!(out, r#"  <g id="{}"{display}>"#, escape_xml(&layer.name));
            for node in &layer.children {
                write_node(&mut out, &doc, node, 2, &mut losses)?;
            }
            let _ = writeln!(out, "  </g>");
        }
        let _ = writeln!(out, "</svg>");

        Ok(SaveOutput { bytes: out.into_bytes(), losses })
    }
}

fn write_node(
    out: &mut String,
    doc: &Document,
    node: &Node,
    depth: usize,
    losses: &mut LossManifest,
) -> Result<(), SaveError> {
    let pad = "  ".repeat(depth);
    match node {
        Node::Group(group) => {
            let _ = writeln!(out, "{pad}<g{}>", trafo_attr(group.trafo.as_ref()));
            for child in &group.children {
                write_node(out, doc, child, depth + 1, losses)?;
            }
            let _ = writeln!(out, "{pad}</g>");
        }
        Node::Primitive(primitive) => {
            let style = doc
                .resolve_style(&primitive.style)
                .map_err(|e| SaveError::Unrepresentable {
                    format: FORMAT,
                    message: e.to_string(),
                })?;
            let attrs = format!(
                "{}{}",
                style_attrs(style),
                trafo_attr(primitive.trafo.as_ref())
            );
            match &primitive.shape {
                Shape::Rectangle { rect, corner_radius } => {
                    let rx = if *corner_radius > 0.0 {
                        format!(r#" rx="{corner_radius}""#)
                    } else {
                        String::new()
                    };
                    let _ = writeln!(
                        out,
                        r#"{pad}<rect x="{}" y="{}" width="{}" height="{}"{rx}{attrs}/>"#,
                        rect.x, rect.y, rect.width, rect.height
                    );
                }
                Shape::Ellipse { center, rx, ry } => {
                    let _ = writeln!(
                        out,
                        r#"{pad}<ellipse cx="{}" cy="{}" rx="{rx}" ry="{ry}"{attrs}/>"#,
                        center.x, center.y
                    );
                }
                Shape::Polygon { points, closed } => {
                    let tag = if *closed { "polygon" } else { "polyline" };
                    let coords = points
                        .iter()
                        .map(|p| format!("{},{}", p.x, p.y))
                        .collect::<Vec<_>>()
                        .join(" ");
                    let _ = writeln!(out, r#"{pad}<{tag} points="{coords}"{attrs}/>"#);
                }
                Shape::BezierPath { segments } => {
                    let _ = writeln!(out, r#"{pad}<path d="{}"{attrs}/>"#, path_data(segments));
                }
                Shape::Text { origin, content } => {
                    let font = style
                        .text
                        .as_ref()
                        .map(|t| {
                            format!(
                                r#" font-family="{}" font-size="{}""#,
                                escape_xml(&t.font_family),
                                t.font_size
                            )
                        })
                        .unwrap_or_default();
                    let _ = writeln!(
                        out,
                        r#"{pad}<text x="{}" y="{}"{font}{attrs}>{}</text>"#,
                        origin.x,
                        origin.y,
                        escape_xml(content)
                    );
                }
                Shape::Bitmap { .. } => {
                    losses.record("bitmap primitive", "not embedded in SVG output");
                }
            }
        }
    }
    Ok(())
}

fn path_data(segments: &[PathSegment]) -> String {
    let mut d = String::new();
    for segment in segments {
        if !d.is_empty() {
            d.push(' ');
        }
        match segment {
            PathSegment::MoveTo(p) => {
                let _ = write!(d, "M {} {}", p.x, p.y);
            }
            PathSegment::LineTo(p) => {
                let _ = write!(d, "L {} {}", p.x, p.y);
            }
            PathSegment::CurveTo { c1, c2, to } => {
                let _ = write!(d, "C {} {} {} {} {} {}", c1.x, c1.y, c2.x, c2.y, to.x, to.y);
            }
            PathSegment::Close => d.push('Z'),
        }
    }
    d
}

fn trafo_attr(trafo: Option<&Trafo>) -> String {
    match trafo {
        Some(t) => format!(
            r#" transform="matrix({} {} {} {} {} {})""#,
            t.m11, t.m12, t.m21, t.m22, t.dx, t.dy
        ),
        None => String::new(),
    }
}

fn style_attrs(style: &Style) -> String {
    let mut attrs = String::new();
    match &style.fill {
        Some(fill) => {
            let _ = write!(attrs, r#" fill="{}""#, rgb_hex(&fill.color));
            if fill.color.alpha() < 1.0 {
                let _ = write!(attrs, r#" fill-opacity="{}""#, fill.color.alpha());
            }
        }
        None => attrs.push_str(r#" fill="none""#),
    }
    if let Some(stroke) = &style.stroke {
        let _ = write!(
            attrs,
            r#" stroke="{}" stroke-width="{}""#,
            rgb_hex(&stroke.color),
            stroke.width
        );
        if !stroke.dash.is_empty() {
            let dashes = stroke
                .dash
                .iter()
                .map(|d| d.to_string())
                .collect::<Vec<_>>()
                .join(",");
            let _ = write!(attrs, r#" stroke-dasharray="{dashes}""#);
        }
    }
    attrs
}

/// The document is RGB-normalized before emission, so every color here
/// has three components.
fn rgb_hex(color: &ColorSpec) -> String {
    let c = color.components();
    format!(
        "#{:02x}{:02x}{:02x}",
        (c[0] * 255.0).round() as u8,
        (c[1] * 255.0).round() as u8,
        (c[2] * 255.0).round() as u8
    )
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

// --- Loader ---

pub struct SvgLoader;

impl Loader for SvgLoader {
    fn load(&self, data: &[u8]) -> Result<Document, LoadError> {
        if data.is_empty() {
            return Err(LoadError::Empty);
        }
        let text = std::str::from_utf8(data).map_err(|e| malformed(e.to_string()))?;
        let tree = roxmltree::Document::parse(text).map_err(|e| malformed(e.to_string()))?;
        let root = tree.root_element();
        if root.tag_name().name() != "svg" {
            return Err(malformed(format!(
                "root element is <{}>, expected <svg>",
                root.tag_name().name()
            )));
        }

        let (width, width_unit) = parse_length(root.attribute("width"))?;
        let (height, _) = parse_length(root.attribute("height"))?;

        let mut doc = Document::new();
        doc.add_page(Page::new(width, height, width_unit).map_err(LoadError::Model)?);

        let mut builder = StyleAllocator::default();
        let mut children = Vec::new();
        for child in root.children().filter(roxmltree::Node::is_element) {
            if let Some(node) = parse_element(child, &mut builder)? {
                children.push(node);
            }
        }

        for (id, style) in builder.styles {
            doc.define_style(id, style).map_err(LoadError::Model)?;
        }
        doc.add_layer(0, Layer::new("Layer 1").with_children(children))
            .map_err(LoadError::Model)?;
        Ok(doc)
    }
}

fn malformed(message: impl Into<String>) -> LoadError {
    LoadError::Malformed { format: FORMAT, message: message.into() }
}

/// Allocates sequential style ids while parsing.
#[derive(Default)]
struct StyleAllocator {
    styles: Vec<(StyleId, Style)>,
}

impl StyleAllocator {
    fn push(&mut self, style: Style) -> StyleId {
        let id = StyleId::new(format!("s{}", self.styles.len()));
        self.styles.push((id.clone(), style));
        id
    }
}

fn parse_element(
    node: roxmltree::Node,
    styles: &mut StyleAllocator,
) -> Result<Option<Node>, LoadError> {
    let trafo = parse_transform(node.attribute("transform"))?;
    let parsed = match node.tag_name().name() {
        "g" => {
            let mut children = Vec::new();
            for child in node.children().filter(roxmltree::Node::is_element) {
                if let Some(parsed) = parse_element(child, styles)? {
                    children.push(parsed);
                }
            }
            let mut group = quiver_doc::Group::new(children);
            group.trafo = trafo;
            return Ok(Some(Node::Group(group)));
        }
        "rect" => {
            let rect = Rect::new(
                float_attr(&node, "x")?.unwrap_or(0.0),
                float_attr(&node, "y")?.unwrap_or(0.0),
                require_float(&node, "width")?,
                require_float(&node, "height")?,
            )
            .map_err(|e| malformed(e.to_string()))?;
            Some(Shape::Rectangle {
                rect,
                corner_radius: float_attr(&node, "rx")?.unwrap_or(0.0),
            })
        }
        "ellipse" => Some(Shape::Ellipse {
            center: Point::new(
                float_attr(&node, "cx")?.unwrap_or(0.0),
                float_attr(&node, "cy")?.unwrap_or(0.0),
            ),
            rx: require_float(&node, "rx")?,
            ry: require_float(&node, "ry")?,
        }),
        "circle" => {
            let r = require_float(&node, "r")?;
            Some(Shape::Ellipse {
                center: Point::new(
                    float_attr(&node, "cx")?.unwrap_or(0.0),
                    float_attr(&node, "cy")?.unwrap_or(0.0),
                ),
                rx: r,
                ry: r,
            })
        }
        "polygon" | "polyline" => Some(Shape::Polygon {
            points: parse_points(node.attribute("points").unwrap_or(""))?,
            closed: node.tag_name().name() == "polygon",
        }),
        "path" => {
            let d = node.attribute("d").ok_or_else(|| malformed("<path> without d"))?;
            Some(Shape::BezierPath { segments: parse_path_data(d)? })
        }
        "text" => Some(Shape::Text {
            origin: Point::new(
                float_attr(&node, "x")?.unwrap_or(0.0),
                float_attr(&node, "y")?.unwrap_or(0.0),
            ),
            content: node.text().unwrap_or("").trim().to_string(),
        }),
        // Unknown elements (defs, metadata, ...) are structural noise.
        _ => None,
    };

    Ok(parsed.map(|shape| {
        let is_text = matches!(shape, Shape::Text { .. });
        let style = parse_style(&node, is_text);
        let style_id = styles.push(style);
        let mut primitive = Primitive::new(shape, style_id);
        primitive.trafo = trafo;
        Node::Primitive(primitive)
    }))
}

fn parse_style(node: &roxmltree::Node, with_text: bool) -> Style {
    // SVG's initial value for fill is black.
    let fill = match node.attribute("fill") {
        Some("none") => None,
        Some(value) => parse_color(value),
        None => Some(ColorSpec::black()),
    };
    let stroke = node
        .attribute("stroke")
        .filter(|v| *v != "none")
        .and_then(parse_color)
        .map(|color| quiver_doc::Stroke {
            color,
            width: node
                .attribute("stroke-width")
                .and_then(|w| w.parse().ok())
                .unwrap_or(1.0),
            cap: Default::default(),
            join: Default::default(),
            dash: Vec::new(),
        });
    let text = with_text.then(|| quiver_doc::TextSpec {
        font_family: node.attribute("font-family").unwrap_or("Sans").to_string(),
        font_size: node
            .attribute("font-size")
            .and_then(|s| s.parse().ok())
            .unwrap_or(12.0),
        letter_spacing: 0.0,
    });
    Style {
        fill: fill.map(|color| quiver_doc::Fill { color }),
        stroke,
        text,
    }
}

fn parse_color(value: &str) -> Option<ColorSpec> {
    let value = value.trim();
    if let Some(hex) = value.strip_prefix('#') {
        let expand = |s: &str| u8::from_str_radix(&s.repeat(2), 16).ok();
        let narrow = |s: &str| u8::from_str_radix(s, 16).ok();
        let (r, g, b) = match hex.len() {
            3 => (expand(&hex[0..1])?, expand(&hex[1..2])?, expand(&hex[2..3])?),
            6 => (narrow(&hex[0..2])?, narrow(&hex[2..4])?, narrow(&hex[4..6])?),
            _ => return None,
        };
        return Some(ColorSpec::rgb(
            r as f64 / 255.0,
            g as f64 / 255.0,
            b as f64 / 255.0,
        ));
    }
    if let Some(args) = value.strip_prefix("rgb(").and_then(|v| v.strip_suffix(')')) {
        let mut parts = args.split(',').map(|p| p.trim().parse::<f64>());
        let r = parts.next()?.ok()?;
        let g = parts.next()?.ok()?;
        let b = parts.next()?.ok()?;
        return Some(ColorSpec::rgb(r / 255.0, g / 255.0, b / 255.0));
    }
    match value {
        "black" => Some(ColorSpec::rgb(0.0, 0.0, 0.0)),
        "white" => Some(ColorSpec::rgb(1.0, 1.0, 1.0)),
        "red" => Some(ColorSpec::rgb(1.0, 0.0, 0.0)),
        "green" => Some(ColorSpec::rgb(0.0, 0.5, 0.0)),
        "blue" => Some(ColorSpec::rgb(0.0, 0.0, 1.0)),
        _ => None,
    }
}

fn parse_transform(value: Option<&str>) -> Result<Option<Trafo>, LoadError> {
    let Some(value) = value else { return Ok(None) };
    let mut combined = Trafo::identity();
    for call in value.split(')').map(str::trim).filter(|s| !s.is_empty()) {
        let (name, args) = call
            .split_once('(')
            .ok_or_else(|| malformed(format!("bad transform '{value}'")))?;
        let nums: Vec<f64> = args
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .map(|s| s.parse().map_err(|_| malformed(format!("bad transform number '{s}'"))))
            .collect::<Result<_, _>>()?;
        let step = match (name.trim(), nums.as_slice()) {
            ("matrix", [a, b, c, d, e, f]) => Trafo::new(*a, *b, *c, *d, *e, *f)
                .map_err(|e| malformed(e.to_string()))?,
            ("translate", [x]) => Trafo::translate(*x, 0.0),
            ("translate", [x, y]) => Trafo::translate(*x, *y),
            ("scale", [s]) => Trafo::scale(*s, *s).map_err(|e| malformed(e.to_string()))?,
            ("scale", [x, y]) => Trafo::scale(*x, *y).map_err(|e| malformed(e.to_string()))?,
            _ => {
                return Err(LoadError::UnsupportedFeature {
                    format: FORMAT,
                    feature: format!("transform '{}'", name.trim()),
                })
            }
        };
        combined = step.then(&combined);
    }
    Ok(Some(combined))
}

fn parse_points(value: &str) -> Result<Vec<Point>, LoadError> {
    let coords: Vec<f64> = value
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(|s| s.parse().map_err(|_| malformed(format!("bad point coordinate '{s}'"))))
        .collect::<Result<_, _>>()?;
    if coords.len() % 2 != 0 {
        return Err(malformed("odd number of point coordinates"));
    }
    Ok(coords.chunks(2).map(|c| Point::new(c[0], c[1])).collect())
}

fn parse_path_data(d: &str) -> Result<Vec<PathSegment>, LoadError> {
    let mut segments = Vec::new();
    let mut current = Point::zero();
    let mut numbers: Vec<f64> = Vec::new();
    let mut command = None;

    let mut tokens = Vec::new();
    let mut buf = String::new();
    for ch in d.chars() {
        if ch.is_ascii_alphabetic() {
            if !buf.is_empty() {
                tokens.push(buf.clone());
                buf.clear();
            }
            tokens.push(ch.to_string());
        } else if ch == ',' || ch.is_whitespace() {
            if !buf.is_empty() {
                tokens.push(buf.clone());
                buf.clear();
            }
        } else {
            buf.push(ch);
        }
    }
    if !buf.is_empty() {
        tokens.push(buf);
    }

    let mut flush = |cmd: char, nums: &mut Vec<f64>, current: &mut Point| -> Result<(), LoadError> {
        let relative = cmd.is_ascii_lowercase();
        let base = |current: &Point| if relative { *current } else { Point::zero() };
        match cmd.to_ascii_uppercase() {
            'M' | 'L' => {
                if nums.len() % 2 != 0 || nums.is_empty() {
                    return Err(malformed(format!("bad argument count for '{cmd}'")));
                }
                for (i, pair) in nums.chunks(2).enumerate() {
                    let b = base(current);
                    let p = Point::new(b.x + pair[0], b.y + pair[1]);
                    // Subsequent M coordinate pairs are implicit line-tos.
                    if cmd.to_ascii_uppercase() == 'M' && i == 0 {
                        segments.push(PathSegment::MoveTo(p));
                    } else {
                        segments.push(PathSegment::LineTo(p));
                    }
                    *current = p;
                }
            }
            'H' | 'V' => {
                if nums.is_empty() {
                    return Err(malformed(format!("bad argument count for '{cmd}'")));
                }
                for n in nums.iter() {
                    let p = match (cmd.to_ascii_uppercase(), relative) {
                        ('H', false) => Point::new(*n, current.y),
                        ('H', true) => Point::new(current.x + n, current.y),
                        ('V', false) => Point::new(current.x, *n),
                        _ => Point::new(current.x, current.y + n),
                    };
                    segments.push(PathSegment::LineTo(p));
                    *current = p;
                }
            }
            'C' => {
                if nums.len() % 6 != 0 || nums.is_empty() {
                    return Err(malformed(format!("bad argument count for '{cmd}'")));
                }
                for six in nums.chunks(6) {
                    let b = base(current);
                    let c1 = Point::new(b.x + six[0], b.y + six[1]);
                    let c2 = Point::new(b.x + six[2], b.y + six[3]);
                    let to = Point::new(b.x + six[4], b.y + six[5]);
                    segments.push(PathSegment::CurveTo { c1, c2, to });
                    *current = to;
                }
            }
            'Z' => segments.push(PathSegment::Close),
            other => {
                return Err(LoadError::UnsupportedFeature {
                    format: FORMAT,
                    feature: format!("path command '{other}'"),
                })
            }
        }
        nums.clear();
        Ok(())
    };

    for token in tokens {
        let ch = token.chars().next().unwrap_or(' ');
        if token.len() == 1 && ch.is_ascii_alphabetic() {
            if let Some(cmd) = command {
                flush(cmd, &mut numbers, &mut current)?;
            }
            command = Some(ch);
            if ch.eq_ignore_ascii_case(&'z') {
                flush(ch, &mut numbers, &mut current)?;
                command = None;
            }
        } else {
            let n = token
                .parse()
                .map_err(|_| malformed(format!("bad path number '{token}'")))?;
            numbers.push(n);
        }
    }
    if let Some(cmd) = command {
        flush(cmd, &mut numbers, &mut current)?;
    }
    Ok(segments)
}

fn float_attr(node: &roxmltree::Node, name: &str) -> Result<Option<f64>, LoadError> {
    match node.attribute(name) {
        None => Ok(None),
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| malformed(format!("bad numeric attribute {name}='{value}'"))),
    }
}

fn require_float(node: &roxmltree::Node, name: &str) -> Result<f64, LoadError> {
    float_attr(node, name)?.ok_or_else(|| {
        malformed(format!("<{}> missing attribute '{name}'", node.tag_name().name()))
    })
}

fn parse_length(value: Option<&str>) -> Result<(f64, Unit), LoadError> {
    let value = value.ok_or_else(|| malformed("missing width/height on <svg>"))?;
    let split = value
        .find(|c: char| c.is_ascii_alphabetic() || c == '%')
        .unwrap_or(value.len());
    let number: f64 = value[..split]
        .trim()
        .parse()
        .map_err(|_| malformed(format!("bad length '{value}'")))?;
    let unit = match &value[split..] {
        "" | "px" => Unit::Pixel,
        "pt" => Unit::Point,
        "mm" => Unit::Millimeter,
        "cm" => Unit::Centimeter,
        "in" => Unit::Inch,
        other => {
            return Err(LoadError::UnsupportedFeature {
                format: FORMAT,
                feature: format!("length unit '{other}'"),
            })
        }
    };
    Ok((number, unit))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cmyk_rect_document() -> Document {
        let mut doc = Document::with_default_page();
        doc.define_style("brand", Style::solid_fill(ColorSpec::cmyk(0.1, 0.2, 0.3, 0.0)))
            .unwrap();
        doc.add_layer(0, Layer::new("art")).unwrap();
        doc.add_node(
            0,
            0,
            Node::Primitive(Primitive::new(
                Shape::Rectangle {
                    rect: Rect::new(10.0, 10.0, 100.0, 40.0).unwrap(),
                    corner_radius: 0.0,
                },
                StyleId::new("brand"),
            )),
        )
        .unwrap();
        doc
    }

    #[test]
    fn test_save_discloses_cmyk_fill() {
        let out = SvgSaver.save(&cmyk_rect_document()).unwrap();
        assert!(out.losses.mentions("CMYK fill"));
        let svg = String::from_utf8(out.bytes).unwrap();
        assert!(svg.contains("<rect"));
        assert!(svg.contains("fill=\"#"));
    }

    #[test]
    fn test_hidden_layer_kept_invisible() {
        let mut doc = Document::with_default_page();
        doc.add_layer(0, Layer::new("notes").hidden()).unwrap();
        let svg = String::from_utf8(SvgSaver.save(&doc).unwrap().bytes).unwrap();
        assert!(svg.contains(r#"display="none""#));
    }

    #[test]
    fn test_load_basic_shapes() {
        let svg = br##"<svg xmlns="http://www.w3.org/2000/svg" width="100px" height="50px">
            <rect x="1" y="2" width="10" height="20" fill="#ff0000"/>
            <g transform="translate(5, 5)">
                <circle cx="4" cy="4" r="3" fill="none" stroke="#000000" stroke-width="2"/>
            </g>
            <path d="M 0 0 L 10 0 C 12 2 12 8 10 10 Z" fill="#00ff00"/>
            <text x="5" y="15" font-family="Serif" font-size="9">Hi &amp; bye</text>
        </svg>"##;
        let doc = SvgLoader.load(svg).unwrap();
        assert_eq!(doc.pages.len(), 1);
        assert_eq!(doc.pages[0].unit, Unit::Pixel);
        assert_eq!(doc.primitive_count(), 4);
        doc.validate().unwrap();

        // Stroke-only circle has no fill.
        let mut stroke_only = 0;
        for (_, style) in doc.styles.iter() {
            if style.fill.is_none() && style.stroke.is_some() {
                stroke_only += 1;
            }
        }
        assert_eq!(stroke_only, 1);
    }

    #[test]
    fn test_load_rejects_empty_and_junk() {
        assert!(matches!(SvgLoader.load(b""), Err(LoadError::Empty)));
        assert!(matches!(
            SvgLoader.load(b"not xml at all"),
            Err(LoadError::Malformed { .. })
        ));
        assert!(matches!(
            SvgLoader.load(b"<html><body/></html>"),
            Err(LoadError::Malformed { .. })
        ));
    }

    #[test]
    fn test_load_rejects_degenerate_scale() {
        let svg = br#"<svg width="10" height="10">
            <g transform="scale(0)"><rect width="1" height="1"/></g>
        </svg>"#;
        assert!(SvgLoader.load(svg).is_err());
    }

    #[test]
    fn test_save_load_round_trip_geometry() {
        let out = SvgSaver.save(&cmyk_rect_document()).unwrap();
        let back = SvgLoader.load(&out.bytes).unwrap();
        assert_eq!(back.primitive_count(), 1);
        let layer = &back.pages[0].layers[0];
        layer.for_each_primitive(&mut |p| match &p.shape {
            Shape::Rectangle { rect, .. } => {
                assert!((rect.x - 10.0).abs() < 1e-6);
                assert!((rect.width - 100.0).abs() < 1e-6);
            }
            other => panic!("unexpected shape {}", other.kind()),
        });
    }

    #[test]
    fn test_relative_path_commands() {
        let svg = br##"<svg width="10" height="10">
            <path d="m 1 1 l 2 0 v 2 h -2 z" fill="#000"/>
        </svg>"##;
        let doc = SvgLoader.load(svg).unwrap();
        let layer = &doc.pages[0].layers[0];
        layer.for_each_primitive(&mut |p| match &p.shape {
            Shape::BezierPath { segments } => {
                assert_eq!(segments.len(), 5);
                assert_eq!(segments[0], PathSegment::MoveTo(Point::new(1.0, 1.0)));
                assert_eq!(segments[1], PathSegment::LineTo(Point::new(3.0, 1.0)));
                assert_eq!(segments[2], PathSegment::LineTo(Point::new(3.0, 3.0)));
                assert_eq!(segments[3], PathSegment::LineTo(Point::new(1.0, 3.0)));
                assert_eq!(segments[4], PathSegment::Close);
            }
            other => panic!("unexpected shape {}", other.kind()),
        });
    }
}
