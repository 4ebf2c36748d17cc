//! GIMP palette (GPL) load and save.
//!
//! GPL is a color-only format. Saving keeps the distinct colors of a
//! document and discloses that geometry is discarded; loading builds a
//! swatch-grid document so the palette is viewable and round-trippable
//! through any vector format.

use crate::traits::{LoadError, Loader, SaveError, SaveOutput, Saver};
use itertools::Itertools;
use quiver_cms::ColorManager;
use quiver_doc::{
    ColorSpec, Colorspace, Document, Layer, Node, Page, Primitive, Rect, Shape, Style, StyleId,
    Unit,
};
use quiver_types::LossManifest;
use std::fmt::Write as _;

const FORMAT: &str = "GPL";
const HEADER: &str = "GIMP Palette";

const SWATCH_SIZE: f64 = 20.0;
const DEFAULT_COLUMNS: usize = 8;

// --- Saver ---

pub struct GplSaver;

impl Saver for GplSaver {
    fn save(&self, doc: &Document) -> Result<SaveOutput, SaveError> {
        let mut losses = LossManifest::new();
        let cms = ColorManager::default();

        let mut colors = Vec::new();
        let mut convert_err = None;
        doc.visit_colors(|_, spec| {
            if convert_err.is_some() {
                return;
            }
            match cms.convert_collecting(spec, &doc.profiles, Colorspace::Rgb, None, &mut losses) {
                Ok(rgb) => {
                    let c = rgb.components();
                    colors.push((
                        (c[0] * 255.0).round() as u8,
                        (c[1] * 255.0).round() as u8,
                        (c[2] * 255.0).round() as u8,
                    ));
                }
                Err(e) => convert_err = Some(e),
            }
        });
        if let Some(e) = convert_err {
            return Err(SaveError::Color(e));
        }
        let colors: Vec<_> = colors.into_iter().unique().collect();

        if doc.primitive_count() > 0 {
            losses.record("vector geometry", "discarded; GPL stores colors only");
        }

        let mut out = String::new();
        let _ = writeln!(out, "{HEADER}");
        let _ = writeln!(out, "Name: Untitled");
        let _ = writeln!(out, "Columns: {DEFAULT_COLUMNS}");
        let _ = writeln!(out, "#");
        for (r, g, b) in &colors {
            let _ = writeln!(out, "{r:>3} {g:>3} {b:>3}\t#{r:02x}{g:02x}{b:02x}");
        }
        Ok(SaveOutput { bytes: out.into_bytes(), losses })
    }
}

// --- Loader ---

pub struct GplLoader;

impl Loader for GplLoader {
    fn load(&self, data: &[u8]) -> Result<Document, LoadError> {
        if data.is_empty() {
            return Err(LoadError::Empty);
        }
        let text = std::str::from_utf8(data).map_err(|e| malformed(e.to_string()))?;
        let mut lines = text.lines();
        if lines.next().map(str::trim) != Some(HEADER) {
            return Err(malformed("missing 'GIMP Palette' header line"));
        }

        let mut columns = DEFAULT_COLUMNS;
        let mut entries = Vec::new();
        for line in lines {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if line.starts_with("Name:") {
                continue;
            }
            if let Some(rest) = line.strip_prefix("Columns:") {
                columns = rest
                    .trim()
                    .parse::<usize>()
                    .map_err(|_| malformed(format!("bad Columns value '{}'", rest.trim())))?
                    .max(1);
                continue;
            }
            entries.push(parse_entry(line)?);
        }

        Ok(swatch_grid(&entries, columns)?)
    }
}

fn malformed(message: impl Into<String>) -> LoadError {
    LoadError::Malformed { format: FORMAT, message: message.into() }
}

fn parse_entry(line: &str) -> Result<ColorSpec, LoadError> {
    let mut parts = line.split_whitespace();
    let mut channel = || -> Result<f64, LoadError> {
        let token = parts
            .next()
            .ok_or_else(|| malformed(format!("short palette line '{line}'")))?;
        let value: u16 = token
            .parse()
            .map_err(|_| malformed(format!("bad channel value '{token}'")))?;
        if value > 255 {
            return Err(malformed(format!("channel value {value} out of range")));
        }
        Ok(value as f64 / 255.0)
    };
    let (r, g, b) = (channel()?, channel()?, channel()?);
    // The remainder of the line is the entry name; the swatch document
    // does not carry names, so it is ignored.
    Ok(ColorSpec::rgb(r, g, b))
}

/// Lays palette entries out as a grid of filled squares.
fn swatch_grid(entries: &[ColorSpec], columns: usize) -> Result<Document, LoadError> {
    let rows = entries.len().div_ceil(columns).max(1);
    let width = columns as f64 * SWATCH_SIZE;
    let height = rows as f64 * SWATCH_SIZE;

    let mut doc = Document::new();
    doc.add_page(Page::new(width, height, Unit::Point).map_err(LoadError::Model)?);

    let mut children = Vec::new();
    for (i, color) in entries.iter().enumerate() {
        let id = StyleId::new(format!("swatch{i}"));
        doc.define_style(id.clone(), Style::solid_fill(color.clone()))
            .map_err(LoadError::Model)?;
        let col = i % columns;
        let row = i / columns;
        let rect = Rect::new(
            col as f64 * SWATCH_SIZE,
            row as f64 * SWATCH_SIZE,
            SWATCH_SIZE,
            SWATCH_SIZE,
        )
        .map_err(|e| malformed(e.to_string()))?;
        children.push(Node::Primitive(Primitive::new(
            Shape::Rectangle { rect, corner_radius: 0.0 },
            id,
        )));
    }
    doc.add_layer(0, Layer::new("Palette").with_children(children))
        .map_err(LoadError::Model)?;
    Ok(doc)
}
