//! Gzip-compressed SVG.
//!
//! Thin wrapper: decompress and delegate to the SVG codec, or take the
//! SVG codec's output and compress it. Loss semantics are identical to
//! plain SVG.

use crate::svg::{SvgLoader, SvgSaver};
use crate::traits::{LoadError, Loader, SaveError, SaveOutput, Saver};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use quiver_doc::Document;
use std::io::{Read, Write};

const FORMAT: &str = "SVGZ";

pub struct SvgzLoader;

impl Loader for SvgzLoader {
    fn load(&self, data: &[u8]) -> Result<Document, LoadError> {
        if data.is_empty() {
            return Err(LoadError::Empty);
        }
        let mut decoder = GzDecoder::new(data);
        let mut inner = Vec::new();
        decoder
            .read_to_end(&mut inner)
            .map_err(|e| LoadError::Malformed {
                format: FORMAT,
                message: format!("gzip stream: {e}"),
            })?;
        SvgLoader.load(&inner)
    }
}

pub struct SvgzSaver;

impl Saver for SvgzSaver {
    fn save(&self, doc: &Document) -> Result<SaveOutput, SaveError> {
        let inner = SvgSaver.save(doc)?;
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder
            .write_all(&inner.bytes)
            .map_err(|e| SaveError::Encode(format!("gzip stream: {e}")))?;
        let bytes = encoder
            .finish()
            .map_err(|e| SaveError::Encode(format!("gzip stream: {e}")))?;
        Ok(SaveOutput { bytes, losses: inner.losses })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiver_doc::{ColorSpec, Layer, Node, Primitive, Rect, Shape, Style, StyleId};

    #[test]
    fn test_round_trip_through_gzip() {
        let mut doc = Document::with_default_page();
        doc.define_style("fill", Style::solid_fill(ColorSpec::rgb(0.2, 0.4, 0.6)))
            .unwrap();
        doc.add_layer(0, Layer::new("art")).unwrap();
        doc.add_node(
            0,
            0,
            Node::Primitive(Primitive::new(
                Shape::Rectangle {
                    rect: Rect::new(0.0, 0.0, 50.0, 50.0).unwrap(),
                    corner_radius: 0.0,
                },
                StyleId::new("fill"),
            )),
        )
        .unwrap();

        let out = SvgzSaver.save(&doc).unwrap();
        assert_eq!(&out.bytes[..2], &[0x1f, 0x8b]);
        let back = SvgzLoader.load(&out.bytes).unwrap();
        assert_eq!(back.primitive_count(), 1);
    }

    #[test]
    fn test_plain_svg_bytes_rejected() {
        let err = SvgzLoader.load(b"<svg width=\"1\" height=\"1\"/>").unwrap_err();
        assert!(matches!(err, LoadError::Malformed { .. }));
    }

    #[test]
    fn test_empty_input_fails() {
        assert!(matches!(SvgzLoader.load(b""), Err(LoadError::Empty)));
    }
}
