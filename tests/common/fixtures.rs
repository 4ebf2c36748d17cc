use quiver::Document;
use quiver_doc::{
    ColorProfile, ColorSpec, Layer, Node, Page, PathSegment, Point, Primitive, Rect, Shape, Style,
    StyleId, Trafo, Unit,
};

/// A one-page document with a CMYK-filled rectangle, the canonical
/// "lossy into RGB formats" input.
pub fn cmyk_rectangle() -> Document {
    let mut doc = Document::new();
    doc.add_page(Page::new(200.0, 100.0, Unit::Point).unwrap());
    doc.define_style("ink", Style::solid_fill(ColorSpec::cmyk(0.0, 0.8, 0.9, 0.1)))
        .unwrap();
    doc.add_layer(0, Layer::new("art")).unwrap();
    doc.add_node(
        0,
        0,
        Node::Primitive(Primitive::new(
            Shape::Rectangle {
                rect: Rect::new(10.0, 10.0, 80.0, 40.0).unwrap(),
                corner_radius: 0.0,
            },
            StyleId::new("ink"),
        )),
    )
    .unwrap();
    doc
}

/// A document styled with a named spot color.
pub fn spot_color_logo() -> Document {
    let mut doc = Document::new();
    doc.add_page(Page::new(100.0, 100.0, Unit::Millimeter).unwrap());
    doc.define_style(
        "brand",
        Style::solid_fill(ColorSpec::spot(
            "PANTONE 2935 C",
            [0.0, 0.34, 0.68],
            [1.0, 0.52, 0.0, 0.0],
        )),
    )
    .unwrap();
    doc.add_layer(0, Layer::new("logo")).unwrap();
    doc.add_node(
        0,
        0,
        Node::Primitive(Primitive::new(
            Shape::Ellipse {
                center: Point::new(50.0, 50.0),
                rx: 30.0,
                ry: 30.0,
            },
            StyleId::new("brand"),
        )),
    )
    .unwrap();
    doc
}

/// A richer document: groups with transforms, a bezier path, text, a
/// hidden layer and an embedded (synthetic) profile.
pub fn mixed_content() -> Document {
    let mut doc = Document::new();
    doc.add_page(Page::new(300.0, 200.0, Unit::Point).unwrap());
    doc.embed_profile(ColorProfile {
        id: "srgb".into(),
        description: "embedded sRGB".to_string(),
        data: quiver_cms::builtin_profile(quiver_doc::Colorspace::Rgb).data.clone(),
    })
    .unwrap();
    doc.define_style(
        "outline",
        Style::stroked(ColorSpec::rgb(0.1, 0.1, 0.1), 2.0),
    )
    .unwrap();
    doc.define_style(
        "accent",
        Style::solid_fill(ColorSpec::rgb(0.9, 0.3, 0.1).with_profile("srgb".into())),
    )
    .unwrap();

    let path = Node::Primitive(Primitive::new(
        Shape::BezierPath {
            segments: vec![
                PathSegment::MoveTo(Point::new(0.0, 0.0)),
                PathSegment::CurveTo {
                    c1: Point::new(10.0, 20.0),
                    c2: Point::new(30.0, 20.0),
                    to: Point::new(40.0, 0.0),
                },
                PathSegment::Close,
            ],
        },
        StyleId::new("outline"),
    ));
    let label = Node::Primitive(Primitive::new(
        Shape::Text {
            origin: Point::new(20.0, 180.0),
            content: "quiver".to_string(),
        },
        StyleId::new("accent"),
    ));
    let group = quiver_doc::Group::new(vec![path]).with_trafo(Trafo::translate(50.0, 50.0));

    doc.add_layer(0, Layer::new("art").with_children(vec![Node::Group(group), label]))
        .unwrap();
    doc.add_layer(0, Layer::new("guides").hidden()).unwrap();
    doc
}
