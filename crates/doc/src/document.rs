//! The root document entity and its shared tables.

use crate::error::ModelError;
use crate::node::{Layer, Node, SharedData};
use crate::page::Page;
use crate::style::Style;
use quiver_types::{ColorSpec, ProfileId, StyleId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// An embedded ICC profile: an opaque blob with a stable identifier.
///
/// The engine never interprets the bytes itself; they are handed to the
/// external transform capability. Color specs reference a profile by id
/// only, never by copying the blob.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorProfile {
    pub id: ProfileId,
    pub description: String,
    pub data: SharedData,
}

impl ColorProfile {
    pub fn new(id: impl Into<ProfileId>, description: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            data: SharedData::new(data),
        }
    }
}

/// The document-owned set of embedded ICC profiles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileSet {
    profiles: HashMap<ProfileId, ColorProfile>,
}

impl ProfileSet {
    pub fn insert(&mut self, profile: ColorProfile) -> Result<(), ModelError> {
        if self.profiles.contains_key(&profile.id) {
            return Err(ModelError::DuplicateProfile(profile.id));
        }
        self.profiles.insert(profile.id.clone(), profile);
        Ok(())
    }

    pub fn get(&self, id: &ProfileId) -> Option<&ColorProfile> {
        self.profiles.get(id)
    }

    pub fn contains(&self, id: &ProfileId) -> bool {
        self.profiles.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColorProfile> {
        self.profiles.values()
    }
}

/// The document-owned table of named styles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StyleTable {
    styles: HashMap<StyleId, Style>,
}

impl StyleTable {
    pub fn insert(&mut self, id: StyleId, style: Style) -> Result<(), ModelError> {
        if self.styles.contains_key(&id) {
            return Err(ModelError::DuplicateStyle(id));
        }
        self.styles.insert(id, style);
        Ok(())
    }

    pub fn get(&self, id: &StyleId) -> Option<&Style> {
        self.styles.get(id)
    }

    pub fn contains(&self, id: &StyleId) -> bool {
        self.styles.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&StyleId, &Style)> {
        self.styles.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&StyleId, &mut Style)> {
        self.styles.iter_mut()
    }
}

/// The canonical, format-agnostic document.
///
/// Owns an ordered sequence of pages, the style table and the embedded
/// profile set. All mutation is synchronous and validated: inserting a
/// node whose style or profile reference does not resolve fails with a
/// [`ModelError`] instead of corrupting the model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub pages: Vec<Page>,
    pub styles: StyleTable,
    pub profiles: ProfileSet,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// A document with a single empty A4 page, matching what the native
    /// format produces for "new document".
    pub fn with_default_page() -> Self {
        let mut doc = Self::new();
        doc.add_page(Page::a4());
        doc
    }

    // --- Pages ---

    pub fn add_page(&mut self, page: Page) -> usize {
        self.pages.push(page);
        self.pages.len() - 1
    }

    pub fn remove_page(&mut self, index: usize) -> Result<Page, ModelError> {
        if index >= self.pages.len() {
            return Err(ModelError::PageOutOfRange(index));
        }
        Ok(self.pages.remove(index))
    }

    pub fn page(&self, index: usize) -> Result<&Page, ModelError> {
        self.pages.get(index).ok_or(ModelError::PageOutOfRange(index))
    }

    pub fn page_mut(&mut self, index: usize) -> Result<&mut Page, ModelError> {
        self.pages
            .get_mut(index)
            .ok_or(ModelError::PageOutOfRange(index))
    }

    // --- Shared tables ---

    /// Defines a named style after checking that every profile it
    /// references is embedded.
    pub fn define_style(&mut self, id: impl Into<StyleId>, style: Style) -> Result<(), ModelError> {
        for color in style.colors() {
            self.check_profile_ref(color)?;
        }
        self.styles.insert(id.into(), style)
    }

    pub fn embed_profile(&mut self, profile: ColorProfile) -> Result<(), ModelError> {
        self.profiles.insert(profile)
    }

    pub fn resolve_style(&self, id: &StyleId) -> Result<&Style, ModelError> {
        self.styles
            .get(id)
            .ok_or_else(|| ModelError::DanglingStyle(id.clone()))
    }

    pub fn resolve_profile(&self, id: &ProfileId) -> Result<&ColorProfile, ModelError> {
        self.profiles
            .get(id)
            .ok_or_else(|| ModelError::DanglingProfile(id.clone()))
    }

    // --- Tree mutation ---

    /// Appends a layer to a page, validating every node it carries.
    pub fn add_layer(&mut self, page_index: usize, layer: Layer) -> Result<usize, ModelError> {
        for node in &layer.children {
            self.check_node(node)?;
        }
        let page = self.page_mut(page_index)?;
        Ok(page.push_layer(layer))
    }

    /// Appends a node to a layer's children, validating style references,
    /// transforms and bitmap payloads first.
    pub fn add_node(
        &mut self,
        page_index: usize,
        layer_index: usize,
        node: Node,
    ) -> Result<(), ModelError> {
        self.check_node(&node)?;
        let page = self.page_mut(page_index)?;
        let layer = page.layer_mut(layer_index)?;
        layer.children.push(node);
        Ok(())
    }

    /// Removes and returns a layer with everything it holds.
    pub fn remove_layer(&mut self, page_index: usize, layer_index: usize) -> Result<Layer, ModelError> {
        let page = self.page_mut(page_index)?;
        if layer_index >= page.layers.len() {
            return Err(ModelError::LayerOutOfRange(layer_index));
        }
        Ok(page.layers.remove(layer_index))
    }

    /// Removes and returns a direct child of a layer. Descendants of a
    /// removed group go with it.
    pub fn remove_node(
        &mut self,
        page_index: usize,
        layer_index: usize,
        node_index: usize,
    ) -> Result<Node, ModelError> {
        let page = self.page_mut(page_index)?;
        let layer = page.layer_mut(layer_index)?;
        if node_index >= layer.children.len() {
            return Err(ModelError::NodeOutOfRange(node_index));
        }
        Ok(layer.children.remove(node_index))
    }

    fn check_node(&self, node: &Node) -> Result<(), ModelError> {
        match node {
            Node::Group(group) => {
                if let Some(trafo) = &group.trafo {
                    trafo.validate()?;
                }
                for child in &group.children {
                    self.check_node(child)?;
                }
                Ok(())
            }
            Node::Primitive(primitive) => {
                if !self.styles.contains(&primitive.style) {
                    return Err(ModelError::DanglingStyle(primitive.style.clone()));
                }
                if let Some(trafo) = &primitive.trafo {
                    trafo.validate()?;
                }
                primitive.shape.validate()
            }
        }
    }

    fn check_profile_ref(&self, color: &ColorSpec) -> Result<(), ModelError> {
        if let Some(id) = color.profile() {
            if !self.profiles.contains(id) {
                return Err(ModelError::DanglingProfile(id.clone()));
            }
        }
        Ok(())
    }

    // --- Whole-document queries ---

    /// Re-checks every structural invariant. Loaders run this after
    /// building a document from untrusted bytes, since serde-built trees
    /// bypass the validated mutation API.
    pub fn validate(&self) -> Result<(), ModelError> {
        for (_, style) in self.styles.iter() {
            for color in style.colors() {
                self.check_profile_ref(color)?;
            }
        }
        for page in &self.pages {
            page.validate()?;
            for layer in &page.layers {
                for node in &layer.children {
                    self.check_node(node)?;
                }
            }
        }
        Ok(())
    }

    pub fn primitive_count(&self) -> usize {
        let mut count = 0;
        for page in &self.pages {
            for layer in &page.layers {
                layer.for_each_primitive(&mut |_| count += 1);
            }
        }
        count
    }

    /// Visits every color spec the document holds. Colors live only in
    /// the style table, so this is a table walk.
    pub fn visit_colors(&self, mut f: impl FnMut(&StyleId, &ColorSpec)) {
        for (id, style) in self.styles.iter() {
            for color in style.colors() {
                f(id, color);
            }
        }
    }

    /// Mutable variant of [`visit_colors`](Self::visit_colors), used by
    /// the color layer to normalize a document in place.
    pub fn visit_colors_mut(&mut self, mut f: impl FnMut(&StyleId, &mut ColorSpec)) {
        for (id, style) in self.styles.iter_mut() {
            for color in style.colors_mut() {
                f(id, color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Group, Primitive, Shape};
    use quiver_types::{Rect, Trafo, Unit};

    fn rect_shape() -> Shape {
        Shape::Rectangle {
            rect: Rect::new(10.0, 10.0, 50.0, 30.0).unwrap(),
            corner_radius: 0.0,
        }
    }

    #[test]
    fn test_dangling_style_rejected() {
        let mut doc = Document::with_default_page();
        doc.add_layer(0, Layer::new("base")).unwrap();

        let node = Node::Primitive(Primitive::new(rect_shape(), StyleId::new("missing")));
        let err = doc.add_node(0, 0, node).unwrap_err();
        assert_eq!(err, ModelError::DanglingStyle(StyleId::new("missing")));
    }

    #[test]
    fn test_dangling_profile_rejected_in_style() {
        let mut doc = Document::new();
        let color =
            ColorSpec::rgb(1.0, 0.0, 0.0).with_profile(ProfileId::new("not-embedded"));
        let err = doc.define_style("red", Style::solid_fill(color)).unwrap_err();
        assert_eq!(err, ModelError::DanglingProfile(ProfileId::new("not-embedded")));
    }

    #[test]
    fn test_profile_reference_resolves_after_embedding() {
        let mut doc = Document::new();
        doc.embed_profile(ColorProfile::new("fogra39", "Coated FOGRA39", vec![0u8; 16]))
            .unwrap();
        let color = ColorSpec::cmyk(0.0, 0.9, 0.8, 0.0).with_profile(ProfileId::new("fogra39"));
        doc.define_style("brand", Style::solid_fill(color)).unwrap();

        let style = doc.resolve_style(&StyleId::new("brand")).unwrap();
        let profile_id = style.fill.as_ref().unwrap().color.profile().unwrap();
        assert!(doc.resolve_profile(profile_id).is_ok());
    }

    #[test]
    fn test_nested_group_validation() {
        let mut doc = Document::with_default_page();
        doc.define_style("s", Style::solid_fill(ColorSpec::gray(0.5)))
            .unwrap();
        doc.add_layer(0, Layer::new("base")).unwrap();

        let nested = Node::Group(Group::new(vec![Node::Group(Group::new(vec![
            Node::Primitive(Primitive::new(rect_shape(), StyleId::new("nope"))),
        ]))]));
        assert!(doc.add_node(0, 0, nested).is_err());
    }

    #[test]
    fn test_duplicate_style_rejected() {
        let mut doc = Document::new();
        doc.define_style("s", Style::default()).unwrap();
        assert_eq!(
            doc.define_style("s", Style::default()).unwrap_err(),
            ModelError::DuplicateStyle(StyleId::new("s"))
        );
    }

    #[test]
    fn test_validate_catches_serde_built_degenerate_trafo() {
        let mut doc = Document::with_default_page();
        doc.define_style("s", Style::solid_fill(ColorSpec::gray(0.0)))
            .unwrap();
        let mut primitive = Primitive::new(rect_shape(), StyleId::new("s"));
        // Forged transform that never went through Trafo::new.
        primitive.trafo = Some(Trafo {
            m11: 0.0,
            m12: 0.0,
            m21: 0.0,
            m22: 0.0,
            dx: 0.0,
            dy: 0.0,
        });
        doc.pages[0]
            .layers
            .push(Layer::new("base").with_children(vec![Node::Primitive(primitive)]));

        assert!(doc.validate().is_err());
    }

    #[test]
    fn test_validate_catches_forged_negative_dimensions() {
        // Page dimensions written directly, bypassing Page::new.
        let mut doc = Document::with_default_page();
        doc.pages[0].width = -100.0;
        assert!(doc.validate().is_err());

        // Rect extents written directly, bypassing Rect::new.
        let mut doc = Document::with_default_page();
        doc.define_style("s", Style::solid_fill(ColorSpec::gray(0.0)))
            .unwrap();
        let primitive = Primitive::new(
            Shape::Rectangle {
                rect: Rect { x: 0.0, y: 0.0, width: -10.0, height: 5.0 },
                corner_radius: 0.0,
            },
            StyleId::new("s"),
        );
        doc.pages[0]
            .layers
            .push(Layer::new("base").with_children(vec![Node::Primitive(primitive)]));
        assert!(doc.validate().is_err());
    }

    #[test]
    fn test_visit_colors_mut_rewrites_in_place() {
        let mut doc = Document::new();
        doc.define_style("a", Style::solid_fill(ColorSpec::cmyk(0.1, 0.2, 0.3, 0.0)))
            .unwrap();
        doc.visit_colors_mut(|_, c| *c = ColorSpec::rgb(0.0, 0.0, 0.0));
        doc.visit_colors(|_, c| assert_eq!(c.colorspace(), quiver_types::Colorspace::Rgb));
    }

    #[test]
    fn test_remove_layer_and_node() {
        let mut doc = Document::with_default_page();
        doc.define_style("s", Style::solid_fill(ColorSpec::gray(0.5)))
            .unwrap();
        doc.add_layer(0, Layer::new("base")).unwrap();
        doc.add_node(0, 0, Node::Primitive(Primitive::new(rect_shape(), StyleId::new("s"))))
            .unwrap();

        assert!(matches!(
            doc.remove_node(0, 0, 1),
            Err(ModelError::NodeOutOfRange(1))
        ));
        let node = doc.remove_node(0, 0, 0).unwrap();
        assert_eq!(node.kind(), "rectangle");
        assert_eq!(doc.primitive_count(), 0);

        let layer = doc.remove_layer(0, 0).unwrap();
        assert_eq!(layer.name, "base");
        assert!(matches!(
            doc.remove_layer(0, 0),
            Err(ModelError::LayerOutOfRange(0))
        ));
    }

    #[test]
    fn test_page_management() {
        let mut doc = Document::new();
        let idx = doc.add_page(Page::new(100.0, 100.0, Unit::Point).unwrap());
        assert_eq!(idx, 0);
        assert!(doc.remove_page(1).is_err());
        let page = doc.remove_page(0).unwrap();
        assert_eq!(page.width, 100.0);
        assert!(doc.pages.is_empty());
    }
}
