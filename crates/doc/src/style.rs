//! Shared, named styles.
//!
//! Styles carry [`ColorSpec`]s rather than raw pixel values, so the color
//! management layer can rewrite them without touching geometry.

use quiver_types::ColorSpec;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fill {
    pub color: ColorSpec,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stroke {
    pub color: ColorSpec,
    pub width: f64,
    #[serde(default)]
    pub cap: LineCap,
    #[serde(default)]
    pub join: LineJoin,
    /// Dash pattern in document units; empty means solid.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dash: Vec<f64>,
}

impl Stroke {
    pub fn hairline(color: ColorSpec) -> Self {
        Self {
            color,
            width: 0.25,
            cap: LineCap::default(),
            join: LineJoin::default(),
            dash: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextSpec {
    pub font_family: String,
    pub font_size: f64,
    #[serde(default)]
    pub letter_spacing: f64,
}

impl Default for TextSpec {
    fn default() -> Self {
        Self {
            font_family: "Sans".to_string(),
            font_size: 12.0,
            letter_spacing: 0.0,
        }
    }
}

/// A named bundle of fill, stroke and text specifications.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Style {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<Fill>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<Stroke>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<TextSpec>,
}

impl Style {
    pub fn solid_fill(color: ColorSpec) -> Self {
        Self {
            fill: Some(Fill { color }),
            ..Self::default()
        }
    }

    pub fn stroked(color: ColorSpec, width: f64) -> Self {
        Self {
            stroke: Some(Stroke {
                color,
                width,
                cap: LineCap::default(),
                join: LineJoin::default(),
                dash: Vec::new(),
            }),
            ..Self::default()
        }
    }

    /// All color specs referenced by this style.
    pub fn colors(&self) -> impl Iterator<Item = &ColorSpec> {
        self.fill
            .iter()
            .map(|f| &f.color)
            .chain(self.stroke.iter().map(|s| &s.color))
    }

    pub fn colors_mut(&mut self) -> impl Iterator<Item = &mut ColorSpec> {
        self.fill
            .iter_mut()
            .map(|f| &mut f.color)
            .chain(self.stroke.iter_mut().map(|s| &mut s.color))
    }
}
