use crate::ids::ProfileId;
use serde::{Deserialize, Serialize};

fn default_one() -> f64 {
    1.0
}

fn is_one(num: &f64) -> bool {
    *num == 1.0
}

fn clamp_unit(v: f64) -> f64 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

/// The colorspace tag of a [`ColorSpec`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Colorspace {
    Rgb,
    Cmyk,
    Gray,
    Lab,
    Spot,
}

impl Colorspace {
    /// Number of components a spec in this space carries.
    pub fn component_count(&self) -> usize {
        match self {
            Colorspace::Rgb => 3,
            Colorspace::Cmyk => 4,
            Colorspace::Gray => 1,
            Colorspace::Lab => 3,
            // Spot colors are measured through their CMYK fallback.
            Colorspace::Spot => 4,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Colorspace::Rgb => "RGB",
            Colorspace::Cmyk => "CMYK",
            Colorspace::Gray => "Gray",
            Colorspace::Lab => "Lab",
            Colorspace::Spot => "Spot",
        }
    }
}

/// A colorspace-aware color value.
///
/// Component values are always held in `[0,1]`; constructors clamp rather
/// than propagate out-of-range or NaN input. Lab values are stored
/// normalized (`L/100`, `(a+128)/255`, `(b+128)/255`). A spec may reference
/// an ICC profile by id; the blob itself lives in the owning document's
/// profile set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "space", rename_all = "lowercase")]
pub enum ColorSpec {
    Rgb {
        components: [f64; 3],
        #[serde(default, skip_serializing_if = "Option::is_none")]
        profile: Option<ProfileId>,
        #[serde(default = "default_one", skip_serializing_if = "is_one")]
        alpha: f64,
    },
    Cmyk {
        components: [f64; 4],
        #[serde(default, skip_serializing_if = "Option::is_none")]
        profile: Option<ProfileId>,
        #[serde(default = "default_one", skip_serializing_if = "is_one")]
        alpha: f64,
    },
    Gray {
        components: [f64; 1],
        #[serde(default, skip_serializing_if = "Option::is_none")]
        profile: Option<ProfileId>,
        #[serde(default = "default_one", skip_serializing_if = "is_one")]
        alpha: f64,
    },
    Lab {
        components: [f64; 3],
        #[serde(default, skip_serializing_if = "Option::is_none")]
        profile: Option<ProfileId>,
        #[serde(default = "default_one", skip_serializing_if = "is_one")]
        alpha: f64,
    },
    /// A named ink with device fallbacks for targets that cannot
    /// reproduce it directly.
    Spot {
        name: String,
        rgb_fallback: [f64; 3],
        cmyk_fallback: [f64; 4],
        #[serde(default = "default_one", skip_serializing_if = "is_one")]
        alpha: f64,
    },
}

impl ColorSpec {
    pub fn rgb(r: f64, g: f64, b: f64) -> Self {
        ColorSpec::Rgb {
            components: [clamp_unit(r), clamp_unit(g), clamp_unit(b)],
            profile: None,
            alpha: 1.0,
        }
    }

    pub fn cmyk(c: f64, m: f64, y: f64, k: f64) -> Self {
        ColorSpec::Cmyk {
            components: [clamp_unit(c), clamp_unit(m), clamp_unit(y), clamp_unit(k)],
            profile: None,
            alpha: 1.0,
        }
    }

    pub fn gray(value: f64) -> Self {
        ColorSpec::Gray {
            components: [clamp_unit(value)],
            profile: None,
            alpha: 1.0,
        }
    }

    /// Builds a Lab spec from raw `L` in `[0,100]` and `a`/`b` in `[-128,127]`.
    pub fn lab(l: f64, a: f64, b: f64) -> Self {
        ColorSpec::Lab {
            components: [
                clamp_unit(l / 100.0),
                clamp_unit((a + 128.0) / 255.0),
                clamp_unit((b + 128.0) / 255.0),
            ],
            profile: None,
            alpha: 1.0,
        }
    }

    pub fn spot(name: impl Into<String>, rgb_fallback: [f64; 3], cmyk_fallback: [f64; 4]) -> Self {
        ColorSpec::Spot {
            name: name.into(),
            rgb_fallback: rgb_fallback.map(clamp_unit),
            cmyk_fallback: cmyk_fallback.map(clamp_unit),
            alpha: 1.0,
        }
    }

    pub fn black() -> Self {
        Self::gray(0.0)
    }

    pub fn white() -> Self {
        Self::gray(1.0)
    }

    pub fn colorspace(&self) -> Colorspace {
        match self {
            ColorSpec::Rgb { .. } => Colorspace::Rgb,
            ColorSpec::Cmyk { .. } => Colorspace::Cmyk,
            ColorSpec::Gray { .. } => Colorspace::Gray,
            ColorSpec::Lab { .. } => Colorspace::Lab,
            ColorSpec::Spot { .. } => Colorspace::Spot,
        }
    }

    /// The component slice in this spec's own space. For spot colors this
    /// is the CMYK fallback.
    pub fn components(&self) -> &[f64] {
        match self {
            ColorSpec::Rgb { components, .. } => components,
            ColorSpec::Cmyk { components, .. } => components,
            ColorSpec::Gray { components, .. } => components,
            ColorSpec::Lab { components, .. } => components,
            ColorSpec::Spot { cmyk_fallback, .. } => cmyk_fallback,
        }
    }

    pub fn alpha(&self) -> f64 {
        match self {
            ColorSpec::Rgb { alpha, .. }
            | ColorSpec::Cmyk { alpha, .. }
            | ColorSpec::Gray { alpha, .. }
            | ColorSpec::Lab { alpha, .. }
            | ColorSpec::Spot { alpha, .. } => *alpha,
        }
    }

    pub fn with_alpha(mut self, a: f64) -> Self {
        let a = clamp_unit(a);
        match &mut self {
            ColorSpec::Rgb { alpha, .. }
            | ColorSpec::Cmyk { alpha, .. }
            | ColorSpec::Gray { alpha, .. }
            | ColorSpec::Lab { alpha, .. }
            | ColorSpec::Spot { alpha, .. } => *alpha = a,
        }
        self
    }

    /// The referenced ICC profile id, if any. Spot colors never carry one.
    pub fn profile(&self) -> Option<&ProfileId> {
        match self {
            ColorSpec::Rgb { profile, .. }
            | ColorSpec::Cmyk { profile, .. }
            | ColorSpec::Gray { profile, .. }
            | ColorSpec::Lab { profile, .. } => profile.as_ref(),
            ColorSpec::Spot { .. } => None,
        }
    }

    pub fn with_profile(mut self, id: ProfileId) -> Self {
        match &mut self {
            ColorSpec::Rgb { profile, .. }
            | ColorSpec::Cmyk { profile, .. }
            | ColorSpec::Gray { profile, .. }
            | ColorSpec::Lab { profile, .. } => *profile = Some(id),
            ColorSpec::Spot { .. } => {}
        }
        self
    }

    /// The spot ink name, if this is a spot color.
    pub fn spot_name(&self) -> Option<&str> {
        match self {
            ColorSpec::Spot { name, .. } => Some(name),
            _ => None,
        }
    }
}

impl Default for ColorSpec {
    fn default() -> Self {
        Self::black()
    }
}
