//! The external transform capability boundary and the built-in
//! device-colorimetric engine.

use crate::error::ColorError;
use crate::intent::RenderingIntent;
use crate::profiles::looks_like_icc;
use quiver_doc::ColorProfile;
use quiver_types::{Colorspace, ProfileId};
use std::sync::Arc;

/// Identifies one side of a transform for cache keying: either a bare
/// device colorspace or a specific embedded profile.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SpaceTag {
    Device(Colorspace),
    Profile(ProfileId),
}

/// A resolved description of one side of a transform, handed to the
/// engine at compile time.
#[derive(Debug, Clone, Copy)]
pub struct SpaceRef<'a> {
    pub space: Colorspace,
    pub profile: Option<&'a ColorProfile>,
}

impl<'a> SpaceRef<'a> {
    pub fn device(space: Colorspace) -> Self {
        Self { space, profile: None }
    }

    pub fn with_profile(space: Colorspace, profile: &'a ColorProfile) -> Self {
        Self { space, profile: Some(profile) }
    }

    pub fn tag(&self) -> SpaceTag {
        match self.profile {
            Some(p) => SpaceTag::Profile(p.id.clone()),
            None => SpaceTag::Device(self.space),
        }
    }
}

/// A compiled transform handle. Immutable once compiled, so handles can
/// be shared freely across worker threads.
pub trait ColorTransform: Send + Sync {
    /// Maps component values in the source space to the target space.
    /// Components are normalized to `[0,1]` on both sides.
    fn apply(&self, components: &[f64]) -> Vec<f64>;

    fn target_space(&self) -> Colorspace;
}

/// The external ICC transform capability.
///
/// The engine treats implementations as an opaque service: compile a
/// (source, target, intent) triple once, apply the handle many times.
pub trait TransformEngine: Send + Sync {
    fn compile(
        &self,
        source: &SpaceRef,
        target: &SpaceRef,
        intent: RenderingIntent,
    ) -> Result<Arc<dyn ColorTransform>, ColorError>;

    /// Human-readable engine name for log lines.
    fn name(&self) -> &'static str;
}

/// Built-in engine performing device-colorimetric conversions between the
/// model's colorspaces, routed through sRGB. Profile blobs are checked
/// for minimal ICC validity but their LUTs are not evaluated; rendering
/// intent does not alter device math and only participates in cache
/// keying.
#[derive(Debug, Default, Clone)]
pub struct DeviceTransformEngine;

impl DeviceTransformEngine {
    pub fn new() -> Self {
        Self
    }

    fn check_profile(profile: Option<&ColorProfile>) -> Result<(), ColorError> {
        if let Some(p) = profile {
            if !looks_like_icc(&p.data) {
                return Err(ColorError::ProfileUnavailable(p.id.to_string()));
            }
        }
        Ok(())
    }
}

impl TransformEngine for DeviceTransformEngine {
    fn compile(
        &self,
        source: &SpaceRef,
        target: &SpaceRef,
        _intent: RenderingIntent,
    ) -> Result<Arc<dyn ColorTransform>, ColorError> {
        if target.space == Colorspace::Spot {
            return Err(ColorError::UnsupportedColorspacePair {
                from: source.space,
                to: target.space,
            });
        }
        Self::check_profile(source.profile)?;
        Self::check_profile(target.profile)?;
        Ok(Arc::new(DeviceTransform {
            source: source.space,
            target: target.space,
        }))
    }

    fn name(&self) -> &'static str {
        "device-colorimetric"
    }
}

struct DeviceTransform {
    source: Colorspace,
    target: Colorspace,
}

impl ColorTransform for DeviceTransform {
    fn apply(&self, components: &[f64]) -> Vec<f64> {
        let rgb = to_rgb(self.source, components);
        from_rgb(self.target, rgb)
    }

    fn target_space(&self) -> Colorspace {
        self.target
    }
}

// --- Device math ---
//
// sRGB is the device-independent hub. Matrices are the standard
// sRGB/XYZ (D65) pair; Lab uses the same D65 white so every path through
// the hub inverts exactly.

const SRGB_TO_XYZ: [[f64; 3]; 3] = [
    [0.4124564, 0.3575761, 0.1804375],
    [0.2126729, 0.7151522, 0.0721750],
    [0.0193339, 0.1191920, 0.9503041],
];

const XYZ_TO_SRGB: [[f64; 3]; 3] = [
    [3.2404542, -1.5371385, -0.4985314],
    [-0.9692660, 1.8760108, 0.0415560],
    [0.0556434, -0.2040259, 1.0572252],
];

const D65_WHITE: [f64; 3] = [0.95047, 1.0, 1.08883];

fn mat_mul(m: &[[f64; 3]; 3], v: [f64; 3]) -> [f64; 3] {
    [
        m[0][0] * v[0] + m[0][1] * v[1] + m[0][2] * v[2],
        m[1][0] * v[0] + m[1][1] * v[1] + m[1][2] * v[2],
        m[2][0] * v[0] + m[2][1] * v[1] + m[2][2] * v[2],
    ]
}

fn srgb_linearize(c: f64) -> f64 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn srgb_delinearize(c: f64) -> f64 {
    let c = c.clamp(0.0, 1.0);
    if c <= 0.0031308 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

fn lab_f(t: f64) -> f64 {
    const DELTA: f64 = 6.0 / 29.0;
    if t > DELTA * DELTA * DELTA {
        t.cbrt()
    } else {
        t / (3.0 * DELTA * DELTA) + 4.0 / 29.0
    }
}

fn lab_f_inv(t: f64) -> f64 {
    const DELTA: f64 = 6.0 / 29.0;
    if t > DELTA {
        t * t * t
    } else {
        3.0 * DELTA * DELTA * (t - 4.0 / 29.0)
    }
}

fn rgb_to_xyz(rgb: [f64; 3]) -> [f64; 3] {
    mat_mul(&SRGB_TO_XYZ, rgb.map(srgb_linearize))
}

fn xyz_to_rgb(xyz: [f64; 3]) -> [f64; 3] {
    mat_mul(&XYZ_TO_SRGB, xyz).map(srgb_delinearize)
}

/// Converts components in `space` to sRGB. Spot components are the CMYK
/// fallback by convention.
fn to_rgb(space: Colorspace, components: &[f64]) -> [f64; 3] {
    match space {
        Colorspace::Rgb => [components[0], components[1], components[2]],
        Colorspace::Cmyk | Colorspace::Spot => {
            let (c, m, y, k) = (components[0], components[1], components[2], components[3]);
            [
                (1.0 - c) * (1.0 - k),
                (1.0 - m) * (1.0 - k),
                (1.0 - y) * (1.0 - k),
            ]
        }
        Colorspace::Gray => {
            let v = components[0];
            [v, v, v]
        }
        Colorspace::Lab => {
            // Components arrive normalized; denormalize to L*a*b*.
            let l = components[0] * 100.0;
            let a = components[1] * 255.0 - 128.0;
            let b = components[2] * 255.0 - 128.0;
            let fy = (l + 16.0) / 116.0;
            let fx = fy + a / 500.0;
            let fz = fy - b / 200.0;
            let xyz = [
                D65_WHITE[0] * lab_f_inv(fx),
                D65_WHITE[1] * lab_f_inv(fy),
                D65_WHITE[2] * lab_f_inv(fz),
            ];
            xyz_to_rgb(xyz)
        }
    }
}

/// Converts sRGB to components in `space`.
fn from_rgb(space: Colorspace, rgb: [f64; 3]) -> Vec<f64> {
    let rgb = rgb.map(|c| c.clamp(0.0, 1.0));
    match space {
        Colorspace::Rgb => rgb.to_vec(),
        Colorspace::Cmyk => {
            let k = 1.0 - rgb[0].max(rgb[1]).max(rgb[2]);
            if k >= 1.0 {
                vec![0.0, 0.0, 0.0, 1.0]
            } else {
                vec![
                    (1.0 - rgb[0] - k) / (1.0 - k),
                    (1.0 - rgb[1] - k) / (1.0 - k),
                    (1.0 - rgb[2] - k) / (1.0 - k),
                    k,
                ]
            }
        }
        Colorspace::Gray => {
            // Rec. 709 luma weights on linear components.
            let linear = rgb.map(srgb_linearize);
            let y = 0.2126 * linear[0] + 0.7152 * linear[1] + 0.0722 * linear[2];
            vec![srgb_delinearize(y)]
        }
        Colorspace::Lab => {
            let xyz = rgb_to_xyz(rgb);
            let fx = lab_f(xyz[0] / D65_WHITE[0]);
            let fy = lab_f(xyz[1] / D65_WHITE[1]);
            let fz = lab_f(xyz[2] / D65_WHITE[2]);
            let l = 116.0 * fy - 16.0;
            let a = 500.0 * (fx - fy);
            let b = 200.0 * (fy - fz);
            vec![
                (l / 100.0).clamp(0.0, 1.0),
                ((a + 128.0) / 255.0).clamp(0.0, 1.0),
                ((b + 128.0) / 255.0).clamp(0.0, 1.0),
            ]
        }
        // Checked at compile time in TransformEngine::compile.
        Colorspace::Spot => rgb.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device(source: Colorspace, target: Colorspace) -> Arc<dyn ColorTransform> {
        DeviceTransformEngine::new()
            .compile(
                &SpaceRef::device(source),
                &SpaceRef::device(target),
                RenderingIntent::RelativeColorimetric,
            )
            .unwrap()
    }

    #[test]
    fn test_pure_red_to_cmyk() {
        let t = device(Colorspace::Rgb, Colorspace::Cmyk);
        let cmyk = t.apply(&[1.0, 0.0, 0.0]);
        assert!((cmyk[0] - 0.0).abs() < 1e-9);
        assert!((cmyk[1] - 1.0).abs() < 1e-9);
        assert!((cmyk[2] - 1.0).abs() < 1e-9);
        assert!((cmyk[3] - 0.0).abs() < 1e-9);
    }

    #[test]
    fn test_cmyk_rgb_round_trip_is_color_stable() {
        // Gray-component replacement redistributes ink, so component
        // identity does not hold; the rendered RGB must.
        let forward = device(Colorspace::Cmyk, Colorspace::Rgb);
        let back = device(Colorspace::Rgb, Colorspace::Cmyk);
        let rgb = forward.apply(&[0.1, 0.2, 0.3, 0.0]);
        let rgb2 = forward.apply(&back.apply(&rgb));
        for (a, b) in rgb.iter().zip(rgb2.iter()) {
            assert!((a - b).abs() < 1e-6, "{rgb:?} vs {rgb2:?}");
        }
    }

    #[test]
    fn test_lab_round_trip() {
        let forward = device(Colorspace::Rgb, Colorspace::Lab);
        let back = device(Colorspace::Lab, Colorspace::Rgb);
        let rgb = [0.25, 0.5, 0.75];
        let out = back.apply(&forward.apply(&rgb));
        for (a, b) in rgb.iter().zip(out.iter()) {
            assert!((a - b).abs() < 1e-4, "{rgb:?} vs {out:?}");
        }
    }

    #[test]
    fn test_white_is_lab_100() {
        let t = device(Colorspace::Rgb, Colorspace::Lab);
        let lab = t.apply(&[1.0, 1.0, 1.0]);
        assert!((lab[0] - 1.0).abs() < 1e-3, "L* for white should be 100, got {}", lab[0] * 100.0);
    }

    #[test]
    fn test_gray_preserves_neutrals() {
        let t = device(Colorspace::Gray, Colorspace::Rgb);
        assert_eq!(t.apply(&[0.5]), vec![0.5, 0.5, 0.5]);
        let back = device(Colorspace::Rgb, Colorspace::Gray);
        let g = back.apply(&[0.5, 0.5, 0.5]);
        assert!((g[0] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_spot_target_rejected() {
        // err() rather than unwrap_err(): the Ok side is a transform
        // handle with no Debug impl.
        let err = DeviceTransformEngine::new()
            .compile(
                &SpaceRef::device(Colorspace::Rgb),
                &SpaceRef::device(Colorspace::Spot),
                RenderingIntent::default(),
            )
            .err()
            .unwrap();
        assert!(matches!(err, ColorError::UnsupportedColorspacePair { .. }));
    }

    #[test]
    fn test_corrupt_profile_rejected() {
        let junk = ColorProfile::new("junk", "not a profile", vec![1, 2, 3]);
        let err = DeviceTransformEngine::new()
            .compile(
                &SpaceRef::with_profile(Colorspace::Rgb, &junk),
                &SpaceRef::device(Colorspace::Cmyk),
                RenderingIntent::default(),
            )
            .err()
            .unwrap();
        assert_eq!(err, ColorError::ProfileUnavailable("junk".to_string()));
    }
}
