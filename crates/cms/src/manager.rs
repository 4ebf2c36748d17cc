//! Policy layer over the transform capability.

use crate::cache::{TransformCache, TransformKey};
use crate::engine::{DeviceTransformEngine, SpaceRef, TransformEngine};
use crate::error::ColorError;
use crate::intent::RenderingIntent;
use log::{debug, warn};
use quiver_doc::{Document, ProfileSet};
use quiver_types::{ColorSpec, Colorspace, LossManifest};
use std::sync::Arc;

/// Converts color specs between colorspaces and profiles, caching
/// compiled transforms across calls.
///
/// The manager is the one shared, mutable structure of a batch
/// conversion; it is safe to use from concurrent workers.
pub struct ColorManager {
    engine: Arc<dyn TransformEngine>,
    cache: TransformCache,
    default_intent: RenderingIntent,
}

impl ColorManager {
    pub fn new(engine: Arc<dyn TransformEngine>) -> Self {
        Self {
            engine,
            cache: TransformCache::new(),
            default_intent: RenderingIntent::default(),
        }
    }

    pub fn with_default_intent(mut self, intent: RenderingIntent) -> Self {
        self.default_intent = intent;
        self
    }

    pub fn default_intent(&self) -> RenderingIntent {
        self.default_intent
    }

    /// Number of compiled transforms currently cached.
    pub fn cached_transforms(&self) -> usize {
        self.cache.len()
    }

    /// Converts a spec to `target`, discarding fallback disclosures.
    pub fn convert(
        &self,
        spec: &ColorSpec,
        profiles: &ProfileSet,
        target: Colorspace,
        intent: Option<RenderingIntent>,
    ) -> Result<ColorSpec, ColorError> {
        let mut scratch = LossManifest::new();
        self.convert_collecting(spec, profiles, target, intent, &mut scratch)
    }

    /// Converts a spec to `target`, appending every fallback event
    /// (spot flattening, missing or corrupt profiles) to `losses`.
    pub fn convert_collecting(
        &self,
        spec: &ColorSpec,
        profiles: &ProfileSet,
        target: Colorspace,
        intent: Option<RenderingIntent>,
        losses: &mut LossManifest,
    ) -> Result<ColorSpec, ColorError> {
        if target == Colorspace::Spot {
            return Err(ColorError::UnsupportedColorspacePair {
                from: spec.colorspace(),
                to: target,
            });
        }

        // Already in the target space: return an equal value, no drift.
        if spec.colorspace() == target {
            return Ok(spec.clone());
        }

        let intent = intent.unwrap_or(self.default_intent);
        let alpha = spec.alpha();

        // Spot colors are converted through a fallback; the ink name is
        // preserved only in the manifest.
        if let ColorSpec::Spot { name, rgb_fallback, cmyk_fallback, .. } = spec {
            let (fallback_space, reason) = match target {
                Colorspace::Cmyk => (Colorspace::Cmyk, "flattened to CMYK fallback"),
                _ => (Colorspace::Rgb, "flattened to RGB fallback"),
            };
            losses.record(format!("spot color '{name}'"), reason);
            let fallback = match fallback_space {
                Colorspace::Cmyk => ColorSpec::Cmyk {
                    components: *cmyk_fallback,
                    profile: None,
                    alpha,
                },
                _ => ColorSpec::Rgb {
                    components: *rgb_fallback,
                    profile: None,
                    alpha,
                },
            };
            // The fallback may itself still need a device conversion.
            return self.convert_collecting(&fallback, profiles, target, Some(intent), losses);
        }

        let source_space = spec.colorspace();
        let resolved_profile = match spec.profile() {
            Some(id) => match profiles.get(id) {
                Some(profile) => Some(profile),
                None => {
                    warn!("color profile '{id}' not embedded; falling back to built-in default");
                    losses.record(
                        format!("color profile '{id}'"),
                        "not embedded; used built-in default",
                    );
                    None
                }
            },
            None => None,
        };

        let source_ref = match resolved_profile {
            Some(profile) => SpaceRef::with_profile(source_space, profile),
            None => SpaceRef::device(source_space),
        };
        let target_ref = SpaceRef::device(target);

        let transform = match self.compile_cached(&source_ref, &target_ref, intent) {
            Ok(t) => t,
            Err(ColorError::ProfileUnavailable(id)) => {
                // Corrupt blob: degrade to the bare device pair.
                warn!("color profile '{id}' malformed; falling back to built-in default");
                losses.record(
                    format!("color profile '{id}'"),
                    "malformed; used built-in default",
                );
                self.compile_cached(&SpaceRef::device(source_space), &target_ref, intent)?
            }
            Err(e) => return Err(e),
        };

        let components = transform.apply(spec.components());
        Ok(spec_from_components(target, &components, alpha))
    }

    fn compile_cached(
        &self,
        source: &SpaceRef,
        target: &SpaceRef,
        intent: RenderingIntent,
    ) -> Result<Arc<dyn crate::engine::ColorTransform>, ColorError> {
        let key = TransformKey {
            source: source.tag(),
            target: target.tag(),
            intent,
        };
        if let Some(hit) = self.cache.get(&key) {
            return Ok(hit);
        }
        let compiled = self.engine.compile(source, target, intent)?;
        debug!(
            "compiled {} transform {:?} -> {:?} ({})",
            self.engine.name(),
            key.source,
            key.target,
            intent.name()
        );
        Ok(self.cache.insert_if_absent(key, compiled))
    }

    /// Rewrites every color spec in the document's style table to
    /// `target` in place, appending all fallback events and colorspace
    /// rewrites to `losses`. Used before saving into formats that
    /// mandate a colorspace.
    pub fn normalize_document(
        &self,
        doc: &mut Document,
        target: Colorspace,
        losses: &mut LossManifest,
    ) -> Result<(), ColorError> {
        let profiles = doc.profiles.clone();
        for (_, style) in doc.styles.iter_mut() {
            if let Some(fill) = style.fill.as_mut() {
                self.normalize_slot(&mut fill.color, "fill", &profiles, target, losses)?;
            }
            if let Some(stroke) = style.stroke.as_mut() {
                self.normalize_slot(&mut stroke.color, "stroke", &profiles, target, losses)?;
            }
        }
        Ok(())
    }

    fn normalize_slot(
        &self,
        color: &mut ColorSpec,
        role: &str,
        profiles: &ProfileSet,
        target: Colorspace,
        losses: &mut LossManifest,
    ) -> Result<(), ColorError> {
        let source_space = color.colorspace();
        if source_space == target && color.profile().is_none() {
            return Ok(());
        }
        let converted = self.convert_collecting(color, profiles, target, None, losses)?;
        // Spot flattening is disclosed by convert_collecting with the ink
        // name; plain device rewrites are disclosed here per slot.
        if source_space != target && source_space != Colorspace::Spot {
            losses.record(
                format!("{} {role}", source_space.name()),
                format!("target requires {}", target.name()),
            );
        }
        *color = converted;
        Ok(())
    }
}

impl Default for ColorManager {
    fn default() -> Self {
        Self::new(Arc::new(DeviceTransformEngine::new()))
    }
}

impl std::fmt::Debug for ColorManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColorManager")
            .field("engine", &self.engine.name())
            .field("default_intent", &self.default_intent)
            .field("cache", &self.cache)
            .finish()
    }
}

fn spec_from_components(target: Colorspace, components: &[f64], alpha: f64) -> ColorSpec {
    match target {
        Colorspace::Rgb => ColorSpec::Rgb {
            components: [components[0], components[1], components[2]],
            profile: None,
            alpha,
        },
        Colorspace::Cmyk => ColorSpec::Cmyk {
            components: [components[0], components[1], components[2], components[3]],
            profile: None,
            alpha,
        },
        Colorspace::Gray => ColorSpec::Gray {
            components: [components[0]],
            profile: None,
            alpha,
        },
        Colorspace::Lab => ColorSpec::Lab {
            components: [components[0], components[1], components[2]],
            profile: None,
            alpha,
        },
        // Rejected before any transform is compiled.
        Colorspace::Spot => unreachable!("spot is never a conversion target"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiver_doc::{ColorProfile, Style};
    use quiver_types::ProfileId;

    #[test]
    fn test_idempotent_when_already_in_target() {
        let manager = ColorManager::default();
        let profiles = ProfileSet::default();
        let spec = ColorSpec::rgb(0.25, 0.5, 0.75);
        let out = manager
            .convert(&spec, &profiles, Colorspace::Rgb, None)
            .unwrap();
        assert_eq!(out, spec);
    }

    #[test]
    fn test_cmyk_to_rgb_uses_cache() {
        let manager = ColorManager::default();
        let profiles = ProfileSet::default();
        for _ in 0..10 {
            manager
                .convert(&ColorSpec::cmyk(0.1, 0.2, 0.3, 0.0), &profiles, Colorspace::Rgb, None)
                .unwrap();
        }
        assert_eq!(manager.cached_transforms(), 1);
    }

    #[test]
    fn test_missing_profile_falls_back_with_disclosure() {
        let manager = ColorManager::default();
        let profiles = ProfileSet::default();
        let spec = ColorSpec::cmyk(0.1, 0.2, 0.3, 0.0).with_profile(ProfileId::new("ghost"));

        let mut losses = LossManifest::new();
        let out = manager
            .convert_collecting(&spec, &profiles, Colorspace::Rgb, None, &mut losses)
            .unwrap();
        assert_eq!(out.colorspace(), Colorspace::Rgb);
        assert!(losses.mentions("color profile 'ghost'"));
    }

    #[test]
    fn test_corrupt_profile_falls_back_with_disclosure() {
        let manager = ColorManager::default();
        let mut profiles = ProfileSet::default();
        profiles
            .insert(ColorProfile::new("bad", "truncated", vec![0u8; 8]))
            .unwrap();
        let spec = ColorSpec::rgb(1.0, 0.0, 0.0).with_profile(ProfileId::new("bad"));

        let mut losses = LossManifest::new();
        let out = manager
            .convert_collecting(&spec, &profiles, Colorspace::Cmyk, None, &mut losses)
            .unwrap();
        assert_eq!(out.colorspace(), Colorspace::Cmyk);
        assert!(losses.mentions("color profile 'bad'"));
    }

    #[test]
    fn test_spot_flattens_and_discloses_name() {
        let manager = ColorManager::default();
        let profiles = ProfileSet::default();
        let spot = ColorSpec::spot("PANTONE 186 C", [0.8, 0.1, 0.2], [0.0, 1.0, 0.8, 0.05]);

        let mut losses = LossManifest::new();
        let rgb = manager
            .convert_collecting(&spot, &profiles, Colorspace::Rgb, None, &mut losses)
            .unwrap();
        assert_eq!(rgb, ColorSpec::rgb(0.8, 0.1, 0.2));
        assert!(losses.mentions("spot color 'PANTONE 186 C'"));

        let cmyk = manager
            .convert(&spot, &profiles, Colorspace::Cmyk, None)
            .unwrap();
        assert_eq!(cmyk, ColorSpec::cmyk(0.0, 1.0, 0.8, 0.05));
    }

    #[test]
    fn test_spot_target_is_hard_error() {
        let manager = ColorManager::default();
        let profiles = ProfileSet::default();
        let err = manager
            .convert(&ColorSpec::gray(0.5), &profiles, Colorspace::Spot, None)
            .unwrap_err();
        assert!(matches!(err, ColorError::UnsupportedColorspacePair { .. }));
    }

    #[test]
    fn test_normalize_document_records_cmyk_fill() {
        let manager = ColorManager::default();
        let mut doc = Document::with_default_page();
        doc.define_style("brand", Style::solid_fill(ColorSpec::cmyk(0.1, 0.2, 0.3, 0.0)))
            .unwrap();

        let mut losses = LossManifest::new();
        manager
            .normalize_document(&mut doc, Colorspace::Rgb, &mut losses)
            .unwrap();

        doc.visit_colors(|_, c| assert_eq!(c.colorspace(), Colorspace::Rgb));
        assert!(losses.mentions("CMYK fill"));
        let entry = losses
            .entries()
            .iter()
            .find(|e| e.feature == "CMYK fill")
            .unwrap();
        assert_eq!(entry.reason, "target requires RGB");
    }

    #[test]
    fn test_normalize_is_stable_on_second_pass() {
        let manager = ColorManager::default();
        let mut doc = Document::new();
        doc.define_style("a", Style::solid_fill(ColorSpec::cmyk(0.3, 0.0, 0.6, 0.1)))
            .unwrap();

        let mut first = LossManifest::new();
        manager
            .normalize_document(&mut doc, Colorspace::Rgb, &mut first)
            .unwrap();
        let snapshot = doc.clone();

        let mut second = LossManifest::new();
        manager
            .normalize_document(&mut doc, Colorspace::Rgb, &mut second)
            .unwrap();
        assert_eq!(doc, snapshot, "second normalization must not drift");
        assert!(second.is_empty());
    }
}
