//! The process-wide format registry.

use crate::descriptor::{catalogue, FormatDescriptor};
use crate::id::FormatId;
use crate::traits::{Loader, Operation, Saver, UnsupportedOperation};
use crate::{gpl, qvd, svg, svgz};
use log::debug;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

static GLOBAL: Lazy<FormatRegistry> = Lazy::new(FormatRegistry::builtin);

/// Read-only lookup from format id, file extension or magic signature to
/// descriptors and codecs.
///
/// Initialized once per process via [`FormatRegistry::global`]; tests
/// that need a custom plugin set build their own instance instead of
/// mutating the global one.
pub struct FormatRegistry {
    descriptors: Vec<FormatDescriptor>,
    loaders: HashMap<FormatId, Arc<dyn Loader>>,
    savers: HashMap<FormatId, Arc<dyn Saver>>,
}

impl FormatRegistry {
    /// The shared registry with the built-in codec set.
    pub fn global() -> &'static FormatRegistry {
        &GLOBAL
    }

    /// Builds a registry carrying the full catalogue and the built-in
    /// QVD, SVG, SVGZ and GPL codecs.
    pub fn builtin() -> Self {
        let mut registry = Self {
            descriptors: catalogue(),
            loaders: HashMap::new(),
            savers: HashMap::new(),
        };
        registry.register_loader(FormatId::Qvd, Arc::new(qvd::QvdLoader));
        registry.register_saver(FormatId::Qvd, Arc::new(qvd::QvdSaver));
        registry.register_loader(FormatId::Svg, Arc::new(svg::SvgLoader));
        registry.register_saver(FormatId::Svg, Arc::new(svg::SvgSaver));
        registry.register_loader(FormatId::Svgz, Arc::new(svgz::SvgzLoader));
        registry.register_saver(FormatId::Svgz, Arc::new(svgz::SvgzSaver));
        registry.register_loader(FormatId::Gpl, Arc::new(gpl::GplLoader));
        registry.register_saver(FormatId::Gpl, Arc::new(gpl::GplSaver));
        debug!(
            "format registry initialized: {} formats, {} loaders, {} savers",
            registry.descriptors.len(),
            registry.loaders.len(),
            registry.savers.len()
        );
        registry
    }

    /// An empty registry for custom plugin sets (mainly tests and
    /// embedders).
    pub fn empty() -> Self {
        Self {
            descriptors: Vec::new(),
            loaders: HashMap::new(),
            savers: HashMap::new(),
        }
    }

    /// Registers a descriptor. Appended at the end, so earlier formats
    /// keep detection priority.
    pub fn register_descriptor(&mut self, descriptor: FormatDescriptor) {
        self.descriptors.push(descriptor);
    }

    pub fn register_loader(&mut self, id: FormatId, loader: Arc<dyn Loader>) {
        if let Some(d) = self.descriptors.iter_mut().find(|d| d.id == id) {
            d.can_load = true;
        }
        self.loaders.insert(id, loader);
    }

    pub fn register_saver(&mut self, id: FormatId, saver: Arc<dyn Saver>) {
        if let Some(d) = self.descriptors.iter_mut().find(|d| d.id == id) {
            d.can_save = true;
        }
        self.savers.insert(id, saver);
    }

    // --- Lookup ---

    pub fn descriptor(&self, id: FormatId) -> Option<&FormatDescriptor> {
        self.descriptors.iter().find(|d| d.id == id)
    }

    pub fn formats(&self) -> impl Iterator<Item = &FormatDescriptor> {
        self.descriptors.iter()
    }

    /// Pure lookup by file name or bare extension; no I/O.
    pub fn resolve_by_extension(&self, name: &str) -> Option<&FormatDescriptor> {
        let ext = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or(name);
        self.descriptors.iter().find(|d| d.matches_extension(ext))
    }

    /// Sniffs a header window against registered magic patterns. First
    /// match wins; ties are broken by registration order.
    pub fn detect(&self, prefix: &[u8]) -> Option<&FormatDescriptor> {
        self.descriptors.iter().find(|d| d.matches_magic(prefix))
    }

    pub fn loader_for(&self, id: FormatId) -> Result<Arc<dyn Loader>, UnsupportedOperation> {
        self.loaders.get(&id).cloned().ok_or(UnsupportedOperation {
            format: id,
            operation: Operation::Load,
        })
    }

    pub fn saver_for(&self, id: FormatId) -> Result<Arc<dyn Saver>, UnsupportedOperation> {
        self.savers.get(&id).cloned().ok_or(UnsupportedOperation {
            format: id,
            operation: Operation::Save,
        })
    }
}

impl std::fmt::Debug for FormatRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormatRegistry")
            .field("formats", &self.descriptors.len())
            .field("loaders", &self.loaders.len())
            .field("savers", &self.savers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_by_extension() {
        let registry = FormatRegistry::builtin();
        assert_eq!(
            registry.resolve_by_extension("drawing.svg").unwrap().id,
            FormatId::Svg
        );
        assert_eq!(registry.resolve_by_extension("SVG").unwrap().id, FormatId::Svg);
        assert_eq!(
            registry.resolve_by_extension("/tmp/photo.JPEG").unwrap().id,
            FormatId::Jpeg
        );
        assert!(registry.resolve_by_extension("notes.txt").is_none());
    }

    #[test]
    fn test_detect_by_magic() {
        let registry = FormatRegistry::builtin();
        assert_eq!(registry.detect(b"QVD1\n{}").unwrap().id, FormatId::Qvd);
        assert_eq!(
            registry.detect(b"\x89PNG\r\n\x1a\n....").unwrap().id,
            FormatId::Png
        );
        assert_eq!(registry.detect(b"GIMP Palette\n").unwrap().id, FormatId::Gpl);
        assert!(registry.detect(b"no such header").is_none());
    }

    #[test]
    fn test_detection_order_is_stable() {
        // An SVGZ stream is also a gzip stream; the catalogue places
        // SVGZ before any other gzip-based format, so it must win.
        let registry = FormatRegistry::builtin();
        assert_eq!(registry.detect(&[0x1f, 0x8b, 0x08, 0x00]).unwrap().id, FormatId::Svgz);
    }

    #[test]
    fn test_loader_for_save_only_format_fails_cleanly() {
        let registry = FormatRegistry::builtin();
        // err() rather than unwrap_err(): the Ok side is a trait object
        // with no Debug impl.
        let err = registry.loader_for(FormatId::Png).err().unwrap();
        assert_eq!(err.format, FormatId::Png);
        assert_eq!(err.operation, Operation::Load);
        assert!(err.to_string().contains("loading"));
    }

    #[test]
    fn test_capability_flags_reflect_registration() {
        let registry = FormatRegistry::builtin();
        let qvd = registry.descriptor(FormatId::Qvd).unwrap();
        assert!(qvd.can_load && qvd.can_save);
        let cdr = registry.descriptor(FormatId::Cdr).unwrap();
        assert!(!cdr.can_load && !cdr.can_save);
    }
}
