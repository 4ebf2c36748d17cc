//! The shared transform cache.
//!
//! Conversions across a document reuse the same (source, target, intent)
//! pair for many colors; compiling a transform once and sharing the
//! handle is the whole point of this layer. Entries are immutable once
//! inserted, so concurrent readers need no coordination beyond the lock.

use crate::engine::{ColorTransform, SpaceTag};
use crate::intent::RenderingIntent;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Cache key: one tag per side plus the rendering intent.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TransformKey {
    pub source: SpaceTag,
    pub target: SpaceTag,
    pub intent: RenderingIntent,
}

#[derive(Default)]
pub struct TransformCache {
    inner: RwLock<HashMap<TransformKey, Arc<dyn ColorTransform>>>,
}

impl TransformCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &TransformKey) -> Option<Arc<dyn ColorTransform>> {
        self.inner.read().ok()?.get(key).cloned()
    }

    /// Inserts a freshly compiled transform unless another worker won the
    /// race, in which case the incumbent is returned and the duplicate is
    /// discarded.
    pub fn insert_if_absent(
        &self,
        key: TransformKey,
        transform: Arc<dyn ColorTransform>,
    ) -> Arc<dyn ColorTransform> {
        match self.inner.write() {
            Ok(mut map) => map.entry(key).or_insert(transform).clone(),
            // A poisoned lock degrades to uncached operation.
            Err(_) => transform,
        }
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for TransformCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransformCache")
            .field("entries", &self.len())
            .finish()
    }
}
