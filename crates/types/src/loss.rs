//! Conversion loss disclosure.
//!
//! Savers and the color layer never drop a document feature silently:
//! every best-effort fallback appends an entry here, and the pipeline
//! surfaces the combined manifest to the caller.

use serde::{Deserialize, Serialize};

/// One disclosed feature the target representation could not preserve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LossEntry {
    /// The document feature that was degraded, e.g. `"CMYK fill"`.
    pub feature: String,
    /// Why it could not be kept, e.g. `"target requires RGB"`.
    pub reason: String,
}

impl LossEntry {
    pub fn new(feature: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            feature: feature.into(),
            reason: reason.into(),
        }
    }
}

/// Ordered list of loss entries collected during a conversion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LossManifest {
    entries: Vec<LossEntry>,
}

impl LossManifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, feature: impl Into<String>, reason: impl Into<String>) {
        self.entries.push(LossEntry::new(feature, reason));
    }

    pub fn push(&mut self, entry: LossEntry) {
        self.entries.push(entry);
    }

    /// Appends all entries of `other`, preserving order.
    pub fn merge(&mut self, other: LossManifest) {
        self.entries.extend(other.entries);
    }

    pub fn entries(&self) -> &[LossEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if any entry's feature names (or contains) the given text,
    /// e.g. `mentions("PANTONE 186 C")` matches the entry for
    /// `"spot color 'PANTONE 186 C'"`.
    pub fn mentions(&self, feature: &str) -> bool {
        self.entries.iter().any(|e| e.feature.contains(feature))
    }
}

impl IntoIterator for LossManifest {
    type Item = LossEntry;
    type IntoIter = std::vec::IntoIter<LossEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_preserves_order() {
        let mut m = LossManifest::new();
        m.record("spot color 'PANTONE 186 C'", "flattened to CMYK fallback");
        m.record("CMYK fill", "target requires RGB");

        assert_eq!(m.len(), 2);
        assert_eq!(m.entries()[0].feature, "spot color 'PANTONE 186 C'");
        assert!(m.mentions("CMYK fill"));
    }

    #[test]
    fn test_merge_appends() {
        let mut a = LossManifest::new();
        a.record("a", "1");
        let mut b = LossManifest::new();
        b.record("b", "2");
        a.merge(b);
        assert_eq!(a.entries()[1].feature, "b");
    }
}
