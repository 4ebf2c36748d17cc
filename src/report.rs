use crate::error::ConversionError;
use quiver_formats::FormatId;
use quiver_types::LossManifest;
use serde::{Deserialize, Serialize};

/// Outcome class of a conversion.
///
/// `Partial` means the output was written but at least one document
/// feature was approximated or dropped, each disclosed in the manifest.
/// `Failed` reports carry no output bytes; the `error` field holds the
/// rendered error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversionStatus {
    Success,
    Partial,
    Failed,
}

/// What a conversion did: formats on both ends and every loss incurred.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionReport {
    /// `None` only for failures where the source format could not be
    /// determined.
    pub source_format: Option<FormatId>,
    pub target_format: FormatId,
    pub status: ConversionStatus,
    pub losses: LossManifest,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ConversionReport {
    pub fn new(source_format: FormatId, target_format: FormatId, losses: LossManifest) -> Self {
        let status = if losses.is_empty() {
            ConversionStatus::Success
        } else {
            ConversionStatus::Partial
        };
        Self {
            source_format: Some(source_format),
            target_format,
            status,
            losses,
            error: None,
        }
    }

    pub fn failed(
        source_format: Option<FormatId>,
        target_format: FormatId,
        error: &ConversionError,
    ) -> Self {
        Self {
            source_format,
            target_format,
            status: ConversionStatus::Failed,
            losses: LossManifest::new(),
            error: Some(error.to_string()),
        }
    }

    pub fn is_lossless(&self) -> bool {
        self.status == ConversionStatus::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_follows_manifest() {
        let clean = ConversionReport::new(FormatId::Qvd, FormatId::Qvd, LossManifest::new());
        assert_eq!(clean.status, ConversionStatus::Success);
        assert!(clean.is_lossless());

        let mut losses = LossManifest::new();
        losses.record("CMYK fill", "target requires RGB");
        let partial = ConversionReport::new(FormatId::Qvd, FormatId::Svg, losses);
        assert_eq!(partial.status, ConversionStatus::Partial);
    }

    #[test]
    fn test_failed_report_carries_error() {
        let err = ConversionError::Unrecognized { filename: None };
        let report = ConversionReport::failed(None, FormatId::Svg, &err);
        assert_eq!(report.status, ConversionStatus::Failed);
        assert!(report.error.as_deref().unwrap().contains("source format"));
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"status\":\"failed\""));
    }

    #[test]
    fn test_report_serializes_camel_case() {
        let report = ConversionReport::new(FormatId::Svg, FormatId::Qvd, LossManifest::new());
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"sourceFormat\""));
        assert!(json.contains("\"status\":\"success\""));
    }
}
