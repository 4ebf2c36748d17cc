//! The native QVD document format.
//!
//! A QVD file is the magic line `QVD1` followed by the JSON-serialized
//! canonical document. The format exists so round-trips have a lossless
//! anchor; everything the model can express survives.

use crate::traits::{LoadError, Loader, SaveError, SaveOutput, Saver};
use quiver_doc::Document;

pub(crate) const MAGIC: &[u8] = b"QVD1\n";
const FORMAT: &str = "QVD";

pub struct QvdLoader;

impl Loader for QvdLoader {
    fn load(&self, data: &[u8]) -> Result<Document, LoadError> {
        if data.is_empty() {
            return Err(LoadError::Empty);
        }
        let body = data.strip_prefix(MAGIC).ok_or_else(|| LoadError::Malformed {
            format: FORMAT,
            message: "missing QVD1 magic line".to_string(),
        })?;
        let doc: Document = serde_json::from_slice(body).map_err(|e| LoadError::Malformed {
            format: FORMAT,
            message: e.to_string(),
        })?;
        // Serde bypasses the validated mutation API; re-check invariants
        // so a failure never leaks a half-valid document.
        doc.validate()?;
        Ok(doc)
    }
}

pub struct QvdSaver;

impl Saver for QvdSaver {
    fn save(&self, doc: &Document) -> Result<SaveOutput, SaveError> {
        let mut bytes = MAGIC.to_vec();
        let body = serde_json::to_vec(doc).map_err(|e| SaveError::Encode(e.to_string()))?;
        bytes.extend_from_slice(&body);
        Ok(SaveOutput::lossless(bytes))
    }
}
