//! The contract every format plugin satisfies.

use crate::id::FormatId;
use quiver_cms::ColorError;
use quiver_doc::{Document, ModelError};
use quiver_types::LossManifest;
use std::fmt;
use thiserror::Error;

/// Error type for format loading.
#[derive(Error, Debug)]
pub enum LoadError {
    /// Zero-byte input never yields an empty-but-valid document.
    #[error("empty input")]
    Empty,

    #[error("malformed {format} input: {message}")]
    Malformed { format: &'static str, message: String },

    /// The input requires a feature the loader does not implement for
    /// minimal validity.
    #[error("unsupported {format} feature: {feature}")]
    UnsupportedFeature { format: &'static str, feature: String },

    /// The parsed bytes violate a document invariant.
    #[error("structural violation in loaded document: {0}")]
    Model(#[from] ModelError),
}

/// Error type for format saving.
#[derive(Error, Debug)]
pub enum SaveError {
    /// The document cannot be represented in the target format even with
    /// best-effort fallback.
    #[error("document cannot be represented as {format}: {message}")]
    Unrepresentable { format: &'static str, message: String },

    #[error("encoding failed: {0}")]
    Encode(String),

    #[error(transparent)]
    Color(#[from] ColorError),
}

/// Requesting a capability a format does not provide.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{format:?} does not support {operation}")]
pub struct UnsupportedOperation {
    pub format: FormatId,
    pub operation: Operation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Load,
    Save,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Load => write!(f, "loading"),
            Operation::Save => write!(f, "saving"),
        }
    }
}

/// A successful save: the encoded bytes plus the ordered disclosure of
/// every document feature the target format could not keep exactly.
#[derive(Debug)]
pub struct SaveOutput {
    pub bytes: Vec<u8>,
    pub losses: LossManifest,
}

impl SaveOutput {
    pub fn lossless(bytes: Vec<u8>) -> Self {
        Self { bytes, losses: LossManifest::new() }
    }
}

/// A format loader.
///
/// Loaders are pure with respect to each other: no global locks, no
/// shared mutable state, and on failure no partially built document is
/// ever returned to the caller.
pub trait Loader: Send + Sync {
    fn load(&self, data: &[u8]) -> Result<Document, LoadError>;
}

/// A format saver.
///
/// Silent loss is forbidden: a saver that falls back (flattens a spot
/// color, drops an unrepresentable primitive) must disclose it in the
/// returned manifest.
pub trait Saver: Send + Sync {
    fn save(&self, doc: &Document) -> Result<SaveOutput, SaveError>;
}
