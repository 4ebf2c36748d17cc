use quiver_types::{GeometryError, ProfileId, StyleId};
use thiserror::Error;

/// Structural-invariant violations reported by document mutation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("reference to unknown style '{0}'")]
    DanglingStyle(StyleId),
    #[error("reference to unknown color profile '{0}'")]
    DanglingProfile(ProfileId),
    #[error("page index {0} out of range")]
    PageOutOfRange(usize),
    #[error("layer index {0} out of range")]
    LayerOutOfRange(usize),
    #[error("node index {0} out of range")]
    NodeOutOfRange(usize),
    #[error("style '{0}' is already defined")]
    DuplicateStyle(StyleId),
    #[error("profile '{0}' is already embedded")]
    DuplicateProfile(ProfileId),
    #[error(
        "bitmap data is {actual} bytes, expected {expected} for {width}x{height} straight-alpha RGBA"
    )]
    BitmapSizeMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}
