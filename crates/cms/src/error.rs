use quiver_types::Colorspace;
use thiserror::Error;

/// Error type for color conversion.
///
/// Both variants the transform capability can produce are recoverable:
/// the manager falls back to a built-in device profile and discloses the
/// event in the loss manifest instead of aborting the conversion.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ColorError {
    #[error("color profile '{0}' unavailable or malformed")]
    ProfileUnavailable(String),

    #[error("unsupported colorspace pair: {from:?} -> {to:?}")]
    UnsupportedColorspacePair { from: Colorspace, to: Colorspace },
}
