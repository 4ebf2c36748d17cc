use quiver_cms::ColorError;
use quiver_formats::{FormatId, LoadError, SaveError, UnsupportedOperation};
use thiserror::Error;

/// A comprehensive error type for the entire conversion pipeline.
#[derive(Error, Debug)]
pub enum ConversionError {
    /// No hint, no recognized extension and no matching magic signature.
    #[error("could not determine source format{}", filename_suffix(.filename))]
    Unrecognized { filename: Option<String> },

    #[error(transparent)]
    Unsupported(#[from] UnsupportedOperation),

    #[error("loading {format} failed: {source}")]
    Load { format: FormatId, source: LoadError },

    #[error("saving {format} failed: {source}")]
    Save { format: FormatId, source: SaveError },

    #[error("color conversion failed: {0}")]
    Color(#[from] ColorError),

    #[error("conversion cancelled")]
    Cancelled,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn filename_suffix(filename: &Option<String>) -> String {
    match filename {
        Some(name) => format!(" of '{name}'"),
        None => String::new(),
    }
}
