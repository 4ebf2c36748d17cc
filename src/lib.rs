//! Quiver: a multi-format vector graphics conversion engine.
//!
//! Every conversion goes through the canonical document model defined
//! in [`quiver_doc`]: a source plugin loads bytes into a [`Document`],
//! the color layer normalizes it to whatever the target mandates, and a
//! target plugin saves it — disclosing in a [`ConversionReport`] every
//! feature the target could not keep.
//!
//! ```
//! use quiver::{Converter, ConversionRequest};
//! use quiver_formats::FormatId;
//!
//! let converter = Converter::default();
//! let palette = b"GIMP Palette\n255 0 0\tRed\n".to_vec();
//! let result = converter
//!     .convert(ConversionRequest::new(palette, FormatId::Svg))
//!     .unwrap();
//! assert!(std::str::from_utf8(&result.bytes).unwrap().contains("<svg"));
//! ```

mod error;
mod pipeline;
mod report;

pub use error::ConversionError;
pub use pipeline::{Conversion, ConversionRequest, Converter, ConverterBuilder};
pub use report::{ConversionReport, ConversionStatus};

pub use quiver_cms::{ColorManager, RenderingIntent};
pub use quiver_doc::Document;
pub use quiver_formats::{FormatId, FormatRegistry};
pub use quiver_types::{CancelToken, LossManifest};

/// Initializes env_logger for binaries and examples embedding the
/// engine. Safe to call more than once.
pub fn init_logging() {
    let _ = env_logger::Builder::from_default_env().try_init();
}
