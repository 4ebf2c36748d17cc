//! Format registry and built-in format plugins.
//!
//! Every supported file format is described by a [`FormatDescriptor`] in
//! a process-wide registry; conversions never go format-to-format but
//! always through the canonical document model. Adding a format means
//! registering a [`Loader`]/[`Saver`] pair against a descriptor — there
//! is no codec base class to subclass.
//!
//! Four codecs ship in-core: the native QVD document format, SVG, its
//! gzip-wrapped SVGZ variant and the GPL palette format. The rest of the
//! catalogue is recognized (by extension and magic signature) but
//! reports [`UnsupportedOperation`] until an out-of-core plugin registers
//! a codec for it.

pub mod descriptor;
pub mod gpl;
pub mod id;
pub mod qvd;
pub mod registry;
pub mod svg;
pub mod svgz;
pub mod traits;

pub use descriptor::{FormatDescriptor, Magic};
pub use id::FormatId;
pub use registry::FormatRegistry;
pub use traits::{LoadError, Loader, Operation, SaveError, SaveOutput, Saver, UnsupportedOperation};
