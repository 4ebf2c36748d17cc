//! Rendering adapter: canonical documents to backend draw commands.
//!
//! The adapter flattens one document page into an ordered list of
//! [`DrawCommand`]s — geometry in device pixels, colors resolved to
//! straight-alpha RGBA — and hands them to a [`Rasterizer`] backend.
//! The adapter owns z-order, transforms and color resolution; backends
//! own nothing but pixel coverage.

mod adapter;
mod command;
mod error;
mod raster;

pub use adapter::{RenderAdapter, RenderOptions};
pub use command::{DrawCommand, Rgba, StrokeSpec, TextRun};
pub use error::RenderError;
pub use raster::{PixelBuffer, Rasterizer};

pub use quiver_types::CancelToken;
