//! Canonical document model.
//!
//! This crate defines the in-memory representation every format loader
//! writes into and every format saver reads from. The model is strictly
//! format-agnostic: it performs no I/O and contains no codec logic.
//!
//! Ownership forms a tree by construction (a node lives in exactly one
//! parent's child vector), so reference cycles cannot be expressed. Shared
//! data is always id-based: primitives point at styles through a
//! [`StyleId`] into the document's style table, and color specs point at
//! embedded ICC profiles through a [`ProfileId`] into the profile set.

pub mod document;
pub mod error;
pub mod node;
pub mod page;
pub mod style;

pub use document::{ColorProfile, Document, ProfileSet, StyleTable};
pub use error::ModelError;
pub use node::{Group, Layer, Node, PathSegment, Primitive, Shape, SharedData};
pub use page::Page;
pub use style::{Fill, LineCap, LineJoin, Stroke, Style, TextSpec};

pub use quiver_types::{ColorSpec, Colorspace, Point, ProfileId, Rect, StyleId, Trafo, Unit};
