//! Color management layer.
//!
//! Sits between the document model and an external ICC transform
//! capability. This crate owns *policy* — default rendering intent, spot
//! handling, fallback behavior for missing or corrupt profiles, and the
//! shared transform cache — while the numeric profile math lives behind
//! the [`TransformEngine`] trait. The shipped [`DeviceTransformEngine`]
//! implements device-colorimetric conversions so the engine works without
//! a native ICC binding.

pub mod cache;
pub mod engine;
pub mod error;
pub mod intent;
pub mod manager;
pub mod profiles;

pub use cache::{TransformCache, TransformKey};
pub use engine::{ColorTransform, DeviceTransformEngine, SpaceRef, SpaceTag, TransformEngine};
pub use error::ColorError;
pub use intent::RenderingIntent;
pub use manager::ColorManager;
pub use profiles::{builtin_profile, looks_like_icc};
