pub mod cancel;
pub mod color;
pub mod geometry;
pub mod ids;
pub mod loss;
pub mod units;

pub use cancel::CancelToken;
pub use color::{ColorSpec, Colorspace};
pub use geometry::{GeometryError, Point, Rect, Trafo};
pub use ids::{ProfileId, StyleId};
pub use loss::{LossEntry, LossManifest};
pub use units::Unit;
