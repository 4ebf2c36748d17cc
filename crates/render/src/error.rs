use quiver_cms::ColorError;
use quiver_doc::ModelError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("render cancelled")]
    Cancelled,

    #[error("page {index} out of range (document has {pages})")]
    PageOutOfRange { index: usize, pages: usize },

    #[error("scale factor {0} is not a positive finite number")]
    InvalidScale(f64),

    #[error(transparent)]
    Color(#[from] ColorError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("rasterizer error: {0}")]
    Raster(String),
}
