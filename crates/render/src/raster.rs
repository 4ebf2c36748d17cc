use crate::command::DrawCommand;
use crate::error::RenderError;

/// A finished raster: straight-alpha RGBA8, row-major, top row first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl PixelBuffer {
    /// A transparent buffer of the given size.
    pub fn blank(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * 4],
        }
    }
}

/// A pixel-producing backend.
///
/// The adapter guarantees commands arrive in paint order (bottom of the
/// z-stack first) with geometry already in device pixels; a backend only
/// rasterizes coverage and composites.
pub trait Rasterizer: Send + Sync {
    fn rasterize(
        &self,
        commands: &[DrawCommand],
        width: u32,
        height: u32,
    ) -> Result<PixelBuffer, RenderError>;
}
