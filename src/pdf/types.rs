//! Core types for PDF rendering

/// Intrinsic page dimensions at scale 1, in PDF points
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageSize {
    pub width: f32,
    pub height: f32,
}

impl PageSize {
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Host window geometry used to compute the render scale.
///
/// Widths are in logical units: one terminal column horizontally and one
/// half-row vertically, so that a logical unit is roughly square.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ViewportGeometry {
    /// Window width in logical units (terminal columns)
    pub window_width: u16,
    /// Window height in terminal rows
    pub window_height: u16,
    /// Raster pixels per logical unit
    pub pixel_density: u16,
}

impl ViewportGeometry {
    #[must_use]
    pub const fn new(window_width: u16, window_height: u16, pixel_density: u16) -> Self {
        Self {
            window_width,
            window_height,
            pixel_density,
        }
    }

    /// Pixel density, never below one
    #[must_use]
    pub fn density(&self) -> u16 {
        self.pixel_density.max(1)
    }
}

impl Default for ViewportGeometry {
    fn default() -> Self {
        Self::new(80, 24, 1)
    }
}

/// Raw rasterized page image.
///
/// RGBA pixel data as produced by the decoder, before it is painted onto
/// the drawing surface.
#[derive(Clone, PartialEq, Eq)]
pub struct RasterImage {
    /// RGBA pixel data (4 bytes per pixel)
    pub pixels: Vec<u8>,
    /// Image width in pixels
    pub width_px: u32,
    /// Image height in pixels
    pub height_px: u32,
}

impl std::fmt::Debug for RasterImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterImage")
            .field("width_px", &self.width_px)
            .field("height_px", &self.height_px)
            .field("bytes", &self.pixels.len())
            .finish()
    }
}

/// A rendered page ready to be painted
#[derive(Clone, Debug)]
pub struct PageData {
    /// Page number (1-indexed)
    pub page: usize,
    /// Scale relative to the intrinsic page size, before pixel density
    pub scale: f32,
    /// Rasterized image sized to `scale * pixel_density`
    pub image: RasterImage,
}
