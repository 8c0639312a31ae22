//! Drawing surface the current page is painted onto

use image::{Rgba, RgbaImage};

use crate::pdf::RasterImage;

/// Pixel buffer owned by the viewer.
///
/// Every paint replaces the whole buffer; nothing from a previous frame
/// survives.
#[derive(Clone, Debug, Default)]
pub struct Surface {
    image: Option<RgbaImage>,
    pixel_density: u16,
}

impl Surface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resize to the raster dimensions and paint it
    pub fn paint(&mut self, raster: &RasterImage, pixel_density: u16) -> bool {
        match RgbaImage::from_raw(raster.width_px, raster.height_px, raster.pixels.clone()) {
            Some(image) => {
                self.image = Some(image);
                self.pixel_density = pixel_density.max(1);
                true
            }
            None => false,
        }
    }

    /// Drop the painted image
    pub fn clear(&mut self) {
        self.image = None;
    }

    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.image.is_none()
    }

    #[must_use]
    pub fn image(&self) -> Option<&RgbaImage> {
        self.image.as_ref()
    }

    /// Pixel dimensions, if anything is painted
    #[must_use]
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.image.as_ref().map(RgbaImage::dimensions)
    }

    /// Dimensions in logical units (pixels divided by density)
    #[must_use]
    pub fn logical_dimensions(&self) -> Option<(u32, u32)> {
        let density = u32::from(self.pixel_density.max(1));
        self.dimensions()
            .map(|(w, h)| (w.div_ceil(density), h.div_ceil(density)))
    }

    /// Sample the pixel covering logical position `(x, y)`
    #[must_use]
    pub fn sample(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        let image = self.image.as_ref()?;
        let density = u32::from(self.pixel_density.max(1));
        let (px, py) = (x * density, y * density);
        (px < image.width() && py < image.height()).then(|| *image.get_pixel(px, py))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raster(width: u32, height: u32, color: [u8; 4]) -> RasterImage {
        RasterImage {
            pixels: color.repeat((width * height) as usize),
            width_px: width,
            height_px: height,
        }
    }

    #[test]
    fn paint_replaces_previous_frame() {
        let mut surface = Surface::new();
        assert!(surface.paint(&raster(10, 20, [1, 2, 3, 255]), 1));
        assert!(surface.paint(&raster(4, 6, [9, 9, 9, 255]), 1));

        assert_eq!(surface.dimensions(), Some((4, 6)));
        assert_eq!(surface.sample(0, 0), Some(Rgba([9, 9, 9, 255])));
    }

    #[test]
    fn malformed_raster_is_refused() {
        let mut surface = Surface::new();
        let mut bad = raster(10, 10, [0, 0, 0, 255]);
        bad.pixels.truncate(8);

        assert!(!surface.paint(&bad, 1));
        assert!(surface.is_blank());
    }

    #[test]
    fn logical_dimensions_account_for_density() {
        let mut surface = Surface::new();
        surface.paint(&raster(21, 40, [0, 0, 0, 255]), 2);

        assert_eq!(surface.logical_dimensions(), Some((11, 20)));
        assert!(surface.sample(10, 19).is_some());
        assert!(surface.sample(11, 0).is_none());
    }

    #[test]
    fn clear_blanks_surface() {
        let mut surface = Surface::new();
        surface.paint(&raster(2, 2, [0, 0, 0, 255]), 1);
        surface.clear();

        assert!(surface.is_blank());
        assert_eq!(surface.sample(0, 0), None);
    }
}
