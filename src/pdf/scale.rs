//! Display scale computation
//!
//! Turns the host viewport width into the scale a page is rasterized at.

use serde::{Deserialize, Serialize};

use super::types::{PageSize, ViewportGeometry};

/// Fraction of the window width a page may occupy
pub const DEFAULT_WIDTH_FRACTION: f32 = 0.9;

/// Upper bound on the available width, in logical units
pub const DEFAULT_MAX_WIDTH: f32 = 800.0;

/// How the available drawing width is derived from the window width
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WidthPolicy {
    /// `min(fraction * window_width, max)`
    Capped { fraction: f32, max: f32 },
    /// `fraction * window_width`
    Uncapped { fraction: f32 },
}

impl Default for WidthPolicy {
    fn default() -> Self {
        Self::Capped {
            fraction: DEFAULT_WIDTH_FRACTION,
            max: DEFAULT_MAX_WIDTH,
        }
    }
}

impl WidthPolicy {
    /// Build a policy from an optional cap
    #[must_use]
    pub fn from_parts(fraction: f32, max: Option<f32>) -> Self {
        match max {
            Some(max) => Self::Capped { fraction, max },
            None => Self::Uncapped { fraction },
        }
    }

    /// Available width in logical units for the given window
    #[must_use]
    pub fn available_width(&self, geometry: &ViewportGeometry) -> f32 {
        let window = f32::from(geometry.window_width);
        match *self {
            Self::Capped { fraction, max } => (window * fraction).min(max),
            Self::Uncapped { fraction } => window * fraction,
        }
        .max(1.0)
    }
}

/// Scale and target dimensions for one page render
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderScale {
    /// `available_width / intrinsic_width`
    pub scale: f32,
    /// Scale the decoder rasterizes at (includes pixel density)
    pub raster_scale: f32,
    /// Surface width in pixels
    pub width_px: u32,
    /// Surface height in pixels
    pub height_px: u32,
}

impl RenderScale {
    /// Compute the scale for a page of `size` in the given viewport
    #[must_use]
    pub fn compute(size: PageSize, geometry: &ViewportGeometry, policy: &WidthPolicy) -> Self {
        let available = policy.available_width(geometry);
        let intrinsic_width = size.width.max(1.0);
        let scale = available / intrinsic_width;
        let raster_scale = scale * f32::from(geometry.density());

        Self {
            scale,
            raster_scale,
            width_px: (size.width * raster_scale).round().max(1.0) as u32,
            height_px: (size.height * raster_scale).round().max(1.0) as u32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LETTER: PageSize = PageSize::new(612.0, 792.0);

    #[test]
    fn capped_policy_uses_fraction_of_small_windows() {
        let policy = WidthPolicy::default();
        let geometry = ViewportGeometry::new(100, 40, 1);
        assert!((policy.available_width(&geometry) - 90.0).abs() < 1e-4);
    }

    #[test]
    fn capped_policy_clamps_wide_windows() {
        let policy = WidthPolicy::Capped {
            fraction: 0.9,
            max: 120.0,
        };
        let geometry = ViewportGeometry::new(400, 40, 1);
        assert!((policy.available_width(&geometry) - 120.0).abs() < 1e-4);
    }

    #[test]
    fn uncapped_policy_grows_with_window() {
        let policy = WidthPolicy::Uncapped { fraction: 0.9 };
        let geometry = ViewportGeometry::new(1000, 40, 1);
        assert!((policy.available_width(&geometry) - 900.0).abs() < 1e-3);
    }

    #[test]
    fn from_parts_selects_policy() {
        assert_eq!(
            WidthPolicy::from_parts(0.5, None),
            WidthPolicy::Uncapped { fraction: 0.5 }
        );
        assert_eq!(
            WidthPolicy::from_parts(0.5, Some(10.0)),
            WidthPolicy::Capped {
                fraction: 0.5,
                max: 10.0
            }
        );
    }

    #[test]
    fn scale_maps_page_width_to_available_width() {
        let geometry = ViewportGeometry::new(68, 40, 1);
        let scale = RenderScale::compute(LETTER, &geometry, &WidthPolicy::default());

        // 0.9 * 68 = 61.2 columns over 612 points
        assert!((scale.scale - 0.1).abs() < 1e-4);
        assert_eq!(scale.width_px, 61);
        assert_eq!(scale.height_px, 79);
    }

    #[test]
    fn pixel_density_multiplies_surface_size_not_scale() {
        let policy = WidthPolicy::default();
        let single = RenderScale::compute(LETTER, &ViewportGeometry::new(68, 40, 1), &policy);
        let double = RenderScale::compute(LETTER, &ViewportGeometry::new(68, 40, 2), &policy);

        assert!((single.scale - double.scale).abs() < 1e-6);
        assert!((double.raster_scale - 2.0 * single.raster_scale).abs() < 1e-6);
        assert_eq!(double.width_px, 122);
    }

    #[test]
    fn tiny_window_still_produces_a_pixel() {
        let geometry = ViewportGeometry::new(0, 0, 0);
        let scale = RenderScale::compute(LETTER, &geometry, &WidthPolicy::default());
        assert!(scale.width_px >= 1);
        assert!(scale.height_px >= 1);
    }
}
