//! Fixed rendering policy.
//!
//! Pages are rendered oversampled and scaled back down when composited,
//! which gives smoother edges at the final display size than rendering at
//! the display resolution directly. None of this is configurable.

use crate::image::PixelFormat;

/// PDF user space units per inch.
pub const POINTS_PER_INCH: f64 = 72.0;

/// Resolution a page is rendered at before oversampling.
pub const BASE_DPI: f64 = 144.0;

/// Oversampling factor applied while rendering and undone while compositing.
pub const ZOOM: f64 = 1.6;

/// Size of the composited page relative to the base resolution.
pub const PRESENTATION_SCALE: f64 = 0.5;

/// Resolution handed to the document library, on both axes.
pub const RENDER_DPI: f64 = BASE_DPI * ZOOM;

/// Scale applied to the target context while painting, on both axes.
pub const COMPOSITE_SCALE: f64 = PRESENTATION_SCALE / ZOOM;

/// Pixel format of rendered images and of the surfaces created from them.
pub const PIXEL_FORMAT: PixelFormat = PixelFormat::Argb32;

/// Hints every page is rendered with.
pub const RENDER_HINTS: RenderHints = RenderHints::all();

bitflags::bitflags! {
    /// Quality hints passed to the document library.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct RenderHints: u32 {
        /// Smooth the edges of vector paths and images.
        const Antialiasing = 1 << 0;

        /// Smooth glyph edges.
        const TextAntialiasing = 1 << 1;

        /// Align glyph stems to the pixel grid.
        const TextHinting = 1 << 2;
    }
}

/// Number of pixels covering `points` PDF units at the given resolution.
pub fn pixels_for(points: f64, dpi: f64) -> u32 {
    let pixels = (points * dpi / POINTS_PER_INCH).round();

    if pixels.is_finite() && pixels > 0.0 {
        pixels.min(u32::MAX as f64) as u32
    } else {
        0
    }
}

/// Extent on the target context covered by `pixels` rendered pixels.
pub fn composited_extent(pixels: u32) -> f64 {
    pixels as f64 * COMPOSITE_SCALE
}
