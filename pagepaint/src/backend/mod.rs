//! Collaborators of the rasterizer.
//!
//! The document side opens documents, looks up pages and renders them into
//! images. The drawing side wraps copied pixels in a surface and paints it
//! onto a context. Handles release their underlying resources when dropped,
//! a page keeps its document alive for as long as it exists.

#[cfg(feature = "cairo")]
pub mod cairo;
pub mod pdfium;

use crate::crop::Rect;
use crate::image::{PixelBuffer, PixelFormat, RenderedImage};
use crate::policy::RenderHints;

pub trait DocumentLibrary {
    type Document: DocumentHandle;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Open the document identified by `locator`, a path or `file://` URI.
    fn open(&self, locator: &str) -> Result<Self::Document, Self::Error>;
}

impl<L> DocumentLibrary for &L
where
    L: DocumentLibrary + ?Sized,
{
    type Document = L::Document;
    type Error = L::Error;

    fn open(&self, locator: &str) -> Result<Self::Document, Self::Error> {
        (**self).open(locator)
    }
}

pub trait DocumentHandle {
    type Page: PageHandle;
    type Error: std::error::Error + Send + Sync + 'static;

    fn page_count(&self) -> u32;

    /// Load the page at the zero-based `index`.
    fn page(&self, index: u32) -> Result<Self::Page, Self::Error>;
}

pub trait PageHandle {
    type Image: RenderedImage;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Page size in PDF points.
    fn size(&self) -> (f64, f64);

    /// Bounding box of everything drawn on the page, `None` for a blank
    /// page. See [`crate::crop`] for the coordinate system.
    fn content_bounds(&self) -> Option<Rect>;

    /// Render the whole page at the given resolution.
    fn render(&self, hints: RenderHints, dpi_x: f64, dpi_y: f64) -> Result<Self::Image, Self::Error> {
        self.render_region(Rect::from_size(self.size()), hints, dpi_x, dpi_y)
    }

    /// Render the part of the page inside `region`. The top-left pixel of
    /// the image is the top-left corner of `region`.
    fn render_region(
        &self,
        region: Rect,
        hints: RenderHints,
        dpi_x: f64,
        dpi_y: f64,
    ) -> Result<Self::Image, Self::Error>;
}

/// A drawing target with a save/restore transform stack.
pub trait DrawingContext {
    type Surface;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Wrap `pixels` in a surface. The surface owns the buffer from now on.
    fn create_surface(
        &mut self,
        pixels: PixelBuffer,
        format: PixelFormat,
    ) -> Result<Self::Surface, Self::Error>;

    fn save(&mut self) -> Result<(), Self::Error>;

    fn scale(&mut self, sx: f64, sy: f64);

    fn set_source_surface(
        &mut self,
        surface: &Self::Surface,
        x: f64,
        y: f64,
    ) -> Result<(), Self::Error>;

    fn paint(&mut self) -> Result<(), Self::Error>;

    fn restore(&mut self) -> Result<(), Self::Error>;
}

/// Paint `surface` at the origin of `ctx`, scaled by `scale` on both axes.
///
/// The transform of `ctx` is restored even if painting fails.
pub(crate) fn paint_scaled<C>(ctx: &mut C, surface: &C::Surface, scale: f64) -> Result<(), C::Error>
where
    C: DrawingContext + ?Sized,
{
    ctx.save()?;

    ctx.scale(scale, scale);
    let painted = ctx
        .set_source_surface(surface, 0.0, 0.0)
        .and_then(|()| ctx.paint());

    let restored = ctx.restore();
    painted.and(restored)
}
