use crate::backend::{self, DocumentHandle, DocumentLibrary, DrawingContext, PageHandle};
use crate::crop::{self, Rect};
use crate::error::RasterError;
use crate::image::{self, PixelBuffer, RenderedImage};
use crate::policy::{COMPOSITE_SCALE, PIXEL_FORMAT, RENDER_DPI, RENDER_HINTS};

/// Resource limits of a [`PageRasterizer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Largest pixel copy attempted, in bytes. Larger images fail as if the
    /// allocation had failed.
    pub max_buffer_bytes: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_buffer_bytes: 512 * 1024 * 1024,
        }
    }
}

/// Framing of a rendered page.
///
/// The defaults paint the whole page at the fixed policy and are what
/// [`PageRasterizer::render_doc_page`] uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Show only the content of the page, see [`crop::crop_box`].
    pub crop: bool,

    /// Device pixels per target unit. The page is rendered this many times
    /// larger and painted with a correspondingly smaller scale, so the
    /// extent on the target stays the same. Zero is treated as one.
    pub scale_factor: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            crop: false,
            scale_factor: 1,
        }
    }
}

impl RenderOptions {
    fn factor(&self) -> f64 {
        self.scale_factor.max(1) as f64
    }

    /// Resolution handed to the document library.
    pub fn render_dpi(&self) -> f64 {
        RENDER_DPI * self.factor()
    }

    /// Scale applied to the target context while painting.
    pub fn composite_scale(&self) -> f64 {
        COMPOSITE_SCALE / self.factor()
    }

    /// Region of a page to render, in points from its top-left corner.
    pub fn region<P>(&self, page: &P) -> Rect
    where
        P: PageHandle + ?Sized,
    {
        if self.crop {
            crop::crop_box(page.size(), page.content_bounds())
        } else {
            Rect::from_size(page.size())
        }
    }
}

/// Summary of a successfully painted page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaintedPage {
    pub index: u32,
    pub width: u32,
    pub height: u32,
    pub stride: u32,
    pub scale: f64,

    /// Part of the page that was painted, in points.
    pub region: Rect,
}

impl PaintedPage {
    /// Area covered on the target, in target units.
    pub fn extent(&self) -> (f64, f64) {
        (self.width as f64 * self.scale, self.height as f64 * self.scale)
    }
}

/// Renders document pages and paints them onto drawing contexts.
///
/// Each call opens the document, loads the page, renders it at
/// [`RENDER_DPI`](crate::policy::RENDER_DPI), copies the pixels into a new
/// surface and paints that surface at the origin of the target scaled by
/// [`COMPOSITE_SCALE`](crate::policy::COMPOSITE_SCALE). Nothing is cached,
/// every resource acquired by a call is released before it returns.
pub struct PageRasterizer<L> {
    library: L,
    limits: Limits,
}

impl<L> PageRasterizer<L>
where
    L: DocumentLibrary,
{
    pub fn new(library: L) -> Self {
        Self::with_limits(library, Limits::default())
    }

    pub fn with_limits(library: L, limits: Limits) -> Self {
        Self { library, limits }
    }

    pub fn library(&self) -> &L {
        &self.library
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Paint page `page_index` of the document at `locator` onto `target`.
    ///
    /// Failures are logged and leave `target` untouched, except for failures
    /// while painting itself. Use [`Self::try_render_doc_page`] to handle
    /// them instead.
    pub fn render_doc_page<C>(&self, locator: &str, page_index: u32, target: &mut C)
    where
        C: DrawingContext + ?Sized,
    {
        self.render_doc_page_with(locator, page_index, target, &RenderOptions::default())
    }

    /// Like [`Self::render_doc_page`], framed according to `options`.
    pub fn render_doc_page_with<C>(
        &self,
        locator: &str,
        page_index: u32,
        target: &mut C,
        options: &RenderOptions,
    ) where
        C: DrawingContext + ?Sized,
    {
        match self.try_render_doc_page_with(locator, page_index, target, options) {
            Ok(page) => {
                let (width, height) = page.extent();
                tracing::debug!(locator, page = page_index, width, height, "page painted");
            }
            Err(err) => {
                tracing::error!(locator, page = page_index, "{}", err.chain());
            }
        }
    }

    pub fn try_render_doc_page<C>(
        &self,
        locator: &str,
        page_index: u32,
        target: &mut C,
    ) -> Result<PaintedPage, RasterError>
    where
        C: DrawingContext + ?Sized,
    {
        self.try_render_doc_page_with(locator, page_index, target, &RenderOptions::default())
    }

    pub fn try_render_doc_page_with<C>(
        &self,
        locator: &str,
        page_index: u32,
        target: &mut C,
        options: &RenderOptions,
    ) -> Result<PaintedPage, RasterError>
    where
        C: DrawingContext + ?Sized,
    {
        let _span = tracing::debug_span!("render_doc_page", locator, page = page_index).entered();

        let document = self
            .library
            .open(locator)
            .map_err(|err| RasterError::DocumentLoad {
                locator: locator.to_owned(),
                source: Box::new(err),
            })?;

        let page_count = document.page_count();
        if page_index >= page_count {
            return Err(RasterError::PageNotFound {
                index: page_index,
                page_count,
                source: None,
            });
        }

        let page = document
            .page(page_index)
            .map_err(|err| RasterError::PageNotFound {
                index: page_index,
                page_count,
                source: Some(Box::new(err)),
            })?;

        let region = options.region(&page);
        if options.crop {
            tracing::trace!(x1 = region.x1, y1 = region.y1, x2 = region.x2, y2 = region.y2, "cropped");
        }

        let pixels = self.render(&page, page_index, region, options)?;
        let (width, height, stride) = (pixels.width(), pixels.height(), pixels.stride());
        tracing::trace!(width, height, stride, "page rendered");

        let surface = target
            .create_surface(pixels, PIXEL_FORMAT)
            .map_err(|err| RasterError::SurfaceCreation(Box::new(err)))?;

        let scale = options.composite_scale();
        backend::paint_scaled(target, &surface, scale)
            .map_err(|err| RasterError::Paint(Box::new(err)))?;

        // surface before page before document
        drop(surface);
        drop(page);
        drop(document);

        Ok(PaintedPage {
            index: page_index,
            width,
            height,
            stride,
            scale,
            region,
        })
    }

    /// Render `region` of `page` and copy the result. The rendered image is
    /// released before this returns.
    fn render<P>(
        &self,
        page: &P,
        index: u32,
        region: Rect,
        options: &RenderOptions,
    ) -> Result<PixelBuffer, RasterError>
    where
        P: PageHandle,
    {
        let dpi = options.render_dpi();

        let image = if options.crop {
            page.render_region(region, RENDER_HINTS, dpi, dpi)
        } else {
            page.render(RENDER_HINTS, dpi, dpi)
        };

        let image = image.map_err(|err| RasterError::Render {
            index,
            source: Box::new(err),
        })?;

        let len = image::validate(&image).map_err(|err| RasterError::Render {
            index,
            source: Box::new(err),
        })?;

        let pixels = PixelBuffer::copy_from(&image, len, self.limits.max_buffer_bytes)
            .map_err(|err| RasterError::OutOfMemory { bytes: err.bytes })?;

        debug_assert_eq!(pixels.len(), image.height() as usize * image.stride() as usize);
        Ok(pixels)
    }
}
