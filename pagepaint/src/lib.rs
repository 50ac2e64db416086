//! Rasterize a single PDF page and composite it onto a drawing context.
//!
//! The document library renders the page into a pixel buffer at a fixed,
//! oversampled resolution. That buffer is copied, wrapped in a surface of
//! the drawing library, and painted onto the caller's context with a
//! compensating downscale. See [`PageRasterizer`] for the full pipeline.

pub mod backend;
pub mod crop;
pub mod locator;
pub mod policy;

mod error;
mod image;
mod rasterizer;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use backend::pdfium::{PdfiumConfig, PdfiumLibrary};
pub use crop::Rect;
pub use backend::{DocumentHandle, DocumentLibrary, DrawingContext, PageHandle};
pub use error::{BoxError, RasterError};
pub use image::{InvalidImage, PixelBuffer, PixelFormat, RenderedImage};
pub use policy::RenderHints;
pub use rasterizer::{Limits, PageRasterizer, PaintedPage, RenderOptions};
