//! Drawing collaborator backed by cairo.

use cairo::{Context, Format, ImageSurface};

use crate::backend::DrawingContext;
use crate::image::{PixelBuffer, PixelFormat};

impl From<PixelFormat> for Format {
    fn from(format: PixelFormat) -> Self {
        match format {
            PixelFormat::Argb32 => Format::ARgb32,
        }
    }
}

impl DrawingContext for Context {
    type Surface = ImageSurface;
    type Error = cairo::Error;

    fn create_surface(
        &mut self,
        pixels: PixelBuffer,
        format: PixelFormat,
    ) -> Result<ImageSurface, cairo::Error> {
        let width = i32::try_from(pixels.width()).map_err(|_| cairo::Error::InvalidSize)?;
        let height = i32::try_from(pixels.height()).map_err(|_| cairo::Error::InvalidSize)?;
        let stride = i32::try_from(pixels.stride()).map_err(|_| cairo::Error::InvalidStride)?;

        ImageSurface::create_for_data(pixels.into_data(), format.into(), width, height, stride)
    }

    fn save(&mut self) -> Result<(), cairo::Error> {
        Context::save(self)
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        Context::scale(self, sx, sy)
    }

    fn set_source_surface(
        &mut self,
        surface: &ImageSurface,
        x: f64,
        y: f64,
    ) -> Result<(), cairo::Error> {
        Context::set_source_surface(self, surface, x, y)
    }

    fn paint(&mut self) -> Result<(), cairo::Error> {
        Context::paint(self)
    }

    fn restore(&mut self) -> Result<(), cairo::Error> {
        Context::restore(self)
    }
}
