use crate::bindings::Handle;
use crate::{Error, Library, Result};

pub type BitmapHandle = Handle<pdfium_sys::fpdf_bitmap_t__>;

/// Pixel memory allocated and owned by pdfium.
///
/// Dimensions and stride are fixed at creation. Rows are `stride` bytes
/// apart and may carry padding after the last pixel.
pub struct Bitmap {
    lib: Library,
    handle: BitmapHandle,
    width: u32,
    height: u32,
    stride: u32,
    format: BitmapFormat,
}

impl Bitmap {
    /// Allocate a bitmap with unspecified contents.
    pub fn uninitialized(lib: Library, width: u32, height: u32, format: BitmapFormat) -> Result<Bitmap> {
        let w = i32::try_from(width).map_err(|_| Error::InvalidArgument)?;
        let h = i32::try_from(height).map_err(|_| Error::InvalidArgument)?;

        let ptr = unsafe {
            lib.ftable()
                .FPDFBitmap_CreateEx(w, h, format.as_i32(), std::ptr::null_mut(), 0)
        };
        let handle = lib.check_handle(ptr)?;

        let stride = unsafe { lib.ftable().FPDFBitmap_GetStride(handle.get()) };
        let stride = u32::try_from(stride).map_err(|_| Error::InvalidArgument)?;

        Ok(Bitmap {
            lib,
            handle,
            width,
            height,
            stride,
            format,
        })
    }

    /// Allocate a bitmap and fill it with `color`.
    pub fn filled(
        lib: Library,
        width: u32,
        height: u32,
        format: BitmapFormat,
        color: Color,
    ) -> Result<Bitmap> {
        let mut bitmap = Self::uninitialized(lib, width, height, format)?;
        bitmap.fill(color);

        Ok(bitmap)
    }

    pub fn handle(&self) -> &BitmapHandle {
        &self.handle
    }

    pub fn library(&self) -> &Library {
        &self.lib
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn stride(&self) -> u32 {
        self.stride
    }

    pub fn format(&self) -> BitmapFormat {
        self.format
    }

    /// All pixel memory including row padding, `height * stride` bytes.
    pub fn buf(&self) -> &[u8] {
        let data = unsafe { self.lib.ftable().FPDFBitmap_GetBuffer(self.handle.get()) };

        if data.is_null() {
            return &[];
        }

        let len = self.height as usize * self.stride as usize;
        unsafe { std::slice::from_raw_parts(data as *const u8, len) }
    }

    /// Pixel rows without padding.
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> + '_ {
        let row = self.width as usize * self.format.bytes_per_pixel() as usize;

        self.buf()
            .chunks_exact(self.stride.max(1) as usize)
            .map(move |line| &line[..row])
    }

    pub fn fill(&mut self, color: Color) {
        unsafe {
            self.lib.ftable().FPDFBitmap_FillRect(
                self.handle.get(),
                0,
                0,
                self.width as _,
                self.height as _,
                color.to_argb() as _,
            )
        }
    }
}

impl Drop for Bitmap {
    fn drop(&mut self) {
        unsafe { self.lib.ftable().FPDFBitmap_Destroy(self.handle.get()) };
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitmapFormat {
    Gray,
    Bgr,
    Bgrx,
    Bgra,
}

impl BitmapFormat {
    fn as_i32(&self) -> i32 {
        let format = match self {
            BitmapFormat::Gray => pdfium_sys::FPDFBitmap_Gray,
            BitmapFormat::Bgr => pdfium_sys::FPDFBitmap_BGR,
            BitmapFormat::Bgrx => pdfium_sys::FPDFBitmap_BGRx,
            BitmapFormat::Bgra => pdfium_sys::FPDFBitmap_BGRA,
        };

        format as i32
    }

    pub fn bytes_per_pixel(&self) -> u32 {
        match self {
            BitmapFormat::Gray => 1,
            BitmapFormat::Bgr => 3,
            BitmapFormat::Bgrx | BitmapFormat::Bgra => 4,
        }
    }
}

/// Non-premultiplied RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(0xff, 0xff, 0xff);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 0xff)
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Packed `0xAARRGGBB`, as expected by pdfium.
    pub const fn to_argb(&self) -> u32 {
        u32::from_be_bytes([self.a, self.r, self.g, self.b])
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_color_packing() {
        assert_eq!(Color::WHITE.to_argb(), 0xffff_ffff);
        assert_eq!(Color::BLACK.to_argb(), 0xff00_0000);
        assert_eq!(Color::TRANSPARENT.to_argb(), 0);
        assert_eq!(Color::rgba(0x12, 0x34, 0x56, 0x78).to_argb(), 0x7812_3456);
    }

    #[test]
    fn test_format_codes() {
        assert_eq!(BitmapFormat::Gray.as_i32(), 1);
        assert_eq!(BitmapFormat::Bgra.as_i32(), 4);
        assert_eq!(BitmapFormat::Bgra.bytes_per_pixel(), 4);
        assert_eq!(BitmapFormat::Bgr.bytes_per_pixel(), 3);
    }
}
