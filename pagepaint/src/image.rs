use thiserror::Error;

use crate::policy::PIXEL_FORMAT;

/// Memory layout of a single pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// 32 bits per pixel, premultiplied alpha in the upper byte, stored in
    /// native endianness. On little-endian machines the byte order in memory
    /// is B, G, R, A.
    Argb32,
}

impl PixelFormat {
    pub const fn bytes_per_pixel(&self) -> usize {
        match self {
            PixelFormat::Argb32 => 4,
        }
    }
}

/// An image produced by the document library.
///
/// Rows are `stride` bytes apart, `stride` may include padding past the last
/// pixel of a row.
pub trait RenderedImage {
    /// Whether the renderer considers this image usable.
    fn is_valid(&self) -> bool;

    fn width(&self) -> u32;

    fn height(&self) -> u32;

    fn stride(&self) -> u32;

    fn pixels(&self) -> &[u8];
}

/// Reasons a rendered image is rejected before copying.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidImage {
    #[error("renderer reported an invalid image")]
    NotValid,

    #[error("image has no pixels ({width}x{height})")]
    Empty { width: u32, height: u32 },

    #[error("stride of {stride} bytes is too small for a row of {width} pixels")]
    StrideTooSmall { stride: u32, width: u32 },

    #[error("image holds {len} bytes of pixel data, expected {expected}")]
    Truncated { len: usize, expected: usize },

    #[error("image dimensions overflow")]
    SizeOverflow,
}

/// Check that `image` can be copied and return the size of the copy in bytes.
pub(crate) fn validate<I>(image: &I) -> Result<usize, InvalidImage>
where
    I: RenderedImage + ?Sized,
{
    if !image.is_valid() {
        return Err(InvalidImage::NotValid);
    }

    let (width, height, stride) = (image.width(), image.height(), image.stride());

    if width == 0 || height == 0 {
        return Err(InvalidImage::Empty { width, height });
    }

    let row = (width as usize)
        .checked_mul(PIXEL_FORMAT.bytes_per_pixel())
        .ok_or(InvalidImage::SizeOverflow)?;

    if (stride as usize) < row {
        return Err(InvalidImage::StrideTooSmall { stride, width });
    }

    let expected = (height as usize)
        .checked_mul(stride as usize)
        .ok_or(InvalidImage::SizeOverflow)?;

    let len = image.pixels().len();
    if len < expected {
        return Err(InvalidImage::Truncated { len, expected });
    }

    Ok(expected)
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("cannot allocate pixel buffer of {bytes} bytes")]
pub(crate) struct AllocError {
    pub bytes: usize,
}

/// Owned copy of the pixels of a rendered image.
///
/// Holds exactly `height * stride` bytes, laid out like the image it was
/// copied from. Ownership passes to the drawing surface created from it.
#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    data: Box<[u8]>,
    width: u32,
    height: u32,
    stride: u32,
    format: PixelFormat,
}

impl PixelBuffer {
    /// Copy the first `len` bytes of `image`, refusing anything above `limit`.
    ///
    /// `len` must have been obtained from [`validate`].
    pub(crate) fn copy_from<I>(image: &I, len: usize, limit: usize) -> Result<Self, AllocError>
    where
        I: RenderedImage + ?Sized,
    {
        if len > limit {
            return Err(AllocError { bytes: len });
        }

        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|_| AllocError { bytes: len })?;
        data.extend_from_slice(&image.pixels()[..len]);

        Ok(PixelBuffer {
            data: data.into_boxed_slice(),
            width: image.width(),
            height: image.height(),
            stride: image.stride(),
            format: PIXEL_FORMAT,
        })
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

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Bytes of row `y` without trailing stride padding.
    pub fn row(&self, y: u32) -> Option<&[u8]> {
        if y >= self.height {
            return None;
        }

        let start = y as usize * self.stride as usize;
        let len = self.width as usize * self.format.bytes_per_pixel();

        self.data.get(start..start + len)
    }

    pub fn into_data(self) -> Box<[u8]> {
        self.data
    }
}

impl std::fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("stride", &self.stride)
            .field("format", &self.format)
            .field("len", &self.data.len())
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    struct Raw {
        valid: bool,
        width: u32,
        height: u32,
        stride: u32,
        data: Vec<u8>,
    }

    impl Raw {
        fn new(width: u32, height: u32, stride: u32) -> Self {
            let data = (0..height as usize * stride as usize)
                .map(|i| i as u8)
                .collect();

            Raw { valid: true, width, height, stride, data }
        }
    }

    impl RenderedImage for Raw {
        fn is_valid(&self) -> bool {
            self.valid
        }

        fn width(&self) -> u32 {
            self.width
        }

        fn height(&self) -> u32 {
            self.height
        }

        fn stride(&self) -> u32 {
            self.stride
        }

        fn pixels(&self) -> &[u8] {
            &self.data
        }
    }

    #[test]
    fn test_validate_accepts_padded_rows() {
        let image = Raw::new(3, 2, 16);
        assert_eq!(validate(&image), Ok(32));
    }

    #[test]
    fn test_validate_rejects() {
        let mut image = Raw::new(3, 2, 12);
        image.valid = false;
        assert_eq!(validate(&image), Err(InvalidImage::NotValid));

        let image = Raw::new(0, 2, 12);
        assert_eq!(validate(&image), Err(InvalidImage::Empty { width: 0, height: 2 }));

        let image = Raw::new(3, 0, 12);
        assert_eq!(validate(&image), Err(InvalidImage::Empty { width: 3, height: 0 }));

        let image = Raw::new(4, 2, 12);
        assert_eq!(validate(&image), Err(InvalidImage::StrideTooSmall { stride: 12, width: 4 }));

        let mut image = Raw::new(3, 2, 12);
        image.data.pop();
        assert_eq!(validate(&image), Err(InvalidImage::Truncated { len: 23, expected: 24 }));
    }

    #[test]
    fn test_copy_is_exact() {
        let mut image = Raw::new(3, 2, 16);
        image.data.extend_from_slice(&[0xaa; 8]);

        let len = validate(&image).unwrap();
        let buffer = PixelBuffer::copy_from(&image, len, usize::MAX).unwrap();

        assert_eq!(buffer.len(), 32);
        assert_eq!(buffer.as_bytes(), &image.data[..32]);
        assert_eq!((buffer.width(), buffer.height(), buffer.stride()), (3, 2, 16));
        assert_eq!(buffer.format(), PixelFormat::Argb32);

        assert_eq!(buffer.row(0), Some(&image.data[0..12]));
        assert_eq!(buffer.row(1), Some(&image.data[16..28]));
        assert_eq!(buffer.row(2), None);
    }

    #[test]
    fn test_copy_respects_limit() {
        let image = Raw::new(4, 4, 16);
        let len = validate(&image).unwrap();

        assert_eq!(PixelBuffer::copy_from(&image, len, 63), Err(AllocError { bytes: 64 }));
        assert!(PixelBuffer::copy_from(&image, len, 64).is_ok());
    }
}
