#![allow(non_upper_case_globals)]
#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
#![allow(clippy::missing_safety_doc)]

//! Raw bindings for the subset of the pdfium C API used by the `pdfium`
//! crate. The library is loaded at runtime, so nothing here links against
//! pdfium at build time.

use std::ffi::OsStr;
use std::os::raw::{c_char, c_int, c_uint, c_ulong, c_void};

#[cfg(all(target_family = "unix", not(target_os = "macos")))]
pub const LIBRARY_NAME: &'static str = "libpdfium.so";

#[cfg(target_os = "macos")]
pub const LIBRARY_NAME: &'static str = "libpdfium.dylib";

#[cfg(target_os = "windows")]
pub const LIBRARY_NAME: &'static str = "pdfium.dll";

pub const FPDF_ERR_SUCCESS: u32 = 0;
pub const FPDF_ERR_UNKNOWN: u32 = 1;
pub const FPDF_ERR_FILE: u32 = 2;
pub const FPDF_ERR_FORMAT: u32 = 3;
pub const FPDF_ERR_PASSWORD: u32 = 4;
pub const FPDF_ERR_SECURITY: u32 = 5;
pub const FPDF_ERR_PAGE: u32 = 6;
pub const FPDF_ERR_XFALOAD: u32 = 7;
pub const FPDF_ERR_XFALAYOUT: u32 = 8;

pub const FPDFBitmap_Unknown: u32 = 0;
pub const FPDFBitmap_Gray: u32 = 1;
pub const FPDFBitmap_BGR: u32 = 2;
pub const FPDFBitmap_BGRx: u32 = 3;
pub const FPDFBitmap_BGRA: u32 = 4;

pub const FPDF_ANNOT: u32 = 0x01;
pub const FPDF_LCD_TEXT: u32 = 0x02;
pub const FPDF_NO_NATIVETEXT: u32 = 0x04;
pub const FPDF_GRAYSCALE: u32 = 0x08;
pub const FPDF_REVERSE_BYTE_ORDER: u32 = 0x10;
pub const FPDF_CONVERT_FILL_TO_STROKE: u32 = 0x20;
pub const FPDF_RENDER_LIMITEDIMAGECACHE: u32 = 0x200;
pub const FPDF_RENDER_FORCEHALFTONE: u32 = 0x400;
pub const FPDF_PRINTING: u32 = 0x800;
pub const FPDF_RENDER_NO_SMOOTHTEXT: u32 = 0x1000;
pub const FPDF_RENDER_NO_SMOOTHIMAGE: u32 = 0x2000;
pub const FPDF_RENDER_NO_SMOOTHPATH: u32 = 0x4000;

#[repr(C)]
pub struct fpdf_document_t__ {
    _unused: [u8; 0],
}

#[repr(C)]
pub struct fpdf_page_t__ {
    _unused: [u8; 0],
}

#[repr(C)]
pub struct fpdf_bitmap_t__ {
    _unused: [u8; 0],
}

#[repr(C)]
pub struct fpdf_pageobject_t__ {
    _unused: [u8; 0],
}

pub type FPDF_DOCUMENT = *mut fpdf_document_t__;
pub type FPDF_PAGE = *mut fpdf_page_t__;
pub type FPDF_BITMAP = *mut fpdf_bitmap_t__;
pub type FPDF_PAGEOBJECT = *mut fpdf_pageobject_t__;
pub type FPDF_BOOL = c_int;
pub type FPDF_DWORD = c_ulong;
pub type FPDF_STRING = *const c_char;
pub type FPDF_BYTESTRING = *const c_char;
pub type FPDF_RENDERER_TYPE = c_int;

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct FPDF_LIBRARY_CONFIG {
    pub version: c_int,
    pub m_pUserFontPaths: *mut *const c_char,
    pub m_pIsolate: *mut c_void,
    pub m_v8EmbedderSlot: c_uint,
    pub m_pPlatform: *mut c_void,
    pub m_RendererType: FPDF_RENDERER_TYPE,
}

/// Declares the function table: one function-pointer field per symbol, a
/// loader resolving all of them, and a same-named method forwarding to the
/// pointer.
macro_rules! pdfium_api {
    ($( fn $name:ident( $($arg:ident : $ty:ty),* $(,)? ) $(-> $ret:ty)?; )*) => {
        /// Function table of a dynamically loaded pdfium library.
        pub struct libpdfium {
            __library: libloading::Library,
            $( $name: unsafe extern "C" fn($($ty),*) $(-> $ret)?, )*
        }

        impl libpdfium {
            pub unsafe fn new<P>(path: P) -> Result<Self, libloading::Error>
            where
                P: AsRef<OsStr>,
            {
                let library = libloading::Library::new(path)?;
                Self::from_library(library)
            }

            pub unsafe fn from_library<L>(library: L) -> Result<Self, libloading::Error>
            where
                L: Into<libloading::Library>,
            {
                let __library = library.into();
                $(
                    let $name = __library
                        .get(concat!(stringify!($name), "\0").as_bytes())
                        .map(|sym| *sym)?;
                )*

                Ok(libpdfium { __library, $($name,)* })
            }

            $(
                pub unsafe fn $name(&self, $($arg: $ty),*) $(-> $ret)? {
                    (self.$name)($($arg),*)
                }
            )*
        }
    };
}

pdfium_api! {
    fn FPDF_InitLibraryWithConfig(config: *const FPDF_LIBRARY_CONFIG);
    fn FPDF_DestroyLibrary();
    fn FPDF_GetLastError() -> c_ulong;

    fn FPDF_LoadDocument(file_path: FPDF_STRING, password: FPDF_BYTESTRING) -> FPDF_DOCUMENT;
    fn FPDF_CloseDocument(document: FPDF_DOCUMENT);
    fn FPDF_GetPageCount(document: FPDF_DOCUMENT) -> c_int;

    fn FPDF_LoadPage(document: FPDF_DOCUMENT, page_index: c_int) -> FPDF_PAGE;
    fn FPDF_ClosePage(page: FPDF_PAGE);
    fn FPDF_GetPageWidthF(page: FPDF_PAGE) -> f32;
    fn FPDF_GetPageHeightF(page: FPDF_PAGE) -> f32;
    fn FPDF_RenderPageBitmap(
        bitmap: FPDF_BITMAP,
        page: FPDF_PAGE,
        start_x: c_int,
        start_y: c_int,
        size_x: c_int,
        size_y: c_int,
        rotate: c_int,
        flags: c_int,
    );

    fn FPDFPage_CountObjects(page: FPDF_PAGE) -> c_int;
    fn FPDFPage_GetObject(page: FPDF_PAGE, index: c_int) -> FPDF_PAGEOBJECT;
    fn FPDFPageObj_GetBounds(
        page_object: FPDF_PAGEOBJECT,
        left: *mut f32,
        bottom: *mut f32,
        right: *mut f32,
        top: *mut f32,
    ) -> FPDF_BOOL;

    fn FPDFBitmap_CreateEx(
        width: c_int,
        height: c_int,
        format: c_int,
        first_scan: *mut c_void,
        stride: c_int,
    ) -> FPDF_BITMAP;
    fn FPDFBitmap_Destroy(bitmap: FPDF_BITMAP);
    fn FPDFBitmap_GetStride(bitmap: FPDF_BITMAP) -> c_int;
    fn FPDFBitmap_GetBuffer(bitmap: FPDF_BITMAP) -> *mut c_void;
    fn FPDFBitmap_FillRect(
        bitmap: FPDF_BITMAP,
        left: c_int,
        top: c_int,
        width: c_int,
        height: c_int,
        color: FPDF_DWORD,
    );
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    #[ignore = "requires libpdfium"]
    fn test_libpdfium_available() {
        let _lib = unsafe { libpdfium::new(LIBRARY_NAME) }.unwrap();
    }

    #[test]
    fn test_render_flags_are_distinct() {
        let flags = [
            FPDF_ANNOT,
            FPDF_LCD_TEXT,
            FPDF_NO_NATIVETEXT,
            FPDF_GRAYSCALE,
            FPDF_REVERSE_BYTE_ORDER,
            FPDF_CONVERT_FILL_TO_STROKE,
            FPDF_RENDER_LIMITEDIMAGECACHE,
            FPDF_RENDER_FORCEHALFTONE,
            FPDF_PRINTING,
            FPDF_RENDER_NO_SMOOTHTEXT,
            FPDF_RENDER_NO_SMOOTHIMAGE,
            FPDF_RENDER_NO_SMOOTHPATH,
        ];

        let combined = flags.iter().fold(0, |acc, f| {
            assert_eq!(acc & f, 0);
            acc | f
        });
        assert_eq!(combined.count_ones() as usize, flags.len());
    }
}
