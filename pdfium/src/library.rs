use crate::bindings::{Bindings, FnTable, Handle};
use crate::document::Document;
use crate::{Error, ErrorCode, Result};

use std::ffi::CString;
use std::path::{Path, PathBuf};
use std::ptr::NonNull;
use std::rc::Rc;

#[derive(Debug, Default, Clone)]
pub struct Config {
    pub user_font_paths: Option<Vec<PathBuf>>,
}

/// Initialized pdfium bindings.
#[derive(Clone)]
pub struct Library {
    inner: Rc<LibraryGuard>,
}

struct LibraryGuard {
    ftable: FnTable,
}

impl Library {
    pub fn init_with_bindings(bindings: Bindings, config: &Config) -> Result<Library> {
        // convert user font paths to null-terminated array of C-string pointers
        let paths = config
            .user_font_paths
            .as_ref()
            .map(|paths| -> Result<Vec<_>> { paths.iter().map(path_to_cstring).collect() })
            .transpose()?;

        let mut path_ptrs = paths.as_ref().map(|paths| -> Vec<*const std::ffi::c_char> {
            paths
                .iter()
                .map(|p| p.as_ptr())
                .chain(std::iter::once(std::ptr::null()))
                .collect()
        });

        let path_array_ptr = if let Some(ref mut path_ptrs) = path_ptrs {
            path_ptrs.as_mut_ptr()
        } else {
            std::ptr::null_mut()
        };

        // build config
        let config_sys = pdfium_sys::FPDF_LIBRARY_CONFIG {
            version: 2,
            m_pUserFontPaths: path_array_ptr,
            m_pIsolate: std::ptr::null_mut(),
            m_v8EmbedderSlot: 0,
            m_pPlatform: std::ptr::null_mut(),
            m_RendererType: 0,
        };

        // initialize library
        unsafe { bindings.ftable.FPDF_InitLibraryWithConfig(&config_sys) };

        // build library struct
        let inner = LibraryGuard {
            ftable: bindings.ftable,
        };

        // FPDF_InitLibraryWithConfig has no failure path and leaves the
        // last-error value alone
        Ok(Library {
            inner: Rc::new(inner),
        })
    }

    pub fn init_with_config(config: &Config) -> Result<Library> {
        Self::init_with_bindings(Bindings::load()?, config)
    }

    pub fn init() -> Result<Library> {
        Self::init_with_config(&Config::default())
    }

    pub fn ftable(&self) -> &FnTable {
        &self.inner.ftable
    }

    /// Load a document from a file on disk.
    pub fn load_file(&self, path: impl AsRef<Path>, password: Option<&str>) -> Result<Document> {
        let path = path_to_cstring(path)?;
        let password = password
            .map(|pw| CString::new(pw).map_err(|_| Error::InvalidEncoding))
            .transpose()?;

        let password_ptr = password.as_ref().map_or(std::ptr::null(), |pw| pw.as_ptr());

        let handle = unsafe { self.ftable().FPDF_LoadDocument(path.as_ptr(), password_ptr) };
        let handle = self.check_handle(handle)?;

        Ok(Document::new(self.clone(), handle))
    }

    /// Last error reported by pdfium, if any.
    pub(crate) fn last_error(&self) -> Option<ErrorCode> {
        let code = unsafe { self.ftable().FPDF_GetLastError() };
        ErrorCode::from_raw(code)
    }

    /// Wrap `ptr` in a handle. A null pointer is reported as the last
    /// error, pdfium does not always set one.
    pub(crate) fn check_handle<T>(&self, ptr: *mut T) -> std::result::Result<Handle<T>, ErrorCode> {
        handle_or_error(ptr, || self.last_error())
    }
}

/// The last-error value is only meaningful right after a call failed. It is
/// left untouched by successful calls, so it is read for null pointers only.
fn handle_or_error<T>(
    ptr: *mut T,
    last_error: impl FnOnce() -> Option<ErrorCode>,
) -> std::result::Result<Handle<T>, ErrorCode> {
    match NonNull::new(ptr) {
        Some(ptr) => Ok(Handle::new(ptr)),
        None => Err(last_error().unwrap_or(ErrorCode::Unknown)),
    }
}

impl Drop for LibraryGuard {
    fn drop(&mut self) {
        unsafe { self.ftable.FPDF_DestroyLibrary() };
    }
}

#[cfg(target_family = "unix")]
fn path_to_cstring(path: impl AsRef<Path>) -> Result<CString> {
    use std::os::unix::ffi::OsStrExt;

    CString::new(path.as_ref().as_os_str().as_bytes()).map_err(|_| Error::InvalidEncoding)
}

#[cfg(not(target_family = "unix"))]
fn path_to_cstring(path: impl AsRef<Path>) -> Result<CString> {
    // FIXME: This assumes paths are always valid unicode, which might not be true

    let unicode = path.as_ref().to_str().ok_or(Error::InvalidEncoding)?;
    CString::new(unicode).map_err(|_| Error::InvalidEncoding)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    #[ignore = "requires libpdfium"]
    fn test_init() {
        let _lib = Library::init().unwrap();
    }

    #[test]
    #[ignore = "requires libpdfium"]
    fn test_load_missing_file() {
        let lib = Library::init().unwrap();
        let err = lib.load_file("/nonexistent/file.pdf", None).err().unwrap();

        assert!(matches!(err, Error::ErrorCode(ErrorCode::File)));
    }

    #[test]
    fn test_stale_error_ignored_for_valid_handle() {
        let mut value = 0u8;

        let handle = handle_or_error(&mut value as *mut u8, || Some(ErrorCode::File));
        assert!(handle.is_ok());
    }

    #[test]
    fn test_null_handle_reports_last_error() {
        let err = handle_or_error(std::ptr::null_mut::<u8>(), || Some(ErrorCode::Format));
        assert_eq!(err.err(), Some(ErrorCode::Format));

        let err = handle_or_error(std::ptr::null_mut::<u8>(), || None);
        assert_eq!(err.err(), Some(ErrorCode::Unknown));
    }

    #[test]
    #[ignore = "requires libpdfium"]
    fn test_load_after_failed_load() {
        let lib = Library::init().unwrap();
        assert!(lib.load_file("/nonexistent/file.pdf", None).is_err());

        // a failed load leaves its code behind, later bitmaps must not see it
        let bitmap = crate::bitmap::Bitmap::uninitialized(
            lib.clone(),
            4,
            4,
            crate::bitmap::BitmapFormat::Bgra,
        );
        assert!(bitmap.is_ok());
    }

    #[test]
    #[cfg(target_family = "unix")]
    fn test_path_with_nul_is_rejected() {
        let err = path_to_cstring("foo\0bar.pdf").unwrap_err();
        assert!(matches!(err, Error::InvalidEncoding));
    }
}
