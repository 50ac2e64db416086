use std::path::Path;
use std::ptr::NonNull;

/// Raw pdfium function pointer table.
pub type FnTable = pdfium_sys::libpdfium;

/// Pdfium library function bindings.
pub struct Bindings {
    pub(crate) ftable: FnTable,
}

impl Bindings {
    const LIBRARY_NAME: &'static str = pdfium_sys::LIBRARY_NAME;

    pub fn load() -> Result<Bindings, libloading::Error> {
        Self::load_from_path(Self::LIBRARY_NAME)
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Bindings, libloading::Error> {
        let ftable = unsafe { pdfium_sys::libpdfium::new(path.as_ref()) }?;

        let library = Bindings { ftable };
        Ok(library)
    }

    pub fn ftable(&self) -> &FnTable {
        &self.ftable
    }
}

/// A handle for a pdfium object.
///
/// Wraps the underlying pointer in `NonNull`: handles are only ever
/// constructed from pointers that pdfium reported as valid. Ownership and
/// release are managed by the wrapper type holding the handle.
#[derive(Debug)]
pub struct Handle<T> {
    ptr: NonNull<T>,
}

impl<T> Handle<T> {
    pub(crate) fn new(ptr: NonNull<T>) -> Self {
        Self { ptr }
    }

    pub fn get(&self) -> *mut T {
        self.ptr.as_ptr()
    }
}
