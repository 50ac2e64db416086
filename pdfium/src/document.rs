use std::rc::Rc;

use crate::bindings::Handle;
use crate::{Error, Library, Page, Result};

pub type DocumentHandle = Handle<pdfium_sys::fpdf_document_t__>;

#[derive(Clone)]
pub struct Document {
    inner: Rc<DocumentInner>,
}

struct DocumentInner {
    lib: Library,
    handle: DocumentHandle,
}

impl Document {
    pub(crate) fn new(lib: Library, handle: DocumentHandle) -> Self {
        let inner = DocumentInner { lib, handle };

        Self {
            inner: Rc::new(inner),
        }
    }

    pub fn handle(&self) -> &DocumentHandle {
        &self.inner.handle
    }

    pub fn library(&self) -> &Library {
        &self.inner.lib
    }

    pub fn pages(&self) -> Pages<'_> {
        Pages::new(self.library(), self)
    }
}

impl Drop for DocumentInner {
    fn drop(&mut self) {
        unsafe { self.lib.ftable().FPDF_CloseDocument(self.handle.get()) };
    }
}

pub struct Pages<'a> {
    lib: &'a Library,
    doc: &'a Document,
}

impl<'a> Pages<'a> {
    pub(crate) fn new(lib: &'a Library, doc: &'a Document) -> Self {
        Pages { lib, doc }
    }

    pub fn count(&self) -> u32 {
        let doc = self.doc.handle().get();
        let count = unsafe { self.lib.ftable().FPDF_GetPageCount(doc) };

        u32::try_from(count).unwrap_or(0)
    }

    pub fn get(&self, index: u32) -> Result<Page> {
        let doc = self.doc.handle().get();
        let index = i32::try_from(index).map_err(|_| Error::InvalidArgument)?;

        let page = unsafe { self.lib.ftable().FPDF_LoadPage(doc, index) };
        let page = self.lib.check_handle(page)?;

        Ok(Page::new(self.lib.clone(), self.doc.clone(), page))
    }
}
