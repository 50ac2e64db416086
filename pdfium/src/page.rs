use std::rc::Rc;

use nalgebra::Vector2;

use crate::bindings::Handle;
use crate::bitmap::Bitmap;
use crate::render::{PageRenderLayout, RenderFlags};
use crate::{Document, Library};

pub type PageHandle = Handle<pdfium_sys::fpdf_page_t__>;

/// Rectangle in PDF user space, with the origin at the bottom-left corner
/// of the page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageRect {
    pub left: f32,
    pub bottom: f32,
    pub right: f32,
    pub top: f32,
}

impl PageRect {
    /// Smallest rectangle containing both `self` and `other`.
    pub fn union(&self, other: &PageRect) -> PageRect {
        PageRect {
            left: self.left.min(other.left),
            bottom: self.bottom.min(other.bottom),
            right: self.right.max(other.right),
            top: self.top.max(other.top),
        }
    }
}

#[derive(Clone)]
pub struct Page {
    inner: Rc<PageInner>,
}

struct PageInner {
    lib: Library,
    doc: Document,
    handle: PageHandle,
}

impl Page {
    pub(crate) fn new(lib: Library, doc: Document, handle: PageHandle) -> Self {
        let inner = PageInner { lib, doc, handle };

        Self {
            inner: Rc::new(inner),
        }
    }

    pub fn handle(&self) -> &PageHandle {
        &self.inner.handle
    }

    pub fn document(&self) -> &Document {
        &self.inner.doc
    }

    pub fn library(&self) -> &Library {
        &self.inner.lib
    }

    /// Page width in PDF points (1/72 inch).
    pub fn width(&self) -> f32 {
        unsafe { self.library().ftable().FPDF_GetPageWidthF(self.handle().get()) }
    }

    /// Page height in PDF points (1/72 inch).
    pub fn height(&self) -> f32 {
        unsafe { self.library().ftable().FPDF_GetPageHeightF(self.handle().get()) }
    }

    pub fn size(&self) -> Vector2<f32> {
        Vector2::new(self.width(), self.height())
    }

    /// Bounding box of all objects on the page, `None` if there are none.
    pub fn content_bounds(&self) -> Option<PageRect> {
        let count = unsafe { self.library().ftable().FPDFPage_CountObjects(self.handle().get()) };

        (0..count.max(0))
            .filter_map(|index| self.object_bounds(index))
            .reduce(|a, b| a.union(&b))
    }

    fn object_bounds(&self, index: i32) -> Option<PageRect> {
        let ftable = self.library().ftable();

        let object = unsafe { ftable.FPDFPage_GetObject(self.handle().get(), index) };
        if object.is_null() {
            return None;
        }

        let (mut left, mut bottom, mut right, mut top) = (0.0, 0.0, 0.0, 0.0);
        let ok = unsafe {
            ftable.FPDFPageObj_GetBounds(object, &mut left, &mut bottom, &mut right, &mut top)
        };

        (ok != 0).then_some(PageRect { left, bottom, right, top })
    }

    /// Render into `bitmap`, placed and rotated according to `layout`.
    ///
    /// The bitmap may be smaller than the laid out page, in which case only
    /// the covered part is rendered. pdfium reports no errors for this call.
    pub fn render(&self, bitmap: &mut Bitmap, layout: &PageRenderLayout, flags: RenderFlags) {
        let page = self.handle().get();
        let bitmap = bitmap.handle().get();

        unsafe {
            self.library().ftable().FPDF_RenderPageBitmap(
                bitmap,
                page,
                layout.start.x,
                layout.start.y,
                layout.size.x,
                layout.size.y,
                layout.rotate.as_i32(),
                flags.bits() as _,
            )
        };
    }
}

impl Drop for PageInner {
    fn drop(&mut self) {
        unsafe { self.lib.ftable().FPDF_ClosePage(self.handle.get()) };
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_rect_union() {
        let a = PageRect { left: 10.0, bottom: 20.0, right: 30.0, top: 40.0 };
        let b = PageRect { left: 5.0, bottom: 25.0, right: 50.0, top: 35.0 };

        let expected = PageRect { left: 5.0, bottom: 20.0, right: 50.0, top: 40.0 };
        assert_eq!(a.union(&b), expected);
        assert_eq!(b.union(&a), expected);
        assert_eq!(a.union(&a), a);
    }
}
