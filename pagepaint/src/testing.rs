//! In-memory collaborators for tests.
//!
//! [`FakeLibrary`] serves documents described by page sizes and records
//! every acquisition and release in a shared [`Ledger`]. [`RecordingContext`]
//! keeps a transform stack and records what gets painted.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use thiserror::Error;

use crate::backend::{DocumentHandle, DocumentLibrary, DrawingContext, PageHandle};
use crate::crop::Rect;
use crate::image::{PixelBuffer, PixelFormat, RenderedImage};
use crate::policy::{self, RenderHints};

/// Acquisition or release of a document-side resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    DocumentOpened,
    DocumentClosed,
    PageOpened(u32),
    PageClosed(u32),
    ImageRendered(u32),
    ImageReleased(u32),
}

#[derive(Debug, Default)]
pub struct Ledger {
    events: RefCell<Vec<Event>>,
}

impl Ledger {
    fn record(&self, event: Event) {
        self.events.borrow_mut().push(event);
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.borrow().clone()
    }

    fn count(&self, pred: impl Fn(&Event) -> bool) -> usize {
        self.events.borrow().iter().filter(|e| pred(e)).count()
    }

    pub fn documents_opened(&self) -> usize {
        self.count(|e| matches!(e, Event::DocumentOpened))
    }

    pub fn documents_closed(&self) -> usize {
        self.count(|e| matches!(e, Event::DocumentClosed))
    }

    pub fn pages_opened(&self) -> usize {
        self.count(|e| matches!(e, Event::PageOpened(_)))
    }

    pub fn pages_closed(&self) -> usize {
        self.count(|e| matches!(e, Event::PageClosed(_)))
    }

    pub fn images_rendered(&self) -> usize {
        self.count(|e| matches!(e, Event::ImageRendered(_)))
    }

    pub fn images_released(&self) -> usize {
        self.count(|e| matches!(e, Event::ImageReleased(_)))
    }

    /// Whether everything acquired so far has been released again.
    pub fn is_balanced(&self) -> bool {
        self.documents_opened() == self.documents_closed()
            && self.pages_opened() == self.pages_closed()
            && self.images_rendered() == self.images_released()
    }
}

/// Failure injected into a fake document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// Loading any page fails.
    PageLoad,

    /// Rendering fails.
    Render,

    /// Rendering produces an image flagged as invalid.
    InvalidImage,

    /// Rendering produces an image missing its last byte.
    TruncatedImage,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FakeError {
    #[error("no such file: {0}")]
    NotFound(String),

    #[error("cannot load page {0}")]
    PageLoad(u32),

    #[error("cannot render page {0}")]
    Render(u32),
}

#[derive(Debug, Clone, Default)]
struct DocumentShape {
    pages: Vec<(f64, f64)>,
    content: Option<Rect>,
    fault: Option<Fault>,
}

/// Serves documents registered by locator.
#[derive(Debug, Default)]
pub struct FakeLibrary {
    documents: HashMap<String, DocumentShape>,
    ledger: Rc<Ledger>,
}

impl FakeLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a document with the given page sizes in points.
    pub fn with_document(mut self, locator: impl Into<String>, pages: &[(f64, f64)]) -> Self {
        let shape = DocumentShape {
            pages: pages.to_vec(),
            content: None,
            fault: None,
        };

        self.documents.insert(locator.into(), shape);
        self
    }

    /// Register a document with `content` drawn on every page.
    pub fn with_content(
        mut self,
        locator: impl Into<String>,
        pages: &[(f64, f64)],
        content: Rect,
    ) -> Self {
        let shape = DocumentShape {
            pages: pages.to_vec(),
            content: Some(content),
            fault: None,
        };

        self.documents.insert(locator.into(), shape);
        self
    }

    /// Register a document that fails in the given way.
    pub fn with_faulty_document(
        mut self,
        locator: impl Into<String>,
        pages: &[(f64, f64)],
        fault: Fault,
    ) -> Self {
        let shape = DocumentShape {
            pages: pages.to_vec(),
            content: None,
            fault: Some(fault),
        };

        self.documents.insert(locator.into(), shape);
        self
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }
}

impl DocumentLibrary for FakeLibrary {
    type Document = FakeDocument;
    type Error = FakeError;

    fn open(&self, locator: &str) -> Result<FakeDocument, FakeError> {
        let shape = self
            .documents
            .get(locator)
            .ok_or_else(|| FakeError::NotFound(locator.to_owned()))?;

        self.ledger.record(Event::DocumentOpened);

        let inner = DocumentInner {
            shape: shape.clone(),
            ledger: self.ledger.clone(),
        };

        Ok(FakeDocument {
            inner: Rc::new(inner),
        })
    }
}

struct DocumentInner {
    shape: DocumentShape,
    ledger: Rc<Ledger>,
}

impl Drop for DocumentInner {
    fn drop(&mut self) {
        self.ledger.record(Event::DocumentClosed);
    }
}

pub struct FakeDocument {
    inner: Rc<DocumentInner>,
}

impl DocumentHandle for FakeDocument {
    type Page = FakePage;
    type Error = FakeError;

    fn page_count(&self) -> u32 {
        self.inner.shape.pages.len() as u32
    }

    fn page(&self, index: u32) -> Result<FakePage, FakeError> {
        if self.inner.shape.fault == Some(Fault::PageLoad) {
            return Err(FakeError::PageLoad(index));
        }

        let size = *self
            .inner
            .shape
            .pages
            .get(index as usize)
            .ok_or(FakeError::PageLoad(index))?;

        self.inner.ledger.record(Event::PageOpened(index));

        Ok(FakePage {
            doc: self.inner.clone(),
            index,
            size,
        })
    }
}

pub struct FakePage {
    doc: Rc<DocumentInner>,
    index: u32,
    size: (f64, f64),
}

impl FakePage {
    /// Byte pattern of the pixel at `(x, y)` of the page at `index`, counted
    /// from the top-left corner of the page.
    pub fn pixel(index: u32, x: u32, y: u32) -> [u8; 4] {
        [x as u8, y as u8, index as u8, 0xff]
    }
}

impl PageHandle for FakePage {
    type Image = FakeImage;
    type Error = FakeError;

    fn size(&self) -> (f64, f64) {
        self.size
    }

    fn content_bounds(&self) -> Option<Rect> {
        self.doc.shape.content
    }

    fn render_region(
        &self,
        region: Rect,
        _hints: RenderHints,
        dpi_x: f64,
        dpi_y: f64,
    ) -> Result<FakeImage, FakeError> {
        let fault = self.doc.shape.fault;

        if fault == Some(Fault::Render) {
            return Err(FakeError::Render(self.index));
        }

        let width = policy::pixels_for(region.width(), dpi_x);
        let height = policy::pixels_for(region.height(), dpi_y);
        let left = policy::pixels_for(region.x1, dpi_x);
        let top = policy::pixels_for(region.y1, dpi_y);

        // rows are padded to 64 bytes
        let row = width as usize * 4;
        let stride = (row + 63) / 64 * 64;

        let mut data = vec![0; stride * height as usize];
        for y in 0..height {
            for x in 0..width {
                let offset = y as usize * stride + x as usize * 4;
                let pixel = FakePage::pixel(self.index, left + x, top + y);
                data[offset..offset + 4].copy_from_slice(&pixel);
            }
        }

        if fault == Some(Fault::TruncatedImage) {
            data.pop();
        }

        self.doc.ledger.record(Event::ImageRendered(self.index));

        Ok(FakeImage {
            ledger: self.doc.ledger.clone(),
            index: self.index,
            valid: fault != Some(Fault::InvalidImage),
            width,
            height,
            stride: stride as u32,
            data,
        })
    }
}

impl Drop for FakePage {
    fn drop(&mut self) {
        self.doc.ledger.record(Event::PageClosed(self.index));
    }
}

pub struct FakeImage {
    ledger: Rc<Ledger>,
    index: u32,
    valid: bool,
    width: u32,
    height: u32,
    stride: u32,
    data: Vec<u8>,
}

impl RenderedImage for FakeImage {
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

impl Drop for FakeImage {
    fn drop(&mut self) {
        self.ledger.record(Event::ImageReleased(self.index));
    }
}

/// Current transform of a [`RecordingContext`]. Only scaling is tracked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub sx: f64,
    pub sy: f64,
}

impl Transform {
    pub const IDENTITY: Transform = Transform { sx: 1.0, sy: 1.0 };
}

/// A single paint operation as seen by a [`RecordingContext`].
#[derive(Debug, Clone, PartialEq)]
pub struct Paint {
    pub transform: Transform,
    pub origin: (f64, f64),
    pub width: u32,
    pub height: u32,
    pub stride: u32,
    pub format: PixelFormat,
    pub pixels: Vec<u8>,
}

impl Paint {
    /// Area covered on the target.
    pub fn extent(&self) -> (f64, f64) {
        (
            self.width as f64 * self.transform.sx,
            self.height as f64 * self.transform.sy,
        )
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordingError {
    #[error("surface creation rejected")]
    SurfaceRejected,

    #[error("paint rejected")]
    PaintRejected,

    #[error("no source set")]
    NoSource,

    #[error("restore without matching save")]
    UnbalancedRestore,
}

#[derive(Debug, Default)]
struct BufferCounts {
    received: Cell<usize>,
    released: Cell<usize>,
}

/// Surface of a [`RecordingContext`], owning the pixels handed to it.
pub struct FakeSurface {
    pixels: PixelBuffer,
    counts: Rc<BufferCounts>,
}

impl Drop for FakeSurface {
    fn drop(&mut self) {
        let released = &self.counts.released;
        released.set(released.get() + 1);
    }
}

#[derive(Default)]
pub struct RecordingContext {
    transform: Option<Transform>,
    stack: Vec<(Transform, Option<Paint>)>,
    source: Option<Paint>,
    paints: Vec<Paint>,
    counts: Rc<BufferCounts>,

    /// Reject every surface creation.
    pub fail_surface: bool,

    /// Reject every paint.
    pub fail_paint: bool,
}

impl RecordingContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transform(&self) -> Transform {
        self.transform.unwrap_or(Transform::IDENTITY)
    }

    /// Number of saved states not yet restored.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn paints(&self) -> &[Paint] {
        &self.paints
    }

    pub fn buffers_received(&self) -> usize {
        self.counts.received.get()
    }

    pub fn buffers_released(&self) -> usize {
        self.counts.released.get()
    }
}

impl DrawingContext for RecordingContext {
    type Surface = FakeSurface;
    type Error = RecordingError;

    fn create_surface(
        &mut self,
        pixels: PixelBuffer,
        _format: PixelFormat,
    ) -> Result<FakeSurface, RecordingError> {
        let received = &self.counts.received;
        received.set(received.get() + 1);

        // the buffer is released right away if the surface is rejected
        let surface = FakeSurface {
            pixels,
            counts: self.counts.clone(),
        };

        if self.fail_surface {
            return Err(RecordingError::SurfaceRejected);
        }

        Ok(surface)
    }

    fn save(&mut self) -> Result<(), RecordingError> {
        self.stack.push((self.transform(), self.source.clone()));
        Ok(())
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        let t = self.transform();
        self.transform = Some(Transform {
            sx: t.sx * sx,
            sy: t.sy * sy,
        });
    }

    fn set_source_surface(
        &mut self,
        surface: &FakeSurface,
        x: f64,
        y: f64,
    ) -> Result<(), RecordingError> {
        let pixels = &surface.pixels;

        self.source = Some(Paint {
            transform: self.transform(),
            origin: (x, y),
            width: pixels.width(),
            height: pixels.height(),
            stride: pixels.stride(),
            format: pixels.format(),
            pixels: pixels.as_bytes().to_vec(),
        });

        Ok(())
    }

    fn paint(&mut self) -> Result<(), RecordingError> {
        if self.fail_paint {
            return Err(RecordingError::PaintRejected);
        }

        let mut paint = self.source.clone().ok_or(RecordingError::NoSource)?;
        paint.transform = self.transform();

        self.paints.push(paint);
        Ok(())
    }

    fn restore(&mut self) -> Result<(), RecordingError> {
        let (transform, source) = self.stack.pop().ok_or(RecordingError::UnbalancedRestore)?;
        self.transform = Some(transform);
        self.source = source;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::image;

    fn buffer(width: f64, height: f64) -> PixelBuffer {
        let library = FakeLibrary::new().with_document("a.pdf", &[(width, height)]);
        let page = library.open("a.pdf").unwrap().page(0).unwrap();
        let rendered = page.render(RenderHints::all(), 72.0, 72.0).unwrap();

        let len = image::validate(&rendered).unwrap();
        PixelBuffer::copy_from(&rendered, len, usize::MAX).unwrap()
    }

    #[test]
    fn test_page_keeps_document_open() {
        let library = FakeLibrary::new().with_document("a.pdf", &[(10.0, 10.0)]);

        let doc = library.open("a.pdf").unwrap();
        let page = doc.page(0).unwrap();
        drop(doc);

        assert_eq!(library.ledger().documents_closed(), 0);

        drop(page);
        assert_eq!(
            library.ledger().events(),
            vec![
                Event::DocumentOpened,
                Event::PageOpened(0),
                Event::PageClosed(0),
                Event::DocumentClosed,
            ]
        );
    }

    #[test]
    fn test_fake_image_layout() {
        let library = FakeLibrary::new().with_document("a.pdf", &[(10.0, 5.0)]);
        let doc = library.open("a.pdf").unwrap();
        let page = doc.page(0).unwrap();

        let image = page.render(RenderHints::all(), 72.0, 72.0).unwrap();
        assert_eq!((image.width(), image.height(), image.stride()), (10, 5, 64));
        assert_eq!(image.pixels().len(), 5 * 64);
        assert_eq!(&image.pixels()[64 + 4..64 + 8], &FakePage::pixel(0, 1, 1));
    }

    #[test]
    fn test_recording_transform_stack() {
        let mut ctx = RecordingContext::new();

        ctx.save().unwrap();
        ctx.scale(2.0, 3.0);
        ctx.scale(0.5, 0.5);
        assert_eq!(ctx.transform(), Transform { sx: 1.0, sy: 1.5 });

        ctx.restore().unwrap();
        assert_eq!(ctx.transform(), Transform::IDENTITY);
        assert_eq!(ctx.restore(), Err(RecordingError::UnbalancedRestore));
        assert_eq!(ctx.paint(), Err(RecordingError::NoSource));
    }

    #[test]
    fn test_restore_brings_back_source() {
        let mut ctx = RecordingContext::new();
        let outer = ctx.create_surface(buffer(1.0, 1.0), PixelFormat::Argb32).unwrap();
        let inner = ctx.create_surface(buffer(2.0, 2.0), PixelFormat::Argb32).unwrap();

        ctx.set_source_surface(&outer, 3.0, 4.0).unwrap();
        ctx.save().unwrap();
        ctx.set_source_surface(&inner, 0.0, 0.0).unwrap();
        ctx.restore().unwrap();

        ctx.paint().unwrap();
        assert_eq!(ctx.paints()[0].origin, (3.0, 4.0));
        assert_eq!((ctx.paints()[0].width, ctx.paints()[0].height), (1, 1));
    }

    #[test]
    fn test_restore_without_source() {
        let mut ctx = RecordingContext::new();
        let surface = ctx.create_surface(buffer(1.0, 1.0), PixelFormat::Argb32).unwrap();

        ctx.save().unwrap();
        ctx.set_source_surface(&surface, 0.0, 0.0).unwrap();
        ctx.restore().unwrap();

        assert_eq!(ctx.paint(), Err(RecordingError::NoSource));
    }

    #[test]
    fn test_fake_region_offsets_pixels() {
        let library = FakeLibrary::new().with_document("a.pdf", &[(20.0, 20.0)]);
        let doc = library.open("a.pdf").unwrap();
        let page = doc.page(0).unwrap();

        let region = Rect::new(4.0, 6.0, 14.0, 11.0);
        let image = page.render_region(region, RenderHints::all(), 72.0, 72.0).unwrap();

        assert_eq!((image.width(), image.height()), (10, 5));
        assert_eq!(&image.pixels()[..4], &FakePage::pixel(0, 4, 6));
    }
}
