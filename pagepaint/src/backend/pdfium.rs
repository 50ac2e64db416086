//! Document collaborator backed by pdfium.

use std::path::PathBuf;

use pdfium::bitmap::{Bitmap, BitmapFormat, Color};
use pdfium::lowlevel::Bindings;
use pdfium::render::{PageRenderLayout, RenderFlags};
use thiserror::Error;

use crate::backend::{DocumentHandle, DocumentLibrary, PageHandle};
use crate::crop::Rect;
use crate::image::RenderedImage;
use crate::locator::{self, LocatorError};
use crate::policy::{self, RenderHints};

/// How to load and initialize pdfium.
#[derive(Debug, Default, Clone)]
pub struct PdfiumConfig {
    /// Shared library to load. Searched in the default library paths if unset.
    pub library_path: Option<PathBuf>,

    /// Additional directories to look for fonts in.
    pub user_font_paths: Option<Vec<PathBuf>>,
}

#[derive(Error, Debug)]
pub enum OpenError {
    #[error(transparent)]
    Locator(#[from] LocatorError),

    #[error(transparent)]
    Pdfium(#[from] pdfium::Error),
}

/// An initialized pdfium library.
///
/// Handles created from it share the library and keep it initialized until
/// the last of them is dropped.
#[derive(Clone)]
pub struct PdfiumLibrary {
    lib: pdfium::Library,
}

impl PdfiumLibrary {
    pub fn new(lib: pdfium::Library) -> Self {
        Self { lib }
    }

    pub fn init(config: &PdfiumConfig) -> Result<Self, pdfium::Error> {
        let bindings = match &config.library_path {
            Some(path) => Bindings::load_from_path(path)?,
            None => Bindings::load()?,
        };

        let lib_config = pdfium::Config {
            user_font_paths: config.user_font_paths.clone(),
        };

        let lib = pdfium::Library::init_with_bindings(bindings, &lib_config)?;
        tracing::debug!(path = ?config.library_path, "pdfium initialized");

        Ok(Self::new(lib))
    }

    pub fn library(&self) -> &pdfium::Library {
        &self.lib
    }
}

impl DocumentLibrary for PdfiumLibrary {
    type Document = PdfiumDocument;
    type Error = OpenError;

    fn open(&self, locator: &str) -> Result<PdfiumDocument, OpenError> {
        let path = locator::resolve_path(locator)?;
        let doc = self.lib.load_file(&path, None)?;

        Ok(PdfiumDocument { doc })
    }
}

pub struct PdfiumDocument {
    doc: pdfium::Document,
}

impl DocumentHandle for PdfiumDocument {
    type Page = PdfiumPage;
    type Error = pdfium::Error;

    fn page_count(&self) -> u32 {
        self.doc.pages().count()
    }

    fn page(&self, index: u32) -> Result<PdfiumPage, pdfium::Error> {
        let page = self.doc.pages().get(index)?;
        Ok(PdfiumPage { page })
    }
}

pub struct PdfiumPage {
    page: pdfium::Page,
}

impl PageHandle for PdfiumPage {
    type Image = PdfiumImage;
    type Error = pdfium::Error;

    fn size(&self) -> (f64, f64) {
        let size = self.page.size();
        (size.x as f64, size.y as f64)
    }

    fn content_bounds(&self) -> Option<Rect> {
        let bounds = self.page.content_bounds()?;
        let height = self.page.height() as f64;

        // flip from the bottom-left origin of PDF user space
        Some(Rect::new(
            bounds.left as f64,
            height - bounds.top as f64,
            bounds.right as f64,
            height - bounds.bottom as f64,
        ))
    }

    fn render_region(
        &self,
        region: Rect,
        hints: RenderHints,
        dpi_x: f64,
        dpi_y: f64,
    ) -> Result<PdfiumImage, pdfium::Error> {
        let width = policy::pixels_for(region.width(), dpi_x);
        let height = policy::pixels_for(region.height(), dpi_y);

        let lib = self.page.library().clone();
        let mut bitmap = Bitmap::filled(lib, width, height, BitmapFormat::Bgra, Color::WHITE)?;

        let (page_width, page_height) = self.size();
        let layout = PageRenderLayout::clipped(
            policy::pixels_for(page_width, dpi_x),
            policy::pixels_for(page_height, dpi_y),
            policy::pixels_for(region.x1, dpi_x),
            policy::pixels_for(region.y1, dpi_y),
        );

        self.page.render(&mut bitmap, &layout, render_flags(hints));

        Ok(PdfiumImage { bitmap })
    }
}

/// A page rendered into a pdfium-owned BGRA bitmap.
///
/// BGRA in memory is the native ARGB32 layout on little-endian machines.
pub struct PdfiumImage {
    bitmap: Bitmap,
}

impl RenderedImage for PdfiumImage {
    fn is_valid(&self) -> bool {
        cfg!(target_endian = "little")
            && self.bitmap.format() == BitmapFormat::Bgra
            && !self.bitmap.buf().is_empty()
    }

    fn width(&self) -> u32 {
        self.bitmap.width()
    }

    fn height(&self) -> u32 {
        self.bitmap.height()
    }

    fn stride(&self) -> u32 {
        self.bitmap.stride()
    }

    fn pixels(&self) -> &[u8] {
        self.bitmap.buf()
    }
}

fn render_flags(hints: RenderHints) -> RenderFlags {
    let mut flags = RenderFlags::Annotations;

    if !hints.contains(RenderHints::Antialiasing) {
        flags |= RenderFlags::NoSmoothPath | RenderFlags::NoSmoothImage;
    }

    if !hints.contains(RenderHints::TextAntialiasing) {
        flags |= RenderFlags::NoSmoothText;
    }

    flags
}
