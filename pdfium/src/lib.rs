//! Safe wrapper around a dynamically loaded pdfium library.
//!
//! All pdfium objects are owned handles: documents, pages, and bitmaps are
//! released when the last clone of their Rust wrapper is dropped. A page
//! keeps its document alive, so pages are always closed before the document
//! they belong to.

mod bindings;
mod document;
mod error;
mod library;
mod page;

pub mod bitmap;
pub mod render;

pub use document::{Document, DocumentHandle, Pages};
pub use error::{Error, ErrorCode, Result};
pub use library::{Config, Library};
pub use page::{Page, PageHandle, PageRect};

pub mod lowlevel {
    pub use crate::bindings::{Bindings, FnTable, Handle};
}
