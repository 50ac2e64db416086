use thiserror::Error;

/// Type-erased error of a collaborating library.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failure of a single page rasterization.
///
/// Every variant aborts the pipeline before anything is painted, except
/// [`RasterError::Paint`] which may leave a partially painted target.
#[derive(Error, Debug)]
pub enum RasterError {
    #[error("unable to load document: {locator}")]
    DocumentLoad {
        locator: String,
        #[source]
        source: BoxError,
    },

    #[error("unable to create page: {index} (document has {page_count} pages)")]
    PageNotFound {
        index: u32,
        page_count: u32,
        #[source]
        source: Option<BoxError>,
    },

    #[error("unable to render page: {index}")]
    Render {
        index: u32,
        #[source]
        source: BoxError,
    },

    #[error("out of memory: cannot copy {bytes} bytes of pixel data")]
    OutOfMemory { bytes: usize },

    #[error("unable to create image surface")]
    SurfaceCreation(#[source] BoxError),

    #[error("unable to paint page")]
    Paint(#[source] BoxError),
}

impl RasterError {
    /// Render this error and all of its sources as a single line.
    pub fn chain(&self) -> String {
        let mut message = self.to_string();
        let mut source = std::error::Error::source(self);

        while let Some(err) = source {
            message.push_str(": ");
            message.push_str(&err.to_string());
            source = err.source();
        }

        message
    }
}
