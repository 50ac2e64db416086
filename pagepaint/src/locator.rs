//! Document locators.
//!
//! A locator is either a plain filesystem path or a `file://` URI. Strings
//! that parse as a URI with any other scheme are rejected. Single-letter
//! schemes are treated as Windows drive letters.

use std::path::PathBuf;

use thiserror::Error;
use url::Url;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocatorError {
    #[error("empty document locator")]
    Empty,

    #[error("unsupported URI scheme '{0}'")]
    UnsupportedScheme(String),

    #[error("URI does not name a local file: {0}")]
    NotLocal(String),
}

/// Resolve `locator` to a local filesystem path.
pub fn resolve_path(locator: &str) -> Result<PathBuf, LocatorError> {
    if locator.is_empty() {
        return Err(LocatorError::Empty);
    }

    match Url::parse(locator) {
        Ok(url) if url.scheme() == "file" => url
            .to_file_path()
            .map_err(|()| LocatorError::NotLocal(locator.to_owned())),
        Ok(url) if url.scheme().len() > 1 => {
            Err(LocatorError::UnsupportedScheme(url.scheme().to_owned()))
        }
        _ => Ok(PathBuf::from(locator)),
    }
}
