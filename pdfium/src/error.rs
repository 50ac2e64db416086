use std::ffi::c_ulong;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("string or path is not representable as a C string")]
    InvalidEncoding,

    #[error("argument out of range")]
    InvalidArgument,

    #[error("failed to load pdfium")]
    LibraryError(#[from] libloading::Error),

    #[error(transparent)]
    ErrorCode(#[from] ErrorCode),
}

/// Error reported by `FPDF_GetLastError`.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    #[error("unknown pdfium error")]
    Unknown,

    #[error("file not found or could not be opened")]
    File,

    #[error("not a PDF file or file corrupted")]
    Format,

    #[error("password required or incorrect")]
    Password,

    #[error("unsupported security scheme")]
    Security,

    #[error("page not found or content error")]
    Page,

    #[error("failed to load XFA forms")]
    XfaLoad,

    #[error("failed to lay out XFA forms")]
    XfaLayout,

    #[error("unrecognized pdfium error code {0}")]
    Other(u32),
}

impl ErrorCode {
    /// Map a raw status code, `None` meaning success.
    pub fn from_raw(code: c_ulong) -> Option<ErrorCode> {
        let code = code as u32;

        let err = match code {
            pdfium_sys::FPDF_ERR_SUCCESS => return None,
            pdfium_sys::FPDF_ERR_UNKNOWN => ErrorCode::Unknown,
            pdfium_sys::FPDF_ERR_FILE => ErrorCode::File,
            pdfium_sys::FPDF_ERR_FORMAT => ErrorCode::Format,
            pdfium_sys::FPDF_ERR_PASSWORD => ErrorCode::Password,
            pdfium_sys::FPDF_ERR_SECURITY => ErrorCode::Security,
            pdfium_sys::FPDF_ERR_PAGE => ErrorCode::Page,
            pdfium_sys::FPDF_ERR_XFALOAD => ErrorCode::XfaLoad,
            pdfium_sys::FPDF_ERR_XFALAYOUT => ErrorCode::XfaLayout,
            other => ErrorCode::Other(other),
        };

        Some(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(ErrorCode::from_raw(0), None);
        assert_eq!(ErrorCode::from_raw(2), Some(ErrorCode::File));
        assert_eq!(ErrorCode::from_raw(3), Some(ErrorCode::Format));
        assert_eq!(ErrorCode::from_raw(6), Some(ErrorCode::Page));
        assert_eq!(ErrorCode::from_raw(42), Some(ErrorCode::Other(42)));
    }

    #[test]
    fn test_error_code_is_transparent() {
        let err = Error::from(ErrorCode::Password);
        assert_eq!(err.to_string(), "password required or incorrect");
    }
}
