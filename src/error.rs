//! Error types for relayout.

use std::io;
use thiserror::Error;

/// Result type alias for relayout operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while analyzing or re-emitting a document.
///
/// Only persistence failures ([`Error::Io`], [`Error::Writer`]) abort a
/// conversion. Extraction failures are downgraded to page warnings by the
/// converter, and degenerate geometry never produces an error at all.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The source fragment stream for a page was malformed or missing.
    #[error("Extraction error on page {page}: {message}")]
    Extraction {
        /// 1-indexed page number
        page: u32,
        /// What went wrong
        message: String,
    },

    /// The output writer rejected a call or failed to persist.
    #[error("Writer error: {0}")]
    Writer(String),

    /// A configuration value is out of its valid range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Page number is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// Invalid page range specification.
    #[error("Invalid page range: {0}")]
    InvalidPageRange(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an extraction error for a page.
    pub fn extraction(page: u32, message: impl Into<String>) -> Self {
        Error::Extraction {
            page,
            message: message.into(),
        }
    }

    /// Whether this error must abort the whole document.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Io(_) | Error::Writer(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::extraction(3, "empty content stream");
        assert_eq!(
            err.to_string(),
            "Extraction error on page 3: empty content stream"
        );

        let err = Error::PageOutOfRange(10, 5);
        assert_eq!(
            err.to_string(),
            "Page 10 is out of range (document has 5 pages)"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_extraction_is_not_fatal() {
        assert!(!Error::extraction(1, "bad").is_fatal());
        assert!(Error::Writer("disk full".into()).is_fatal());
    }
}
