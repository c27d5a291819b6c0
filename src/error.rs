//! Error types for the pdfnotes library.
//!
//! Errors only surface where a document is opened, decoded or rendered.
//! Highlight analysis itself never fails: malformed units are skipped and
//! ambiguous fragments resolve to [`Category::Point`](crate::model::Category).

use std::io;
use thiserror::Error;

/// Result type alias for pdfnotes operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while loading a PDF or writing notes.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input does not start with a PDF header.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// Error parsing PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// The PDF document is encrypted and cannot be read.
    #[error("Document is encrypted")]
    Encrypted,

    /// Page number is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// Invalid page range string.
    #[error("Invalid page range: {0}")]
    InvalidPageRange(String),

    /// Error while producing notes output (Markdown, text, JSON).
    #[error("Rendering error: {0}")]
    Render(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::PdfParse(err.to_string()),
        }
    }
}
