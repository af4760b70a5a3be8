//! Error types for slide model compilation.
//!
//! Only I/O-level failures are errors. Irregular Markdown input never
//! produces an `Err`; it is logged and degraded to a fallback instead.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal errors that abort a compile run.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to open or read an input file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// The layout catalog has no layouts at all.
    #[error("Layout catalog is empty: no slide layouts available")]
    EmptyCatalog,

    /// ZIP archive error (for PPTX templates).
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// XML parsing error (for PPTX templates).
    #[error("XML parsing error: {0}")]
    XmlError(String),
}
