//! Document error types

use thiserror::Error;

use crate::fetch::FetchError;

/// Errors raised while opening or rendering a document
#[derive(Debug, Error)]
pub enum DocumentError {
    /// Document not found at the location
    #[error("Document not found: {0}")]
    NotFound(String),

    /// Failed to read the document bytes
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Failed to parse the document
    #[error("Parse error: {0}")]
    Parse(String),

    /// Page number outside the document
    #[error("Page {page} out of range (1-{total})")]
    PageOutOfRange { page: u32, total: u32 },

    /// Failed to render a page
    #[error("Render error: {0}")]
    Render(String),

    /// Open did not finish in time
    #[error("Operation timed out after {0} ms")]
    Timeout(u64),
}

/// Result type alias for document operations
pub type Result<T> = std::result::Result<T, DocumentError>;

/// Alias for Result
pub type DocumentResult<T> = Result<T>;
