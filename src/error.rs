//! Crate error type
//!
//! Two fallible paths exist: scanner configuration (fail fast, before any
//! input is read) and transport I/O while refilling the window. Malformed
//! markup is never an error; the scanner and tokenizer resolve it
//! heuristically.

use thiserror::Error;

/// Errors reported by scanner construction and streaming.
#[derive(Debug, Error)]
pub enum Error {
    /// Target tag name was empty.
    #[error("target tag name is empty")]
    EmptyTagName,

    /// Attribute filter was configured but empty.
    #[error("attribute filter is empty")]
    EmptyAttributeFilter,

    /// Search text filter was configured but empty.
    #[error("search text is empty")]
    EmptySearchText,

    /// Window size of zero cannot hold any input.
    #[error("window size must be non-zero")]
    WindowSizeZero,

    /// Search text cannot exceed the window or chunk capacity.
    #[error("search text length {len} exceeds capacity {limit}")]
    SearchTextTooLong { len: usize, limit: usize },

    /// Substring search is bounded to adjacent chunk pairs, so the needle
    /// must fit within a single chunk.
    #[error("needle length {len} exceeds chunk capacity {capacity}")]
    NeedleTooLong { len: usize, capacity: usize },

    /// Transport failure while requesting more input.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
