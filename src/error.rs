use std::path::PathBuf;

use thiserror::Error;

/// The error type for all fallible operations on [`Writer`](crate::Writer) and
/// [`Reader`](crate::Reader).
#[derive(Debug, Error)]
pub enum IndexError {
    /// An underlying file operation (open, read, write, seek, sync) failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A [`Reader`](crate::Reader) was opened against a path that does not exist.
    #[error("index file not found: {path}")]
    NotFound { path: PathBuf },

    /// The index file's contents do not follow the chunk record layout: a
    /// truncated record, a zero-length text blob, or a suffix-array length
    /// that does not match `4 * text_len`.
    #[error("corrupt index: {reason}")]
    CorruptIndex { reason: String },

    /// A chunk's text blob would exceed the 32-bit offset range that the
    /// suffix array encodes positions in.
    #[error("chunk of {chunk_len} bytes exceeds the 2^32 byte size limit")]
    SizeLimit { chunk_len: u64 },

    /// A caller-supplied argument violates a documented precondition (a
    /// zero threshold, an entry containing the sentinel byte, and so on).
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },
}

/// A specialized [`Result`](std::result::Result) for `subdex` operations.
pub type Result<T> = std::result::Result<T, IndexError>;
