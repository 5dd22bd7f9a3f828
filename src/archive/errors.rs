use std::io;
use std::path::PathBuf;

/// Alias for `Result<T, ArchiveError>`.
pub type ArchiveResult<T> = Result<T, ArchiveError>;

/// Possible errors from the archive backing a [`Book`](crate::Book).
#[non_exhaustive]
#[derive(thiserror::Error, Debug)]
pub enum ArchiveError {
    /// No entry exists at the requested path within the archive.
    #[error("no entry `{name}` within the archive")]
    MissingEntry {
        /// The archive-relative path of the missing entry.
        name: String,
    },

    /// The entry exists, although reading its content failed, typically I/O.
    #[error("unable to read entry `{name}`: {source}")]
    CannotRead {
        /// The root cause of the error.
        source: io::Error,
        /// The archive-relative path of the unreadable entry.
        name: String,
    },

    /// The archive itself is unreadable due to not existing,
    /// unsupported format, or malformed state.
    ///
    /// This error is thrown **before** any entry is accessed.
    ///
    /// Path *is* [`None`] when the archive was opened from a plain
    /// `R: Read + Seek` via [`Book::read`](crate::Book::read).
    #[error("unreadable archive `{path:?}`: {source}")]
    UnreadableArchive {
        /// The root cause of this error.
        source: io::Error,
        /// The path responsible for triggering the error, if applicable.
        path: Option<PathBuf>,
    },
}
