//! Error-related types for a [`Book`](crate::Book).

pub use crate::archive::errors::{ArchiveError, ArchiveResult};
use std::error::Error;

/// Alias for `Result<T, BookError>`.
pub type BookResult<T> = Result<T, BookError>;

/// Unified error type.
/// Possible errors when constructing or reading a [`Book`](crate::Book).
#[non_exhaustive]
#[derive(thiserror::Error, Debug)]
pub enum BookError {
    /// Entry access within the container archive has failed.
    #[error(transparent)]
    Archive(#[from] ArchiveError),

    /// The container or package content is missing or malformed.
    #[error(transparent)]
    Format(#[from] FormatError),
}

/// Possible format errors for a [`Book`](crate::Book).
///
/// Every parsing stage fails fast: the first error encountered aborts
/// [`Book`](crate::Book) construction entirely. The one exception is
/// [`NoTitleFound`](FormatError::NoTitleFound), which is scoped to an
/// individual [`Chapter`](crate::Chapter) and does not invalidate the
/// rest of the book.
#[non_exhaustive]
#[derive(thiserror::Error, Debug)]
pub enum FormatError {
    /// The archive does not contain the fixed `META-INF/container.xml`
    /// bootstrap entry.
    #[error("missing `META-INF/container.xml` bootstrap entry")]
    MissingBootstrapEntry,

    /// The bootstrap entry exists but carries no usable `rootfile`
    /// declaration pointing to the package document.
    ///
    /// Error Source: `META-INF/container.xml`
    #[error("malformed `META-INF/container.xml`: {0}")]
    MalformedBootstrap(String),

    /// The document root declares no default namespace,
    /// so its elements cannot be resolved.
    ///
    /// Error Source: `META-INF/container.xml`
    #[error("no default namespace declared on the document root")]
    UnexpectedNamespace,

    /// One of the three required package sections
    /// (`metadata`, `manifest`, `spine`) is absent from the package root.
    ///
    /// Error Source: package `.opf` file
    #[error("missing `{0}` section within the package document")]
    MissingSection(&'static str),

    /// A manifest item is missing its required `id` or `href` attribute.
    ///
    /// Error Source: package `.opf` file
    #[error("malformed manifest item: {0}")]
    MalformedManifestItem(String),

    /// A required attribute is missing from an element.
    ///
    /// Error Source: package `.opf` file
    #[error("required attribute missing: {0}")]
    MissingAttribute(String),

    /// A spine entry references a manifest item id that does not exist.
    ///
    /// Error Source: package `.opf` file
    #[error("spine `idref` references a non-existent manifest item: {0}")]
    DanglingSpineReference(String),

    /// A resolved spine entry points to a path with no archive entry
    /// behind it.
    #[error("no entry `{0}` within the archive for a resolved spine item")]
    MissingContentEntry(String),

    /// A chapter payload contains no `title` element with text content.
    #[error("no `title` element with text content")]
    NoTitleFound,

    /// Document content unexpectedly causes an internal parser error.
    ///
    /// This may originate from malformed content within a file,
    /// such as improper XML.
    #[error(transparent)]
    DocumentParse(#[from] Box<dyn Error + Send + Sync + 'static>),
}
