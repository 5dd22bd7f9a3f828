use crate::archive::zip::ZipArchive;
use crate::archive::{self, Archive};
use crate::chapter::{self, Chapter};
use crate::errors::BookResult;
use crate::parser;
use crate::util;
use std::collections::HashMap;
use std::fmt::{Debug, Formatter};
use std::io::{Read, Seek};
use std::path::Path;

/// An epub, parsed into an immutable, read-only view.
///
/// Provides access to the following contents:
/// - metadata: field name to text value
/// - manifest: item id to [`ManifestItem`] (href and media type)
/// - spine: the canonical reading-order sequence of item ids
/// - [`Chapter`]: one materialized content section per spine entry
///
/// Construction fails fast: the first missing or malformed piece aborts
/// with an error and no partial book is ever produced. The underlying
/// archive is only held during construction; a constructed book is plain
/// owned data and safe to share between readers.
///
/// # Examples
/// - Reading the contents of an epub:
/// ```
/// # use lectern::errors::BookResult;
/// # use lectern::Book;
/// # fn main() -> BookResult<()> {
/// let book = Book::open("tests/ebooks/sample_epub")?;
///
/// assert_eq!(Some("The Lighthouse Keeper"), book.metadata_field("title"));
///
/// for chapter in book.chapters() {
///     println!("{}: {}", chapter.path(), chapter.title()?);
/// }
/// # Ok(())
/// # }
/// ```
pub struct Book {
    package_path: String,
    identifier: Option<String>,
    metadata: HashMap<String, String>,
    manifest: HashMap<String, ManifestItem>,
    spine: Vec<String>,
    chapters: Vec<Chapter>,
}

impl Book {
    /// Opens a [`Book`] from the given [`Path`].
    ///
    /// The provided path may be an epub **file** or a **directory**
    /// containing the contents of an unzipped epub.
    ///
    /// # Errors
    /// - [`ArchiveError`](crate::errors::BookError::Archive):
    ///   Missing or unreadable archive content.
    /// - [`FormatError`](crate::errors::BookError::Format):
    ///   Malformed container or package content.
    ///
    /// # See Also
    /// - [`Self::read`] to open from any byte source.
    pub fn open(path: impl AsRef<Path>) -> BookResult<Self> {
        let mut archive = archive::open_archive(path.as_ref())?;

        Self::from_archive(archive.as_mut())
    }

    /// Opens a [`Book`] from any implementation of [`Read`] + [`Seek`]
    /// holding a zipped epub.
    ///
    /// # Errors
    /// See [`Self::open`].
    ///
    /// # Examples
    /// - Opening from a [`Cursor`](std::io::Cursor) over bytes in memory:
    /// ```no_run
    /// # use lectern::Book;
    /// # fn main() -> lectern::errors::BookResult<()> {
    /// # let epub_bytes: Vec<u8> = Vec::new();
    /// let book = Book::read(std::io::Cursor::new(epub_bytes))?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn read<R: Read + Seek>(reader: R) -> BookResult<Self> {
        let mut archive = ZipArchive::new(reader, None)?;

        Self::from_archive(&mut archive)
    }

    /// Linear construction: locate the package document, parse its three
    /// sections, then materialize one chapter per spine entry.
    ///
    /// The archive handle is dropped by the caller on every exit path,
    /// including failure partway through.
    fn from_archive(archive: &mut dyn Archive) -> BookResult<Self> {
        let package_path = parser::locate_package(archive)?;
        let base_dir = util::parent(&package_path).to_string();

        let package = archive.read_entry(&util::decode(&package_path))?;
        let data = parser::parse_package(&package)?;

        let chapters = chapter::resolve_chapters(archive, &base_dir, &data.manifest, &data.spine)?;

        Ok(Self {
            package_path,
            identifier: data.identifier,
            metadata: data.metadata,
            manifest: data.manifest,
            spine: data.spine,
            chapters,
        })
    }

    /// The package root's `unique-identifier` attribute: the canonical
    /// metadata key naming the book's identifier.
    ///
    /// [`None`] when the package root carries no such attribute.
    ///
    /// # See Also
    /// - [`Self::identifier_value`] for the metadata value it points to.
    pub fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref()
    }

    /// The metadata value recorded under the [`Self::identifier`] key,
    /// if both the key and the field exist.
    pub fn identifier_value(&self) -> Option<&str> {
        self.metadata_field(self.identifier.as_deref()?)
    }

    /// Metadata fields: bare field name (namespace stripped) to text value.
    ///
    /// A field repeated within the package keeps its last occurrence.
    pub fn metadata(&self) -> &HashMap<String, String> {
        &self.metadata
    }

    /// Returns the metadata value for `name`, or [`None`] if not recorded.
    pub fn metadata_field(&self, name: &str) -> Option<&str> {
        self.metadata.get(name).map(String::as_str)
    }

    /// Manifest items keyed by their `id`.
    pub fn manifest(&self) -> &HashMap<String, ManifestItem> {
        &self.manifest
    }

    /// Returns the [`ManifestItem`] matching the given `id`,
    /// or [`None`] if not found.
    pub fn manifest_item(&self, id: &str) -> Option<&ManifestItem> {
        self.manifest.get(id)
    }

    /// The reading order: manifest item ids in document order,
    /// duplicates permitted.
    pub fn spine(&self) -> &[String] {
        &self.spine
    }

    /// One [`Chapter`] per spine entry, in spine order.
    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    /// The archive-relative location of the package `.opf` file,
    /// as recorded by the bootstrap entry.
    pub fn package_path(&self) -> &str {
        &self.package_path
    }

    /// The directory [`Self::package_path`] resides in.
    ///
    /// Manifest hrefs are resolved relative to this directory.
    pub fn package_directory(&self) -> &str {
        util::parent(&self.package_path)
    }
}

impl Debug for Book {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> std::fmt::Result {
        fmt.debug_struct("Book")
            .field("package_path", &self.package_path)
            .field("identifier", &self.identifier)
            .field("metadata", &self.metadata)
            .field("manifest", &self.manifest)
            .field("spine", &self.spine)
            .field("chapters", &self.chapters)
            .finish()
    }
}

/// A manifest entry: where an item lives within the archive
/// (relative to the package directory) and what media type it carries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ManifestItem {
    href: String,
    media_type: String,
}

impl ManifestItem {
    pub(crate) fn new(href: String, media_type: String) -> Self {
        Self { href, media_type }
    }

    /// The item's location, relative to the package directory,
    /// as recorded (percent-encoding preserved).
    pub fn href(&self) -> &str {
        &self.href
    }

    /// The item's media type, or `""` when the package omitted it.
    pub fn media_type(&self) -> &str {
        &self.media_type
    }
}
