//! # lectern
//!
//! A small library for reading the epub format.
//!
//! An epub is a zip archive bundling a package document (`.opf`) with the
//! content it describes. Opening a [`Book`] locates that package document
//! through the well-known `META-INF/container.xml` bootstrap entry, parses
//! its metadata, manifest, and spine, and materializes one [`Chapter`] per
//! spine entry, in reading order.
//!
//! ## Examples
//! Opening and reading an epub:
//! ```
//! # use lectern::errors::BookResult;
//! use lectern::Book;
//!
//! # fn main() -> BookResult<()> {
//! let book = Book::open("tests/ebooks/sample_epub")?;
//!
//! // Retrieving a metadata field
//! assert_eq!(Some("The Lighthouse Keeper"), book.metadata_field("title"));
//!
//! // Printing the title of each chapter, in spine order
//! for chapter in book.chapters() {
//!     println!("{}", chapter.title()?);
//! }
//! # Ok(())
//! # }
//! ```
//! Accessing the manifest and spine directly:
//! ```
//! # use lectern::errors::BookResult;
//! # use lectern::Book;
//! # fn main() -> BookResult<()> {
//! # let book = Book::open("tests/ebooks/sample_epub")?;
//! let item = book.manifest_item("c1").unwrap();
//!
//! assert_eq!("c1.xhtml", item.href());
//! assert_eq!("application/xhtml+xml", item.media_type());
//! assert_eq!("c1", book.spine()[0]);
//! # Ok(())
//! # }
//! ```

mod archive;
mod book;
mod chapter;
mod consts;
pub mod errors;
mod parser;
mod util;

pub use self::book::{Book, ManifestItem};
pub use self::chapter::Chapter;
