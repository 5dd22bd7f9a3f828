use crate::archive::Archive;
use crate::archive::errors::ArchiveError;
use crate::book::ManifestItem;
use crate::consts;
use crate::errors::{BookResult, FormatError};
use crate::parser::{self, ParserResult};
use crate::util;
use quick_xml::Reader;
use quick_xml::events::Event;
use std::collections::HashMap;
use std::fmt::{Debug, Formatter};

/// One unit of reading-order content, backed by one manifest/spine entry.
///
/// A chapter owns its raw byte payload, read once during
/// [`Book`](crate::Book) construction and retained verbatim.
///
/// # Examples
/// ```
/// # use lectern::Book;
/// # fn main() -> lectern::errors::BookResult<()> {
/// let book = Book::open("tests/ebooks/sample_epub")?;
/// let chapter = &book.chapters()[0];
///
/// assert_eq!("OEBPS/c1.xhtml", chapter.path());
/// assert_eq!("I. The Light at Dusk", chapter.title()?);
/// # Ok(())
/// # }
/// ```
pub struct Chapter {
    path: String,
    content: Vec<u8>,
}

impl Chapter {
    pub(crate) fn new(path: String, content: Vec<u8>) -> Self {
        Self { path, content }
    }

    /// The archive-relative path this chapter was resolved from:
    /// the package base directory joined with the manifest `href`.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The raw byte payload, exactly as stored within the archive.
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Derives a display title by parsing the payload as (possibly
    /// tag-soup) HTML and taking the text of the first `title` element
    /// anywhere in the tree.
    ///
    /// Derivation is read-only and idempotent; the payload is never
    /// mutated, so repeated calls yield the same result.
    ///
    /// # Errors
    /// - [`NoTitleFound`](FormatError::NoTitleFound): No `title` element
    ///   exists, or it has no text content.
    /// - [`DocumentParse`](FormatError::DocumentParse): The payload is too
    ///   broken to scan.
    pub fn title(&self) -> BookResult<String> {
        derive_title(&self.content).map_err(Into::into)
    }
}

impl Debug for Chapter {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> std::fmt::Result {
        fmt.debug_struct("Chapter")
            .field("path", &self.path)
            .field("content", &format_args!("{} bytes", self.content.len()))
            .finish()
    }
}

/// Resolves every spine entry to its manifest item, joins the package base
/// directory with the item's href, and reads one chapter payload per entry,
/// in spine order.
///
/// References are checked for all entries up front, so a dangling idref
/// aborts before any content is fetched.
pub(crate) fn resolve_chapters(
    archive: &mut dyn Archive,
    base_dir: &str,
    manifest: &HashMap<String, ManifestItem>,
    spine: &[String],
) -> BookResult<Vec<Chapter>> {
    let mut paths = Vec::with_capacity(spine.len());

    for idref in spine {
        let item = manifest
            .get(idref)
            .ok_or_else(|| FormatError::DanglingSpineReference(idref.clone()))?;
        paths.push(util::join(base_dir, item.href()));
    }

    paths
        .into_iter()
        .map(|path| {
            let content = match archive.read_entry(&util::decode(&path)) {
                Ok(content) => content,
                Err(ArchiveError::MissingEntry { .. }) => {
                    return Err(FormatError::MissingContentEntry(path).into());
                }
                Err(error) => return Err(error.into()),
            };
            Ok(Chapter::new(path, content))
        })
        .collect()
}

fn derive_title(content: &[u8]) -> ParserResult<String> {
    let mut reader = Reader::from_reader(content);
    // Chapter payloads are frequently tag soup
    reader.config_mut().check_end_names = false;

    loop {
        match reader.read_event().map_err(parser::unparsable)? {
            Event::Start(el) if el.local_name().as_ref() == consts::TITLE => {
                return title_text(&mut reader);
            }
            Event::Eof => return Err(FormatError::NoTitleFound),
            _ => {}
        }
    }
}

/// Text up to the closing `title` tag (or end of input, for soup
/// missing the closing tag).
fn title_text(reader: &mut Reader<&[u8]>) -> ParserResult<String> {
    let mut title = String::new();

    loop {
        match reader.read_event().map_err(parser::unparsable)? {
            Event::Text(text) => title.push_str(&parser::decoded_text(&text)),
            Event::GeneralRef(reference) => title.push_str(&parser::resolve_reference(&reference)?),
            Event::CData(cdata) => title.push_str(&String::from_utf8_lossy(cdata.as_ref())),
            Event::End(el) if el.local_name().as_ref() == consts::TITLE => break,
            Event::Eof => break,
            _ => {}
        }
    }

    let title = title.trim();
    if title.is_empty() {
        Err(FormatError::NoTitleFound)
    } else {
        Ok(title.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::Chapter;
    use crate::errors::{BookError, FormatError};

    fn chapter(content: &str) -> Chapter {
        Chapter::new("OEBPS/c1.xhtml".to_string(), content.as_bytes().to_vec())
    }

    #[test]
    fn test_title() {
        let chapter = chapter("<html><head><title>Chapter One</title></head></html>");
        assert_eq!("Chapter One", chapter.title().unwrap());
    }

    #[test]
    fn test_title_is_idempotent() {
        let chapter = chapter("<html><head><title>Chapter One</title></head></html>");
        let content_before = chapter.content().to_vec();

        assert_eq!(chapter.title().unwrap(), chapter.title().unwrap());
        assert_eq!(content_before, chapter.content());
    }

    #[test]
    fn test_title_from_tag_soup() {
        // Unclosed and mismatched tags must not prevent derivation
        let chapter = chapter("<html><head><meta charset='utf-8'></wrong><title>Soup</title>");
        assert_eq!("Soup", chapter.title().unwrap());
    }

    #[test]
    fn test_title_unescapes_entities() {
        let chapter = chapter("<html><head><title>Crime &amp; Punishment</title></head></html>");
        assert_eq!("Crime & Punishment", chapter.title().unwrap());
    }

    #[test]
    fn test_title_resolves_character_references() {
        let chapter = chapter("<html><head><title>Caf&#233; &#x2116; 5</title></head></html>");
        assert_eq!("Café № 5", chapter.title().unwrap());
    }

    #[test]
    fn test_namespaced_title_matches_local_name() {
        let chapter = chapter(r#"<x:html xmlns:x="ns"><x:title>Qualified</x:title></x:html>"#);
        assert_eq!("Qualified", chapter.title().unwrap());
    }

    #[test]
    fn test_no_title_element() {
        let chapter = chapter("<html><head></head><body><p>text</p></body></html>");
        let error = chapter.title().unwrap_err();

        assert!(matches!(
            error,
            BookError::Format(FormatError::NoTitleFound)
        ));
    }

    #[test]
    fn test_empty_title_element() {
        let chapter = chapter("<html><head><title>  </title></head></html>");
        let error = chapter.title().unwrap_err();

        assert!(matches!(
            error,
            BookError::Format(FormatError::NoTitleFound)
        ));
    }
}
