use crate::book::ManifestItem;
use crate::consts;
use crate::errors::FormatError;
use crate::parser::{self, ParserResult};
use quick_xml::NsReader;
use quick_xml::events::{BytesStart, Event};
use std::collections::HashMap;

/// Everything the package `.opf` document contributes to a
/// [`Book`](crate::Book).
#[derive(Debug)]
pub(crate) struct PackageData {
    /// The package root's `unique-identifier` attribute:
    /// the canonical metadata key, not its value.
    pub(crate) identifier: Option<String>,
    pub(crate) metadata: HashMap<String, String>,
    pub(crate) manifest: HashMap<String, ManifestItem>,
    pub(crate) spine: Vec<String>,
}

/// Parses the package document into its metadata, manifest,
/// and spine sections.
///
/// The three sections are direct children of the package root, matched by
/// local name within the root's own namespace. Any section absent at the
/// end of the document is a fatal [`FormatError::MissingSection`].
pub(crate) fn parse_package(data: &[u8]) -> ParserResult<PackageData> {
    let mut reader = NsReader::from_reader(data);
    // `None` until the package root has been seen; the root may itself
    // resolve to no namespace, hence the nesting.
    let mut root_ns: Option<Option<Vec<u8>>> = None;
    let mut identifier = None;
    let mut metadata = None;
    let mut manifest = None;
    let mut spine = None;

    loop {
        let (resolve, event) = reader.read_resolved_event().map_err(parser::unparsable)?;
        let element_ns = parser::resolved_namespace(resolve);

        match event {
            Event::Start(el) => match &root_ns {
                None => {
                    identifier = parser::attribute(&el, consts::UNIQUE_ID)?;
                    root_ns = Some(element_ns);
                }
                Some(package_ns) if *package_ns == element_ns => {
                    match el.local_name().as_ref() {
                        consts::METADATA => {
                            metadata.replace(parse_metadata(&mut reader)?);
                        }
                        consts::MANIFEST => {
                            manifest.replace(parse_manifest(&mut reader)?);
                        }
                        consts::SPINE => {
                            spine.replace(parse_spine(&mut reader)?);
                        }
                        _ => skip(&mut reader, &el)?,
                    }
                }
                Some(_) => skip(&mut reader, &el)?,
            },
            Event::Empty(el) if root_ns.as_ref() == Some(&element_ns) => {
                // A self-closed section is present but empty
                match el.local_name().as_ref() {
                    consts::METADATA => {
                        metadata.replace(HashMap::new());
                    }
                    consts::MANIFEST => {
                        manifest.replace(HashMap::new());
                    }
                    consts::SPINE => {
                        spine.replace(Vec::new());
                    }
                    _ => {}
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(PackageData {
        identifier,
        metadata: metadata.ok_or(FormatError::MissingSection("metadata"))?,
        manifest: manifest.ok_or(FormatError::MissingSection("manifest"))?,
        spine: spine.ok_or(FormatError::MissingSection("spine"))?,
    })
}

/// Consumes the subtree opened by `el`.
fn skip(reader: &mut NsReader<&[u8]>, el: &BytesStart) -> ParserResult<()> {
    reader
        .read_to_end(el.name())
        .map(|_| ())
        .map_err(parser::unparsable)
}

/// Every direct child element contributes `local name -> text`;
/// a repeated field name overwrites the previous value.
fn parse_metadata(reader: &mut NsReader<&[u8]>) -> ParserResult<HashMap<String, String>> {
    let mut fields = HashMap::new();

    loop {
        match reader.read_event().map_err(parser::unparsable)? {
            Event::Start(el) => {
                let name = local_name(&el);
                let text = parser::collect_text(reader, &el)?;
                fields.insert(name, text);
            }
            Event::Empty(el) => {
                fields.insert(local_name(&el), String::new());
            }
            Event::End(el) if el.local_name().as_ref() == consts::METADATA => break,
            Event::Eof => return Err(parser::premature_eof()),
            _ => {}
        }
    }
    Ok(fields)
}

/// Every direct child element contributes an [`ManifestItem`] keyed by its
/// `id`; `id` and `href` are required, a missing `media-type` is recorded
/// as empty.
fn parse_manifest(reader: &mut NsReader<&[u8]>) -> ParserResult<HashMap<String, ManifestItem>> {
    let mut items = HashMap::new();

    loop {
        let event = reader.read_event().map_err(parser::unparsable)?;

        match &event {
            Event::Start(el) | Event::Empty(el) => {
                let Some(id) = parser::attribute(el, consts::ID)? else {
                    return Err(FormatError::MalformedManifestItem(
                        "item missing its `id` attribute".to_string(),
                    ));
                };
                let Some(href) = parser::attribute(el, consts::HREF)? else {
                    return Err(FormatError::MalformedManifestItem(format!(
                        "item `{id}` missing its `href` attribute"
                    )));
                };
                let media_type = parser::attribute(el, consts::MEDIA_TYPE)?.unwrap_or_default();

                items.insert(id, ManifestItem::new(href, media_type));

                // Only direct children count
                if let Event::Start(el) = &event {
                    skip(reader, el)?;
                }
            }
            Event::End(el) if el.local_name().as_ref() == consts::MANIFEST => break,
            Event::Eof => return Err(parser::premature_eof()),
            _ => {}
        }
    }
    Ok(items)
}

/// Every direct child element appends its `idref` in document order;
/// duplicates are preserved.
fn parse_spine(reader: &mut NsReader<&[u8]>) -> ParserResult<Vec<String>> {
    let mut idrefs = Vec::new();

    loop {
        let event = reader.read_event().map_err(parser::unparsable)?;

        match &event {
            Event::Start(el) | Event::Empty(el) => {
                let idref = parser::attribute(el, consts::IDREF)?
                    .ok_or_else(|| FormatError::MissingAttribute("itemref[idref]".to_string()))?;
                idrefs.push(idref);

                // Only direct children count
                if let Event::Start(el) = &event {
                    skip(reader, el)?;
                }
            }
            Event::End(el) if el.local_name().as_ref() == consts::SPINE => break,
            Event::Eof => return Err(parser::premature_eof()),
            _ => {}
        }
    }
    Ok(idrefs)
}

fn local_name(el: &BytesStart) -> String {
    String::from_utf8_lossy(el.local_name().as_ref()).into_owned()
}

#[cfg(test)]
mod tests {
    use super::parse_package;
    use crate::errors::FormatError;

    #[test]
    fn test_prefixed_package_namespace() {
        // Sections qualified by a prefixed binding resolve all the same
        let package = r#"<opf:package xmlns:opf="http://www.idpf.org/2007/opf"
                unique-identifier="pub-id">
            <opf:metadata xmlns:dc="http://purl.org/dc/elements/1.1/">
                <dc:title>Qualified</dc:title>
            </opf:metadata>
            <opf:manifest>
                <opf:item id="c1" href="c1.xhtml" media-type="application/xhtml+xml"/>
            </opf:manifest>
            <opf:spine>
                <opf:itemref idref="c1"/>
            </opf:spine>
        </opf:package>"#;

        let data = parse_package(package.as_bytes()).unwrap();

        assert_eq!(Some("pub-id"), data.identifier.as_deref());
        assert_eq!(Some("Qualified"), data.metadata.get("title").map(String::as_str));
        assert_eq!("c1.xhtml", data.manifest["c1"].href());
        assert_eq!(["c1"], data.spine.as_slice());
    }

    #[test]
    fn test_sections_outside_root_namespace_are_skipped() {
        let package = r#"<package xmlns="http://www.idpf.org/2007/opf">
            <metadata/>
            <manifest/>
            <spine xmlns="http://example.com/not-opf">
                <itemref idref="c1"/>
            </spine>
        </package>"#;

        let error = parse_package(package.as_bytes()).unwrap_err();
        assert!(matches!(error, FormatError::MissingSection("spine")));
    }

    #[test]
    fn test_metadata_empty_and_repeated_fields() {
        let package = r#"<package xmlns="http://www.idpf.org/2007/opf">
            <metadata xmlns:dc="http://purl.org/dc/elements/1.1/">
                <dc:title>First</dc:title>
                <dc:title>Second</dc:title>
                <dc:description/>
            </metadata>
            <manifest/>
            <spine/>
        </package>"#;

        let data = parse_package(package.as_bytes()).unwrap();

        // Last write wins on a repeated field
        assert_eq!(Some("Second"), data.metadata.get("title").map(String::as_str));
        assert_eq!(Some(""), data.metadata.get("description").map(String::as_str));
    }

    #[test]
    fn test_metadata_resolves_entity_references() {
        let package = r#"<package xmlns="http://www.idpf.org/2007/opf">
            <metadata xmlns:dc="http://purl.org/dc/elements/1.1/">
                <dc:title>Crime &amp; Punishment</dc:title>
                <dc:rights>&#169; 1866</dc:rights>
            </metadata>
            <manifest/>
            <spine/>
        </package>"#;

        let data = parse_package(package.as_bytes()).unwrap();

        assert_eq!(
            Some("Crime & Punishment"),
            data.metadata.get("title").map(String::as_str),
        );
        assert_eq!(Some("© 1866"), data.metadata.get("rights").map(String::as_str));
    }

    #[test]
    fn test_metadata_nested_markup_contributes_text() {
        let package = r#"<package xmlns="http://www.idpf.org/2007/opf">
            <metadata xmlns:dc="http://purl.org/dc/elements/1.1/">
                <dc:rights>All rights <span>reserved</span></dc:rights>
            </metadata>
            <manifest/>
            <spine/>
        </package>"#;

        let data = parse_package(package.as_bytes()).unwrap();
        assert_eq!(
            Some("All rights reserved"),
            data.metadata.get("rights").map(String::as_str),
        );
    }

    #[test]
    fn test_manifest_media_type_defaults_to_empty() {
        let package = r#"<package xmlns="http://www.idpf.org/2007/opf">
            <metadata/>
            <manifest>
                <item id="c1" href="c1.xhtml"/>
            </manifest>
            <spine/>
        </package>"#;

        let data = parse_package(package.as_bytes()).unwrap();
        assert_eq!("", data.manifest["c1"].media_type());
    }

    #[test]
    fn test_manifest_item_missing_href() {
        let package = r#"<package xmlns="http://www.idpf.org/2007/opf">
            <metadata/>
            <manifest>
                <item id="c1" media-type="application/xhtml+xml"/>
            </manifest>
            <spine/>
        </package>"#;

        let error = parse_package(package.as_bytes()).unwrap_err();
        assert!(matches!(error, FormatError::MalformedManifestItem(_)));
    }

    #[test]
    fn test_spine_preserves_order_and_duplicates() {
        let package = r#"<package xmlns="http://www.idpf.org/2007/opf">
            <metadata/>
            <manifest>
                <item id="c1" href="c1.xhtml" media-type="application/xhtml+xml"/>
                <item id="c2" href="c2.xhtml" media-type="application/xhtml+xml"/>
            </manifest>
            <spine>
                <itemref idref="c2"/>
                <itemref idref="c1"/>
                <itemref idref="c2"/>
            </spine>
        </package>"#;

        let data = parse_package(package.as_bytes()).unwrap();
        assert_eq!(["c2", "c1", "c2"], data.spine.as_slice());
    }

    #[test]
    fn test_spine_entry_missing_idref() {
        let package = r#"<package xmlns="http://www.idpf.org/2007/opf">
            <metadata/>
            <manifest/>
            <spine>
                <itemref/>
            </spine>
        </package>"#;

        let error = parse_package(package.as_bytes()).unwrap_err();
        assert!(matches!(error, FormatError::MissingAttribute(_)));
    }
}
