use crate::archive::Archive;
use crate::archive::errors::ArchiveError;
use crate::consts;
use crate::errors::{BookError, FormatError};
use crate::parser::{self, ParserResult};
use quick_xml::NsReader;
use quick_xml::events::{BytesStart, Event};

/// Reads `META-INF/container.xml` and retrieves the package `.opf`
/// file location.
pub(crate) fn locate_package(archive: &mut dyn Archive) -> Result<String, BookError> {
    let data = match archive.read_entry(consts::CONTAINER) {
        Ok(data) => data,
        Err(ArchiveError::MissingEntry { .. }) => {
            return Err(FormatError::MissingBootstrapEntry.into());
        }
        Err(error) => return Err(error.into()),
    };

    parse_container(&data).map_err(Into::into)
}

/// Extracts the `full-path` attribute of the `rootfile` declaration
/// nested two levels under the container root.
///
/// The root element must carry an unprefixed default namespace;
/// `rootfile` is matched against that same binding.
fn parse_container(data: &[u8]) -> ParserResult<String> {
    let mut reader = NsReader::from_reader(data);
    let mut root_ns: Option<Vec<u8>> = None;
    let mut depth = 0usize;

    loop {
        let (resolve, event) = reader.read_resolved_event().map_err(parser::unparsable)?;
        let element_ns = parser::resolved_namespace(resolve);

        match event {
            Event::Start(el) => {
                match &root_ns {
                    // First element: the container root
                    None => root_ns = Some(require_default_namespace(&el, element_ns)?),
                    Some(container_ns) => {
                        if let Some(full_path) =
                            try_root_file(&el, depth, element_ns.as_deref(), container_ns)?
                        {
                            return Ok(full_path);
                        }
                    }
                }
                depth += 1;
            }
            Event::Empty(el) => {
                if let Some(container_ns) = &root_ns
                    && let Some(full_path) =
                        try_root_file(&el, depth, element_ns.as_deref(), container_ns)?
                {
                    return Ok(full_path);
                }
            }
            Event::End(_) => depth = depth.saturating_sub(1),
            Event::Eof => break,
            _ => {}
        }
    }

    Err(FormatError::MalformedBootstrap(
        "no `rootfile` element within `rootfiles`".to_string(),
    ))
}

fn require_default_namespace(
    root: &BytesStart,
    element_ns: Option<Vec<u8>>,
) -> ParserResult<Vec<u8>> {
    // Resolution depends on exactly one unprefixed default binding
    match element_ns {
        Some(ns) if root.name().prefix().is_none() => Ok(ns),
        _ => Err(FormatError::UnexpectedNamespace),
    }
}

/// The `full-path` of `el`, when `el` is a `rootfile` declaration sitting
/// two levels below the container root within the root's namespace.
fn try_root_file(
    el: &BytesStart,
    depth: usize,
    element_ns: Option<&[u8]>,
    container_ns: &[u8],
) -> ParserResult<Option<String>> {
    if depth != 2
        || el.local_name().as_ref() != consts::ROOT_FILE
        || element_ns != Some(container_ns)
    {
        return Ok(None);
    }

    parser::attribute(el, consts::FULL_PATH)?
        .ok_or_else(|| {
            FormatError::MalformedBootstrap(
                "`rootfile` element missing its `full-path` attribute".to_string(),
            )
        })
        .map(Some)
}
