mod container;
mod package;

pub(crate) use container::locate_package;
pub(crate) use package::parse_package;

use crate::errors::FormatError;
use quick_xml::NsReader;
use quick_xml::events::{BytesRef, BytesStart, BytesText, Event};
use quick_xml::name::ResolveResult;
use std::error::Error;
use std::io;

pub(crate) type ParserResult<T> = Result<T, FormatError>;

/// Wraps an internal parser error without losing its type.
pub(crate) fn unparsable(error: impl Error + Send + Sync + 'static) -> FormatError {
    FormatError::DocumentParse(Box::new(error))
}

pub(crate) fn premature_eof() -> FormatError {
    unparsable(io::Error::from(io::ErrorKind::UnexpectedEof))
}

/// Returns the raw value of the attribute `name` on `el`, if present.
pub(crate) fn attribute(el: &BytesStart, name: &str) -> ParserResult<Option<String>> {
    el.try_get_attribute(name)
        .map(|attr| attr.map(|attr| String::from_utf8_lossy(&attr.value).into_owned()))
        .map_err(unparsable)
}

/// The namespace of the current element as an owned buffer,
/// or [`None`] when it resolves to no binding.
pub(crate) fn resolved_namespace(resolve: ResolveResult) -> Option<Vec<u8>> {
    match resolve {
        ResolveResult::Bound(ns) => Some(ns.into_inner().to_vec()),
        _ => None,
    }
}

/// Decoded text content, falling back to lossy conversion for
/// undecodable byte sequences.
pub(crate) fn decoded_text(text: &BytesText) -> String {
    text.decode()
        .unwrap_or_else(|_| String::from_utf8_lossy(text.as_ref()))
        .into_owned()
}

/// Resolves a general entity reference to the text it stands for:
/// character references and the predefined XML entities.
///
/// An unrecognized entity is reproduced literally.
pub(crate) fn resolve_reference(reference: &BytesRef) -> ParserResult<String> {
    if let Some(ch) = reference.resolve_char_ref().map_err(unparsable)? {
        return Ok(ch.to_string());
    }

    let name = reference
        .decode()
        .unwrap_or_else(|_| String::from_utf8_lossy(reference.as_ref()));

    Ok(match name.as_ref() {
        "amp" => "&".to_string(),
        "lt" => "<".to_string(),
        "gt" => ">".to_string(),
        "quot" => "\"".to_string(),
        "apos" => "'".to_string(),
        _ => format!("&{name};"),
    })
}

/// Collects the text content of the element opened by `start`,
/// consuming events up to and including its end tag.
///
/// Nested markup contributes its text; surrounding whitespace is trimmed.
pub(crate) fn collect_text(
    reader: &mut NsReader<&[u8]>,
    start: &BytesStart,
) -> ParserResult<String> {
    let mut value = String::new();
    let mut depth = 0usize;

    loop {
        match reader.read_event().map_err(unparsable)? {
            Event::Start(el) if el.name() == start.name() => depth += 1,
            Event::End(el) if el.name() == start.name() => {
                if depth == 0 {
                    break;
                }
                depth -= 1;
            }
            Event::Text(text) => value.push_str(&decoded_text(&text)),
            Event::GeneralRef(reference) => value.push_str(&resolve_reference(&reference)?),
            Event::CData(cdata) => value.push_str(&String::from_utf8_lossy(cdata.as_ref())),
            Event::Eof => return Err(premature_eof()),
            _ => {}
        }
    }

    Ok(value.trim().to_string())
}
