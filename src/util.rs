use std::borrow::Cow;

/// Directory component of an archive-relative href,
/// or `""` when the href has none.
pub(crate) fn parent(href: &str) -> &str {
    href.rfind('/').map_or("", |index| &href[..index])
}

/// Joins a base directory and a relative href with a single separator.
///
/// Hrefs within a package document are flat relative paths;
/// `.`/`..` segments are not normalized.
pub(crate) fn join(base: &str, href: &str) -> String {
    if base.is_empty() {
        href.to_string()
    } else {
        format!("{base}/{href}")
    }
}

/// Percent-decodes an href for archive entry lookup.
pub(crate) fn decode(href: &str) -> Cow<'_, str> {
    percent_encoding::percent_decode_str(href).decode_utf8_lossy()
}
