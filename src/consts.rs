// Paths
pub(crate) const CONTAINER: &str = "META-INF/container.xml"; // Used to identify container

// Container elements
pub(crate) const ROOT_FILE: &[u8] = b"rootfile";

// Container attributes
pub(crate) const FULL_PATH: &str = "full-path";

// Package sections
pub(crate) const METADATA: &[u8] = b"metadata";
pub(crate) const MANIFEST: &[u8] = b"manifest";
pub(crate) const SPINE: &[u8] = b"spine";

// Package attributes
pub(crate) const UNIQUE_ID: &str = "unique-identifier";
pub(crate) const ID: &str = "id";
pub(crate) const HREF: &str = "href";
pub(crate) const MEDIA_TYPE: &str = "media-type";
pub(crate) const IDREF: &str = "idref";

// Chapter elements
pub(crate) const TITLE: &[u8] = b"title";
