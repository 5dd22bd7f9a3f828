mod directory;
pub(crate) mod errors;
pub(crate) mod zip;

use crate::archive::directory::DirectoryArchive;
use crate::archive::errors::{ArchiveError, ArchiveResult};
use crate::archive::zip::ZipArchive;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Random-access read-by-name over an epub container.
///
/// Entry paths are archive-relative and `/`-separated,
/// e.g. `META-INF/container.xml`.
pub(crate) trait Archive {
    fn read_entry(&mut self, path: &str) -> ArchiveResult<Vec<u8>>;
}

/// Unzip the file if it is not a directory.
///
/// If it is, the contents can be accessed directly,
/// which makes using a zip file unnecessary.
pub(crate) fn open_archive(path: &Path) -> ArchiveResult<Box<dyn Archive>> {
    Ok(if path.is_file() {
        let file = File::open(path).map_err(|source| ArchiveError::UnreadableArchive {
            source,
            path: Some(path.to_path_buf()),
        })?;
        Box::new(ZipArchive::new(BufReader::new(file), Some(path))?)
    } else {
        Box::new(DirectoryArchive::new(path)?)
    })
}
