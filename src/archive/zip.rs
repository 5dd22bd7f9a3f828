use crate::archive::Archive;
use crate::archive::errors::{ArchiveError, ArchiveResult};
use std::io::{self, Read, Seek};
use std::path::Path;
use zip::ZipArchive as Zip;
use zip::result::ZipError;

pub(crate) struct ZipArchive<R>(Zip<R>);

impl<R: Read + Seek> ZipArchive<R> {
    /// `reader` (and optional `path` for a more descriptive error message).
    pub(crate) fn new(reader: R, path: Option<&Path>) -> ArchiveResult<Self> {
        Zip::new(reader)
            .map(Self)
            .map_err(|error| ArchiveError::UnreadableArchive {
                source: io::Error::from(error),
                path: path.map(Path::to_path_buf),
            })
    }
}

impl<R: Read + Seek> Archive for ZipArchive<R> {
    fn read_entry(&mut self, path: &str) -> ArchiveResult<Vec<u8>> {
        let mut file = match self.0.by_name(path) {
            Ok(file) => file,
            Err(ZipError::FileNotFound) => {
                return Err(ArchiveError::MissingEntry {
                    name: path.to_string(),
                });
            }
            Err(error) => {
                return Err(ArchiveError::CannotRead {
                    source: io::Error::from(error),
                    name: path.to_string(),
                });
            }
        };
        let mut buf = Vec::new();

        file.read_to_end(&mut buf)
            .map(|_| buf)
            .map_err(|source| ArchiveError::CannotRead {
                source,
                name: path.to_string(),
            })
    }
}
