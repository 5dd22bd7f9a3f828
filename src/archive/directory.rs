use crate::archive::Archive;
use crate::archive::errors::{ArchiveError, ArchiveResult};
use std::path::{Path, PathBuf};
use std::{fs, io};

/// An unzipped epub accessed directly from the filesystem.
#[derive(Debug)]
pub(crate) struct DirectoryArchive(PathBuf);

impl DirectoryArchive {
    pub(crate) fn new(dir: &Path) -> ArchiveResult<Self> {
        match dir.canonicalize() {
            Ok(root) if root.is_dir() => Ok(Self(root)),
            Ok(_) => Err(ArchiveError::UnreadableArchive {
                path: Some(dir.to_path_buf()),
                source: io::Error::from(io::ErrorKind::NotADirectory),
            }),
            Err(source) => Err(ArchiveError::UnreadableArchive {
                path: Some(dir.to_path_buf()),
                source,
            }),
        }
    }

    fn get_path(&self, path: &str) -> ArchiveResult<PathBuf> {
        let missing = || ArchiveError::MissingEntry {
            name: path.to_string(),
        };
        let resolved = self.0.join(path).canonicalize().map_err(|_| missing())?;

        // Path traversal mitigation
        if resolved.starts_with(&self.0) && resolved.is_file() {
            Ok(resolved)
        } else {
            Err(missing())
        }
    }
}

impl Archive for DirectoryArchive {
    fn read_entry(&mut self, path: &str) -> ArchiveResult<Vec<u8>> {
        fs::read(self.get_path(path)?).map_err(|source| ArchiveError::CannotRead {
            source,
            name: path.to_string(),
        })
    }
}
