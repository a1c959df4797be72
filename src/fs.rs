//! Filesystem access used by the tree walker and the content classifier.
//!
//! The walker only needs directory enumeration, `lstat`/`stat`-style
//! metadata, canonicalization and reading the ignore file. The classifier
//! adds bounded and full reads. [`OsFs`] forwards to `std::fs`; other
//! implementations can wrap it to inject failures.

use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// What kind of entry a path refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    Symlink,
}

/// The subset of metadata the walker cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryMetadata {
    pub kind: EntryKind,
    pub len: u64,
}

impl From<fs::Metadata> for EntryMetadata {
    fn from(meta: fs::Metadata) -> Self {
        let file_type = meta.file_type();
        let kind = if file_type.is_symlink() {
            EntryKind::Symlink
        } else if file_type.is_dir() {
            EntryKind::Directory
        } else {
            EntryKind::File
        };
        Self {
            kind,
            len: meta.len(),
        }
    }
}

/// One name returned by [`FileSystem::read_dir`].
///
/// `kind` is the entry's own type as reported by the directory listing
/// (symlinks are not followed). It is `None` when the platform could not
/// report it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntryInfo {
    pub name: String,
    pub kind: Option<EntryKind>,
}

pub trait FileSystem {
    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntryInfo>>;
    /// Metadata without following a trailing symlink.
    fn symlink_metadata(&self, path: &Path) -> io::Result<EntryMetadata>;
    /// Metadata of the final target.
    fn metadata(&self, path: &Path) -> io::Result<EntryMetadata>;
    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf>;
    fn read_to_string(&self, path: &Path) -> io::Result<String>;
    /// At most `limit` bytes from the start of the file.
    fn read_prefix(&self, path: &Path, limit: u64) -> io::Result<Vec<u8>>;
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;
}

/// The real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFs;

impl FileSystem for OsFs {
    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntryInfo>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(path)? {
            let entry = match entry {
                Ok(entry) => entry,
                Err(_e) => {
                    #[cfg(feature = "logging")]
                    tracing::debug!("Unreadable entry in {}: {}", path.display(), _e);
                    continue;
                }
            };
            let kind = entry.file_type().ok().map(|t| {
                if t.is_symlink() {
                    EntryKind::Symlink
                } else if t.is_dir() {
                    EntryKind::Directory
                } else {
                    EntryKind::File
                }
            });
            entries.push(DirEntryInfo {
                name: entry.file_name().to_string_lossy().into_owned(),
                kind,
            });
        }
        Ok(entries)
    }

    fn symlink_metadata(&self, path: &Path) -> io::Result<EntryMetadata> {
        fs::symlink_metadata(path).map(EntryMetadata::from)
    }

    fn metadata(&self, path: &Path) -> io::Result<EntryMetadata> {
        fs::metadata(path).map(EntryMetadata::from)
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        fs::canonicalize(path)
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }

    fn read_prefix(&self, path: &Path, limit: u64) -> io::Result<Vec<u8>> {
        let file = File::open(path)?;
        let mut buf = Vec::with_capacity(limit.min(64 * 1024) as usize);
        file.take(limit).read_to_end(&mut buf)?;
        Ok(buf)
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path)
    }
}

/// Node-level error text for an I/O failure.
pub(crate) fn describe_io_error(err: &io::Error) -> String {
    match err.kind() {
        io::ErrorKind::PermissionDenied => "Permission denied".to_string(),
        io::ErrorKind::NotFound => "Path not found".to_string(),
        _ => err.to_string(),
    }
}
