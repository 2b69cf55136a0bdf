//! Content digests for change detection.

use std::io;
use std::path::Path;

/// CRC-32 of the content plus its length.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Digest {
    pub crc: u32,
    pub len: u64,
}

impl Digest {
    pub fn of(bytes: &[u8]) -> Self {
        Self {
            crc: crc32fast::hash(bytes),
            len: bytes.len() as u64,
        }
    }

    /// Digest of the file at `path`, or `None` if it does not exist.
    pub fn of_file(path: &Path) -> io::Result<Option<Self>> {
        Ok(read_existing(path)?.map(|bytes| Self::of(&bytes)))
    }
}

/// Contents of the file at `path`, or `None` if it does not exist.
pub fn read_existing(path: &Path) -> io::Result<Option<Vec<u8>>> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

/// Whether the file at `path` holds exactly `content`.
///
/// Digests rule out most changes cheaply; equal digests still get a byte comparison.
pub fn holds(path: &Path, content: &[u8]) -> io::Result<bool> {
    Ok(match read_existing(path)? {
        Some(existing) => Digest::of(&existing) == Digest::of(content) && existing == content,
        None => false,
    })
}
