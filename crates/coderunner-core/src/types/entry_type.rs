//! Archive entry model shared by the ZIP and TAR readers.

use std::path::PathBuf;

/// Kind of an archive entry.
///
/// The extractor handles exactly these three cases; anything the decoder
/// reports that is not a directory or a regular file is `Unsupported` and
/// aborts extraction.
///
/// # Examples
///
/// ```
/// use coderunner_core::types::EntryKind;
///
/// assert!(EntryKind::File.is_file());
/// assert!(!EntryKind::Unsupported("symlink").is_directory());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// Directory entry.
    Directory,

    /// Regular file entry.
    File,

    /// Any other entry (symlink, hardlink, device, fifo, ...).
    ///
    /// Carries a short name of the kind for error reporting.
    Unsupported(&'static str),
}

impl EntryKind {
    /// Returns `true` if this is a regular file.
    #[must_use]
    pub const fn is_file(&self) -> bool {
        matches!(self, Self::File)
    }

    /// Returns `true` if this is a directory.
    #[must_use]
    pub const fn is_directory(&self) -> bool {
        matches!(self, Self::Directory)
    }

    /// Classifies a TAR entry from its type flag and stored name.
    ///
    /// Old-style headers mark directories only by a trailing `/` on a
    /// regular entry, so such entries are treated as directories.
    #[must_use]
    pub fn from_tar(entry_type: tar::EntryType, name: &[u8]) -> Self {
        match entry_type {
            tar::EntryType::Regular if name.ends_with(b"/") => Self::Directory,
            tar::EntryType::Regular | tar::EntryType::Continuous => Self::File,
            tar::EntryType::Directory => Self::Directory,
            tar::EntryType::Symlink => Self::Unsupported("symlink"),
            tar::EntryType::Link => Self::Unsupported("hardlink"),
            tar::EntryType::Char => Self::Unsupported("character device"),
            tar::EntryType::Block => Self::Unsupported("block device"),
            tar::EntryType::Fifo => Self::Unsupported("fifo"),
            _ => Self::Unsupported("unknown"),
        }
    }
}

/// One archive entry as handed to the extractor.
///
/// `path` is the name exactly as stored in the archive; it has not been
/// validated. `content` streams the entry's data and is only read for
/// regular files.
#[derive(Debug)]
pub struct ArchiveEntry<R> {
    /// Relative path as stored in the archive.
    pub path: PathBuf,
    /// Entry kind.
    pub kind: EntryKind,
    /// Unix permission bits, if the archive records them.
    pub mode: Option<u32>,
    /// Uncompressed size in bytes.
    pub size: u64,
    /// Content stream.
    pub content: R,
}
