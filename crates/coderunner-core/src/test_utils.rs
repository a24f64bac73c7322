//! In-memory archive builders for tests and benchmarks.
//!
//! # Panics
//!
//! All functions in this module may panic on I/O errors since they are
//! designed for test use only where panics are acceptable.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::io::Cursor;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use flate2::Compression;
use flate2::write::GzEncoder;
use zip::write::SimpleFileOptions;
use zip::write::ZipWriter;

/// Creates an in-memory TAR archive of regular files with mode 0o644.
#[must_use]
pub fn create_test_tar(entries: Vec<(&str, &[u8])>) -> Vec<u8> {
    entries
        .into_iter()
        .fold(TarTestBuilder::new(), |builder, (path, data)| {
            builder.add_file(path, data)
        })
        .build()
}

/// Creates an in-memory ZIP archive of stored files with mode 0o644.
///
/// Entry names are written verbatim, so traversal names such as
/// `../evil.txt` end up in the archive unchanged.
#[must_use]
pub fn create_test_zip(entries: Vec<(&str, &[u8])>) -> Vec<u8> {
    entries
        .into_iter()
        .fold(ZipTestBuilder::new(), |builder, (path, data)| {
            builder.add_file(path, data)
        })
        .build()
}

/// Builder for TAR test archives.
///
/// # Examples
///
/// ```
/// use coderunner_core::test_utils::TarTestBuilder;
///
/// let tar_gz = TarTestBuilder::new()
///     .add_directory("src/")
///     .add_file_with_mode("src/run.sh", b"#!/bin/sh\n", 0o755)
///     .build_gz();
/// ```
pub struct TarTestBuilder {
    builder: tar::Builder<Vec<u8>>,
}

impl TarTestBuilder {
    /// Creates a new TAR test builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            builder: tar::Builder::new(Vec::new()),
        }
    }

    /// Adds a regular file with mode 0o644.
    #[must_use]
    pub fn add_file(self, path: &str, data: &[u8]) -> Self {
        self.add_file_with_mode(path, data, 0o644)
    }

    /// Adds a regular file with a custom mode.
    #[must_use]
    pub fn add_file_with_mode(mut self, path: &str, data: &[u8], mode: u32) -> Self {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(mode);
        header.set_cksum();
        self.builder.append_data(&mut header, path, data).unwrap();
        self
    }

    /// Adds a directory with mode 0o755.
    #[must_use]
    pub fn add_directory(self, path: &str) -> Self {
        self.add_directory_with_mode(path, 0o755)
    }

    /// Adds a directory with a custom mode.
    #[must_use]
    pub fn add_directory_with_mode(mut self, path: &str, mode: u32) -> Self {
        let mut header = tar::Header::new_gnu();
        header.set_size(0);
        header.set_mode(mode);
        header.set_entry_type(tar::EntryType::Directory);
        header.set_cksum();
        self.builder
            .append_data(&mut header, path, std::io::empty())
            .unwrap();
        self
    }

    /// Adds a symlink.
    #[must_use]
    pub fn add_symlink(mut self, path: &str, target: &str) -> Self {
        let mut header = tar::Header::new_gnu();
        header.set_size(0);
        header.set_mode(0o777);
        header.set_entry_type(tar::EntryType::Symlink);
        header.set_cksum();
        self.builder
            .append_link(&mut header, path, target)
            .unwrap();
        self
    }

    /// Adds a regular file whose name bytes are written into the header
    /// verbatim, bypassing the `tar` crate's own path checks.
    ///
    /// Used to build archives with `..` or absolute names.
    #[must_use]
    pub fn add_raw_file(mut self, name: &str, data: &[u8]) -> Self {
        let mut header = tar::Header::new_old();
        let name_field = &mut header.as_old_mut().name;
        let len = name.len().min(name_field.len());
        name_field[..len].copy_from_slice(&name.as_bytes()[..len]);
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_entry_type(tar::EntryType::Regular);
        header.set_cksum();
        self.builder.append(&header, data).unwrap();
        self
    }

    /// Builds the uncompressed TAR archive.
    #[must_use]
    pub fn build(self) -> Vec<u8> {
        self.builder.into_inner().unwrap()
    }

    /// Builds the archive and gzip-compresses it.
    #[must_use]
    pub fn build_gz(self) -> Vec<u8> {
        gzip(&self.build())
    }
}

impl Default for TarTestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for ZIP test archives.
pub struct ZipTestBuilder {
    writer: ZipWriter<Cursor<Vec<u8>>>,
    method: zip::CompressionMethod,
}

impl ZipTestBuilder {
    /// Creates a new ZIP builder that stores entries uncompressed.
    #[must_use]
    pub fn new() -> Self {
        Self {
            writer: ZipWriter::new(Cursor::new(Vec::new())),
            method: zip::CompressionMethod::Stored,
        }
    }

    /// Deflates entries added after this call.
    #[must_use]
    pub fn deflated(mut self) -> Self {
        self.method = zip::CompressionMethod::Deflated;
        self
    }

    fn options(&self, mode: u32) -> SimpleFileOptions {
        SimpleFileOptions::default()
            .compression_method(self.method)
            .unix_permissions(mode)
    }

    /// Adds a regular file with mode 0o644.
    #[must_use]
    pub fn add_file(self, path: &str, data: &[u8]) -> Self {
        self.add_file_with_mode(path, data, 0o644)
    }

    /// Adds a regular file with a custom mode.
    #[must_use]
    pub fn add_file_with_mode(mut self, path: &str, data: &[u8], mode: u32) -> Self {
        let options = self.options(mode);
        self.writer.start_file(path, options).unwrap();
        self.writer.write_all(data).unwrap();
        self
    }

    /// Adds a directory with mode 0o755.
    #[must_use]
    pub fn add_directory(self, path: &str) -> Self {
        self.add_directory_with_mode(path, 0o755)
    }

    /// Adds a directory with a custom mode.
    #[must_use]
    pub fn add_directory_with_mode(mut self, path: &str, mode: u32) -> Self {
        let options = self.options(mode);
        self.writer.add_directory(path, options).unwrap();
        self
    }

    /// Adds a symlink.
    #[must_use]
    pub fn add_symlink(mut self, path: &str, target: &str) -> Self {
        let options = self.options(0o777);
        self.writer.add_symlink(path, target, options).unwrap();
        self
    }

    /// Builds the ZIP archive.
    #[must_use]
    pub fn build(self) -> Vec<u8> {
        self.writer.finish().unwrap().into_inner()
    }
}

impl Default for ZipTestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Gzip-compresses `data`.
#[must_use]
pub fn gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

/// Packs the contents of `dir` into an uncompressed TAR archive.
///
/// Entry names are relative to `dir`; modes are taken from the filesystem.
#[must_use]
pub fn pack_dir_tar(dir: &Path) -> Vec<u8> {
    let mut builder = tar::Builder::new(Vec::new());
    for (name, path, is_dir) in walk_sorted(dir) {
        if is_dir {
            builder.append_dir(&name, &path).unwrap();
        } else {
            builder.append_path_with_name(&path, &name).unwrap();
        }
    }
    builder.into_inner().unwrap()
}

/// Packs the contents of `dir` into a gzip-compressed TAR archive.
#[must_use]
pub fn pack_dir_tar_gz(dir: &Path) -> Vec<u8> {
    gzip(&pack_dir_tar(dir))
}

/// Packs the contents of `dir` into a deflated ZIP archive.
#[must_use]
pub fn pack_dir_zip(dir: &Path) -> Vec<u8> {
    let mut builder = ZipTestBuilder::new().deflated();
    for (name, path, is_dir) in walk_sorted(dir) {
        let mode = file_mode(&path);
        builder = if is_dir {
            builder.add_directory_with_mode(&format!("{name}/"), mode)
        } else {
            builder.add_file_with_mode(&name, &std::fs::read(&path).unwrap(), mode)
        };
    }
    builder.build()
}

/// Lists `(relative name, path, is_dir)` below `root`, parents first.
fn walk_sorted(root: &Path) -> Vec<(String, PathBuf, bool)> {
    let mut out = Vec::new();
    let mut pending = vec![root.to_path_buf()];
    while let Some(dir) = pending.pop() {
        let children: Vec<PathBuf> = std::fs::read_dir(&dir)
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .collect();
        for path in children {
            let name = path
                .strip_prefix(root)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/");
            let is_dir = path.is_dir();
            if is_dir {
                pending.push(path.clone());
            }
            out.push((name, path, is_dir));
        }
    }
    out.sort_by(|a, b| a.0.cmp(&b.0));
    out
}

#[cfg(unix)]
fn file_mode(path: &Path) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path).unwrap().permissions().mode() & 0o777
}

#[cfg(not(unix))]
fn file_mode(path: &Path) -> u32 {
    if path.is_dir() { 0o755 } else { 0o644 }
}
