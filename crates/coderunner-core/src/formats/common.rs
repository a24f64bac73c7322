//! Entry materialization shared by the TAR and ZIP readers.
//!
//! Both readers turn their native entries into [`ArchiveEntry`] values and
//! hand them to [`extract_entry`], so the containment check and the
//! permission handling are identical for every format.

use std::fs::File;
use std::fs::create_dir_all;
use std::io::BufWriter;
use std::io::Read;
use std::io::Write;

use tracing::debug;

use crate::ExtractionConfig;
use crate::ExtractionError;
use crate::ExtractionReport;
use crate::copy::CopyBuffer;
use crate::copy::copy_with_buffer;
use crate::security::apply_mode;
use crate::security::effective_mode;
use crate::types::ArchiveEntry;
use crate::types::DestDir;
use crate::types::EntryKind;
use crate::types::SafePath;

/// Validates one entry and writes it under `dest`.
///
/// The entry path is checked with [`SafePath::validate`] before anything is
/// written. Directories are created with their ancestors; files get their
/// parent directories, are truncated and filled from `entry.content`.
/// Permission bits are applied last.
///
/// # Errors
///
/// - `PathTraversal` / `SecurityViolation` if the path escapes `dest`, or a
///   file entry names `dest` itself
/// - `UnsupportedEntry` for anything but directories and regular files
/// - `Io` for filesystem failures
pub fn extract_entry<R: Read>(
    entry: ArchiveEntry<R>,
    dest: &DestDir,
    config: &ExtractionConfig,
    report: &mut ExtractionReport,
    buffer: &mut CopyBuffer,
) -> Result<(), ExtractionError> {
    let ArchiveEntry {
        path,
        kind,
        mode,
        size,
        mut content,
    } = entry;

    let safe_path = SafePath::validate(&path, dest)?;
    let mode = effective_mode(mode, kind, config);

    match kind {
        EntryKind::Directory if safe_path.is_root() => {
            debug!(path = %path.display(), "skipping entry for the destination root");
            report.entries_skipped += 1;
        }
        EntryKind::Directory => {
            create_directory(&safe_path, dest, mode)?;
            report.directories_created += 1;
        }
        EntryKind::File if safe_path.is_root() => {
            return Err(ExtractionError::PathTraversal { path });
        }
        EntryKind::File => {
            let written = extract_file(&mut content, &safe_path, dest, mode, buffer)?;
            debug!(path = %safe_path.as_path().display(), size, written, "extracted file");
            report.files_extracted += 1;
            report.bytes_written += written;
        }
        EntryKind::Unsupported(kind) => {
            return Err(ExtractionError::UnsupportedEntry { path, kind });
        }
    }

    Ok(())
}

/// Creates a directory (and ancestors) and applies `mode` to it.
fn create_directory(
    safe_path: &SafePath,
    dest: &DestDir,
    mode: Option<u32>,
) -> Result<(), ExtractionError> {
    let dir_path = dest.join(safe_path);
    create_dir_all(&dir_path)?;
    apply_mode(&dir_path, mode)?;
    Ok(())
}

/// Writes one regular file and returns the number of bytes written.
fn extract_file<R: Read>(
    reader: &mut R,
    safe_path: &SafePath,
    dest: &DestDir,
    mode: Option<u32>,
    buffer: &mut CopyBuffer,
) -> Result<u64, ExtractionError> {
    let output_path = dest.join(safe_path);

    if let Some(parent) = output_path.parent() {
        create_dir_all(parent)?;
    }

    let output_file = File::create(&output_path)?;
    let mut writer = BufWriter::with_capacity(64 * 1024, output_file);
    let written = copy_with_buffer(reader, &mut writer, buffer)?;
    writer.flush()?;
    drop(writer);

    apply_mode(&output_path, mode)?;
    Ok(written)
}
