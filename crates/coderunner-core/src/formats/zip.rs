//! ZIP archive format handler.

use std::io::Read;
use std::io::Seek;
use std::path::PathBuf;
use std::time::Instant;

use crate::ExtractionConfig;
use crate::ExtractionError;
use crate::ExtractionReport;
use crate::copy::CopyBuffer;
use crate::types::ArchiveEntry;
use crate::types::DestDir;
use crate::types::EntryKind;

use super::common::extract_entry;
use super::traits::ArchiveFormat;

/// ZIP archive handler.
pub struct ZipArchive<R: Read + Seek> {
    archive: zip::ZipArchive<R>,
}

impl<R: Read + Seek> ZipArchive<R> {
    /// Opens a ZIP archive by reading its central directory.
    ///
    /// # Errors
    ///
    /// Returns `ExtractionError::InvalidArchive` if the central directory
    /// cannot be parsed.
    pub fn new(reader: R) -> Result<Self, ExtractionError> {
        let archive = zip::ZipArchive::new(reader)?;
        Ok(Self { archive })
    }

    /// Returns the number of entries in the central directory.
    #[must_use]
    pub fn len(&self) -> usize {
        self.archive.len()
    }

    /// Returns `true` if the archive has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.archive.is_empty()
    }
}

impl<R: Read + Seek> ArchiveFormat for ZipArchive<R> {
    fn extract(
        &mut self,
        dest: &DestDir,
        config: &ExtractionConfig,
    ) -> Result<ExtractionReport, ExtractionError> {
        let start = Instant::now();
        let mut report = ExtractionReport::new();
        let mut buffer = CopyBuffer::new();

        for index in 0..self.archive.len() {
            let file = self.archive.by_index(index)?;

            // The raw name, not `enclosed_name()`: containment is checked by
            // the shared extractor exactly as for tar entries.
            let path = PathBuf::from(file.name());
            let kind = if file.is_dir() {
                EntryKind::Directory
            } else if file.is_symlink() {
                EntryKind::Unsupported("symlink")
            } else if file.is_file() {
                EntryKind::File
            } else {
                EntryKind::Unsupported("unknown")
            };
            let mode = file.unix_mode();
            let size = file.size();

            let entry = ArchiveEntry {
                path,
                kind,
                mode,
                size,
                content: file,
            };
            extract_entry(entry, dest, config, &mut report, &mut buffer)?;
        }

        report.duration = start.elapsed();
        Ok(report)
    }

    fn format_name(&self) -> &'static str {
        "zip"
    }
}
