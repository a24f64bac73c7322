//! Tar archive format handler, plain or gzip-wrapped.

use std::io::Read;
use std::time::Instant;

use flate2::read::GzDecoder;
use tracing::debug;

use crate::ExtractionConfig;
use crate::ExtractionError;
use crate::ExtractionReport;
use crate::copy::CopyBuffer;
use crate::types::ArchiveEntry;
use crate::types::DestDir;
use crate::types::EntryKind;

use super::common::extract_entry;
use super::traits::ArchiveFormat;

/// Tar archive handler.
///
/// Entries are read sequentially from the stream; nothing is buffered beyond
/// the current entry.
pub struct TarArchive<R: Read> {
    archive: tar::Archive<R>,
    name: &'static str,
}

impl<R: Read> TarArchive<R> {
    /// Creates a handler for an uncompressed tar stream.
    pub fn new(reader: R) -> Self {
        Self {
            archive: tar::Archive::new(reader),
            name: "tar",
        }
    }
}

impl<R: Read> TarArchive<GzDecoder<R>> {
    /// Creates a handler for a gzip-compressed tar stream.
    pub fn gzip(reader: R) -> Self {
        Self {
            archive: tar::Archive::new(GzDecoder::new(reader)),
            name: "tar.gz",
        }
    }
}

impl<R: Read> ArchiveFormat for TarArchive<R> {
    fn extract(
        &mut self,
        dest: &DestDir,
        config: &ExtractionConfig,
    ) -> Result<ExtractionReport, ExtractionError> {
        let start = Instant::now();
        let mut report = ExtractionReport::new();
        let mut buffer = CopyBuffer::new();

        let entries = self
            .archive
            .entries()
            .map_err(|e| ExtractionError::InvalidArchive(e.to_string()))?;

        for entry in entries {
            let entry = entry.map_err(|e| ExtractionError::InvalidArchive(e.to_string()))?;
            let header = entry.header();
            let entry_type = header.entry_type();

            // Global pax headers carry metadata only.
            if entry_type.is_pax_global_extensions() {
                debug!("skipping pax global header");
                continue;
            }

            let kind = EntryKind::from_tar(entry_type, &entry.path_bytes());
            let path = entry
                .path()
                .map_err(|e| ExtractionError::InvalidArchive(e.to_string()))?
                .into_owned();
            let mode = header.mode().ok();
            let size = entry.size();

            let archive_entry = ArchiveEntry {
                path,
                kind,
                mode,
                size,
                content: entry,
            };
            extract_entry(archive_entry, dest, config, &mut report, &mut buffer)?;
        }

        report.duration = start.elapsed();
        Ok(report)
    }

    fn format_name(&self) -> &'static str {
        self.name
    }
}
