//! Extraction operation reporting.

use std::time::Duration;

use serde::Serialize;

/// Report of an archive extraction operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractionReport {
    /// Number of regular files written.
    pub files_extracted: usize,

    /// Number of directory entries created.
    pub directories_created: usize,

    /// Entries that resolved to the destination root itself.
    pub entries_skipped: usize,

    /// Total bytes written to disk.
    pub bytes_written: u64,

    /// Duration of the extraction operation.
    pub duration: Duration,
}

impl ExtractionReport {
    /// Creates a new empty extraction report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns total number of items written.
    #[must_use]
    pub fn total_items(&self) -> usize {
        self.files_extracted + self.directories_created
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_items() {
        let report = ExtractionReport {
            files_extracted: 3,
            directories_created: 2,
            entries_skipped: 1,
            ..ExtractionReport::new()
        };
        assert_eq!(report.total_items(), 5);
    }
}
