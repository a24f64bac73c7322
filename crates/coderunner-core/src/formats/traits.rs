//! Common traits for archive format handlers.

use crate::ExtractionConfig;
use crate::ExtractionError;
use crate::ExtractionReport;
use crate::types::DestDir;

/// Trait for archive format handlers.
pub trait ArchiveFormat {
    /// Extracts every entry, in archive order, under `dest`.
    ///
    /// # Errors
    ///
    /// Returns an error on the first I/O failure, malformed entry,
    /// unsupported entry kind, or containment violation. Entries written
    /// before the failure are left in place.
    fn extract(
        &mut self,
        dest: &DestDir,
        config: &ExtractionConfig,
    ) -> Result<ExtractionReport, ExtractionError>;

    /// Returns the archive format name.
    fn format_name(&self) -> &'static str;
}
