//! Error conversion utilities for CLI.
//!
//! Converts coderunner-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance.

use anyhow::anyhow;
use coderunner_core::ExtractionError;
use coderunner_core::RunnerError;
use std::path::Path;

/// Converts `ExtractionError` to user-friendly anyhow error with context
pub fn convert_extraction_error(err: ExtractionError, archive: &Path) -> anyhow::Error {
    match err {
        ExtractionError::PathTraversal { path } => {
            anyhow!(
                "Security violation: Archive '{}' attempted path traversal with '{}'\n\
                 HINT: This archive may be malicious. Do not extract from untrusted sources.",
                archive.display(),
                path.display()
            )
        }
        ExtractionError::SecurityViolation { reason } => {
            anyhow!(
                "Security violation in '{}': {}\n\
                 HINT: This archive may be malicious. Do not extract from untrusted sources.",
                archive.display(),
                reason
            )
        }
        ExtractionError::UnsupportedEntry { path, kind } => {
            anyhow!(
                "Unsupported entry in '{}': {} is a {}\n\
                 HINT: Only regular files and directories can be extracted. \
                 Entries before this one were left in place.",
                archive.display(),
                path.display(),
                kind
            )
        }
        ExtractionError::Io(io_err) => {
            anyhow!(
                "I/O error while processing '{}': {}",
                archive.display(),
                io_err
            )
        }
        ExtractionError::InvalidArchive(reason) => {
            anyhow!(
                "Invalid archive '{}': {}\n\
                 HINT: The archive may be corrupted or malformed. \
                 Supported formats: zip, tar, tar.gz",
                archive.display(),
                reason
            )
        }
    }
}

/// Converts `RunnerError` to user-friendly anyhow error with context
pub fn convert_runner_error(err: RunnerError, archive: &Path) -> anyhow::Error {
    match err {
        RunnerError::FileRetrieval { reason } => {
            anyhow!("Could not read submission '{}': {}", archive.display(), reason)
        }
        RunnerError::Decompression(inner) | RunnerError::SecurityViolation(inner) => {
            convert_extraction_error(inner, archive)
        }
        RunnerError::Navigation { path, source } => {
            anyhow!(
                "Work directory '{}' is not available: {}\n\
                 HINT: --workdir is relative to the top of the extracted archive.",
                path.display(),
                source
            )
        }
        err @ RunnerError::Command { .. } => anyhow::Error::from(err)
            .context(format!("Submission '{}' failed", archive.display())),
    }
}
