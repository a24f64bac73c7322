//! Error types for the upload, build and run pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `RunnerError`.
pub type Result<T> = std::result::Result<T, RunnerError>;

/// Errors that can occur while extracting an archive.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Archive is corrupted or invalid.
    #[error("invalid archive: {0}")]
    InvalidArchive(String),

    /// Entry is neither a directory nor a regular file.
    #[error("unsupported entry type '{kind}': {path}")]
    UnsupportedEntry {
        /// The entry path as stored in the archive.
        path: PathBuf,
        /// Short name of the entry kind.
        kind: &'static str,
    },

    /// Path traversal attempt detected.
    #[error("path traversal detected: {path}")]
    PathTraversal {
        /// The path that attempted traversal.
        path: PathBuf,
    },

    /// Operation not permitted by security policy.
    #[error("operation denied by security policy: {reason}")]
    SecurityViolation {
        /// Reason for the violation.
        reason: String,
    },
}

impl ExtractionError {
    /// Returns `true` if this error represents a security violation.
    ///
    /// # Examples
    ///
    /// ```
    /// use coderunner_core::ExtractionError;
    /// use std::path::PathBuf;
    ///
    /// let err = ExtractionError::PathTraversal {
    ///     path: PathBuf::from("../etc/passwd"),
    /// };
    /// assert!(err.is_security_violation());
    ///
    /// let err = ExtractionError::InvalidArchive("truncated".into());
    /// assert!(!err.is_security_violation());
    /// ```
    #[must_use]
    pub const fn is_security_violation(&self) -> bool {
        matches!(
            self,
            Self::PathTraversal { .. } | Self::SecurityViolation { .. }
        )
    }

    /// Returns a context string for this error, if available.
    #[must_use]
    pub fn context(&self) -> Option<&str> {
        match self {
            Self::InvalidArchive(msg) => Some(msg),
            Self::SecurityViolation { reason } => Some(reason),
            _ => None,
        }
    }
}

impl From<zip::result::ZipError> for ExtractionError {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(io) => Self::Io(io),
            other => Self::InvalidArchive(other.to_string()),
        }
    }
}

/// Classification of a pipeline failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// No archive was supplied with the upload.
    FileRetrieval,
    /// The archive could not be decoded or written out.
    Decompression,
    /// A path escaped its destination root.
    SecurityViolation,
    /// The work directory is missing or unreachable.
    Navigation,
    /// A compile or run command failed.
    Command,
}

/// Errors surfaced by upload, build and run.
///
/// None of these are fatal to the hosting process; each one is reported to
/// the caller as a human-readable string.
#[derive(Error, Debug)]
pub enum RunnerError {
    /// The upload carried no archive.
    #[error("error in retrieving the file: {reason}")]
    FileRetrieval {
        /// Why the archive could not be retrieved.
        reason: String,
    },

    /// The archive is malformed or could not be written to disk.
    #[error("error in extracting uploaded file: {0}")]
    Decompression(#[source] ExtractionError),

    /// An archive entry or submitted directory escapes its root.
    #[error("security violation: {0}")]
    SecurityViolation(#[source] ExtractionError),

    /// The submission's work directory cannot be entered.
    #[error("error while navigating to working directory {}: {source}", path.display())]
    Navigation {
        /// The directory that was resolved.
        path: PathBuf,
        /// Underlying cause.
        #[source]
        source: std::io::Error,
    },

    /// The command exited non-zero or could not be spawned.
    #[error("command `{command}` failed: {reason}")]
    Command {
        /// The command line that was executed.
        command: String,
        /// Captured stdout, a newline, then captured stderr.
        output: String,
        /// Exit status or spawn error.
        reason: String,
    },
}

impl RunnerError {
    /// Returns the classification of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::FileRetrieval { .. } => ErrorKind::FileRetrieval,
            Self::Decompression(_) => ErrorKind::Decompression,
            Self::SecurityViolation(_) => ErrorKind::SecurityViolation,
            Self::Navigation { .. } => ErrorKind::Navigation,
            Self::Command { .. } => ErrorKind::Command,
        }
    }

    /// Returns `true` if this error represents a security violation.
    #[must_use]
    pub const fn is_security_violation(&self) -> bool {
        matches!(self, Self::SecurityViolation(_))
    }

    /// Returns the output captured before a command failed.
    #[must_use]
    pub fn command_output(&self) -> Option<&str> {
        match self {
            Self::Command { output, .. } => Some(output),
            _ => None,
        }
    }
}

impl From<ExtractionError> for RunnerError {
    fn from(err: ExtractionError) -> Self {
        if err.is_security_violation() {
            Self::SecurityViolation(err)
        } else {
            Self::Decompression(err)
        }
    }
}
