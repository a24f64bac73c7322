//! Resolution of a submission's build directory.
//!
//! The build directory is `<base>/<assignments>/<root>/<work_dir>`. It is
//! handed to the spawned command as its working directory; the process's
//! own working directory is never switched.

use std::io;
use std::path::Path;
use std::path::PathBuf;

use crate::ExtractionError;
use crate::RunnerConfig;
use crate::RunnerError;
use crate::security::clean_relative_dir;
use crate::security::validate_root_name;

/// An existing directory in which a command may run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkDir(PathBuf);

impl WorkDir {
    /// Checks that `path` is an existing directory.
    ///
    /// # Errors
    ///
    /// Returns `RunnerError::Navigation` if it is missing or not a directory.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, RunnerError> {
        let path = path.into();
        match std::fs::metadata(&path) {
            Ok(meta) if meta.is_dir() => Ok(Self(path)),
            Ok(_) => Err(RunnerError::Navigation {
                source: io::Error::new(io::ErrorKind::NotADirectory, "not a directory"),
                path,
            }),
            Err(source) => Err(RunnerError::Navigation { path, source }),
        }
    }

    /// Returns the directory path.
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.0
    }
}

/// Computes extraction roots and build directories under the assignments
/// directory.
#[derive(Debug, Clone)]
pub struct WorkspaceNavigator {
    assignments: PathBuf,
}

impl WorkspaceNavigator {
    /// Creates a navigator rooted at `base/assignments_dir`.
    pub fn new(base: impl AsRef<Path>, assignments_dir: impl AsRef<Path>) -> Self {
        Self {
            assignments: base.as_ref().join(assignments_dir),
        }
    }

    /// Creates a navigator from configuration, reading the process working
    /// directory when no base directory is pinned.
    ///
    /// # Errors
    ///
    /// Returns `RunnerError::Navigation` if the current directory cannot be
    /// determined.
    pub fn from_config(config: &RunnerConfig) -> Result<Self, RunnerError> {
        let base = match &config.base_dir {
            Some(base) => base.clone(),
            None => std::env::current_dir().map_err(|source| RunnerError::Navigation {
                path: PathBuf::from("."),
                source,
            })?,
        };
        Ok(Self::new(base, &config.assignments_dir))
    }

    /// Returns the shared assignments directory.
    #[must_use]
    pub fn assignments_dir(&self) -> &Path {
        &self.assignments
    }

    /// Returns the path of the extraction root named `root`.
    ///
    /// # Errors
    ///
    /// Returns `ExtractionError::PathTraversal` unless `root` is a single
    /// plain path component.
    pub fn extraction_root(&self, root: &str) -> Result<PathBuf, ExtractionError> {
        Ok(self.assignments.join(validate_root_name(root)?))
    }

    /// Resolves `<root>/<work_dir>` to an existing directory.
    ///
    /// # Errors
    ///
    /// - `RunnerError::SecurityViolation` if `root` or `work_dir` would
    ///   leave the assignments directory
    /// - `RunnerError::Navigation` if the directory does not exist
    pub fn resolve(&self, root: &str, work_dir: &str) -> Result<WorkDir, RunnerError> {
        let root = self.extraction_root(root)?;
        let sub = clean_relative_dir(work_dir)?;
        WorkDir::new(root.join(sub))
    }
}
