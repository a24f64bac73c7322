//! Configuration for extraction and command execution.

use std::path::PathBuf;

/// Directory, relative to the base directory, that holds extraction roots.
pub const DEFAULT_ASSIGNMENTS_DIR: &str = "assignments";

/// Shell used to interpret compile and run command lines.
pub const DEFAULT_SHELL: &str = "/bin/sh";

/// Settings applied to every archive entry during extraction.
///
/// # Examples
///
/// ```
/// use coderunner_core::ExtractionConfig;
///
/// let config = ExtractionConfig::default();
/// assert!(config.preserve_permissions);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionConfig {
    /// Apply the permission bits recorded in the archive to extracted
    /// files and directories.
    pub preserve_permissions: bool,

    /// Mode applied to directory entries that carry no Unix mode.
    pub default_dir_mode: u32,

    /// Mode applied to file entries that carry no Unix mode.
    pub default_file_mode: u32,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            preserve_permissions: true,
            default_dir_mode: 0o755,
            default_file_mode: 0o644,
        }
    }
}

/// Configuration for a [`CodeRunner`](crate::CodeRunner).
///
/// The defaults reproduce the service layout: extraction roots live under
/// `./assignments`, commands run through `/bin/sh -c`.
///
/// # Examples
///
/// ```
/// use coderunner_core::RunnerConfig;
///
/// let config = RunnerConfig::default()
///     .with_assignments_dir("/srv/submissions")
///     .with_shell("/bin/bash");
/// assert_eq!(config.shell.to_str(), Some("/bin/bash"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Shared directory holding one extraction root per submission.
    ///
    /// Relative values are resolved against the base directory.
    pub assignments_dir: PathBuf,

    /// Base directory for resolving `assignments_dir`.
    ///
    /// `None` means the process working directory at the time of each call.
    pub base_dir: Option<PathBuf>,

    /// Shell program; invoked as `<shell> -c <command line>`.
    pub shell: PathBuf,

    /// Per-entry extraction settings.
    pub extraction: ExtractionConfig,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            assignments_dir: PathBuf::from(DEFAULT_ASSIGNMENTS_DIR),
            base_dir: None,
            shell: PathBuf::from(DEFAULT_SHELL),
            extraction: ExtractionConfig::default(),
        }
    }
}

impl RunnerConfig {
    /// Sets the assignments directory.
    pub fn with_assignments_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.assignments_dir = dir.into();
        self
    }

    /// Pins the base directory instead of reading the process working
    /// directory on every call.
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    /// Sets the shell program.
    pub fn with_shell(mut self, shell: impl Into<PathBuf>) -> Self {
        self.shell = shell.into();
        self
    }

    /// Enables or disables permission preservation.
    pub fn with_preserve_permissions(mut self, preserve: bool) -> Self {
        self.extraction.preserve_permissions = preserve;
        self
    }
}
