//! Permission bits applied to extracted entries.

use crate::ExtractionConfig;
use crate::types::EntryKind;

/// Permission bits kept from an archive mode: user, group and other rwx.
///
/// setuid, setgid and sticky bits are dropped.
pub const PERMISSION_MASK: u32 = 0o777;

/// Returns the mode to apply to an extracted entry, or `None` to leave the
/// filesystem default in place.
///
/// # Examples
///
/// ```
/// use coderunner_core::ExtractionConfig;
/// use coderunner_core::security::effective_mode;
/// use coderunner_core::types::EntryKind;
///
/// let config = ExtractionConfig::default();
/// assert_eq!(effective_mode(Some(0o100755), EntryKind::File, &config), Some(0o755));
/// assert_eq!(effective_mode(None, EntryKind::Directory, &config), Some(0o755));
/// ```
#[must_use]
pub fn effective_mode(mode: Option<u32>, kind: EntryKind, config: &ExtractionConfig) -> Option<u32> {
    if !config.preserve_permissions {
        return None;
    }

    let mode = mode.unwrap_or(match kind {
        EntryKind::Directory => config.default_dir_mode,
        EntryKind::File | EntryKind::Unsupported(_) => config.default_file_mode,
    });
    Some(mode & PERMISSION_MASK)
}

/// Applies `mode` to `path` (Unix only).
///
/// # Errors
///
/// Returns an I/O error if the permissions cannot be changed.
pub fn apply_mode(path: &std::path::Path, mode: Option<u32>) -> std::io::Result<()> {
    #[cfg(unix)]
    if let Some(mode) = mode {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))?;
    }

    // Permission bits are Unix-specific; extraction proceeds without them.
    #[cfg(not(unix))]
    let _ = (path, mode);

    Ok(())
}
