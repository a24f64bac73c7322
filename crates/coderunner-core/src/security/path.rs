//! Containment checks for names that come from a submission rather than
//! from an archive entry.

use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use crate::ExtractionError;

/// Validates an extraction root name: exactly one normal path component.
///
/// # Errors
///
/// Returns `ExtractionError::PathTraversal` for empty names, `.`/`..`,
/// separators, or absolute paths.
///
/// # Examples
///
/// ```
/// use coderunner_core::security::validate_root_name;
///
/// assert!(validate_root_name("hello").is_ok());
/// assert!(validate_root_name("..").is_err());
/// assert!(validate_root_name("a/b").is_err());
/// ```
pub fn validate_root_name(name: &str) -> Result<&str, ExtractionError> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) if !name.contains('\0') => Ok(name),
        _ => Err(ExtractionError::PathTraversal {
            path: PathBuf::from(name),
        }),
    }
}

/// Cleans a submitted work subdirectory to a relative path without `..`.
///
/// An empty string or `.` yields an empty path (the extraction root).
///
/// # Errors
///
/// Returns `ExtractionError::PathTraversal` if the subdirectory is absolute
/// or walks above its root.
pub fn clean_relative_dir(dir: &str) -> Result<PathBuf, ExtractionError> {
    let mut cleaned = PathBuf::new();
    for component in Path::new(dir).components() {
        match component {
            Component::Normal(part) => cleaned.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(ExtractionError::PathTraversal {
                    path: PathBuf::from(dir),
                });
            }
        }
    }
    Ok(cleaned)
}
