//! Validated safe path type for archive extraction.

use crate::ExtractionError;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use super::DestDir;

/// A relative path that has been verified to stay inside a [`DestDir`].
///
/// `SafePath` represents a path that has been validated to not contain:
/// - Path traversal attempts (`..`)
/// - Null bytes
/// - Absolute paths or platform prefixes
///
/// The stored path is lexically cleaned (`.` components removed). It may be
/// empty when the input names the destination root itself (`./`); callers
/// decide what that means for their entry kind via [`SafePath::is_root`].
///
/// There is no `From<PathBuf>`: validation is the only constructor.
///
/// # Examples
///
/// ```no_run
/// use coderunner_core::types::DestDir;
/// use coderunner_core::types::SafePath;
/// use std::path::Path;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let dest = DestDir::new("/tmp")?;
///
/// let safe = SafePath::validate(Path::new("./src/main.c"), &dest)?;
/// assert_eq!(safe.as_path(), Path::new("src/main.c"));
///
/// assert!(SafePath::validate(Path::new("../etc/passwd"), &dest).is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SafePath(PathBuf);

impl SafePath {
    /// Validates and constructs a `SafePath`.
    ///
    /// # Validation Steps
    ///
    /// 1. Reject null bytes
    /// 2. Reject absolute paths, roots and prefixes
    /// 3. Reject parent directory components (`..`)
    /// 4. Drop `.` components
    /// 5. Verify `dest + path` keeps the destination as a prefix, and that
    ///    its nearest existing ancestor (the path itself included) does not
    ///    resolve outside it
    ///
    /// # Errors
    ///
    /// - `ExtractionError::PathTraversal` for `..`, absolute paths, or a
    ///   resolved path outside the destination
    /// - `ExtractionError::SecurityViolation` for null bytes
    pub fn validate(path: &Path, dest: &DestDir) -> Result<Self, ExtractionError> {
        if path.as_os_str().as_encoded_bytes().contains(&0) {
            return Err(ExtractionError::SecurityViolation {
                reason: format!("path contains null bytes: {}", path.display()),
            });
        }

        let traversal = || ExtractionError::PathTraversal {
            path: path.to_path_buf(),
        };

        let mut normalized = PathBuf::new();
        for component in path.components() {
            match component {
                Component::Normal(part) => normalized.push(part),
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    return Err(traversal());
                }
            }
        }

        let resolved = dest.as_path().join(&normalized);
        if !resolved.starts_with(dest.as_path()) {
            return Err(traversal());
        }

        // Whatever already exists on disk may be a symlink planted earlier.
        if !normalized.as_os_str().is_empty() {
            let existing = resolved
                .ancestors()
                .find(|ancestor| ancestor.symlink_metadata().is_ok())
                .unwrap_or_else(|| dest.as_path());
            match existing.canonicalize() {
                Ok(canonical) if canonical.starts_with(dest.as_path()) => {}
                Ok(_) => return Err(traversal()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(traversal()),
                Err(e) => {
                    return Err(ExtractionError::Io(std::io::Error::new(
                        e.kind(),
                        format!("failed to canonicalize {}: {e}", existing.display()),
                    )));
                }
            }
        }

        Ok(Self(normalized))
    }

    /// Returns `true` if the path names the destination root itself.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.as_os_str().is_empty()
    }

    /// Returns the path as a `&Path`.
    #[inline]
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_dest() -> (TempDir, DestDir) {
        let temp = TempDir::new().expect("failed to create temp dir");
        let dest = DestDir::new(temp.path()).expect("failed to create dest");
        (temp, dest)
    }

    #[test]
    fn test_valid_nested_path() {
        let (_temp, dest) = create_test_dest();
        let safe = SafePath::validate(Path::new("foo/bar/baz.txt"), &dest).unwrap();
        assert_eq!(safe.as_path(), Path::new("foo/bar/baz.txt"));
        assert!(dest.join(&safe).starts_with(dest.as_path()));
    }

    #[test]
    fn test_current_dir_removed() {
        let (_temp, dest) = create_test_dest();
        let safe = SafePath::validate(Path::new("./foo/./bar.txt"), &dest).unwrap();
        assert_eq!(safe.as_path(), Path::new("foo/bar.txt"));
    }

    #[test]
    fn test_root_equivalent() {
        let (_temp, dest) = create_test_dest();
        assert!(SafePath::validate(Path::new("./"), &dest).unwrap().is_root());
        assert!(SafePath::validate(Path::new("."), &dest).unwrap().is_root());
        assert!(!SafePath::validate(Path::new("a"), &dest).unwrap().is_root());
    }

    #[test]
    fn test_parent_traversal_rejected() {
        let (_temp, dest) = create_test_dest();
        for path in ["../etc/passwd", "../../etc/passwd", "foo/../../etc/passwd", "foo/.."] {
            assert!(
                matches!(
                    SafePath::validate(Path::new(path), &dest),
                    Err(ExtractionError::PathTraversal { .. })
                ),
                "{path} should be rejected"
            );
        }
    }

    #[test]
    fn test_absolute_rejected() {
        let (_temp, dest) = create_test_dest();
        let result = SafePath::validate(Path::new("/etc/passwd"), &dest);
        assert!(matches!(result, Err(ExtractionError::PathTraversal { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_null_byte_rejected() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let (_temp, dest) = create_test_dest();
        let path = Path::new(OsStr::from_bytes(b"file\0.txt"));
        let result = SafePath::validate(path, &dest);
        assert!(matches!(
            result,
            Err(ExtractionError::SecurityViolation { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_parent_rejected() {
        let (temp, dest) = create_test_dest();
        let outside = TempDir::new().unwrap();
        std::os::unix::fs::symlink(outside.path(), temp.path().join("escape")).unwrap();

        let result = SafePath::validate(Path::new("escape/payload"), &dest);
        assert!(matches!(result, Err(ExtractionError::PathTraversal { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_grandparent_rejected() {
        let (temp, dest) = create_test_dest();
        let outside = TempDir::new().unwrap();
        std::os::unix::fs::symlink(outside.path(), temp.path().join("escape")).unwrap();

        let result = SafePath::validate(Path::new("escape/sub/payload"), &dest);
        assert!(matches!(result, Err(ExtractionError::PathTraversal { .. })));
        assert!(!outside.path().join("sub").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlink_ancestor_rejected() {
        let (temp, dest) = create_test_dest();
        std::os::unix::fs::symlink("/nonexistent/target", temp.path().join("gone")).unwrap();

        let result = SafePath::validate(Path::new("gone/file.txt"), &dest);
        assert!(matches!(result, Err(ExtractionError::PathTraversal { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_entry_itself_rejected() {
        let (temp, dest) = create_test_dest();
        let outside = TempDir::new().unwrap();
        let target = outside.path().join("victim.txt");
        std::fs::write(&target, "keep").unwrap();
        std::os::unix::fs::symlink(&target, temp.path().join("link.txt")).unwrap();

        let result = SafePath::validate(Path::new("link.txt"), &dest);
        assert!(matches!(result, Err(ExtractionError::PathTraversal { .. })));
    }

    #[test]
    fn test_missing_nested_path_accepted() {
        let (_temp, dest) = create_test_dest();
        let safe = SafePath::validate(Path::new("a/b/c/d.txt"), &dest).unwrap();
        assert_eq!(safe.as_path(), Path::new("a/b/c/d.txt"));
    }
}
