//! Upload requests and extraction-root naming.

use std::collections::BTreeMap;
use std::path::Path;

use crate::ExtractionError;
use crate::formats::ArchiveType;
use crate::security::validate_root_name;
use crate::session::SubmissionArgs;
use crate::session::SubmissionSession;

/// Form field names of an upload request.
pub mod fields {
    /// The archive file part.
    pub const FILE: &str = "file";
    /// Compile command line.
    pub const COMPILE_COMMAND: &str = "compileCmd";
    /// Run command line.
    pub const RUN_COMMAND: &str = "runCmd";
    /// Work subdirectory inside the extraction root.
    pub const WORK_DIR: &str = "workDir";
    /// Prefix of the `i`-th argument name, e.g. `cmdArgName1`.
    pub const ARG_NAME_PREFIX: &str = "cmdArgName";
    /// Prefix of the `i`-th argument value, e.g. `cmdArgValue1`.
    pub const ARG_VALUE_PREFIX: &str = "cmdArgValue";
}

/// One submission as received from a caller.
///
/// # Examples
///
/// ```
/// use coderunner_core::Upload;
///
/// let upload = Upload::new("hello.tar.gz", vec![0x1f, 0x8b, 0x08])
///     .with_compile_command("gcc -o hello hello.c")
///     .with_run_command("./hello")
///     .with_arg("1", "world");
/// assert_eq!(upload.args.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Upload {
    /// Filename the archive was uploaded under.
    pub file_name: String,
    /// Archive bytes; `None` when the request carried no file.
    pub archive: Option<Vec<u8>>,
    /// Compile command line.
    pub compile_command: String,
    /// Run command line, before arguments.
    pub run_command: String,
    /// Work subdirectory inside the extraction root.
    pub work_dir: String,
    /// Run arguments in order.
    pub args: SubmissionArgs,
}

impl Upload {
    /// Creates an upload carrying `archive` under `file_name`.
    pub fn new(file_name: impl Into<String>, archive: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            archive: Some(archive),
            ..Self::default()
        }
    }

    /// Builds an upload from form fields.
    ///
    /// Argument pairs are matched by index and stored in ascending index
    /// order. A name without a value (or the reverse) pairs with an empty
    /// string. Unknown fields are ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use coderunner_core::Upload;
    ///
    /// let upload = Upload::from_fields([
    ///     ("runCmd", "./main"),
    ///     ("cmdArgName2", "b"),
    ///     ("cmdArgValue2", "second"),
    ///     ("cmdArgName1", "a"),
    ///     ("cmdArgValue1", "first"),
    /// ]);
    /// assert_eq!(upload.args.values().collect::<Vec<_>>(), ["first", "second"]);
    /// ```
    pub fn from_fields<'a, I>(form: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut upload = Self::default();
        let mut pairs: BTreeMap<u32, (&str, &str)> = BTreeMap::new();

        for (key, value) in form {
            match key {
                fields::COMPILE_COMMAND => upload.compile_command = value.to_string(),
                fields::RUN_COMMAND => upload.run_command = value.to_string(),
                fields::WORK_DIR => upload.work_dir = value.to_string(),
                _ => {
                    if let Some(index) = arg_index(key, fields::ARG_NAME_PREFIX) {
                        pairs.entry(index).or_default().0 = value;
                    } else if let Some(index) = arg_index(key, fields::ARG_VALUE_PREFIX) {
                        pairs.entry(index).or_default().1 = value;
                    }
                }
            }
        }

        upload.args = pairs.into_values().collect();
        upload
    }

    /// Sets the compile command line.
    pub fn with_compile_command(mut self, command: impl Into<String>) -> Self {
        self.compile_command = command.into();
        self
    }

    /// Sets the run command line.
    pub fn with_run_command(mut self, command: impl Into<String>) -> Self {
        self.run_command = command.into();
        self
    }

    /// Sets the work subdirectory.
    pub fn with_work_dir(mut self, dir: impl Into<String>) -> Self {
        self.work_dir = dir.into();
        self
    }

    /// Appends a run argument.
    pub fn with_arg(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.args.insert(name, value);
        self
    }

    /// Returns the session this upload records.
    #[must_use]
    pub fn session(&self, root_dir: &str) -> SubmissionSession {
        SubmissionSession {
            compile_command: self.compile_command.clone(),
            run_command: self.run_command.clone(),
            work_dir: self.work_dir.clone(),
            root_dir: root_dir.to_string(),
            args: self.args.clone(),
        }
    }
}

/// Parses the index suffix of an argument field. Only canonical decimal
/// indices count, so `cmdArgName01` and `cmdArgName+1` are unknown fields.
fn arg_index(key: &str, prefix: &str) -> Option<u32> {
    let index = key.strip_prefix(prefix)?;
    let canonical = !index.is_empty()
        && index.bytes().all(|b| b.is_ascii_digit())
        && (index == "0" || !index.starts_with('0'));
    if canonical { index.parse().ok() } else { None }
}

/// Derives the extraction root name from an uploaded filename.
///
/// Takes the final path component and strips one extension, or two for
/// gzip-wrapped archives.
///
/// # Errors
///
/// Returns `ExtractionError::PathTraversal` if the result is empty or not a
/// single plain path component.
///
/// # Examples
///
/// ```
/// use coderunner_core::formats::ArchiveType;
/// use coderunner_core::upload::root_dir_name;
///
/// assert_eq!(root_dir_name("hw1.tar.gz", ArchiveType::TarGz).unwrap(), "hw1");
/// assert_eq!(root_dir_name("dir/hw1.zip", ArchiveType::Zip).unwrap(), "hw1");
/// ```
pub fn root_dir_name(file_name: &str, format: ArchiveType) -> Result<String, ExtractionError> {
    let mut name = Path::new(file_name)
        .file_name()
        .map(Path::new)
        .unwrap_or_else(|| Path::new(""));

    for _ in 0..format.extension_count() {
        if let Some(stem) = name.file_stem() {
            name = Path::new(stem);
        }
    }

    let name = name.to_string_lossy();
    validate_root_name(&name)?;
    Ok(name.into_owned())
}
