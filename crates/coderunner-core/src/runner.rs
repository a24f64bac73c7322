//! The upload, build and run pipeline.

use std::io::Cursor;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::time::Instant;

use serde::Serialize;
use tracing::info;
use tracing::warn;

use crate::ExtractionReport;
use crate::Result;
use crate::RunnerConfig;
use crate::RunnerError;
use crate::api::extract_as;
use crate::command::CommandLine;
use crate::command::CommandResult;
use crate::command::CommandRunner;
use crate::formats::detect::detect_format;
use crate::session::SessionStore;
use crate::session::SubmissionSession;
use crate::types::DestDir;
use crate::upload::Upload;
use crate::upload::root_dir_name;
use crate::workspace::WorkDir;
use crate::workspace::WorkspaceNavigator;

/// Response text for a successful upload.
pub const UPLOAD_SUCCESS: &str = r#""Upload Status":"Successfully Uploaded File(s)""#;

/// Response text for a successful build.
pub const BUILD_SUCCESS: &str = "Compiled successfully";

/// Uploads, builds and runs one submission at a time.
///
/// All three operations hold the same lock for their whole duration, so a
/// build never observes a half-extracted tree or a half-written session.
///
/// # Examples
///
/// ```no_run
/// use coderunner_core::CodeRunner;
/// use coderunner_core::RunnerConfig;
/// use coderunner_core::Upload;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let runner = CodeRunner::new(RunnerConfig::default());
/// runner.upload(
///     Upload::new("hello.tar.gz", std::fs::read("hello.tar.gz")?)
///         .with_compile_command("gcc -o hello hello.c")
///         .with_run_command("./hello"),
/// )?;
/// runner.build()?;
/// print!("{}", runner.run()?.output);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct CodeRunner {
    config: RunnerConfig,
    session: Mutex<SubmissionSession>,
}

impl CodeRunner {
    /// Creates a runner with an empty session.
    #[must_use]
    pub fn new(config: RunnerConfig) -> Self {
        Self {
            config,
            session: Mutex::new(SubmissionSession::default()),
        }
    }

    /// Returns the runner configuration.
    #[must_use]
    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    fn lock(&self) -> MutexGuard<'_, SubmissionSession> {
        // The session is plain data and every writer replaces it whole.
        self.session
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Records the submission and extracts its archive.
    ///
    /// The session is stored before extraction starts, so a failed
    /// extraction still leaves it pointing at the new root. An existing
    /// root of the same name is removed first. A failed extraction leaves
    /// whatever was written in place.
    ///
    /// # Errors
    ///
    /// - `RunnerError::FileRetrieval` if the upload has no archive
    /// - `RunnerError::SecurityViolation` if the root name or an entry path
    ///   escapes its directory
    /// - `RunnerError::Decompression` for malformed archives, unsupported
    ///   entries and I/O failures
    pub fn upload(&self, upload: Upload) -> Result<ExtractionReport> {
        let mut session = self.lock();
        let start = Instant::now();

        let Some(archive) = upload.archive.as_deref() else {
            warn!(file = %upload.file_name, "upload carried no archive");
            return Err(RunnerError::FileRetrieval {
                reason: "no archive file in request".to_string(),
            });
        };

        let mut reader = Cursor::new(archive);
        let format = detect_format(&mut reader)?;
        let root = root_dir_name(&upload.file_name, format)?;
        *session = upload.session(&root);

        let navigator = WorkspaceNavigator::from_config(&self.config)?;
        let root_path = navigator.extraction_root(&root)?;
        info!(
            file = %upload.file_name,
            format = format.name(),
            root = %root_path.display(),
            "extracting upload"
        );

        if root_path.exists() {
            std::fs::remove_dir_all(&root_path).map_err(crate::ExtractionError::from)?;
        }
        std::fs::create_dir_all(&root_path).map_err(crate::ExtractionError::from)?;
        let dest = DestDir::new(&root_path)?;

        let mut report = extract_as(reader, format, &dest, &self.config.extraction)
            .inspect_err(|e| warn!(error = %e, "extraction failed"))?;
        report.duration = start.elapsed();

        info!(
            files = report.files_extracted,
            directories = report.directories_created,
            bytes = report.bytes_written,
            "upload extracted"
        );
        Ok(report)
    }

    /// Runs the stored compile command in the stored work directory.
    ///
    /// # Errors
    ///
    /// - `RunnerError::Navigation` if the work directory does not exist
    /// - `RunnerError::SecurityViolation` if it escapes the extraction root
    /// - `RunnerError::Command` if the command fails
    pub fn build(&self) -> Result<CommandResult> {
        let session = self.lock();
        let dir = self.work_dir(&session)?;
        info!(command = %session.compile_command, "building submission");
        self.runner()
            .run(&CommandLine::new(session.compile_command.as_str()), &dir)
            .into_result()
    }

    /// Runs the stored run command, with the stored arguments appended, in
    /// the stored work directory.
    ///
    /// # Errors
    ///
    /// See [`CodeRunner::build`].
    pub fn run(&self) -> Result<CommandResult> {
        let session = self.lock();
        let dir = self.work_dir(&session)?;
        let line = CommandLine::new(session.run_command.as_str()).with_args(session.args.values());
        info!(command = %line, "running submission");
        self.runner().run(&line, &dir).into_result()
    }

    fn work_dir(&self, session: &SubmissionSession) -> Result<WorkDir> {
        WorkspaceNavigator::from_config(&self.config)?.resolve(&session.root_dir, &session.work_dir)
    }

    fn runner(&self) -> CommandRunner {
        CommandRunner::new(&self.config.shell)
    }
}

impl SessionStore for CodeRunner {
    fn store(&self, session: SubmissionSession) {
        *self.lock() = session;
    }

    fn current(&self) -> SubmissionSession {
        self.lock().clone()
    }
}

/// The single string payload returned for each operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Response {
    /// The operation succeeded.
    Success(String),
    /// The operation failed; the text describes why.
    Error(String),
}

impl Response {
    /// Response for an upload.
    #[must_use]
    pub fn upload(result: &Result<ExtractionReport>) -> Self {
        match result {
            Ok(_) => Self::Success(UPLOAD_SUCCESS.to_string()),
            Err(e) => Self::from_error(e),
        }
    }

    /// Response for a build.
    #[must_use]
    pub fn build(result: &Result<CommandResult>) -> Self {
        match result {
            Ok(_) => Self::Success(BUILD_SUCCESS.to_string()),
            Err(e) => Self::from_error(e),
        }
    }

    /// Response for a run: the program's stdout on success.
    #[must_use]
    pub fn run(result: &Result<CommandResult>) -> Self {
        match result {
            Ok(result) => Self::Success(result.output.clone()),
            Err(e) => Self::from_error(e),
        }
    }

    /// Error response; command errors also carry the captured output.
    #[must_use]
    pub fn from_error(err: &RunnerError) -> Self {
        match err.command_output() {
            Some(output) => Self::Error(format!("{err}\n{output}")),
            None => Self::Error(err.to_string()),
        }
    }

    /// Returns the payload text.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Success(message) | Self::Error(message) => message,
        }
    }

    /// Returns `true` for error responses.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// Encodes the payload as a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self.message())
    }
}
