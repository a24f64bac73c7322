//! Upload, safely extract, build and run packaged source submissions.
//!
//! `coderunner-core` accepts a ZIP, TAR or gzip-compressed TAR archive,
//! extracts it under a per-submission root with every entry path checked
//! against that root, then runs caller-supplied compile and run commands in
//! the extracted tree and returns their captured output.
//!
//! # Examples
//!
//! ```no_run
//! use coderunner_core::CodeRunner;
//! use coderunner_core::Response;
//! use coderunner_core::RunnerConfig;
//! use coderunner_core::Upload;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let runner = CodeRunner::new(RunnerConfig::default());
//! let upload = Upload::new("hello.zip", std::fs::read("hello.zip")?)
//!     .with_compile_command("make")
//!     .with_run_command("./hello")
//!     .with_arg("1", "world");
//!
//! println!("{}", Response::upload(&runner.upload(upload)).to_json()?);
//! println!("{}", Response::build(&runner.build()).to_json()?);
//! println!("{}", Response::run(&runner.run()).to_json()?);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod command;
pub mod config;
pub mod copy;
pub mod error;
pub mod formats;
pub mod report;
pub mod runner;
pub mod security;
pub mod session;
pub mod types;
pub mod upload;
pub mod workspace;

#[cfg(any(test, feature = "test-utils"))]
#[doc(hidden)]
pub mod test_utils;

pub use api::extract_archive;
pub use api::extract_archive_file;
pub use command::CommandLine;
pub use command::CommandResult;
pub use command::CommandRunner;
pub use config::ExtractionConfig;
pub use config::RunnerConfig;
pub use error::ErrorKind;
pub use error::ExtractionError;
pub use error::Result;
pub use error::RunnerError;
pub use formats::ArchiveType;
pub use report::ExtractionReport;
pub use runner::CodeRunner;
pub use runner::Response;
pub use session::SessionStore;
pub use session::SubmissionArgs;
pub use session::SubmissionSession;
pub use upload::Upload;
pub use workspace::WorkDir;
pub use workspace::WorkspaceNavigator;

pub use types::DestDir;
pub use types::EntryKind;
pub use types::SafePath;
