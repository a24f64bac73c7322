//! Output formatter trait for CLI results.

use anyhow::Result;
use coderunner_core::ExtractionReport;
use coderunner_core::Response;
use serde::Serialize;

/// Common output formatter trait
pub trait OutputFormatter {
    /// Format extraction result
    fn format_extraction_result(&self, report: &ExtractionReport) -> Result<()>;

    /// Format the responses of a submit run, in stage order
    fn format_submission(&self, outcome: &SubmissionOutcome) -> Result<()>;
}

/// One pipeline step and the response it produced.
#[derive(Debug)]
pub struct Stage {
    pub name: &'static str,
    pub response: Response,
}

/// Everything a submit run produced before it stopped.
#[derive(Debug, Default)]
pub struct SubmissionOutcome {
    pub report: Option<ExtractionReport>,
    pub stages: Vec<Stage>,
}

impl SubmissionOutcome {
    pub fn push(&mut self, name: &'static str, response: Response) {
        self.stages.push(Stage { name, response });
    }

    /// The first stage that failed, if any.
    pub fn failure(&self) -> Option<&Stage> {
        self.stages.iter().find(|stage| stage.response.is_error())
    }
}

/// Generic JSON output structure
#[derive(Debug, Serialize)]
pub struct JsonOutput<T> {
    pub operation: String,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

impl<T: Serialize> JsonOutput<T> {
    pub fn success(operation: impl Into<String>, data: T) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Success,
            data: Some(data),
            error: None,
        }
    }

    /// Reports `data` with an error status when `error` is set.
    pub fn with_error(operation: impl Into<String>, data: T, error: Option<String>) -> Self {
        Self {
            operation: operation.into(),
            status: if error.is_some() { Status::Error } else { Status::Success },
            data: Some(data),
            error,
        }
    }
}
