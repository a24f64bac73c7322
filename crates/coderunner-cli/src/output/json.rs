//! JSON output formatter for machine-readable results.

use super::formatter::JsonOutput;
use super::formatter::OutputFormatter;
use super::formatter::SubmissionOutcome;
use anyhow::Result;
use coderunner_core::ExtractionReport;
use serde::Serialize;
use std::io::Write;
use std::io::{self};

pub struct JsonFormatter;

impl JsonFormatter {
    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }
}

#[derive(Serialize)]
struct ExtractionOutput {
    files_extracted: usize,
    directories_created: usize,
    entries_skipped: usize,
    bytes_written: u64,
    duration_ms: u128,
}

impl From<&ExtractionReport> for ExtractionOutput {
    fn from(report: &ExtractionReport) -> Self {
        Self {
            files_extracted: report.files_extracted,
            directories_created: report.directories_created,
            entries_skipped: report.entries_skipped,
            bytes_written: report.bytes_written,
            duration_ms: report.duration.as_millis(),
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_extraction_result(&self, report: &ExtractionReport) -> Result<()> {
        let output = JsonOutput::success("extract", ExtractionOutput::from(report));
        Self::output(&output)
    }

    fn format_submission(&self, outcome: &SubmissionOutcome) -> Result<()> {
        #[derive(Serialize)]
        struct StageOutput<'a> {
            stage: &'a str,
            success: bool,
            message: &'a str,
        }

        #[derive(Serialize)]
        struct SubmissionOutput<'a> {
            #[serde(skip_serializing_if = "Option::is_none")]
            extraction: Option<ExtractionOutput>,
            stages: Vec<StageOutput<'a>>,
        }

        let data = SubmissionOutput {
            extraction: outcome.report.as_ref().map(ExtractionOutput::from),
            stages: outcome
                .stages
                .iter()
                .map(|stage| StageOutput {
                    stage: stage.name,
                    success: !stage.response.is_error(),
                    message: stage.response.message(),
                })
                .collect(),
        };

        let error = outcome
            .failure()
            .map(|stage| format!("{} stage failed", stage.name));
        let output = JsonOutput::with_error("submit", data, error);
        Self::output(&output)
    }
}
