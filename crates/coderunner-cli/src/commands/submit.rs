//! Submit command implementation: upload, then build, then run.

use crate::cli::SubmitArgs;
use crate::error::convert_runner_error;
use crate::output::OutputFormatter;
use crate::output::SubmissionOutcome;
use anyhow::Context;
use anyhow::Result;
use coderunner_core::CodeRunner;
use coderunner_core::Response;
use coderunner_core::RunnerConfig;
use coderunner_core::RunnerError;
use coderunner_core::Upload;
use std::path::Path;
use tracing::debug;

pub fn execute(args: &SubmitArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let archive = std::fs::read(&args.archive)
        .with_context(|| format!("failed to read archive '{}'", args.archive.display()))?;
    let file_name = args
        .archive
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let upload = args
        .args
        .iter()
        .enumerate()
        .fold(
            Upload::new(file_name, archive)
                .with_compile_command(args.compile.as_str())
                .with_run_command(args.run.as_str())
                .with_work_dir(args.workdir.as_str()),
            |upload, (i, value)| upload.with_arg((i + 1).to_string(), value.as_str()),
        );

    let config = RunnerConfig::default()
        .with_assignments_dir(&args.assignments_dir)
        .with_shell(&args.shell)
        .with_preserve_permissions(!args.no_preserve_permissions);
    debug!(?config, "submitting");

    let runner = CodeRunner::new(config);
    let mut outcome = SubmissionOutcome::default();

    let uploaded = runner.upload(upload);
    outcome.push("upload", Response::upload(&uploaded));
    match uploaded {
        Ok(report) => outcome.report = Some(report),
        Err(e) => return finish(formatter, &outcome, e, &args.archive),
    }

    let built = runner.build();
    outcome.push("build", Response::build(&built));
    if let Err(e) = built {
        return finish(formatter, &outcome, e, &args.archive);
    }

    let ran = runner.run();
    outcome.push("run", Response::run(&ran));
    if let Err(e) = ran {
        return finish(formatter, &outcome, e, &args.archive);
    }

    formatter.format_submission(&outcome)
}

fn finish(
    formatter: &dyn OutputFormatter,
    outcome: &SubmissionOutcome,
    err: RunnerError,
    archive: &Path,
) -> Result<()> {
    formatter.format_submission(outcome)?;
    Err(convert_runner_error(err, archive))
}
