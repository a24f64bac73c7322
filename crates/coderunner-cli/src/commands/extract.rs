//! Extract command implementation.

use crate::cli::ExtractArgs;
use crate::error::convert_extraction_error;
use crate::output::OutputFormatter;
use anyhow::Context;
use anyhow::Result;
use coderunner_core::ExtractionConfig;
use coderunner_core::extract_archive_file;
use std::env;

pub fn execute(args: &ExtractArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let output_dir = match &args.output_dir {
        Some(dir) => dir.clone(),
        None => env::current_dir().context("failed to get current directory")?,
    };

    let config = ExtractionConfig {
        preserve_permissions: !args.no_preserve_permissions,
        ..ExtractionConfig::default()
    };

    let report = extract_archive_file(&args.archive, &output_dir, &config)
        .map_err(|e| convert_extraction_error(e, &args.archive))?;

    formatter.format_extraction_result(&report)?;

    Ok(())
}
