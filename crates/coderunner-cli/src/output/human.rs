//! Human-readable output formatter with colors and styling.

use super::formatter::OutputFormatter;
use super::formatter::SubmissionOutcome;
use anyhow::Result;
use console::Term;
use console::style;
use coderunner_core::ExtractionReport;

pub struct HumanFormatter {
    verbose: bool,
    quiet: bool,
    use_colors: bool,
    term: Term,
}

impl HumanFormatter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            use_colors: console::colors_enabled(),
            term: Term::stdout(),
        }
    }

    fn format_size(bytes: u64) -> String {
        const KB: u64 = 1024;
        const MB: u64 = KB * 1024;
        const GB: u64 = MB * 1024;

        if bytes >= GB {
            format!("{:.1} GB", bytes as f64 / GB as f64)
        } else if bytes >= MB {
            format!("{:.1} MB", bytes as f64 / MB as f64)
        } else if bytes >= KB {
            format!("{:.1} KB", bytes as f64 / KB as f64)
        } else {
            format!("{bytes} B")
        }
    }

    fn heading(&self, success: bool, text: &str) -> String {
        match (self.use_colors, success) {
            (true, true) => format!("{} {text}", style("✓").green().bold()),
            (true, false) => format!("{} {text}", style("✗").red().bold()),
            (false, true) => text.to_string(),
            (false, false) => format!("FAILED: {text}"),
        }
    }

    fn write_report(&self, report: &ExtractionReport) {
        let _ = self
            .term
            .write_line(&format!("  Files extracted: {}", report.files_extracted));
        let _ = self
            .term
            .write_line(&format!("  Directories: {}", report.directories_created));
        let _ = self.term.write_line(&format!(
            "  Total size: {}",
            Self::format_size(report.bytes_written)
        ));

        if self.verbose {
            let _ = self
                .term
                .write_line(&format!("  Skipped entries: {}", report.entries_skipped));
            let _ = self
                .term
                .write_line(&format!("  Duration: {:?}", report.duration));
        }
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_extraction_result(&self, report: &ExtractionReport) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        let _ = self.term.write_line(&self.heading(true, "Extraction complete"));
        self.write_report(report);
        Ok(())
    }

    fn format_submission(&self, outcome: &SubmissionOutcome) -> Result<()> {
        for stage in &outcome.stages {
            let success = !stage.response.is_error();
            let message = stage.response.message();

            // Quiet mode keeps only what the program printed.
            if self.quiet {
                if stage.name == "run" && success {
                    self.term.write_str(message)?;
                }
                continue;
            }

            if stage.name == "run" && success {
                let _ = self.term.write_line(&self.heading(true, "run"));
                self.term.write_str(message)?;
            } else {
                let _ = self
                    .term
                    .write_line(&self.heading(success, &format!("{}: {message}", stage.name)));
            }

            if stage.name == "upload"
                && let Some(report) = &outcome.report
            {
                self.write_report(report);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size_bytes() {
        assert_eq!(HumanFormatter::format_size(0), "0 B");
        assert_eq!(HumanFormatter::format_size(1023), "1023 B");
    }

    #[test]
    fn test_format_size_kilobytes() {
        assert_eq!(HumanFormatter::format_size(1024), "1.0 KB");
        assert_eq!(HumanFormatter::format_size(1536), "1.5 KB");
    }

    #[test]
    fn test_format_size_megabytes() {
        assert_eq!(HumanFormatter::format_size(1024 * 1024), "1.0 MB");
        assert_eq!(HumanFormatter::format_size(10 * 1024 * 1024), "10.0 MB");
    }

    #[test]
    fn test_format_size_gigabytes() {
        assert_eq!(HumanFormatter::format_size(1024 * 1024 * 1024), "1.0 GB");
    }

    #[test]
    fn test_plain_heading() {
        let formatter = HumanFormatter {
            verbose: false,
            quiet: false,
            use_colors: false,
            term: Term::stdout(),
        };
        assert_eq!(formatter.heading(true, "build: ok"), "build: ok");
        assert_eq!(formatter.heading(false, "build: no"), "FAILED: build: no");
    }
}
