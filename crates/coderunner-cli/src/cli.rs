//! CLI argument parsing using clap.

use clap::Parser;
use clap::Subcommand;
use coderunner_core::config::DEFAULT_ASSIGNMENTS_DIR;
use coderunner_core::config::DEFAULT_SHELL;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "coderunner")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Upload a submission archive, then build and run it
    Submit(SubmitArgs),
    /// Extract archive contents with path containment checks
    Extract(ExtractArgs),
}

#[derive(clap::Args)]
pub struct SubmitArgs {
    /// Path to the submission archive (zip, tar or tar.gz)
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,

    /// Compile command, run through the shell
    #[arg(short = 'c', long = "compile", value_name = "CMD")]
    pub compile: String,

    /// Run command, run through the shell with arguments appended
    #[arg(short = 'r', long = "run", value_name = "CMD")]
    pub run: String,

    /// Subdirectory of the extracted submission to build in
    #[arg(short = 'w', long = "workdir", value_name = "DIR", default_value = "")]
    pub workdir: String,

    /// Argument appended to the run command (can be repeated)
    #[arg(short = 'a', long = "arg", value_name = "VALUE")]
    pub args: Vec<String>,

    /// Directory that holds extracted submissions
    #[arg(long, value_name = "DIR", default_value = DEFAULT_ASSIGNMENTS_DIR)]
    pub assignments_dir: PathBuf,

    /// Shell used to run commands
    #[arg(long, value_name = "SHELL", default_value = DEFAULT_SHELL)]
    pub shell: PathBuf,

    /// Ignore permission bits recorded in the archive
    #[arg(long)]
    pub no_preserve_permissions: bool,
}

#[derive(clap::Args)]
pub struct ExtractArgs {
    /// Path to the archive file
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,

    /// Output directory (default: current directory)
    #[arg(value_name = "OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Ignore permission bits recorded in the archive
    #[arg(long)]
    pub no_preserve_permissions: bool,
}
