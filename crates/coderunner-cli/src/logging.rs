//! Tracing subscriber setup.

use anyhow::Result;
use anyhow::anyhow;
use tracing_subscriber::EnvFilter;

/// Installs a stderr `fmt` subscriber.
///
/// `RUST_LOG` wins when set. Otherwise the filter is `coderunner=warn`,
/// raised to `debug` by `--verbose` and lowered to `error` by `--quiet`.
pub fn init(verbose: bool, quiet: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive(verbose, quiet)))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("failed to install logger: {e}"))
}

fn default_directive(verbose: bool, quiet: bool) -> &'static str {
    if verbose {
        "coderunner=debug"
    } else if quiet {
        "coderunner=error"
    } else {
        "coderunner=warn"
    }
}
