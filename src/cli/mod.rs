//! Command line interface for douluo_bridge_release.

mod args;
mod output;

pub use args::Args;
pub use output::OutputManager;

use crate::error::Result;

/// Main CLI entry point; returns the process exit code
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    let output = OutputManager::new(args.verbose, args.quiet);
    let config = args.into_config()?;

    let outcome = crate::publish::run_publish(&config, &output).await?;

    output.println(&format!(
        "\n🎉 Release published: {}",
        outcome.release.html_url
    ));
    output.indent(&format!("Asset: {}", outcome.asset.browser_download_url));
    Ok(0)
}
