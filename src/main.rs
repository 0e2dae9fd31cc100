//! DouluoBridge Release - publish an Android release to GitHub in one pass.
//!
//! This binary resolves the version from the Gradle build script, replaces
//! any stale release carrying the same tag, and streams the APK to the fresh
//! release. Exit code 0 on full success, 1 on any fatal failure.

use douluo_bridge_release::cli;
use douluo_bridge_release::cli::OutputManager;
use std::process;

#[tokio::main]
async fn main() {
    env_logger::init();

    match cli::run().await {
        Ok(exit_code) => {
            process::exit(exit_code);
        }
        Err(e) => {
            // Create output manager for error display (never quiet for fatal errors)
            let output = OutputManager::new(false, false);
            output.error(&format!("Fatal error: {e}"));

            // Show recovery suggestions for critical errors
            let suggestions = e.recovery_suggestions();
            if !suggestions.is_empty() {
                output.println("\n💡 Recovery suggestions:");
                for suggestion in suggestions {
                    output.indent(&suggestion);
                }
            }

            process::exit(1);
        }
    }
}
