//! Kodegen Bundler Standalone - release archives and Homebrew tap updates.
//!
//! This binary archives the prebuilt standalone binaries of a release and,
//! when publishing is requested, pushes an updated formula to a Homebrew tap.

use std::process;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    // Run CLI and get exit code
    let exit_code = match kodegen_bundler_standalone::cli::run().await {
        Ok(code) => code,
        Err(e) => {
            log::error!("Release failed: {}", e);
            eprintln!("Error: {}", e);
            for suggestion in e.recovery_suggestions() {
                eprintln!("  hint: {}", suggestion);
            }
            1
        }
    };

    process::exit(exit_code);
}
