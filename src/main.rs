//! gh-sarif - Main entry point
//!
//! CLI for GitHub Code Scanning analyses: list, view, upload, and
//! delete them, including whole-set deletion walks.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() {
    // Initialize tracing
    init_tracing();

    // Run the CLI
    let app = gh_sarif::CliApp::new();
    let exit_code = app.run().await;

    // Exit with the appropriate code for CI integration
    std::process::exit(exit_code);
}

/// Initialize tracing/logging for the CLI
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,gh_sarif=info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).without_time())
        .with(filter)
        .init();
}
