//! Kodegen Bundler Pipeline - staged packaging of Rust applications.
//!
//! Creates, builds, packages and publishes native bundles (.app/.dmg,
//! AppImage, NSIS installers), provisioning the helper tools each build needs.

use std::process;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Run CLI and get exit code
    let exit_code = match kodegen_bundler_pipeline::cli::run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    };

    process::exit(exit_code);
}
