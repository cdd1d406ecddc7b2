//! Multi-platform application packaging pipeline.
//!
//! Produces native artifacts for a (platform, format) pair by running one of
//! seven lifecycle stages:
//! - macOS `.app` bundles, packaged as DMG images
//! - Linux AppImages, built with a managed linuxdeploy
//! - Windows installers compiled with NSIS
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod bundler;
pub mod cli;
pub mod error;
pub mod metadata;

// Re-export commonly used types
pub use error::{BundlerError, CliError, Result};
