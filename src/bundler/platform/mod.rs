//! Platform and format profiles.
//!
//! # Module Organization
//!
//! - [`macos`] - `.app` bundles and DMG images
//! - [`linux`] - AppImage
//! - [`windows`] - NSIS installers
//!
//! Platform profiles supply the bundle location and the host's reveal/launch
//! commands; format profiles supply everything else.

pub mod linux;
pub mod macos;
pub mod windows;

use crate::bundler::{
    compose::{CommandContext, PathContext},
    error::Result,
    utils::{fs, process::Invocation},
};
use std::path::PathBuf;

/// Name of the platform the bundler is running on, if it has a profile.
pub fn host_platform() -> Option<&'static str> {
    if cfg!(target_os = "macos") {
        Some(macos::NAME)
    } else if cfg!(target_os = "windows") {
        Some(windows::NAME)
    } else if cfg!(target_os = "linux") {
        Some(linux::NAME)
    } else {
        None
    }
}

/// `<base>/build/<app>/<platform>/<format>`
pub(crate) fn bundle_path(cx: &PathContext<'_>) -> PathBuf {
    cx.app
        .build_directory()
        .join(cx.app.product_name())
        .join(cx.platform)
        .join(cx.format)
}

/// Name of the executable inside a bundle.
pub(crate) fn executable_name(cx: &PathContext<'_>) -> String {
    cx.app
        .main_binary()
        .map(|b| b.name().to_string())
        .unwrap_or_else(|| cx.app.product_name().to_string())
}

/// Reveals the bundle with the host's file opener.
pub(crate) async fn reveal(cx: &mut CommandContext, opener: &str) -> Result<bool> {
    let bundle = cx.bundle_path()?;
    cx.run(&Invocation::new(opener).path_arg(&bundle)).await?;
    Ok(true)
}

/// Launches the executable in place.
pub(crate) async fn run_executable(cx: &mut CommandContext) -> Result<bool> {
    let executable = cx.executable_path()?;
    let project = cx.project_path()?;
    cx.run(&Invocation::new(&executable).current_dir(project))
        .await?;
    Ok(true)
}

/// Packages by copying the built artifact to the distribution path.
pub(crate) async fn copy_to_dist(cx: &mut CommandContext) -> Result<bool> {
    let binary = cx.binary_path()?;
    let distribution = cx.distribution_path()?;
    log::info!("Copying {} to {}", binary.display(), distribution.display());
    fs::copy_file(&binary, &distribution).await?;
    Ok(true)
}
