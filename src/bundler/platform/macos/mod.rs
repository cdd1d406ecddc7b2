//! macOS platform profile.

pub mod app;

use crate::bundler::{
    compose::{CommandContext, Hooks, PathContext, PlatformProfile},
    error::Result,
    utils::process::Invocation,
};
use async_trait::async_trait;
use std::path::PathBuf;

pub(crate) const NAME: &str = "macos";

/// Reveals bundles with `open`, signs with `codesign`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Macos;

impl PlatformProfile for Macos {
    fn name(&self) -> &'static str {
        NAME
    }
}

#[async_trait]
impl Hooks for Macos {
    fn bundle_path(&self, cx: &PathContext<'_>) -> Option<PathBuf> {
        Some(super::bundle_path(cx))
    }

    async fn sign_app(&self, cx: &mut CommandContext, identity: &str) -> Result<bool> {
        let binary = cx.binary_path()?;
        let mut codesign = Invocation::new("codesign").args(["--sign", identity, "--force", "--deep"]);
        if identity == "-" {
            log::info!("Ad-hoc signing {}", binary.display());
        } else {
            log::info!("Signing {} with identity {}", binary.display(), identity);
            codesign = codesign.args(["--options", "runtime", "--timestamp"]);
        }
        if let Some(entitlements) = &cx.settings().bundle_settings().entitlements {
            codesign = codesign.arg("--entitlements").path_arg(entitlements);
        }
        cx.run(&codesign.path_arg(&binary)).await?;
        Ok(true)
    }

    async fn open_app(&self, cx: &mut CommandContext) -> Result<bool> {
        super::reveal(cx, "open").await
    }

    async fn run_app(&self, cx: &mut CommandContext) -> Result<bool> {
        super::run_executable(cx).await
    }
}
