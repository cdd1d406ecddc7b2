//! Linux platform profile.

pub mod appimage;

use crate::bundler::{
    compose::{CommandContext, Hooks, PathContext, PlatformProfile},
    error::Result,
};
use async_trait::async_trait;
use std::path::PathBuf;

pub(crate) const NAME: &str = "linux";

/// Reveals bundles with `xdg-open`; packages by copying the built artifact.
#[derive(Debug, Default, Clone, Copy)]
pub struct Linux;

impl PlatformProfile for Linux {
    fn name(&self) -> &'static str {
        NAME
    }
}

#[async_trait]
impl Hooks for Linux {
    fn bundle_path(&self, cx: &PathContext<'_>) -> Option<PathBuf> {
        Some(super::bundle_path(cx))
    }

    async fn open_app(&self, cx: &mut CommandContext) -> Result<bool> {
        super::reveal(cx, "xdg-open").await
    }

    async fn run_app(&self, cx: &mut CommandContext) -> Result<bool> {
        super::run_executable(cx).await
    }

    async fn package_app(&self, cx: &mut CommandContext) -> Result<bool> {
        super::copy_to_dist(cx).await
    }
}
