//! Windows platform profile.

pub mod nsis;

use crate::bundler::{
    compose::{CommandContext, Hooks, PathContext, PlatformProfile},
    error::Result,
};
use async_trait::async_trait;
use std::path::PathBuf;

pub(crate) const NAME: &str = "windows";

/// Reveals bundles with Explorer; packages by copying the built installer.
#[derive(Debug, Default, Clone, Copy)]
pub struct Windows;

impl PlatformProfile for Windows {
    fn name(&self) -> &'static str {
        NAME
    }
}

#[async_trait]
impl Hooks for Windows {
    fn bundle_path(&self, cx: &PathContext<'_>) -> Option<PathBuf> {
        Some(super::bundle_path(cx))
    }

    async fn open_app(&self, cx: &mut CommandContext) -> Result<bool> {
        super::reveal(cx, "explorer").await
    }

    async fn run_app(&self, cx: &mut CommandContext) -> Result<bool> {
        super::run_executable(cx).await
    }

    async fn package_app(&self, cx: &mut CommandContext) -> Result<bool> {
        super::copy_to_dist(cx).await
    }
}
