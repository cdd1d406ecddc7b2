use super::require;
use crate::bundler::{
    compose::{CommandContext, Hook, Hooks, Stage, StageMixin, StageOutcome},
    error::{Context, Error, Result},
    utils::{checksum, fs},
};
use async_trait::async_trait;
use std::path::PathBuf;

/// Ships the packaged distributable and its checksum to the configured
/// channel directory.
///
/// The copy itself is this fragment's `publish_app` hook.
#[derive(Debug, Default, Clone, Copy)]
pub struct PublishStage;

fn destination(cx: &CommandContext) -> Result<PathBuf> {
    let channel = cx
        .settings()
        .bundle_settings()
        .publish_channel
        .clone()
        .ok_or_else(|| {
            Error::Configuration(format!(
                "no publication channel configured for {}; set `publish_channel` in [package.metadata.bundle]",
                cx.settings().product_name()
            ))
        })?;
    let distribution = cx.distribution_path()?;
    let file_name = distribution
        .file_name()
        .context("distribution path has no file name")?;
    Ok(channel.join(file_name))
}

#[async_trait]
impl Hooks for PublishStage {
    async fn publish_app(&self, cx: &mut CommandContext) -> Result<bool> {
        let destination = destination(cx)?;
        let distribution = cx.distribution_path()?;
        require(&distribution, Stage::Package)?;

        fs::copy_file(&distribution, &destination).await?;
        let sidecar = checksum::checksum_path(&distribution);
        if sidecar.exists() {
            fs::copy_file(&sidecar, &checksum::checksum_path(&destination)).await?;
        }
        Ok(true)
    }
}

#[async_trait]
impl StageMixin for PublishStage {
    fn stage(&self) -> Stage {
        Stage::Publish
    }

    async fn run(&self, cx: &mut CommandContext) -> Result<StageOutcome> {
        let destination = destination(cx)?;
        cx.perform(Hook::Publish).await?;
        log::info!("✓ Published to {}", destination.display());
        Ok(StageOutcome::Published { destination })
    }
}
