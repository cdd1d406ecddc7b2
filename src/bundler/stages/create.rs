use super::materialize;
use crate::bundler::{
    compose::{CommandContext, Hooks, Stage, StageMixin, StageOutcome},
    error::Result,
    utils::fs,
};
use async_trait::async_trait;

/// Materializes the skeleton at the bundle path, erasing any previous bundle.
#[derive(Debug, Default, Clone, Copy)]
pub struct CreateStage;

impl Hooks for CreateStage {}

#[async_trait]
impl StageMixin for CreateStage {
    fn stage(&self) -> Stage {
        Stage::Create
    }

    async fn run(&self, cx: &mut CommandContext) -> Result<StageOutcome> {
        let bundle = cx.bundle_path()?;
        let entries = cx.skeleton()?;

        if bundle.exists() {
            log::info!("Removing old bundle at {}", bundle.display());
        }
        fs::create_dir_all(&bundle, true).await?;
        materialize(cx, &entries).await?;

        log::info!("✓ Created {}", bundle.display());
        Ok(StageOutcome::Created { bundle })
    }
}
