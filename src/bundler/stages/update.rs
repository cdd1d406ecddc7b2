use super::{existing_bundle, materialize, state};
use crate::bundler::{
    compose::{CommandContext, Hooks, Stage, StageMixin, StageOutcome},
    error::Result,
};
use async_trait::async_trait;

/// Re-applies the skeleton onto an existing bundle.
///
/// Anything previously built is considered stale afterwards.
#[derive(Debug, Default, Clone, Copy)]
pub struct UpdateStage;

impl Hooks for UpdateStage {}

#[async_trait]
impl StageMixin for UpdateStage {
    fn stage(&self) -> Stage {
        Stage::Update
    }

    async fn run(&self, cx: &mut CommandContext) -> Result<StageOutcome> {
        let bundle = existing_bundle(cx)?;
        let entries = cx.skeleton()?;

        state::clear(&bundle).await?;
        materialize(cx, &entries).await?;

        log::info!("✓ Updated {}", bundle.display());
        Ok(StageOutcome::Updated { bundle })
    }
}
