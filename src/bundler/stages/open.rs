use super::existing_bundle;
use crate::bundler::{
    compose::{CommandContext, Hook, Hooks, Stage, StageMixin, StageOutcome},
    error::Result,
};
use async_trait::async_trait;

/// Reveals the bundle. Never modifies it.
#[derive(Debug, Default, Clone, Copy)]
pub struct OpenStage;

impl Hooks for OpenStage {}

#[async_trait]
impl StageMixin for OpenStage {
    fn stage(&self) -> Stage {
        Stage::Open
    }

    async fn run(&self, cx: &mut CommandContext) -> Result<StageOutcome> {
        let bundle = existing_bundle(cx)?;
        cx.perform(Hook::Open).await?;
        Ok(StageOutcome::Opened { bundle })
    }
}
