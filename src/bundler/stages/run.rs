use super::require;
use crate::bundler::{
    compose::{CommandContext, Hook, Hooks, Stage, StageMixin, StageOutcome},
    error::Result,
};
use async_trait::async_trait;

/// Launches the built artifact in place.
#[derive(Debug, Default, Clone, Copy)]
pub struct RunStage;

impl Hooks for RunStage {}

#[async_trait]
impl StageMixin for RunStage {
    fn stage(&self) -> Stage {
        Stage::Run
    }

    async fn run(&self, cx: &mut CommandContext) -> Result<StageOutcome> {
        require(&cx.binary_path()?, Stage::Build)?;
        let executable = cx.executable_path()?;
        cx.perform(Hook::Run).await?;
        Ok(StageOutcome::Ran { executable })
    }
}
