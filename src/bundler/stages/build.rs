use super::{existing_bundle, state};
use crate::bundler::{
    compose::{CommandContext, Hook, Hooks, Stage, StageMixin, StageOutcome},
    error::Result,
};
use async_trait::async_trait;

/// Assembles the built artifact from the populated skeleton.
///
/// The build state is dropped before the hook runs and rewritten only after
/// it succeeds, so a failed build never looks complete to Package.
#[derive(Debug, Default, Clone, Copy)]
pub struct BuildStage;

impl Hooks for BuildStage {}

#[async_trait]
impl StageMixin for BuildStage {
    fn stage(&self) -> Stage {
        Stage::Build
    }

    async fn run(&self, cx: &mut CommandContext) -> Result<StageOutcome> {
        let bundle = existing_bundle(cx)?;
        let binary = cx.binary_path()?;

        state::clear(&bundle).await?;
        cx.perform(Hook::Build).await?;
        state::record(&bundle, cx).await?;

        log::info!("✓ Built {}", binary.display());
        Ok(StageOutcome::Built { binary })
    }
}
