use super::{existing_bundle, state};
use crate::bundler::{
    compose::{CommandContext, Hook, Hooks, Stage, StageMixin, StageOutcome},
    error::{Error, Result},
    utils::{checksum, fs},
};
use async_trait::async_trait;

/// Produces the distributable from a completed Build.
#[derive(Debug, Default, Clone, Copy)]
pub struct PackageStage;

impl Hooks for PackageStage {}

#[async_trait]
impl StageMixin for PackageStage {
    fn stage(&self) -> Stage {
        Stage::Package
    }

    async fn run(&self, cx: &mut CommandContext) -> Result<StageOutcome> {
        let bundle = existing_bundle(cx)?;
        let version = cx.settings().version_string();
        match state::load(&bundle).await? {
            Some(built) if built.matches_version(version) => {
                log::debug!("Packaging build from {}", built.built_at);
            }
            Some(built) => {
                log::warn!(
                    "Bundle was built for version {}, descriptor is at {}",
                    built.version,
                    version
                );
                return Err(Error::Prerequisite {
                    path: state::path(&bundle),
                    run_first: Stage::Build,
                });
            }
            None => {
                return Err(Error::Prerequisite {
                    path: state::path(&bundle),
                    run_first: Stage::Build,
                });
            }
        }

        let distribution = cx.distribution_path()?;
        if let Some(parent) = distribution.parent() {
            fs::create_dir_all(parent, false).await?;
        }
        fs::remove_file_if_exists(&distribution).await?;

        cx.perform(Hook::Package).await?;

        if !distribution.exists() {
            crate::bail!(
                "packaging finished but {} was not produced",
                distribution.display()
            );
        }
        let artifact = checksum::describe_artifact(&distribution).await?;

        log::info!(
            "✓ Packaged {} ({} bytes, sha256 {})",
            artifact.path.display(),
            artifact.size,
            artifact.checksum
        );
        Ok(StageOutcome::Packaged(artifact))
    }
}
