//! The seven stage fragments.
//!
//! Stages hold no platform knowledge: everything platform- or
//! format-specific is asked of the [`CommandContext`], which dispatches it to
//! the profiles through the precedence table.

mod build;
mod create;
mod open;
mod package;
mod publish;
mod run;
pub mod state;
mod update;

pub use build::BuildStage;
pub use create::CreateStage;
pub use open::OpenStage;
pub use package::PackageStage;
pub use publish::PublishStage;
pub use run::RunStage;
pub use update::UpdateStage;

use crate::bundler::{
    compose::{CommandContext, ProfileRegistry, SkeletonEntry, Stage},
    error::{Error, Result},
    utils::fs,
};
use std::path::{Path, PathBuf};

/// Registers every stage fragment.
pub fn register(registry: &mut ProfileRegistry) {
    registry
        .register_stage(CreateStage)
        .register_stage(UpdateStage)
        .register_stage(OpenStage)
        .register_stage(BuildStage)
        .register_stage(RunStage)
        .register_stage(PackageStage)
        .register_stage(PublishStage);
}

/// Writes skeleton entries in order. Safe to repeat.
///
/// Executable bits go through the command's host filesystem.
pub(crate) async fn materialize(cx: &CommandContext, entries: &[SkeletonEntry]) -> Result<()> {
    for entry in entries {
        match entry {
            SkeletonEntry::Dir(path) => fs::create_dir_all(path, false).await?,
            SkeletonEntry::File { path, contents } => fs::write_file(path, contents).await?,
            SkeletonEntry::Copy {
                from,
                to,
                executable,
            } => {
                fs::copy_file(from, to).await?;
                if *executable {
                    cx.fs().set_executable(to).await?;
                }
            }
        }
    }
    Ok(())
}

/// Fails with a prerequisite error unless `path` exists.
pub(crate) fn require(path: &Path, run_first: Stage) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(Error::Prerequisite {
            path: path.to_path_buf(),
            run_first,
        })
    }
}

/// The bundle path, which must already have been created.
pub(crate) fn existing_bundle(cx: &CommandContext) -> Result<PathBuf> {
    let bundle = cx.bundle_path()?;
    require(&bundle, Stage::Create)?;
    Ok(bundle)
}
