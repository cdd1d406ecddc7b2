//! Stage subcommands.

use crate::{
    bundler::{Composer, Error, ProfileRegistry, Stage, platform},
    cli::{RuntimeConfig, StageArgs},
    error::{CliError, Result},
    metadata,
};

/// Composes and runs one stage.
pub async fn run_stage(config: &RuntimeConfig, stage: Stage, args: &StageArgs) -> Result<i32> {
    let registry = ProfileRegistry::builtin();

    let platform = match &args.platform {
        Some(platform) => platform.clone(),
        None => platform::host_platform()
            .ok_or_else(|| Error::Configuration("no profile for the host platform".into()))?
            .to_string(),
    };
    let format = match &args.format {
        Some(format) => format.clone(),
        None => registry
            .default_format(&platform)
            .ok_or_else(|| {
                Error::Configuration(format!(
                    "unsupported platform `{}`; available platforms: {}",
                    platform,
                    registry.platforms().join(", ")
                ))
            })?
            .to_string(),
    };

    let manifest = metadata::load_manifest(config.manifest())?;
    if let Some(app) = args.app.as_ref().filter(|app| **app != manifest.metadata.name) {
        return Err(CliError::InvalidArguments {
            reason: format!(
                "unknown app `{}`; {} defines `{}`",
                app,
                config.manifest().display(),
                manifest.metadata.name
            ),
        }
        .into());
    }
    let settings = manifest.into_settings(config.binary_dir(), config.target().map(String::from))?;

    let composer = Composer::new(registry, config.host_environment()?);
    let mut command = composer.compose_stage(&platform, &format, stage, settings)?;
    let outcome = command.execute().await?;
    println!("{}", outcome);
    Ok(0)
}
