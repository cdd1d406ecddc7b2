//! Assembles commands from registered fragments.

use super::{
    Stage,
    command::{Command, CommandContext, Fragments, HostEnvironment},
    registry::ProfileRegistry,
};
use crate::bundler::{
    error::{Error, Result},
    settings::Settings,
    tools::ToolRegistry,
};
use std::sync::Arc;

/// Builds a [`Command`] for a (platform, format, stage) triple.
#[derive(Debug, Clone)]
pub struct Composer {
    registry: Arc<ProfileRegistry>,
    host: HostEnvironment,
}

impl Composer {
    /// Freezes `registry` and binds it to the host capabilities.
    pub fn new(registry: ProfileRegistry, host: HostEnvironment) -> Self {
        Self {
            registry: Arc::new(registry),
            host,
        }
    }

    /// The frozen registry.
    pub fn registry(&self) -> &ProfileRegistry {
        &self.registry
    }

    /// Host capabilities handed to every command.
    pub fn host(&self) -> &HostEnvironment {
        &self.host
    }

    /// Composes a command, parsing `stage` by name.
    pub fn compose(&self, platform: &str, format: &str, stage: &str, settings: Settings) -> Result<Command> {
        let stage: Stage = stage.parse()?;
        self.compose_stage(platform, format, stage, settings)
    }

    /// Composes a command for an already-parsed stage.
    ///
    /// Every command gets its own [`ToolRegistry`].
    pub fn compose_stage(
        &self,
        platform: &str,
        format: &str,
        stage: Stage,
        settings: Settings,
    ) -> Result<Command> {
        let platform_entry = self.registry.platform(platform).ok_or_else(|| {
            Error::Configuration(format!(
                "unsupported platform `{}`; available platforms: {}",
                platform,
                self.registry.platforms().join(", ")
            ))
        })?;
        let format_entry = self.registry.format(platform, format).ok_or_else(|| {
            Error::Configuration(format!(
                "unsupported output format `{}` for {}; available formats: {}",
                format,
                platform,
                self.registry.formats(platform).join(", ")
            ))
        })?;
        let stage_entry = self.registry.stage(stage).ok_or_else(|| {
            Error::Configuration(format!("no fragment registered for the {} stage", stage))
        })?;

        log::debug!(
            "Composed {}/{}/{}",
            platform_entry.name,
            format_entry.name,
            stage
        );

        let cx = CommandContext::new(
            platform_entry.name,
            format_entry.name,
            format_entry.description,
            stage,
            Fragments {
                platform: Arc::clone(&platform_entry.hooks),
                format: Arc::clone(&format_entry.hooks),
                stage: Arc::clone(&stage_entry.hooks),
            },
            settings,
            ToolRegistry::new(self.host.tools().clone()),
            self.host.runner(),
        );
        Ok(Command::new(Arc::clone(&stage_entry.mixin), cx))
    }
}
