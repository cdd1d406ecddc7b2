//! Registered platforms, formats and stages.

use super::{
    Stage,
    hooks::{FormatProfile, Hooks, PlatformProfile, StageMixin},
};
use crate::bundler::{platform, stages};
use std::{collections::BTreeMap, fmt, sync::Arc};

pub(super) struct PlatformEntry {
    pub(super) name: &'static str,
    pub(super) hooks: Arc<dyn Hooks>,
}

pub(super) struct FormatEntry {
    pub(super) platform: &'static str,
    pub(super) name: &'static str,
    pub(super) description: &'static str,
    pub(super) hooks: Arc<dyn Hooks>,
}

pub(super) struct StageEntry {
    pub(super) hooks: Arc<dyn Hooks>,
    pub(super) mixin: Arc<dyn StageMixin>,
}

/// Every fragment the composer can assemble commands from.
///
/// Built once at startup and frozen inside the [`Composer`](super::Composer).
/// Adding a platform or format means registering its profile; stages never
/// change.
#[derive(Default)]
pub struct ProfileRegistry {
    platforms: Vec<PlatformEntry>,
    formats: Vec<FormatEntry>,
    stages: BTreeMap<Stage, StageEntry>,
}

impl ProfileRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The shipped platforms, formats and all seven stages.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry
            .register_platform(platform::macos::Macos)
            .register_format(platform::macos::app::MacosApp)
            .register_platform(platform::linux::Linux)
            .register_format(platform::linux::appimage::LinuxAppImage)
            .register_platform(platform::windows::Windows)
            .register_format(platform::windows::nsis::WindowsNsis);
        stages::register(&mut registry);
        registry
    }

    /// Registers a platform profile, replacing any with the same name.
    pub fn register_platform<P>(&mut self, profile: P) -> &mut Self
    where
        P: PlatformProfile + 'static,
    {
        let name = profile.name();
        let entry = PlatformEntry {
            name,
            hooks: Arc::new(profile),
        };
        match self.platforms.iter_mut().find(|p| p.name == name) {
            Some(existing) => *existing = entry,
            None => self.platforms.push(entry),
        }
        self
    }

    /// Registers a format profile, replacing any with the same platform and name.
    ///
    /// The first format registered for a platform is its default.
    pub fn register_format<F>(&mut self, profile: F) -> &mut Self
    where
        F: FormatProfile + 'static,
    {
        let platform = profile.platform();
        let name = profile.name();
        let entry = FormatEntry {
            platform,
            name,
            description: profile.description(),
            hooks: Arc::new(profile),
        };
        match self
            .formats
            .iter_mut()
            .find(|f| f.platform == platform && f.name == name)
        {
            Some(existing) => *existing = entry,
            None => self.formats.push(entry),
        }
        self
    }

    /// Registers the fragment implementing a stage.
    pub fn register_stage<S>(&mut self, mixin: S) -> &mut Self
    where
        S: StageMixin + 'static,
    {
        let stage = mixin.stage();
        let mixin = Arc::new(mixin);
        self.stages.insert(
            stage,
            StageEntry {
                hooks: Arc::clone(&mixin) as Arc<dyn Hooks>,
                mixin,
            },
        );
        self
    }

    /// Registered platform names, in registration order.
    pub fn platforms(&self) -> Vec<&'static str> {
        self.platforms.iter().map(|p| p.name).collect()
    }

    /// Formats registered for `platform`, in registration order.
    pub fn formats(&self, platform: &str) -> Vec<&'static str> {
        self.formats
            .iter()
            .filter(|f| f.platform == platform)
            .map(|f| f.name)
            .collect()
    }

    /// Stages with a registered fragment.
    pub fn stages(&self) -> Vec<Stage> {
        self.stages.keys().copied().collect()
    }

    /// The format used when none is given.
    pub fn default_format(&self, platform: &str) -> Option<&'static str> {
        self.formats
            .iter()
            .find(|f| f.platform == platform)
            .map(|f| f.name)
    }

    pub(super) fn platform(&self, name: &str) -> Option<&PlatformEntry> {
        self.platforms.iter().find(|p| p.name == name)
    }

    pub(super) fn format(&self, platform: &str, name: &str) -> Option<&FormatEntry> {
        self.formats
            .iter()
            .find(|f| f.platform == platform && f.name == name)
    }

    pub(super) fn stage(&self, stage: Stage) -> Option<&StageEntry> {
        self.stages.get(&stage)
    }
}

impl fmt::Debug for ProfileRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProfileRegistry")
            .field("platforms", &self.platforms())
            .field(
                "formats",
                &self
                    .formats
                    .iter()
                    .map(|f| format!("{}/{}", f.platform, f.name))
                    .collect::<Vec<_>>(),
            )
            .field("stages", &self.stages())
            .finish()
    }
}
