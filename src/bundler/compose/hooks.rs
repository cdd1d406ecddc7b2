//! Fragment contracts.
//!
//! A composed command is made of three fragments: a [`PlatformProfile`], a
//! [`FormatProfile`] and a [`StageMixin`]. All three implement [`Hooks`]; every
//! hook is optional and a fragment that does not implement one simply
//! declines (`None` / `Ok(false)`), letting the next fragment in the hook's
//! precedence order answer.

use super::{CommandContext, Stage};
use crate::bundler::{error::Result, settings::Settings, utils::checksum::BundledArtifact};
use async_trait::async_trait;
use std::{
    fmt,
    path::{Path, PathBuf},
};

/// Inputs available to path-convention hooks.
#[derive(Debug, Clone, Copy)]
pub struct PathContext<'a> {
    /// The application descriptor.
    pub app: &'a Settings,
    /// Platform name of the command.
    pub platform: &'a str,
    /// Format name of the command.
    pub format: &'a str,
}

/// Resolved paths of a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// Everything generated for this app/platform/format.
    pub bundle: PathBuf,
    /// The built artifact.
    pub binary: PathBuf,
    /// Where the skeleton is populated.
    pub project: PathBuf,
    /// What Run launches.
    pub executable: PathBuf,
    /// Where Package writes the distributable.
    pub distribution: PathBuf,
}

/// One item of a bundle skeleton.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkeletonEntry {
    /// A directory.
    Dir(PathBuf),
    /// A generated file.
    File {
        /// Destination.
        path: PathBuf,
        /// Contents.
        contents: Vec<u8>,
    },
    /// A file copied from the application's build output.
    Copy {
        /// Source file.
        from: PathBuf,
        /// Destination.
        to: PathBuf,
        /// Whether to mark the copy executable.
        executable: bool,
    },
}

/// Optional operations any fragment may provide.
#[async_trait]
pub trait Hooks: Send + Sync {
    /// Directory holding everything generated for the app on this platform/format.
    fn bundle_path(&self, _cx: &PathContext<'_>) -> Option<PathBuf> {
        None
    }

    /// The built artifact, given the bundle path.
    fn binary_path(&self, _cx: &PathContext<'_>, _bundle: &Path) -> Option<PathBuf> {
        None
    }

    /// Directory the skeleton is populated into.
    fn project_path(&self, _cx: &PathContext<'_>, _bundle: &Path, _binary: &Path) -> Option<PathBuf> {
        None
    }

    /// What Run launches.
    fn executable_path(&self, _cx: &PathContext<'_>, _project: &Path, _binary: &Path) -> Option<PathBuf> {
        None
    }

    /// Where Package writes the distributable.
    fn distribution_path(&self, _cx: &PathContext<'_>) -> Option<PathBuf> {
        None
    }

    /// Entries Create and Update materialize, in order.
    fn skeleton(&self, _cx: &PathContext<'_>, _layout: &Layout) -> Result<Option<Vec<SkeletonEntry>>> {
        Ok(None)
    }

    /// Signs the built artifact with `identity` (`-` for ad-hoc).
    async fn sign_app(&self, _cx: &mut CommandContext, _identity: &str) -> Result<bool> {
        Ok(false)
    }

    /// Reveals the bundle.
    async fn open_app(&self, _cx: &mut CommandContext) -> Result<bool> {
        Ok(false)
    }

    /// Produces the built artifact from the populated skeleton.
    async fn build_app(&self, _cx: &mut CommandContext) -> Result<bool> {
        Ok(false)
    }

    /// Launches the built artifact.
    async fn run_app(&self, _cx: &mut CommandContext) -> Result<bool> {
        Ok(false)
    }

    /// Writes the distributable to the distribution path.
    async fn package_app(&self, _cx: &mut CommandContext) -> Result<bool> {
        Ok(false)
    }

    /// Transmits the distributable to a channel.
    async fn publish_app(&self, _cx: &mut CommandContext) -> Result<bool> {
        Ok(false)
    }
}

/// Per-platform fragment.
pub trait PlatformProfile: Hooks {
    /// Platform name (`macos`, `linux`, ...).
    fn name(&self) -> &'static str;
}

/// Per-(platform, format) fragment.
pub trait FormatProfile: Hooks {
    /// Platform this format belongs to.
    fn platform(&self) -> &'static str;

    /// Format name (`app`, `appimage`, ...).
    fn name(&self) -> &'static str;

    /// Human description used in stage messages, e.g. "macOS app".
    fn description(&self) -> &'static str;
}

/// Per-stage fragment.
#[async_trait]
pub trait StageMixin: Hooks {
    /// Which stage this fragment implements.
    fn stage(&self) -> Stage;

    /// Runs the stage against a composed command.
    async fn run(&self, cx: &mut CommandContext) -> Result<StageOutcome>;
}

/// What a stage produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome {
    /// Skeleton created at the bundle path.
    Created {
        /// Bundle path.
        bundle: PathBuf,
    },
    /// Existing skeleton refreshed.
    Updated {
        /// Bundle path.
        bundle: PathBuf,
    },
    /// Bundle revealed.
    Opened {
        /// Bundle path.
        bundle: PathBuf,
    },
    /// Artifact built.
    Built {
        /// Built artifact.
        binary: PathBuf,
    },
    /// Artifact executed.
    Ran {
        /// What was launched.
        executable: PathBuf,
    },
    /// Distributable produced.
    Packaged(BundledArtifact),
    /// Distributable shipped.
    Published {
        /// Where it was shipped.
        destination: PathBuf,
    },
}

impl fmt::Display for StageOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created { bundle } => write!(f, "Created {}", bundle.display()),
            Self::Updated { bundle } => write!(f, "Updated {}", bundle.display()),
            Self::Opened { bundle } => write!(f, "Opened {}", bundle.display()),
            Self::Built { binary } => write!(f, "Built {}", binary.display()),
            Self::Ran { executable } => write!(f, "Ran {}", executable.display()),
            Self::Packaged(artifact) => write!(
                f,
                "Packaged {} ({} bytes, sha256 {})",
                artifact.path.display(),
                artifact.size,
                artifact.checksum
            ),
            Self::Published { destination } => write!(f, "Published to {}", destination.display()),
        }
    }
}
