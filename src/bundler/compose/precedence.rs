//! Hook precedence.
//!
//! Several fragments of a command may implement the same hook. Which one runs
//! is decided here and nowhere else: for each hook, the fragments are asked in
//! the listed order and the first that handles it wins.
//!
//! | Hook                      | Order                    |
//! |---------------------------|--------------------------|
//! | path conventions          | Format, Platform, Stage  |
//! | `skeleton`                | Format, Platform, Stage  |
//! | `sign_app`                | Format, Platform         |
//! | primary actions           | Stage, Format, Platform  |
//!
//! This table is part of the public contract; profiles are written against it.

use super::Stage;
use std::fmt;

/// A fragment of a composed command.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Layer {
    /// The per-stage behavior fragment.
    Stage,
    /// The per-platform profile.
    Platform,
    /// The per-(platform, format) profile.
    Format,
}

/// Every hook a fragment may implement.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Hook {
    /// Directory holding everything generated for the app on this platform/format.
    BundlePath,
    /// The built artifact (`.app`, `.AppImage`, installer).
    BinaryPath,
    /// Directory the skeleton is populated into.
    ProjectPath,
    /// What Run launches.
    ExecutablePath,
    /// Where Package writes the distributable.
    DistributionPath,
    /// Files and directories Create/Update materialize.
    Skeleton,
    /// Code signing.
    Sign,
    /// Open's primary action.
    Open,
    /// Build's primary action.
    Build,
    /// Run's primary action.
    Run,
    /// Package's primary action.
    Package,
    /// Publish's primary action.
    Publish,
}

/// Profiles first: path conventions and skeleton content.
pub const PROFILE_FIRST: &[Layer] = &[Layer::Format, Layer::Platform, Layer::Stage];

/// Signing is a profile concern only.
pub const PROFILES_ONLY: &[Layer] = &[Layer::Format, Layer::Platform];

/// Stage first: primary actions.
pub const STAGE_FIRST: &[Layer] = &[Layer::Stage, Layer::Format, Layer::Platform];

impl Hook {
    /// All hooks.
    pub const ALL: &'static [Hook] = &[
        Hook::BundlePath,
        Hook::BinaryPath,
        Hook::ProjectPath,
        Hook::ExecutablePath,
        Hook::DistributionPath,
        Hook::Skeleton,
        Hook::Sign,
        Hook::Open,
        Hook::Build,
        Hook::Run,
        Hook::Package,
        Hook::Publish,
    ];

    /// Hook method name, as it appears on [`Hooks`](super::Hooks).
    pub fn name(self) -> &'static str {
        match self {
            Self::BundlePath => "bundle_path",
            Self::BinaryPath => "binary_path",
            Self::ProjectPath => "project_path",
            Self::ExecutablePath => "executable_path",
            Self::DistributionPath => "distribution_path",
            Self::Skeleton => "skeleton",
            Self::Sign => "sign_app",
            Self::Open => "open_app",
            Self::Build => "build_app",
            Self::Run => "run_app",
            Self::Package => "package_app",
            Self::Publish => "publish_app",
        }
    }

    /// The order fragments are consulted in.
    pub fn precedence(self) -> &'static [Layer] {
        match self {
            Self::BundlePath
            | Self::BinaryPath
            | Self::ProjectPath
            | Self::ExecutablePath
            | Self::DistributionPath
            | Self::Skeleton => PROFILE_FIRST,
            Self::Sign => PROFILES_ONLY,
            Self::Open | Self::Build | Self::Run | Self::Package | Self::Publish => STAGE_FIRST,
        }
    }

    /// The primary-action hook a stage dispatches, if it has one.
    ///
    /// Create and Update materialize the skeleton themselves.
    pub fn primary_action(stage: Stage) -> Option<Hook> {
        match stage {
            Stage::Create | Stage::Update => None,
            Stage::Open => Some(Self::Open),
            Stage::Build => Some(Self::Build),
            Stage::Run => Some(Self::Run),
            Stage::Package => Some(Self::Package),
            Stage::Publish => Some(Self::Publish),
        }
    }
}

impl fmt::Display for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_hooks_prefer_profiles() {
        for hook in [
            Hook::BundlePath,
            Hook::BinaryPath,
            Hook::ProjectPath,
            Hook::ExecutablePath,
            Hook::DistributionPath,
        ] {
            assert_eq!(
                hook.precedence(),
                &[Layer::Format, Layer::Platform, Layer::Stage]
            );
        }
    }

    #[test]
    fn primary_actions_prefer_the_stage() {
        for stage in Stage::ALL {
            if let Some(hook) = Hook::primary_action(*stage) {
                assert_eq!(hook.precedence()[0], Layer::Stage, "{hook}");
            }
        }
    }

    #[test]
    fn signing_never_consults_the_stage() {
        assert!(!Hook::Sign.precedence().contains(&Layer::Stage));
    }

    #[test]
    fn every_hook_has_a_non_empty_order_without_repeats() {
        for hook in Hook::ALL {
            let order = hook.precedence();
            assert!(!order.is_empty());
            for (i, layer) in order.iter().enumerate() {
                assert!(!order[i + 1..].contains(layer), "{hook} repeats {layer:?}");
            }
        }
    }
}
