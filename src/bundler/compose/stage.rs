//! Pipeline stages.

use crate::bundler::error::Error;
use std::{fmt, str::FromStr};

/// One phase of the build lifecycle.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum Stage {
    /// Materialize the bundle skeleton.
    Create,
    /// Re-apply Create onto an existing skeleton.
    Update,
    /// Expose the bundle for inspection.
    Open,
    /// Compile, assemble and sign.
    Build,
    /// Execute the built artifact in place.
    Run,
    /// Produce the distributable.
    Package,
    /// Ship the distributable to a channel.
    Publish,
}

impl Stage {
    /// All stages, in lifecycle order.
    pub const ALL: &'static [Stage] = &[
        Stage::Create,
        Stage::Update,
        Stage::Open,
        Stage::Build,
        Stage::Run,
        Stage::Package,
        Stage::Publish,
    ];

    /// Subcommand name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Open => "open",
            Self::Build => "build",
            Self::Run => "run",
            Self::Package => "package",
            Self::Publish => "publish",
        }
    }

    /// Describes this stage applied to `target` (e.g. "macOS app").
    pub fn describe(self, target: &str) -> String {
        match self {
            Self::Create => format!("Create and populate a {}.", target),
            Self::Update => format!("Update an existing {}.", target),
            Self::Open => format!("Open the bundle folder for an existing {}.", target),
            Self::Build => format!("Build a {}.", target),
            Self::Run => format!("Run a {}.", target),
            Self::Package => format!("Package a {} for distribution.", target),
            Self::Publish => format!("Publish a {}.", target),
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stage {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|stage| stage.as_str() == s)
            .ok_or_else(|| {
                Error::Configuration(format!(
                    "no stage named `{}`; expected one of: {}",
                    s,
                    Self::ALL
                        .iter()
                        .map(|stage| stage.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_stage_name() {
        for stage in Stage::ALL {
            assert_eq!(stage.as_str().parse::<Stage>().unwrap(), *stage);
        }
    }

    #[test]
    fn unknown_stage_is_configuration_error() {
        let err = "deploy".parse::<Stage>().unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("deploy"));
    }
}
