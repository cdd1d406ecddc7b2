//! External helper tools and their provisioning.
//!
//! A [`ManagedTool`] describes one helper binary (where it comes from, where
//! it lives on disk) and implements the verify/install/upgrade lifecycle. The
//! [`ToolRegistry`] owned by each composed command resolves tools lazily, at
//! most once per run.
//!
//! # Module Organization
//!
//! - [`managed`] - Descriptor and lifecycle state machine
//! - [`registry`] - Per-command resolution cache
//! - `lock` - Advisory lock serializing installs across processes
//! - `linuxdeploy` / `makensis` - The shipped tool descriptors

mod linuxdeploy;
mod lock;
mod makensis;
pub mod managed;
pub mod registry;

pub use managed::{ManagedTool, ToolHandle, ToolSource};
pub use registry::ToolRegistry;

use crate::bundler::{
    error::Result,
    settings::Arch,
    utils::{fs::HostFs, http::Fetcher},
};
use std::{
    fmt,
    path::{Path, PathBuf},
    sync::Arc,
};

/// Every tool the bundler knows how to provide.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum ToolKind {
    /// AppImage assembly tool and its plugins (managed).
    LinuxDeploy,
    /// NSIS compiler (system-installed).
    Makensis,
}

impl ToolKind {
    /// All known tools.
    pub const ALL: &'static [ToolKind] = &[ToolKind::LinuxDeploy, ToolKind::Makensis];

    /// Stable identifier.
    pub fn name(self) -> &'static str {
        match self {
            Self::LinuxDeploy => linuxdeploy::NAME,
            Self::Makensis => makensis::NAME,
        }
    }

    /// Looks a tool up by its identifier.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.name() == name)
    }

    /// Builds the descriptor for this tool in `env`.
    ///
    /// Pure: the result depends only on the tools directory and host
    /// architecture.
    pub fn describe(self, env: &ToolEnvironment) -> Result<ManagedTool> {
        match self {
            Self::LinuxDeploy => linuxdeploy::describe(env.tools_dir(), env.host_arch()),
            Self::Makensis => Ok(makensis::describe(env.tools_dir())),
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Host capabilities the tool lifecycle runs against.
#[derive(Clone)]
pub struct ToolEnvironment {
    tools_dir: PathBuf,
    host_arch: Arch,
    fetcher: Arc<dyn Fetcher>,
    fs: Arc<dyn HostFs>,
}

impl ToolEnvironment {
    /// Creates an environment rooted at `tools_dir`.
    pub fn new(
        tools_dir: impl Into<PathBuf>,
        host_arch: Arch,
        fetcher: Arc<dyn Fetcher>,
        fs: Arc<dyn HostFs>,
    ) -> Self {
        Self {
            tools_dir: tools_dir.into(),
            host_arch,
            fetcher,
            fs,
        }
    }

    /// Shared directory all managed tools are installed into.
    pub fn tools_dir(&self) -> &Path {
        &self.tools_dir
    }

    /// Architecture of the machine running the bundler.
    pub fn host_arch(&self) -> Arch {
        self.host_arch
    }

    /// Fetch primitive.
    pub fn fetcher(&self) -> &dyn Fetcher {
        self.fetcher.as_ref()
    }

    /// Filesystem capability.
    pub fn fs(&self) -> &dyn HostFs {
        self.fs.as_ref()
    }
}

impl fmt::Debug for ToolEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolEnvironment")
            .field("tools_dir", &self.tools_dir)
            .field("host_arch", &self.host_arch)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for kind in ToolKind::ALL {
            assert_eq!(ToolKind::from_name(kind.name()), Some(*kind));
        }
        assert_eq!(ToolKind::from_name("wix"), None);
    }
}
