//! Managed tool descriptor and lifecycle.
//!
//! Per tool and filesystem location the lifecycle moves through
//! `Absent -> Installing -> Present` and, on upgrade,
//! `Present -> Removing -> Absent -> Installing -> Present`.
//!
//! [`ManagedTool::verify`] is the entry point; installation only ever happens
//! through it or through [`ManagedTool::upgrade`].

use super::{ToolKind, ToolEnvironment, lock::InstallLock};
use crate::bundler::{
    error::{Error, Result},
    utils::http::{FetchError, download_file_name},
};
use std::path::{Path, PathBuf};

/// Where a tool's files come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolSource {
    /// Downloaded into the tools directory; lifecycle owned by the bundler.
    ///
    /// The primary artifact is always fetched before the auxiliary ones.
    Download {
        /// URL of the primary artifact.
        primary: String,
        /// Plugin artifacts, fetched after the primary in declaration order.
        auxiliary: Vec<String>,
    },
    /// Expected on `PATH`; never installed by the bundler.
    System,
}

/// Descriptor for one external helper tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagedTool {
    kind: ToolKind,
    display_name: &'static str,
    artifact_name: String,
    source: ToolSource,
    tools_dir: PathBuf,
}

/// A verified tool, ready to be invoked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolHandle {
    tool: ManagedTool,
    executable: PathBuf,
}

impl ToolHandle {
    /// The descriptor this handle was verified from.
    pub fn tool(&self) -> &ManagedTool {
        &self.tool
    }

    /// Path to run.
    pub fn executable(&self) -> &Path {
        &self.executable
    }
}

impl ManagedTool {
    /// Creates a descriptor.
    ///
    /// `artifact_name` is the primary artifact's file name for downloaded
    /// tools and the program name looked up on `PATH` for system tools.
    pub fn new(
        kind: ToolKind,
        display_name: &'static str,
        artifact_name: String,
        source: ToolSource,
        tools_dir: &Path,
    ) -> Self {
        Self {
            kind,
            display_name,
            artifact_name,
            source,
            tools_dir: tools_dir.to_path_buf(),
        }
    }

    /// Tool kind.
    pub fn kind(&self) -> ToolKind {
        self.kind
    }

    /// Stable identifier.
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// Name for messages.
    pub fn display_name(&self) -> &'static str {
        self.display_name
    }

    /// Host-specific primary artifact name.
    pub fn artifact_name(&self) -> &str {
        &self.artifact_name
    }

    /// Whether the bundler owns this tool's lifecycle.
    pub fn is_managed(&self) -> bool {
        matches!(self.source, ToolSource::Download { .. })
    }

    /// Where the tool comes from.
    pub fn source(&self) -> &ToolSource {
        &self.source
    }

    /// URLs to fetch, primary first. Empty for system tools.
    pub fn download_sources(&self) -> Vec<&str> {
        match &self.source {
            ToolSource::Download { primary, auxiliary } => std::iter::once(primary.as_str())
                .chain(auxiliary.iter().map(String::as_str))
                .collect(),
            ToolSource::System => Vec::new(),
        }
    }

    /// Location of the primary artifact inside the tools directory.
    pub fn install_path(&self) -> PathBuf {
        self.tools_dir.join(&self.artifact_name)
    }

    /// Locations of the auxiliary artifacts, in declaration order.
    pub fn auxiliary_paths(&self) -> Vec<PathBuf> {
        match &self.source {
            ToolSource::Download { auxiliary, .. } => auxiliary
                .iter()
                .map(|url| self.tools_dir.join(download_file_name(url)))
                .collect(),
            ToolSource::System => Vec::new(),
        }
    }

    /// Whether the tool is present.
    ///
    /// Downloaded tools count as present only when the primary and every
    /// auxiliary artifact are on disk, so an install interrupted after the
    /// primary still reads as absent. System tools are present when found on
    /// `PATH`.
    pub async fn exists(&self, env: &ToolEnvironment) -> bool {
        match &self.source {
            ToolSource::Download { .. } => {
                let fs = env.fs();
                if !fs.exists(&self.install_path()).await {
                    log::debug!("{} not found at {}", self.display_name, self.install_path().display());
                    return false;
                }
                for path in self.auxiliary_paths() {
                    if !fs.exists(&path).await {
                        log::debug!("{} plugin missing: {}", self.display_name, path.display());
                        return false;
                    }
                }
                true
            }
            ToolSource::System => env.fs().which(&self.artifact_name).is_some(),
        }
    }

    /// Verifies the tool is available, installing it if allowed.
    ///
    /// System tools are looked up on `PATH` exactly once.
    ///
    /// # Errors
    ///
    /// - [`Error::MissingTool`] if the tool is absent and `install_if_missing`
    ///   is false, or it is a system tool that cannot be fetched
    /// - whatever [`install`](Self::install) fails with
    pub async fn verify(self, env: &ToolEnvironment, install_if_missing: bool) -> Result<ToolHandle> {
        let executable = match &self.source {
            ToolSource::System => env
                .fs()
                .which(&self.artifact_name)
                .ok_or_else(|| Error::missing_tool(self.name()))?,
            ToolSource::Download { .. } => {
                if !self.exists(env).await {
                    if !install_if_missing {
                        return Err(Error::missing_tool(self.name()));
                    }
                    self.install(env).await?;
                }
                self.install_path()
            }
        };
        Ok(ToolHandle {
            tool: self,
            executable,
        })
    }

    /// Removes the primary artifact and installs everything again.
    ///
    /// # Errors
    ///
    /// - [`Error::MissingTool`] if the tool is not present; nothing is deleted
    ///   or fetched in that case
    /// - [`Error::UnmanagedTool`] for system tools
    pub async fn upgrade(&self, env: &ToolEnvironment) -> Result<()> {
        if !self.exists(env).await {
            return Err(Error::missing_tool(self.name()));
        }
        if !self.is_managed() {
            return Err(Error::UnmanagedTool {
                tool: self.name().to_string(),
            });
        }

        let _lock = InstallLock::acquire(&self.tools_dir, self.name()).await?;

        log::info!("Removing old {} install...", self.display_name);
        env.fs().remove_file(&self.install_path()).await?;

        self.fetch_artifacts(env).await?;
        log::info!("✓ Upgraded {}", self.display_name);
        Ok(())
    }

    /// Downloads every artifact under the install lock.
    ///
    /// Another process may have finished the same install while this one
    /// waited for the lock; presence is checked again once it is held.
    async fn install(&self, env: &ToolEnvironment) -> Result<()> {
        let _lock = InstallLock::acquire(&self.tools_dir, self.name()).await?;
        if self.exists(env).await {
            log::debug!("{} was installed while waiting for the lock", self.display_name);
            return Ok(());
        }

        log::info!("Installing {}...", self.display_name);
        self.fetch_artifacts(env).await?;
        log::info!("✓ Installed {} at {}", self.display_name, self.install_path().display());
        Ok(())
    }

    /// Fetches primary then auxiliary artifacts, marking each executable.
    ///
    /// Stops at the first failure; artifacts already fetched stay on disk.
    async fn fetch_artifacts(&self, env: &ToolEnvironment) -> Result<()> {
        for url in self.download_sources() {
            let path = env
                .fetcher()
                .fetch(url, &self.tools_dir)
                .await
                .map_err(|e| match e {
                    FetchError::Connection { .. } => Error::NetworkFailure {
                        operation: format!("downloading {} artifacts", self.display_name),
                    },
                    other => Error::Fetch(other),
                })?;
            env.fs().set_executable(&path).await?;
        }
        Ok(())
    }
}
