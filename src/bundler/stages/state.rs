//! Persisted record of the last successful Build.

use crate::bundler::{
    compose::CommandContext,
    error::{ErrorExt, Result},
    utils::fs,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{
    io,
    path::{Path, PathBuf},
};

/// File name of the state record inside the bundle.
pub const FILE_NAME: &str = ".build-state.json";

/// What was built, and when.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildState {
    /// Platform name.
    pub platform: String,
    /// Output format name.
    pub format: String,
    /// Application version at build time.
    pub version: String,
    /// Completion time.
    pub built_at: DateTime<Utc>,
}

impl BuildState {
    /// Whether this state was produced for the descriptor's current version.
    pub fn matches_version(&self, version: &str) -> bool {
        self.version == version
    }
}

/// Location of the state record for `bundle`.
pub fn path(bundle: &Path) -> PathBuf {
    bundle.join(FILE_NAME)
}

/// Reads the state record, if there is one.
pub async fn load(bundle: &Path) -> Result<Option<BuildState>> {
    let path = path(bundle);
    match tokio::fs::read(&path).await {
        Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).fs_context("reading build state", path),
    }
}

/// Records a successful Build of `cx`.
pub async fn record(bundle: &Path, cx: &CommandContext) -> Result<BuildState> {
    let state = BuildState {
        platform: cx.platform().to_string(),
        format: cx.format().to_string(),
        version: cx.settings().version_string().to_string(),
        built_at: Utc::now(),
    };
    fs::write_file(&path(bundle), &serde_json::to_vec_pretty(&state)?).await?;
    Ok(state)
}

/// Invalidates any previous Build.
pub async fn clear(bundle: &Path) -> Result<()> {
    fs::remove_file_if_exists(&path(bundle)).await
}
