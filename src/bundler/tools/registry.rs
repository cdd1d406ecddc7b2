//! Per-command tool resolution cache.

use super::{ToolEnvironment, ToolHandle, ToolKind};
use crate::bundler::error::Result;
use std::collections::{HashMap, hash_map::Entry};

/// Resolves tools for one command invocation.
///
/// The first resolution of a tool builds its descriptor and verifies it
/// (installing if allowed); the handle is then cached for the rest of the
/// run, so each tool goes through at most one verify/install cycle. Failed
/// resolutions are not cached.
///
/// A registry belongs to exactly one command and is dropped with it.
#[derive(Debug)]
pub struct ToolRegistry {
    env: ToolEnvironment,
    resolved: HashMap<ToolKind, ToolHandle>,
}

impl ToolRegistry {
    /// Creates an empty registry.
    pub fn new(env: ToolEnvironment) -> Self {
        Self {
            env,
            resolved: HashMap::new(),
        }
    }

    /// Host capabilities tools are resolved against.
    pub fn environment(&self) -> &ToolEnvironment {
        &self.env
    }

    /// Resolves `kind`, installing it if it is missing.
    pub async fn resolve(&mut self, kind: ToolKind) -> Result<ToolHandle> {
        self.resolve_with(kind, true).await
    }

    /// Resolves `kind`; with `install_if_missing` false an absent tool is
    /// reported as [`MissingTool`](crate::bundler::Error::MissingTool) and
    /// nothing is fetched.
    pub async fn resolve_with(&mut self, kind: ToolKind, install_if_missing: bool) -> Result<ToolHandle> {
        match self.resolved.entry(kind) {
            Entry::Occupied(entry) => {
                log::debug!("Using cached {} handle", kind);
                Ok(entry.get().clone())
            }
            Entry::Vacant(entry) => {
                let handle = kind
                    .describe(&self.env)?
                    .verify(&self.env, install_if_missing)
                    .await?;
                log::debug!("Resolved {} at {}", kind, handle.executable().display());
                Ok(entry.insert(handle).clone())
            }
        }
    }

    /// Upgrades an installed tool, dropping any cached handle first.
    pub async fn upgrade(&mut self, kind: ToolKind) -> Result<()> {
        self.resolved.remove(&kind);
        kind.describe(&self.env)?.upgrade(&self.env).await
    }

    /// Whether `kind` has been resolved during this run.
    pub fn is_resolved(&self, kind: ToolKind) -> bool {
        self.resolved.contains_key(&kind)
    }

    /// Tools resolved so far, in no particular order.
    pub fn resolved_kinds(&self) -> impl Iterator<Item = ToolKind> + '_ {
        self.resolved.keys().copied()
    }
}
