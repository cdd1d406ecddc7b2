//! Advisory lock around tool installation.
//!
//! The tools directory is shared by every bundler process on the machine. Two
//! builds installing the same tool at once would interleave writes to the same
//! files, so install and upgrade hold an exclusive `flock` on
//! `<tools_dir>/.<tool>.lock` for their duration. The lock is released when
//! the guard drops.

use crate::bundler::error::{Error, ErrorExt, Result};
use std::path::Path;

/// Held for the duration of an install or upgrade.
pub struct InstallLock {
    #[cfg(unix)]
    _file: nix::fcntl::Flock<std::fs::File>,
}

impl InstallLock {
    /// Blocks until the lock for `tool` is acquired.
    ///
    /// Creates the tools directory if needed.
    pub async fn acquire(tools_dir: &Path, tool: &str) -> Result<Self> {
        tokio::fs::create_dir_all(tools_dir)
            .await
            .fs_context("creating tools directory", tools_dir)?;

        let lock_path = tools_dir.join(format!(".{}.lock", tool));
        log::debug!("Acquiring install lock {}", lock_path.display());

        #[cfg(unix)]
        {
            let path = lock_path.clone();
            let file = tokio::task::spawn_blocking(move || {
                let file = std::fs::OpenOptions::new()
                    .create(true)
                    .truncate(false)
                    .write(true)
                    .open(&path)
                    .fs_context("opening install lock", &path)?;
                nix::fcntl::Flock::lock(file, nix::fcntl::FlockArg::LockExclusive).map_err(
                    |(_, errno)| Error::Fs {
                        context: "locking",
                        path: path.clone(),
                        error: std::io::Error::from(errno),
                    },
                )
            })
            .await
            .map_err(|e| Error::GenericError(format!("install lock task panicked: {}", e)))??;

            Ok(Self { _file: file })
        }

        #[cfg(not(unix))]
        {
            let _ = lock_path;
            Ok(Self {})
        }
    }
}
