//! File system utilities for bundling.
//!
//! Provides the [`HostFs`] capability managed tools are provisioned through,
//! plus idempotent directory helpers used by the stages.

use crate::bundler::error::{Error, ErrorExt, Result};
use async_trait::async_trait;
use std::{
    io,
    path::{Path, PathBuf},
};
use tokio::fs;

/// Filesystem capability used by the managed tool lifecycle.
///
/// Everything the lifecycle does to disk goes through this trait, which keeps
/// the state machine testable without touching the real tools directory.
#[async_trait]
pub trait HostFs: Send + Sync {
    /// Whether `path` exists. Never fails; unreadable paths count as absent.
    async fn exists(&self, path: &Path) -> bool;

    /// Deletes a single file.
    async fn remove_file(&self, path: &Path) -> Result<()>;

    /// Marks a file executable (mode 0o755 on Unix).
    async fn set_executable(&self, path: &Path) -> Result<()>;

    /// Looks `program` up on `PATH`.
    fn which(&self, program: &str) -> Option<PathBuf>;
}

/// [`HostFs`] backed by the local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFs;

#[async_trait]
impl HostFs for LocalFs {
    async fn exists(&self, path: &Path) -> bool {
        fs::try_exists(path).await.unwrap_or(false)
    }

    async fn remove_file(&self, path: &Path) -> Result<()> {
        fs::remove_file(path)
            .await
            .fs_context("removing", path)
    }

    async fn set_executable(&self, path: &Path) -> Result<()> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
                .await
                .fs_context("setting executable permissions on", path)?;
        }
        #[cfg(not(unix))]
        let _ = path;
        Ok(())
    }

    fn which(&self, program: &str) -> Option<PathBuf> {
        match which::which(program) {
            Ok(path) => {
                log::debug!("Found {} at: {}", program, path.display());
                Some(path)
            }
            Err(e) => {
                log::debug!("{} not found in PATH: {}", program, e);
                None
            }
        }
    }
}

/// Creates all of the directories of the specified path, erasing it first if specified.
pub async fn create_dir_all(path: &Path, erase: bool) -> Result<()> {
    if erase {
        remove_dir_all(path).await?;
    }

    // create_dir_all is already idempotent - succeeds even if dir exists
    fs::create_dir_all(path)
        .await
        .fs_context("creating directory", path)
}

/// Removes the directory and its contents if it exists.
pub async fn remove_dir_all(path: &Path) -> Result<()> {
    match fs::remove_dir_all(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(Error::Fs {
            context: "removing directory",
            path: path.to_path_buf(),
            error: e,
        }),
    }
}

/// Removes a file if it exists.
pub async fn remove_file_if_exists(path: &Path) -> Result<()> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(Error::Fs {
            context: "removing",
            path: path.to_path_buf(),
            error: e,
        }),
    }
}

/// Writes a file, creating any parent directories as needed.
pub async fn write_file(path: &Path, contents: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .await
            .fs_context("creating directory", parent)?;
    }
    fs::write(path, contents).await.fs_context("writing", path)
}

/// Copies a regular file from one path to another, creating any parent
/// directories of the destination path as necessary.
///
/// Fails if the source path is a directory or doesn't exist.
pub async fn copy_file(from: &Path, to: &Path) -> Result<()> {
    if !from.exists() {
        crate::bail!("{from:?} does not exist");
    }
    if !from.is_file() {
        crate::bail!("{from:?} is not a file");
    }
    if let Some(dest_dir) = to.parent() {
        fs::create_dir_all(dest_dir)
            .await
            .fs_context("creating directory", dest_dir)?;
    }
    fs::copy(from, to).await.fs_context("copying to", to)?;
    Ok(())
}

/// Recursively copies a directory, preserving symlinks.
///
/// The walk runs on the blocking pool.
pub async fn copy_dir(from: &Path, to: &Path) -> Result<()> {
    if !from.is_dir() {
        crate::bail!("{from:?} is not a directory");
    }

    let from = from.to_path_buf();
    let to = to.to_path_buf();

    tokio::task::spawn_blocking(move || {
        if let Some(parent) = to.parent() {
            std::fs::create_dir_all(parent)?;
        }

        for entry in walkdir::WalkDir::new(&from) {
            let entry = entry?;
            let dest_path = to.join(entry.path().strip_prefix(&from)?);

            if entry.file_type().is_symlink() {
                let target = std::fs::read_link(entry.path())?;
                symlink(&target, &dest_path, entry.path().is_dir())?;
            } else if entry.file_type().is_dir() {
                std::fs::create_dir_all(dest_path)?;
            } else {
                std::fs::copy(entry.path(), dest_path)?;
            }
        }

        Ok(())
    })
    .await
    .map_err(|e| Error::GenericError(format!("Directory copy task panicked: {}", e)))?
}

/// Makes a symbolic link.
#[cfg(unix)]
pub fn symlink(target: &Path, link: &Path, _is_dir: bool) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

/// Makes a symbolic link.
#[cfg(windows)]
pub fn symlink(target: &Path, link: &Path, is_dir: bool) -> io::Result<()> {
    if is_dir {
        std::os::windows::fs::symlink_dir(target, link)
    } else {
        std::os::windows::fs::symlink_file(target, link)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_dir_all_with_erase_drops_old_content() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("bundle");
        write_file(&dir.join("stale.txt"), b"old").await.unwrap();

        create_dir_all(&dir, true).await.unwrap();

        assert!(dir.is_dir());
        assert!(!dir.join("stale.txt").exists());
    }

    #[tokio::test]
    async fn removing_missing_paths_is_not_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        remove_dir_all(&tmp.path().join("nope")).await.unwrap();
        remove_file_if_exists(&tmp.path().join("nope.txt")).await.unwrap();
    }

    #[tokio::test]
    async fn copy_dir_mirrors_nested_files() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("Demo.app");
        write_file(&src.join("Contents/MacOS/demo"), b"bin").await.unwrap();
        write_file(&src.join("Contents/Info.plist"), b"plist").await.unwrap();

        let dst = tmp.path().join("staging/Demo.app");
        copy_dir(&src, &dst).await.unwrap();

        assert_eq!(std::fs::read(dst.join("Contents/MacOS/demo")).unwrap(), b"bin");
        assert!(dst.join("Contents/Info.plist").is_file());
    }

    #[tokio::test]
    async fn copy_file_rejects_missing_and_directory_sources() {
        let tmp = tempfile::tempdir().unwrap();
        let to = tmp.path().join("out/hello");

        let err = copy_file(&tmp.path().join("hello"), &to).await.unwrap_err();
        assert!(matches!(err, Error::GenericError(ref m) if m.ends_with("does not exist")));

        let err = copy_file(tmp.path(), &to).await.unwrap_err();
        assert!(matches!(err, Error::GenericError(ref m) if m.ends_with("is not a file")));
        assert!(!to.exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn local_fs_sets_mode_755() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("tool");
        write_file(&file, b"#!/bin/sh\n").await.unwrap();

        LocalFs.set_executable(&file).await.unwrap();

        let mode = std::fs::metadata(&file).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }
}
