//! Artifact checksum calculation.
//!
//! Package reports every distributable with its size and SHA-256, and writes a
//! `<artifact>.sha256` sidecar in the `sha256sum` format so Publish can ship
//! both together.

use crate::bundler::error::{ErrorExt, Result};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;

/// A packaged distributable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundledArtifact {
    /// Location of the distributable.
    pub path: PathBuf,
    /// Size in bytes.
    pub size: u64,
    /// Hex-encoded SHA-256 of the file contents.
    pub checksum: String,
}

impl BundledArtifact {
    /// Path of the `sha256sum`-style sidecar next to the artifact.
    pub fn checksum_path(&self) -> PathBuf {
        checksum_path(&self.path)
    }
}

/// Sidecar path for `artifact`.
pub fn checksum_path(artifact: &Path) -> PathBuf {
    let mut name = artifact.as_os_str().to_os_string();
    name.push(".sha256");
    PathBuf::from(name)
}

/// Hashes `path`, records size and checksum, and writes the sidecar.
pub async fn describe_artifact(path: &Path) -> Result<BundledArtifact> {
    let metadata = tokio::fs::metadata(path)
        .await
        .fs_context("reading artifact metadata", path)?;
    let checksum = calculate_file_sha256(path).await?;

    let artifact = BundledArtifact {
        path: path.to_path_buf(),
        size: metadata.len(),
        checksum,
    };

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let sidecar = artifact.checksum_path();
    tokio::fs::write(&sidecar, format!("{}  {}\n", artifact.checksum, file_name))
        .await
        .fs_context("writing checksum file", &sidecar)?;

    Ok(artifact)
}

/// Calculates SHA256 checksum of a single file.
///
/// Reads the file in 8KB chunks to handle large files efficiently.
pub async fn calculate_file_sha256(file_path: &Path) -> Result<String> {
    let mut file = tokio::fs::File::open(file_path)
        .await
        .fs_context("opening file for hashing", file_path)?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; 8192];

    loop {
        let n = file
            .read(&mut buffer)
            .await
            .fs_context("reading file for hash calculation", file_path)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}
