//! HTTP utilities for downloading bundler tools.
//!
//! Provides the [`Fetcher`] primitive ("fetch a URL into a directory") and its
//! reqwest-backed implementation.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::io::AsyncWriteExt;

/// Failure of a [`Fetcher`].
///
/// Only [`FetchError::Connection`] is classified by the tool lifecycle (it
/// becomes a network failure); every other variant is propagated unchanged.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The remote host could not be reached.
    #[error("could not connect while fetching {url}: {reason}")]
    Connection {
        /// URL being fetched.
        url: String,
        /// Transport message.
        reason: String,
    },

    /// The server answered with a non-success status.
    #[error("fetching {url} returned HTTP {status}")]
    Status {
        /// URL being fetched.
        url: String,
        /// HTTP status code.
        status: u16,
    },

    /// Any other transport error.
    #[error("fetching {url} failed: {reason}")]
    Request {
        /// URL being fetched.
        url: String,
        /// Transport message.
        reason: String,
    },

    /// The downloaded body could not be written.
    #[error("writing {}: {source}", .path.display())]
    Io {
        /// Destination file.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
}

/// Downloads a URL into a directory.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches `url` into `destination`, returning the local file path.
    ///
    /// The file is named by [`download_file_name`].
    async fn fetch(&self, url: &str, destination: &Path) -> Result<PathBuf, FetchError>;
}

/// Name a downloaded URL is stored under: the last path segment.
pub fn download_file_name(url: &str) -> String {
    url::Url::parse(url)
        .ok()
        .and_then(|parsed| {
            parsed
                .path_segments()
                .and_then(|mut segments| segments.next_back().map(str::to_string))
        })
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| url.rsplit('/').next().unwrap_or(url).to_string())
}

/// [`Fetcher`] backed by reqwest.
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Creates a fetcher with a default client.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str, destination: &Path) -> Result<PathBuf, FetchError> {
        log::info!("Downloading {}", url);

        let classify = |e: reqwest::Error| {
            if e.is_connect() || e.is_timeout() {
                FetchError::Connection {
                    url: url.to_string(),
                    reason: e.to_string(),
                }
            } else {
                FetchError::Request {
                    url: url.to_string(),
                    reason: e.to_string(),
                }
            }
        };

        let mut response = self.client.get(url).send().await.map_err(classify)?;
        if !response.status().is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let path = destination.join(download_file_name(url));
        let io_err = |source| FetchError::Io {
            path: path.clone(),
            source,
        };

        tokio::fs::create_dir_all(destination)
            .await
            .map_err(|source| FetchError::Io {
                path: destination.to_path_buf(),
                source,
            })?;
        let mut file = tokio::fs::File::create(&path).await.map_err(io_err)?;
        while let Some(chunk) = response.chunk().await.map_err(classify)? {
            file.write_all(&chunk).await.map_err(io_err)?;
        }
        file.flush().await.map_err(io_err)?;

        log::debug!("Saved {} to {}", url, path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_is_last_segment() {
        assert_eq!(
            download_file_name(
                "https://github.com/linuxdeploy/linuxdeploy/releases/download/continuous/linuxdeploy-x86_64.AppImage"
            ),
            "linuxdeploy-x86_64.AppImage"
        );
    }

    #[test]
    fn file_name_ignores_query_string() {
        assert_eq!(
            download_file_name("https://example.com/tools/plugin.sh?raw=true"),
            "plugin.sh"
        );
    }

    #[test]
    fn file_name_falls_back_for_non_urls() {
        assert_eq!(download_file_name("mirror/tool.AppImage"), "tool.AppImage");
    }
}
