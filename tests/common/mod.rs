//! Test doubles for the host capabilities and small fixture helpers.

#![allow(dead_code)]

use async_trait::async_trait;
use kodegen_bundler_pipeline::bundler::{
    Arch, BundleBinary, BundleSettings, HostEnvironment, PackageSettings, Settings,
    SettingsBuilder, ToolEnvironment,
    error::Result,
    utils::{
        fs::{HostFs, LocalFs},
        http::{FetchError, Fetcher, download_file_name},
        process::{Invocation, ProcessRunner},
    },
};
use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

/// Writes a placeholder for every URL and records the order of requests.
///
/// URLs containing `fail_on` fail with the configured error instead.
#[derive(Default)]
pub struct RecordingFetcher {
    fetched: Mutex<Vec<String>>,
    fail_on: Option<(String, FailWith)>,
}

#[derive(Clone, Copy)]
pub enum FailWith {
    Connection,
    Status,
}

impl RecordingFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(fragment: &str, with: FailWith) -> Self {
        Self {
            fetched: Mutex::new(Vec::new()),
            fail_on: Some((fragment.to_string(), with)),
        }
    }

    pub fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }
}

#[async_trait]
impl Fetcher for RecordingFetcher {
    async fn fetch(&self, url: &str, destination: &Path) -> std::result::Result<PathBuf, FetchError> {
        self.fetched.lock().unwrap().push(url.to_string());

        if let Some((fragment, with)) = &self.fail_on {
            if url.contains(fragment.as_str()) {
                return Err(match with {
                    FailWith::Connection => FetchError::Connection {
                        url: url.to_string(),
                        reason: "connection refused".into(),
                    },
                    FailWith::Status => FetchError::Status {
                        url: url.to_string(),
                        status: 404,
                    },
                });
            }
        }

        let path = destination.join(download_file_name(url));
        tokio::fs::create_dir_all(destination).await.unwrap();
        tokio::fs::write(&path, b"#!/bin/sh\n").await.unwrap();
        Ok(path)
    }
}

/// [`LocalFs`] that counts existence checks, deletions, chmods and `PATH`
/// lookups. Only programs registered with [`CountingFs::put_on_path`] are
/// found on `PATH`.
#[derive(Default)]
pub struct CountingFs {
    exists_calls: Mutex<Vec<PathBuf>>,
    removed: Mutex<Vec<PathBuf>>,
    made_executable: Mutex<Vec<PathBuf>>,
    on_path: Mutex<Vec<(String, PathBuf)>>,
    which_calls: Mutex<usize>,
}

impl CountingFs {
    pub fn put_on_path(&self, program: &str, path: &Path) {
        self.on_path
            .lock()
            .unwrap()
            .push((program.to_string(), path.to_path_buf()));
    }

    pub fn which_calls(&self) -> usize {
        *self.which_calls.lock().unwrap()
    }

    pub fn made_executable(&self) -> Vec<PathBuf> {
        self.made_executable.lock().unwrap().clone()
    }

    pub fn exists_calls_for(&self, path: &Path) -> usize {
        self.exists_calls
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.as_path() == path)
            .count()
    }

    pub fn removed(&self) -> Vec<PathBuf> {
        self.removed.lock().unwrap().clone()
    }
}

#[async_trait]
impl HostFs for CountingFs {
    async fn exists(&self, path: &Path) -> bool {
        self.exists_calls.lock().unwrap().push(path.to_path_buf());
        LocalFs.exists(path).await
    }

    async fn remove_file(&self, path: &Path) -> Result<()> {
        self.removed.lock().unwrap().push(path.to_path_buf());
        LocalFs.remove_file(path).await
    }

    async fn set_executable(&self, path: &Path) -> Result<()> {
        self.made_executable.lock().unwrap().push(path.to_path_buf());
        LocalFs.set_executable(path).await
    }

    fn which(&self, program: &str) -> Option<PathBuf> {
        *self.which_calls.lock().unwrap() += 1;
        self.on_path
            .lock()
            .unwrap()
            .iter()
            .find(|(name, _)| name == program)
            .map(|(_, path)| path.clone())
    }
}

/// Records invocations instead of spawning them.
#[derive(Default)]
pub struct RecordingRunner {
    invocations: Mutex<Vec<Invocation>>,
}

impl RecordingRunner {
    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProcessRunner for RecordingRunner {
    async fn run(&self, invocation: &Invocation) -> Result<()> {
        self.invocations.lock().unwrap().push(invocation.clone());
        Ok(())
    }
}

/// A tool environment on x86_64 rooted at `tools_dir`.
pub fn tool_env(tools_dir: &Path, fetcher: Arc<RecordingFetcher>, fs: Arc<CountingFs>) -> ToolEnvironment {
    ToolEnvironment::new(tools_dir, Arch::X86_64, fetcher, fs)
}

/// Host fakes bundled together.
pub struct FakeHost {
    pub fetcher: Arc<RecordingFetcher>,
    pub fs: Arc<CountingFs>,
    pub runner: Arc<RecordingRunner>,
    pub host: HostEnvironment,
}

pub fn fake_host(tools_dir: &Path) -> FakeHost {
    let fetcher = Arc::new(RecordingFetcher::new());
    let fs = Arc::new(CountingFs::default());
    let runner = Arc::new(RecordingRunner::default());
    let host = HostEnvironment::new(
        tool_env(tools_dir, Arc::clone(&fetcher), Arc::clone(&fs)),
        Arc::clone(&runner) as Arc<dyn ProcessRunner>,
    );
    FakeHost {
        fetcher,
        fs,
        runner,
        host,
    }
}

/// An app rooted at `root` with a compiled `hello` binary in `root/target/release`.
pub fn hello_app(root: &Path, bundle: BundleSettings) -> Settings {
    let out = root.join("target").join("release");
    std::fs::create_dir_all(&out).unwrap();
    std::fs::write(out.join("hello"), b"\x7fELF").unwrap();

    SettingsBuilder::new()
        .base_directory(root)
        .project_out_directory(&out)
        .package_settings(PackageSettings {
            product_name: "hello".into(),
            formal_name: Some("Hello World".into()),
            version: "0.2.0".into(),
            description: "Says hello".into(),
            ..Default::default()
        })
        .bundle_settings(bundle)
        .binaries(vec![BundleBinary::new("hello".into(), true)])
        .target("x86_64-unknown-linux-gnu".into())
        .build()
        .unwrap()
}
