//! Command line argument parsing.
//!
//! One subcommand per stage, each taking an optional platform and format,
//! plus the `doctor` and `upgrade` tool maintenance commands.

use crate::bundler::{
    Arch, HostEnvironment, Stage, ToolEnvironment,
    error::Error,
    utils::{fs::LocalFs, http::HttpFetcher, process::SystemRunner},
};
use clap::{Parser, Subcommand};
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

/// Staged native packaging for Rust applications
#[derive(Parser, Debug)]
#[command(
    name = "kodegen_bundler_pipeline",
    version,
    about = "Staged native packaging for Rust applications",
    long_about = "Creates, builds, packages and publishes native bundles for a Rust application.

Every stage takes an optional PLATFORM (macos, linux, windows; defaults to the host)
and FORMAT (app, appimage, nsis; defaults to the platform's first format).
Helper tools such as linuxdeploy are downloaded on first use.

Usage:
  kodegen_bundler_pipeline create linux
  kodegen_bundler_pipeline build linux appimage
  kodegen_bundler_pipeline package
  kodegen_bundler_pipeline doctor"
)]
pub struct Args {
    /// Application manifest
    #[arg(long, value_name = "PATH", default_value = "Cargo.toml", global = true)]
    pub manifest: PathBuf,

    /// Directory managed tools are installed into
    #[arg(long, value_name = "DIR", env = "KODEGEN_TOOLS_DIR", global = true)]
    pub tools_dir: Option<PathBuf>,

    /// Directory holding the compiled binaries [default: <manifest dir>/target/release]
    #[arg(long, value_name = "DIR", global = true)]
    pub binary_dir: Option<PathBuf>,

    /// Target triple of the compiled binaries [default: host]
    #[arg(long, value_name = "TRIPLE", global = true)]
    pub target: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create and populate a bundle
    Create(StageArgs),
    /// Re-apply the bundle skeleton onto an existing bundle
    Update(StageArgs),
    /// Open the bundle folder
    Open(StageArgs),
    /// Build the bundle
    Build(StageArgs),
    /// Run the built bundle
    Run(StageArgs),
    /// Package the bundle for distribution
    Package(StageArgs),
    /// Publish the packaged bundle
    Publish(StageArgs),
    /// Report every helper tool without installing anything
    Doctor,
    /// Upgrade installed helper tools (all managed tools when none given)
    Upgrade {
        /// Tools to upgrade (e.g. linuxdeploy)
        #[arg(value_name = "TOOL")]
        tools: Vec<String>,
    },
}

impl Command {
    /// The stage this subcommand runs, if it is a stage subcommand.
    pub fn stage(&self) -> Option<(Stage, &StageArgs)> {
        match self {
            Self::Create(args) => Some((Stage::Create, args)),
            Self::Update(args) => Some((Stage::Update, args)),
            Self::Open(args) => Some((Stage::Open, args)),
            Self::Build(args) => Some((Stage::Build, args)),
            Self::Run(args) => Some((Stage::Run, args)),
            Self::Package(args) => Some((Stage::Package, args)),
            Self::Publish(args) => Some((Stage::Publish, args)),
            Self::Doctor | Self::Upgrade { .. } => None,
        }
    }
}

/// Platform/format selector shared by every stage subcommand.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct StageArgs {
    /// Target platform [default: host platform]
    #[arg(value_name = "PLATFORM")]
    pub platform: Option<String>,

    /// Output format [default: the platform's default format]
    #[arg(value_name = "FORMAT")]
    pub format: Option<String>,

    /// Application to operate on; must match the manifest's package name
    #[arg(short, long, value_name = "NAME")]
    pub app: Option<String>,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    manifest: PathBuf,
    tools_dir: PathBuf,
    binary_dir: PathBuf,
    target: Option<String>,
}

impl From<&Args> for RuntimeConfig {
    fn from(args: &Args) -> Self {
        let root = args
            .manifest
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let tools_dir = args.tools_dir.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .map(|cache| cache.join("kodegen").join("tools"))
                .unwrap_or_else(|| root.join(".kodegen").join("tools"))
        });

        let binary_dir = args
            .binary_dir
            .clone()
            .unwrap_or_else(|| root.join("target").join("release"));

        Self {
            manifest: args.manifest.clone(),
            tools_dir,
            binary_dir,
            target: args.target.clone(),
        }
    }
}

impl RuntimeConfig {
    /// Application manifest path.
    pub fn manifest(&self) -> &Path {
        &self.manifest
    }

    /// Shared tools directory.
    pub fn tools_dir(&self) -> &Path {
        &self.tools_dir
    }

    /// Directory holding the compiled binaries.
    pub fn binary_dir(&self) -> &Path {
        &self.binary_dir
    }

    /// Target triple override.
    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    /// Tool environment backed by the network and the local filesystem.
    pub fn tool_environment(&self) -> Result<ToolEnvironment, Error> {
        let host_arch = Arch::host().ok_or_else(|| {
            Error::Configuration(format!(
                "unsupported host architecture `{}`",
                std::env::consts::ARCH
            ))
        })?;
        Ok(ToolEnvironment::new(
            &self.tools_dir,
            host_arch,
            Arc::new(HttpFetcher::new()),
            Arc::new(LocalFs),
        ))
    }

    /// Host capabilities for composed commands.
    pub fn host_environment(&self) -> Result<HostEnvironment, Error> {
        Ok(HostEnvironment::new(
            self.tool_environment()?,
            Arc::new(SystemRunner),
        ))
    }
}
