//! Bundler core: command composition and managed tool provisioning.
//!
//! # Module Organization
//!
//! - [`compose`] - Fragment contracts, precedence table, composer
//! - [`stages`] - Create, Update, Open, Build, Run, Package, Publish
//! - [`platform`] - macOS, Linux and Windows profiles
//! - [`tools`] - Managed external tools and the per-command registry
//! - [`settings`] - Application descriptor
//! - [`utils`] - Filesystem, fetch, process and checksum helpers
//! - [`error`] - Error taxonomy

pub mod compose;
pub mod error;
pub mod platform;
pub mod settings;
pub mod stages;
pub mod tools;
pub mod utils;

pub use compose::{Command, CommandContext, Composer, HostEnvironment, ProfileRegistry, Stage, StageOutcome};
pub use error::{Error, Result};
pub use settings::{Arch, BundleBinary, BundleSettings, PackageSettings, Settings, SettingsBuilder};
pub use tools::{ManagedTool, ToolEnvironment, ToolHandle, ToolKind, ToolRegistry};
pub use utils::checksum::BundledArtifact;
