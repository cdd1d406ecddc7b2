//! Application descriptor types.
//!
//! [`Settings`] is the opaque application description every composed command
//! carries. It is built once (usually from `Cargo.toml`, see
//! [`crate::metadata`]) and read by stages and profiles.

mod arch;
mod builder;
mod bundle;
mod core;
mod package;

pub use arch::Arch;
pub use builder::SettingsBuilder;
pub use bundle::{BundleBinary, BundleSettings};
pub use core::Settings;
pub use package::PackageSettings;
