//! Bundle configuration and binary definitions.

use std::path::PathBuf;

/// Bundle configuration shared by every platform and format.
///
/// # Configuration
///
/// Add to `Cargo.toml`:
///
/// ```toml
/// [package.metadata.bundle]
/// identifier = "com.example.app"
/// formal_name = "Example App"
/// publisher = "Example Inc."
/// icon = ["assets/icon.png", "assets/icon.icns"]
/// category = "Utility"
/// signing_identity = "Developer ID Application: Example Inc. (TEAMID)"
/// linuxdeploy_plugins = ["gtk"]
/// publish_channel = "/srv/releases/example"
/// ```
#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(default)]
pub struct BundleSettings {
    /// Reverse-DNS bundle identifier (CFBundleIdentifier on macOS).
    pub identifier: Option<String>,

    /// Display name override; wins over `PackageSettings::formal_name`.
    pub formal_name: Option<String>,

    /// Publisher / manufacturer shown by installers.
    pub publisher: Option<String>,

    /// Application category (freedesktop category on Linux).
    pub category: Option<String>,

    /// Copyright line.
    pub copyright: Option<String>,

    /// Icon files; formats pick the extension they understand.
    pub icon: Option<Vec<PathBuf>>,

    /// Code signing identity applied by Package. Build always signs ad-hoc.
    pub signing_identity: Option<String>,

    /// Entitlements plist passed to the signing tool.
    pub entitlements: Option<PathBuf>,

    /// Minimum macOS version (LSMinimumSystemVersion).
    pub minimum_system_version: Option<String>,

    /// linuxdeploy plugins to enable during an AppImage build (e.g. `gtk`).
    pub linuxdeploy_plugins: Vec<String>,

    /// Directory the Publish stage copies packaged artifacts into.
    pub publish_channel: Option<PathBuf>,
}

/// A binary to include in the bundle.
#[derive(Clone, Debug)]
pub struct BundleBinary {
    name: String,
    main: bool,
}

impl BundleBinary {
    /// Creates a new bundle binary.
    ///
    /// * `name` - executable name, without extension
    /// * `main` - whether this is the binary launched by Run and desktop entries
    pub fn new(name: String, main: bool) -> Self {
        Self { name, main }
    }

    /// Marks the binary as the main one.
    pub fn set_main(&mut self, main: bool) {
        self.main = main;
    }

    /// Whether this is the main binary.
    pub fn main(&self) -> bool {
        self.main
    }

    /// Binary name.
    pub fn name(&self) -> &str {
        &self.name
    }
}
