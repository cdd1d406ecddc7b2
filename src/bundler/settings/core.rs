//! Core Settings struct and implementations.

use super::{Arch, BundleBinary, BundleSettings, PackageSettings};
use std::path::{Path, PathBuf};

/// The application descriptor consumed by every stage.
///
/// Constructed via [`SettingsBuilder`](super::SettingsBuilder). Stages and
/// profiles only ever read it.
///
/// # Examples
///
/// ```no_run
/// use kodegen_bundler_pipeline::bundler::{BundleBinary, PackageSettings, SettingsBuilder};
///
/// # fn example() -> kodegen_bundler_pipeline::bundler::Result<()> {
/// let settings = SettingsBuilder::new()
///     .base_directory(".")
///     .project_out_directory("target/release")
///     .package_settings(PackageSettings {
///         product_name: "myapp".into(),
///         version: "1.0.0".into(),
///         description: "My application".into(),
///         ..Default::default()
///     })
///     .binaries(vec![BundleBinary::new("myapp".into(), true)])
///     .build()?;
/// assert_eq!(settings.formal_name(), "myapp");
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Settings {
    package: PackageSettings,
    bundle_settings: BundleSettings,

    /// Where compiled binaries are located, typically `target/release`.
    project_out_directory: PathBuf,

    /// Application root; `build/` and `dist/` live under it.
    base_directory: PathBuf,

    binaries: Vec<BundleBinary>,

    /// Target triple (e.g., "x86_64-unknown-linux-gnu").
    target: String,
}

impl Settings {
    /// Returns the machine name of the application.
    pub fn product_name(&self) -> &str {
        &self.package.product_name
    }

    /// Returns the human-readable application name.
    pub fn formal_name(&self) -> &str {
        self.bundle_settings
            .formal_name
            .as_deref()
            .or(self.package.formal_name.as_deref())
            .unwrap_or(&self.package.product_name)
    }

    /// Returns the version string.
    pub fn version_string(&self) -> &str {
        &self.package.version
    }

    /// Returns the package description.
    pub fn description(&self) -> &str {
        &self.package.description
    }

    /// Returns the package homepage URL.
    pub fn homepage(&self) -> Option<&str> {
        self.package.homepage.as_deref()
    }

    /// Returns the package authors.
    pub fn authors(&self) -> Option<&[String]> {
        self.package.authors.as_deref()
    }

    /// Returns the bundle identifier, defaulting to `com.example.<product_name>`.
    pub fn bundle_identifier(&self) -> String {
        self.bundle_settings
            .identifier
            .clone()
            .unwrap_or_else(|| format!("com.example.{}", self.product_name()))
    }

    /// Returns the project output directory.
    pub fn project_out_directory(&self) -> &Path {
        &self.project_out_directory
    }

    /// Returns the application root directory.
    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    /// Root of all generated bundles.
    pub fn build_directory(&self) -> PathBuf {
        self.base_directory.join("build")
    }

    /// Where packaged distributables are written.
    pub fn dist_directory(&self) -> PathBuf {
        self.base_directory.join("dist")
    }

    /// Returns the target triple.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Detects the binary architecture from the target triple.
    pub fn binary_arch(&self) -> Arch {
        Arch::from_target_triple(&self.target)
    }

    /// Returns the binaries to bundle.
    pub fn binaries(&self) -> &[BundleBinary] {
        &self.binaries
    }

    /// Returns the main binary, or the first one if none is flagged.
    pub fn main_binary(&self) -> Option<&BundleBinary> {
        self.binaries
            .iter()
            .find(|b| b.main())
            .or_else(|| self.binaries.first())
    }

    /// Returns the path of a compiled binary, with `extension` appended when given.
    pub fn binary_path(&self, binary: &BundleBinary, extension: Option<&str>) -> PathBuf {
        let mut path = self.project_out_directory.join(binary.name());
        if let Some(extension) = extension {
            path.set_extension(extension);
        }
        path
    }

    /// Returns the bundle settings.
    pub fn bundle_settings(&self) -> &BundleSettings {
        &self.bundle_settings
    }

    /// Creates a new Settings instance (used by SettingsBuilder).
    pub(super) fn new(
        package: PackageSettings,
        bundle_settings: BundleSettings,
        project_out_directory: PathBuf,
        base_directory: PathBuf,
        binaries: Vec<BundleBinary>,
        target: String,
    ) -> Self {
        Self {
            package,
            bundle_settings,
            project_out_directory,
            base_directory,
            binaries,
            target,
        }
    }
}
