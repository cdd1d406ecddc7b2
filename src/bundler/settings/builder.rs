//! Builder for constructing Settings.

use super::{BundleBinary, BundleSettings, PackageSettings, Settings};
use std::path::{Path, PathBuf};

/// Builder for constructing [`Settings`].
///
/// # Examples
///
/// ```no_run
/// use kodegen_bundler_pipeline::bundler::{SettingsBuilder, PackageSettings, BundleBinary};
///
/// # fn example() -> kodegen_bundler_pipeline::bundler::Result<()> {
/// let settings = SettingsBuilder::new()
///     .base_directory("/work/myapp")
///     .project_out_directory("/work/myapp/target/release")
///     .package_settings(PackageSettings {
///         product_name: "myapp".into(),
///         version: "1.0.0".into(),
///         description: "My application".into(),
///         ..Default::default()
///     })
///     .binaries(vec![BundleBinary::new("myapp".into(), true)])
///     .target("x86_64-unknown-linux-gnu".into())
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct SettingsBuilder {
    project_out_directory: Option<PathBuf>,
    base_directory: Option<PathBuf>,
    package_settings: Option<PackageSettings>,
    bundle_settings: BundleSettings,
    binaries: Vec<BundleBinary>,
    target: Option<String>,
}

impl SettingsBuilder {
    /// Creates a new settings builder.
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the directory holding compiled binaries. Required.
    pub fn project_out_directory<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.project_out_directory = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the application root directory. Required.
    pub fn base_directory<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.base_directory = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets package metadata. Required.
    pub fn package_settings(mut self, settings: PackageSettings) -> Self {
        self.package_settings = Some(settings);
        self
    }

    /// Sets bundle configuration.
    ///
    /// Default: Empty [`BundleSettings`]
    pub fn bundle_settings(mut self, settings: BundleSettings) -> Self {
        self.bundle_settings = settings;
        self
    }

    /// Sets binaries to bundle.
    pub fn binaries(mut self, binaries: Vec<BundleBinary>) -> Self {
        self.binaries = binaries;
        self
    }

    /// Sets target triple.
    ///
    /// If not set, uses the `TARGET` environment variable or the host architecture.
    pub fn target(mut self, target: String) -> Self {
        self.target = Some(target);
        self
    }

    /// Builds the settings.
    ///
    /// # Errors
    ///
    /// Returns an error if `project_out_directory`, `base_directory` or
    /// `package_settings` is missing.
    pub fn build(self) -> crate::bundler::Result<Settings> {
        use crate::bundler::error::Context;

        let target = self.target.unwrap_or_else(|| {
            std::env::var("TARGET").unwrap_or_else(|_| std::env::consts::ARCH.to_string())
        });

        Ok(Settings::new(
            self.package_settings
                .context("package_settings is required")?,
            self.bundle_settings,
            self.project_out_directory
                .context("project_out_directory is required")?,
            self.base_directory.context("base_directory is required")?,
            self.binaries,
            target,
        ))
    }
}
