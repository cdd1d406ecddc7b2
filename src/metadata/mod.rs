//! Application descriptor loading from a single Cargo.toml

use crate::bundler::{BundleBinary, BundleSettings, PackageSettings, Settings, SettingsBuilder};
use crate::error::{BundlerError, CliError, Result};
use std::path::{Path, PathBuf};

/// Package metadata extracted from Cargo.toml
#[derive(Debug, Clone)]
pub struct PackageMetadata {
    /// Package name from Cargo.toml
    pub name: String,

    /// Package description from Cargo.toml
    pub description: String,

    /// Package version from Cargo.toml (e.g., "0.1.0")
    pub version: String,

    /// List of package authors from Cargo.toml
    pub authors: Vec<String>,

    /// Homepage URL if specified in Cargo.toml
    pub homepage: Option<String>,
}

/// Complete manifest data from Cargo.toml
#[derive(Debug, Clone)]
pub struct CargoManifest {
    /// Directory containing the manifest; the application root.
    pub root: PathBuf,

    /// Package metadata ([package] section)
    pub metadata: PackageMetadata,

    /// Binary names, main binary first (from [[bin]] or package.name)
    pub binaries: Vec<String>,

    /// Bundle settings (from [package.metadata.bundle] section + asset discovery)
    pub bundle_settings: BundleSettings,
}

impl CargoManifest {
    /// Builds the application descriptor.
    ///
    /// `binary_dir` is where the compiled binaries live; `target` overrides
    /// the target triple.
    pub fn into_settings(self, binary_dir: &Path, target: Option<String>) -> Result<Settings> {
        let binaries = self
            .binaries
            .iter()
            .enumerate()
            .map(|(i, name)| BundleBinary::new(name.clone(), i == 0))
            .collect();

        let mut builder = SettingsBuilder::new()
            .base_directory(&self.root)
            .project_out_directory(binary_dir)
            .package_settings(PackageSettings {
                product_name: self.metadata.name,
                formal_name: None,
                version: self.metadata.version,
                description: self.metadata.description,
                homepage: self.metadata.homepage,
                authors: Some(self.metadata.authors),
            })
            .bundle_settings(self.bundle_settings)
            .binaries(binaries);
        if let Some(target) = target {
            builder = builder.target(target);
        }
        Ok(builder.build()?)
    }
}

fn invalid(reason: impl Into<String>) -> BundlerError {
    BundlerError::Cli(CliError::InvalidArguments {
        reason: reason.into(),
    })
}

/// Load complete manifest from Cargo.toml (single read + parse)
pub fn load_manifest(cargo_toml_path: &Path) -> Result<CargoManifest> {
    let manifest = std::fs::read_to_string(cargo_toml_path).map_err(|e| {
        BundlerError::Cli(CliError::ExecutionFailed {
            command: "read_cargo_toml".to_string(),
            reason: format!("Failed to read {}: {}", cargo_toml_path.display(), e),
        })
    })?;

    let root = cargo_toml_path
        .parent()
        .map(|p| {
            if p.as_os_str().is_empty() {
                Path::new(".")
            } else {
                p
            }
        })
        .ok_or_else(|| invalid("Invalid Cargo.toml path"))?
        .to_path_buf();

    parse_manifest(&manifest, root)
}

/// Parses manifest text; relative bundle paths are resolved against `root`.
pub fn parse_manifest(manifest: &str, root: PathBuf) -> Result<CargoManifest> {
    let toml_value: toml::Value = toml::from_str(manifest)?;

    let package = toml_value
        .get("package")
        .ok_or_else(|| invalid("No [package] section in Cargo.toml"))?;

    let name = package
        .get("name")
        .and_then(|v| v.as_str())
        .ok_or_else(|| invalid("Missing 'name' in [package]"))?
        .to_string();

    let metadata = PackageMetadata {
        description: package
            .get("description")
            .and_then(|v| v.as_str())
            .unwrap_or("Rust application")
            .to_string(),

        version: package
            .get("version")
            .and_then(|v| v.as_str())
            .ok_or_else(|| invalid("Missing 'version' in [package]"))?
            .to_string(),

        authors: package
            .get("authors")
            .and_then(|v| v.as_array())
            .map(|arr| {
                arr.iter()
                    .filter_map(|v| v.as_str().map(String::from))
                    .collect()
            })
            .unwrap_or_default(),

        homepage: package
            .get("homepage")
            .and_then(|v| v.as_str())
            .map(String::from),

        name,
    };

    // [[bin]] entries in declaration order; the package name otherwise
    let mut binaries: Vec<String> = toml_value
        .get("bin")
        .and_then(|v| v.as_array())
        .map(|arr| {
            arr.iter()
                .filter_map(|bin| bin.get("name").and_then(|v| v.as_str()))
                .map(String::from)
                .collect()
        })
        .unwrap_or_default();
    if binaries.is_empty() {
        binaries.push(metadata.name.clone());
    }

    let mut bundle_settings = parse_bundle_settings(&toml_value)?;
    resolve_paths(&root, &mut bundle_settings);
    if bundle_settings.icon.is_none() {
        discover_bundle_assets(&root, &mut bundle_settings);
    }

    Ok(CargoManifest {
        root,
        metadata,
        binaries,
        bundle_settings,
    })
}

/// Parse bundle settings from [package.metadata.bundle] section
fn parse_bundle_settings(toml_value: &toml::Value) -> Result<BundleSettings> {
    match toml_value
        .get("package")
        .and_then(|p| p.get("metadata"))
        .and_then(|m| m.get("bundle"))
    {
        Some(bundle) => Ok(bundle.clone().try_into()?),
        None => Ok(BundleSettings::default()),
    }
}

fn resolve_paths(root: &Path, settings: &mut BundleSettings) {
    let resolve = |p: &mut PathBuf| {
        if p.is_relative() {
            *p = root.join(&*p);
        }
    };
    if let Some(icons) = settings.icon.as_mut() {
        icons.iter_mut().for_each(resolve);
    }
    if let Some(entitlements) = settings.entitlements.as_mut() {
        resolve(entitlements);
    }
    if let Some(channel) = settings.publish_channel.as_mut() {
        resolve(channel);
    }
}

/// Discover bundle icons from `assets/img/` when none are configured
///
/// - icon.icns (macOS)
/// - icon.ico (Windows)
/// - icon_256x256.png, icon_512x512.png, icon_128x128.png (Linux, first found wins in the AppDir)
fn discover_bundle_assets(package_root: &Path, settings: &mut BundleSettings) {
    let assets_dir = package_root.join("assets").join("img");

    if !assets_dir.exists() {
        log::debug!("Assets directory not found: {}", assets_dir.display());
        return;
    }

    let icons: Vec<PathBuf> = [
        "icon.icns",
        "icon.ico",
        "icon_256x256.png",
        "icon_512x512.png",
        "icon_128x128.png",
    ]
    .iter()
    .map(|filename| assets_dir.join(filename))
    .filter(|path| path.exists())
    .collect();

    if icons.is_empty() {
        log::warn!("No icon files found in {}", assets_dir.display());
    } else {
        log::info!("Discovered {} icon files", icons.len());
        settings.icon = Some(icons);
    }
}
