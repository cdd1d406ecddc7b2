//! macOS `.app` bundles, distributed as DMG images.
//!
//! Layout of the bundle directory:
//!
//! ```text
//! <Formal Name>.app/
//!   Contents/
//!     Info.plist
//!     PkgInfo
//!     MacOS/<executable>
//!     Resources/<icon>.icns
//! ```

use crate::bundler::{
    compose::{CommandContext, FormatProfile, Hooks, Layout, PathContext, SkeletonEntry},
    error::Result,
    settings::Settings,
    utils::{fs, process::Invocation},
};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// `.app` bundle format.
#[derive(Debug, Default, Clone, Copy)]
pub struct MacosApp;

impl FormatProfile for MacosApp {
    fn platform(&self) -> &'static str {
        super::NAME
    }

    fn name(&self) -> &'static str {
        "app"
    }

    fn description(&self) -> &'static str {
        "macOS app"
    }
}

#[async_trait]
impl Hooks for MacosApp {
    fn binary_path(&self, cx: &PathContext<'_>, bundle: &Path) -> Option<PathBuf> {
        Some(bundle.join(format!("{}.app", cx.app.formal_name())))
    }

    fn project_path(&self, _cx: &PathContext<'_>, _bundle: &Path, binary: &Path) -> Option<PathBuf> {
        Some(binary.join("Contents"))
    }

    fn executable_path(&self, cx: &PathContext<'_>, project: &Path, _binary: &Path) -> Option<PathBuf> {
        Some(project.join("MacOS").join(crate::bundler::platform::executable_name(cx)))
    }

    fn distribution_path(&self, cx: &PathContext<'_>) -> Option<PathBuf> {
        Some(cx.app.dist_directory().join(format!(
            "{}-{}.dmg",
            cx.app.formal_name(),
            cx.app.version_string()
        )))
    }

    fn skeleton(&self, cx: &PathContext<'_>, layout: &Layout) -> Result<Option<Vec<SkeletonEntry>>> {
        let executable = crate::bundler::platform::executable_name(cx);
        let resources = layout.project.join("Resources");

        let mut entries = vec![
            SkeletonEntry::Dir(layout.project.join("MacOS")),
            SkeletonEntry::Dir(resources.clone()),
            SkeletonEntry::File {
                path: layout.project.join("Info.plist"),
                contents: info_plist(cx.app, &executable)?,
            },
            SkeletonEntry::File {
                path: layout.project.join("PkgInfo"),
                contents: b"APPL????".to_vec(),
            },
        ];
        if let Some(binary) = cx.app.main_binary() {
            entries.push(SkeletonEntry::Copy {
                from: cx.app.binary_path(binary, None),
                to: layout.executable.clone(),
                executable: true,
            });
        }
        if let Some(icon) = icns_icon(cx.app) {
            entries.push(SkeletonEntry::Copy {
                from: icon.to_path_buf(),
                to: resources.join(format!("{}.icns", cx.app.product_name())),
                executable: false,
            });
        }
        Ok(Some(entries))
    }

    async fn build_app(&self, cx: &mut CommandContext) -> Result<bool> {
        cx.sign_app("-").await?;
        Ok(true)
    }

    async fn package_app(&self, cx: &mut CommandContext) -> Result<bool> {
        if let Some(identity) = cx.settings().bundle_settings().signing_identity.clone() {
            cx.sign_app(&identity).await?;
        }

        let bundle = cx.bundle_path()?;
        let app = cx.binary_path()?;
        let dmg = cx.distribution_path()?;

        let staging = bundle.join("dmg-staging");
        fs::create_dir_all(&staging, true).await?;
        let app_name = app.file_name().map(PathBuf::from).unwrap_or_default();
        fs::copy_dir(&app, &staging.join(app_name)).await?;
        fs::symlink(Path::new("/Applications"), &staging.join("Applications"), true)?;

        let hdiutil = Invocation::new("hdiutil")
            .arg("create")
            .arg("-volname")
            .arg(cx.settings().formal_name())
            .arg("-srcfolder")
            .path_arg(&staging)
            .arg("-ov")
            .args(["-format", "UDZO"])
            .path_arg(&dmg);
        let result = cx.run(&hdiutil).await;
        fs::remove_dir_all(&staging).await?;
        result?;
        Ok(true)
    }
}

fn icns_icon(app: &Settings) -> Option<&Path> {
    app.bundle_settings()
        .icon
        .as_deref()?
        .iter()
        .find(|p| p.extension().and_then(|e| e.to_str()) == Some("icns"))
        .map(PathBuf::as_path)
}

/// Renders `Contents/Info.plist`.
fn info_plist(app: &Settings, executable: &str) -> Result<Vec<u8>> {
    let mut dict = plist::Dictionary::new();
    dict.insert("CFBundleDevelopmentRegion".into(), "en".into());
    dict.insert("CFBundleDisplayName".into(), app.formal_name().into());
    dict.insert("CFBundleExecutable".into(), executable.into());
    dict.insert("CFBundleIdentifier".into(), app.bundle_identifier().into());
    dict.insert("CFBundleInfoDictionaryVersion".into(), "6.0".into());
    dict.insert("CFBundleName".into(), app.formal_name().into());
    dict.insert("CFBundlePackageType".into(), "APPL".into());
    dict.insert("CFBundleShortVersionString".into(), app.version_string().into());
    dict.insert("CFBundleVersion".into(), app.version_string().into());
    if icns_icon(app).is_some() {
        dict.insert("CFBundleIconFile".into(), app.product_name().into());
    }
    if let Some(category) = &app.bundle_settings().category {
        dict.insert("LSApplicationCategoryType".into(), category.as_str().into());
    }
    let minimum = app
        .bundle_settings()
        .minimum_system_version
        .as_deref()
        .unwrap_or("10.13");
    dict.insert("LSMinimumSystemVersion".into(), minimum.into());
    if let Some(copyright) = &app.bundle_settings().copyright {
        dict.insert("NSHumanReadableCopyright".into(), copyright.as_str().into());
    }
    dict.insert("NSHighResolutionCapable".into(), true.into());

    let mut contents = Vec::new();
    plist::Value::Dictionary(dict).to_writer_xml(&mut contents)?;
    Ok(contents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::settings::{BundleBinary, BundleSettings, PackageSettings, SettingsBuilder};

    fn settings() -> Settings {
        SettingsBuilder::new()
            .base_directory("/work/demo")
            .project_out_directory("/work/demo/target/release")
            .package_settings(PackageSettings {
                product_name: "demo".into(),
                formal_name: Some("Demo App".into()),
                version: "1.2.3".into(),
                ..Default::default()
            })
            .bundle_settings(BundleSettings {
                identifier: Some("org.example.demo".into()),
                ..Default::default()
            })
            .binaries(vec![BundleBinary::new("demo".into(), true)])
            .build()
            .unwrap()
    }

    #[test]
    fn info_plist_names_the_executable_and_identifier() {
        let xml = String::from_utf8(info_plist(&settings(), "demo").unwrap()).unwrap();
        assert!(xml.contains("<string>org.example.demo</string>"));
        assert!(xml.contains("<key>CFBundleExecutable</key>"));
        assert!(xml.contains("<string>1.2.3</string>"));
    }

    #[test]
    fn app_paths_use_the_formal_name() {
        let app = settings();
        let cx = PathContext {
            app: &app,
            platform: "macos",
            format: "app",
        };
        let bundle = PathBuf::from("/work/demo/build/demo/macos/app");
        let binary = MacosApp.binary_path(&cx, &bundle).unwrap();
        assert_eq!(binary, bundle.join("Demo App.app"));
        let project = MacosApp.project_path(&cx, &bundle, &binary).unwrap();
        assert_eq!(
            MacosApp.executable_path(&cx, &project, &binary).unwrap(),
            binary.join("Contents/MacOS/demo")
        );
        assert_eq!(
            MacosApp.distribution_path(&cx).unwrap(),
            PathBuf::from("/work/demo/dist/Demo App-1.2.3.dmg")
        );
    }
}
