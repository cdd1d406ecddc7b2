//! AppImage bundler - portable Linux applications.
//!
//! Create populates an AppDir (`usr/bin`, `usr/lib`, desktop entry, icon);
//! Build hands it to linuxdeploy, which is provisioned on first use.

use crate::bundler::{
    compose::{CommandContext, FormatProfile, Hooks, Layout, PathContext, SkeletonEntry},
    error::Result,
    settings::Settings,
    tools::ToolKind,
    utils::process::Invocation,
};
use async_trait::async_trait;
use handlebars::Handlebars;
use std::path::{Path, PathBuf};

const DESKTOP_TEMPLATE: &str = "[Desktop Entry]
Type=Application
Name={{name}}
Exec={{exec}}
Icon={{icon}}
{{#if comment}}Comment={{comment}}
{{/if}}{{#if category}}Categories={{category}};
{{/if}}Terminal=false
";

/// AppImage format.
#[derive(Debug, Default, Clone, Copy)]
pub struct LinuxAppImage;

impl FormatProfile for LinuxAppImage {
    fn platform(&self) -> &'static str {
        super::NAME
    }

    fn name(&self) -> &'static str {
        "appimage"
    }

    fn description(&self) -> &'static str {
        "Linux AppImage"
    }
}

/// linuxdeploy's name for the target architecture.
fn arch_name(app: &Settings) -> String {
    let arch = app.binary_arch();
    arch.appimage_name()
        .map(str::to_string)
        .unwrap_or_else(|| arch.to_string())
}

/// `<Formal_Name>-<version>-<arch>.AppImage`
fn appimage_name(app: &Settings) -> String {
    format!(
        "{}-{}-{}.AppImage",
        app.formal_name().replace(' ', "_"),
        app.version_string(),
        arch_name(app)
    )
}

fn desktop_path(app: &Settings, app_dir: &Path) -> PathBuf {
    app_dir.join(format!("{}.desktop", app.product_name()))
}

fn icon_path(app: &Settings, app_dir: &Path) -> PathBuf {
    app_dir.join(format!("{}.png", app.product_name()))
}

fn png_icon(app: &Settings) -> Option<&Path> {
    app.bundle_settings()
        .icon
        .as_deref()?
        .iter()
        .find(|p| p.extension().and_then(|e| e.to_str()) == Some("png"))
        .map(PathBuf::as_path)
}

/// Renders the freedesktop.org desktop entry.
fn desktop_entry(app: &Settings, exec: &str) -> Result<String> {
    let mut handlebars = Handlebars::new();
    handlebars.register_escape_fn(handlebars::no_escape);
    let data = serde_json::json!({
        "name": app.formal_name(),
        "exec": exec,
        "icon": app.product_name(),
        "comment": app.description(),
        "category": app.bundle_settings().category,
    });
    Ok(handlebars.render_template(DESKTOP_TEMPLATE, &data)?)
}

#[async_trait]
impl Hooks for LinuxAppImage {
    fn binary_path(&self, cx: &PathContext<'_>, bundle: &Path) -> Option<PathBuf> {
        Some(bundle.join(appimage_name(cx.app)))
    }

    fn project_path(&self, cx: &PathContext<'_>, bundle: &Path, _binary: &Path) -> Option<PathBuf> {
        Some(bundle.join(format!("{}.AppDir", cx.app.formal_name())))
    }

    /// The AppImage itself is what gets launched.
    fn executable_path(&self, _cx: &PathContext<'_>, _project: &Path, binary: &Path) -> Option<PathBuf> {
        Some(binary.to_path_buf())
    }

    fn distribution_path(&self, cx: &PathContext<'_>) -> Option<PathBuf> {
        Some(cx.app.dist_directory().join(appimage_name(cx.app)))
    }

    fn skeleton(&self, cx: &PathContext<'_>, layout: &Layout) -> Result<Option<Vec<SkeletonEntry>>> {
        let app_dir = &layout.project;
        let bin_dir = app_dir.join("usr/bin");

        let mut entries = vec![
            SkeletonEntry::Dir(bin_dir.clone()),
            SkeletonEntry::Dir(app_dir.join("usr/lib")),
            SkeletonEntry::File {
                path: desktop_path(cx.app, app_dir),
                contents: desktop_entry(cx.app, &crate::bundler::platform::executable_name(cx))?
                    .into_bytes(),
            },
        ];
        for binary in cx.app.binaries() {
            entries.push(SkeletonEntry::Copy {
                from: cx.app.binary_path(binary, None),
                to: bin_dir.join(binary.name()),
                executable: true,
            });
        }
        if let Some(icon) = png_icon(cx.app) {
            entries.push(SkeletonEntry::Copy {
                from: icon.to_path_buf(),
                to: icon_path(cx.app, app_dir),
                executable: false,
            });
        }
        Ok(Some(entries))
    }

    async fn build_app(&self, cx: &mut CommandContext) -> Result<bool> {
        let linuxdeploy = cx.tool(ToolKind::LinuxDeploy).await?;
        let bundle = cx.bundle_path()?;
        let app_dir = cx.project_path()?;
        let appimage = cx.binary_path()?;
        let app = cx.settings();

        let mut invocation = Invocation::new(linuxdeploy.executable())
            .env("OUTPUT", appimage.display().to_string())
            .env("ARCH", arch_name(app))
            .arg("--appdir")
            .path_arg(&app_dir)
            .arg("--desktop-file")
            .path_arg(&desktop_path(app, &app_dir));
        let icon = icon_path(app, &app_dir);
        if icon.exists() {
            invocation = invocation.arg("--icon-file").path_arg(&icon);
        }
        for plugin in &app.bundle_settings().linuxdeploy_plugins {
            invocation = invocation.args(["--plugin", plugin.as_str()]);
        }
        let invocation = invocation.args(["--output", "appimage"]).current_dir(bundle);

        cx.run(&invocation).await?;
        Ok(true)
    }
}
