//! Windows NSIS installer creation.
//!
//! Create stages the binaries under `<bundle>/src/` next to a generated
//! `installer.nsi`; Build compiles it with the system `makensis`.
//!
//! # Module Organization
//!
//! - `template` - NSI script template constant
//! - `script` - NSI script generation from templates
//! - `utils` - Architecture mapping, version formatting, BOM handling

mod script;
mod template;
mod utils;

use crate::bundler::{
    compose::{CommandContext, FormatProfile, Hooks, Layout, PathContext, SkeletonEntry},
    error::Result,
    settings::Settings,
    tools::ToolKind,
    utils::process::Invocation,
};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

const SCRIPT_NAME: &str = "installer.nsi";

/// NSIS installer format.
#[derive(Debug, Default, Clone, Copy)]
pub struct WindowsNsis;

impl FormatProfile for WindowsNsis {
    fn platform(&self) -> &'static str {
        super::NAME
    }

    fn name(&self) -> &'static str {
        "nsis"
    }

    fn description(&self) -> &'static str {
        "Windows NSIS installer"
    }
}

/// `<product>_<version>_<arch>-setup.exe`
fn installer_name(app: &Settings) -> String {
    format!(
        "{}_{}_{}-setup.exe",
        app.product_name(),
        app.version_string(),
        utils::map_arch(app.binary_arch())
    )
}

#[async_trait]
impl Hooks for WindowsNsis {
    fn binary_path(&self, cx: &PathContext<'_>, bundle: &Path) -> Option<PathBuf> {
        Some(bundle.join(installer_name(cx.app)))
    }

    fn project_path(&self, _cx: &PathContext<'_>, bundle: &Path, _binary: &Path) -> Option<PathBuf> {
        Some(bundle.to_path_buf())
    }

    fn executable_path(&self, cx: &PathContext<'_>, project: &Path, _binary: &Path) -> Option<PathBuf> {
        Some(
            project
                .join("src")
                .join(format!("{}.exe", crate::bundler::platform::executable_name(cx))),
        )
    }

    fn distribution_path(&self, cx: &PathContext<'_>) -> Option<PathBuf> {
        Some(cx.app.dist_directory().join(installer_name(cx.app)))
    }

    fn skeleton(&self, cx: &PathContext<'_>, layout: &Layout) -> Result<Option<Vec<SkeletonEntry>>> {
        let src = layout.project.join("src");
        let main_binary = crate::bundler::platform::executable_name(cx);
        let script = script::render_nsi_script(cx.app, &main_binary, &installer_name(cx.app))?;

        let mut entries = vec![
            SkeletonEntry::Dir(src.clone()),
            SkeletonEntry::File {
                path: layout.project.join(SCRIPT_NAME),
                contents: utils::with_utf8_bom(&script),
            },
        ];
        for binary in cx.app.binaries() {
            entries.push(SkeletonEntry::Copy {
                from: cx.app.binary_path(binary, Some("exe")),
                to: src.join(format!("{}.exe", binary.name())),
                executable: false,
            });
        }
        Ok(Some(entries))
    }

    async fn build_app(&self, cx: &mut CommandContext) -> Result<bool> {
        let makensis = cx.tool(ToolKind::Makensis).await?;
        let project = cx.project_path()?;
        let installer = cx.binary_path()?;

        let invocation = Invocation::new(makensis.executable())
            .args(["-V3", "-INPUTCHARSET", "UTF8", "-OUTPUTCHARSET", "UTF8"])
            .arg(format!("-DOUTPUT_FILE={}", installer.display()))
            .path_arg(&project.join(SCRIPT_NAME))
            .current_dir(&project);
        cx.run(&invocation).await?;
        Ok(true)
    }
}
