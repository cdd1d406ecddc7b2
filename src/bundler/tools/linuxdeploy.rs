//! linuxdeploy - assembles AppDirs into AppImages.
//!
//! Downloaded from the continuous release channel together with the plugins
//! the AppImage build may enable.

use super::{ManagedTool, ToolKind, ToolSource};
use crate::bundler::{
    error::{Error, Result},
    settings::Arch,
};
use std::path::Path;

pub(super) const NAME: &str = "linuxdeploy";

const LINUXDEPLOY_BASE_URL: &str =
    "https://github.com/linuxdeploy/linuxdeploy/releases/download/continuous";

const GTK_PLUGIN_URL: &str =
    "https://raw.githubusercontent.com/linuxdeploy/linuxdeploy-plugin-gtk/master/linuxdeploy-plugin-gtk.sh";

const APPIMAGE_PLUGIN_BASE_URL: &str =
    "https://github.com/linuxdeploy/linuxdeploy-plugin-appimage/releases/download/continuous";

/// Descriptor for the host's linuxdeploy build.
pub(super) fn describe(tools_dir: &Path, host_arch: Arch) -> Result<ManagedTool> {
    let arch = host_arch.appimage_name().ok_or_else(|| {
        Error::Configuration(format!(
            "linuxdeploy has no release for host architecture {}",
            host_arch
        ))
    })?;

    let artifact_name = format!("linuxdeploy-{}.AppImage", arch);
    let source = ToolSource::Download {
        primary: format!("{}/{}", LINUXDEPLOY_BASE_URL, artifact_name),
        auxiliary: vec![
            GTK_PLUGIN_URL.to_string(),
            format!(
                "{}/linuxdeploy-plugin-appimage-{}.AppImage",
                APPIMAGE_PLUGIN_BASE_URL, arch
            ),
        ],
    };

    Ok(ManagedTool::new(
        ToolKind::LinuxDeploy,
        "linuxdeploy",
        artifact_name,
        source,
        tools_dir,
    ))
}
