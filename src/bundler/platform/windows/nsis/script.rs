//! NSIS installer script generation.
//!
//! Renders `installer.nsi` from the template with handlebars. The script
//! installs everything staged under the bundle's `src/` directory.

use super::{template::NSI_TEMPLATE, utils};
use crate::bundler::{error::Result, settings::Settings};
use handlebars::Handlebars;
use std::collections::BTreeMap;

/// Renders the installer script for `settings`.
///
/// `installer_name` is the default output file; Build overrides it with
/// `-DOUTPUT_FILE`.
pub fn render_nsi_script(settings: &Settings, main_binary: &str, installer_name: &str) -> Result<String> {
    let mut handlebars = Handlebars::new();
    handlebars.register_escape_fn(handlebars::no_escape);

    let bundle = settings.bundle_settings();
    let mut data = BTreeMap::new();
    data.insert("formal_name", settings.formal_name().to_string());
    data.insert("version", settings.version_string().to_string());
    data.insert(
        "version_nsis",
        utils::format_version_for_nsis(settings.version_string()),
    );
    data.insert("description", settings.description().to_string());
    data.insert(
        "publisher",
        bundle
            .publisher
            .as_deref()
            .unwrap_or("Unknown Publisher")
            .to_string(),
    );
    if let Some(copyright) = &bundle.copyright {
        data.insert("copyright", copyright.clone());
    }
    // Backslashes are joined here; `\{{` would be an escaped mustache.
    data.insert(
        "install_dir",
        format!("$LOCALAPPDATA\\Programs\\{}", settings.formal_name()),
    );
    data.insert(
        "shortcut",
        format!("$SMPROGRAMS\\{}.lnk", settings.formal_name()),
    );
    data.insert("main_exe", format!("$INSTDIR\\{}.exe", main_binary));
    data.insert("installer_name", installer_name.to_string());

    Ok(handlebars.render_template(NSI_TEMPLATE, &data)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::settings::{BundleSettings, PackageSettings, SettingsBuilder};

    #[test]
    fn script_carries_metadata() {
        let settings = SettingsBuilder::new()
            .base_directory("C:/work/demo")
            .project_out_directory("C:/work/demo/target/release")
            .package_settings(PackageSettings {
                product_name: "demo".into(),
                formal_name: Some("Demo App".into()),
                version: "1.2.3".into(),
                ..Default::default()
            })
            .bundle_settings(BundleSettings {
                publisher: Some("Example Org".into()),
                ..Default::default()
            })
            .build()
            .unwrap();

        let script = render_nsi_script(&settings, "demo", "demo_1.2.3_x64-setup.exe").unwrap();
        assert!(script.contains("Name \"Demo App\""));
        assert!(script.contains("VIProductVersion \"1.2.3.0\""));
        assert!(script.contains("\"CompanyName\" \"Example Org\""));
        assert!(script.contains("$INSTDIR\\demo.exe"));
        assert!(!script.contains("LegalCopyright"));
    }
}
