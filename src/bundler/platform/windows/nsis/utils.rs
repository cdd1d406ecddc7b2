//! NSIS utility functions.

use crate::bundler::settings::Arch;

/// NSIS architecture identifier, falling back to the generic arch name.
pub fn map_arch(arch: Arch) -> String {
    arch.nsis_name()
        .map(str::to_string)
        .unwrap_or_else(|| arch.to_string())
}

/// Format version string for NSIS VIProductVersion.
///
/// NSIS requires exactly 4 numeric parts (major.minor.patch.build):
/// - "1" -> "1.0.0.0"
/// - "1.2.3" -> "1.2.3.0"
/// - "1.2.3.4.5" -> "1.2.3.4"
///
/// Pre-release and build metadata (`-beta.1`, `+sha`) are dropped.
pub fn format_version_for_nsis(version: &str) -> String {
    let core = version
        .split(['-', '+'])
        .next()
        .unwrap_or(version);
    let mut parts: Vec<&str> = core.split('.').filter(|p| !p.is_empty()).take(4).collect();
    while parts.len() < 4 {
        parts.push("0");
    }
    parts.join(".")
}

/// Prefixes `content` with the UTF-8 BOM NSIS expects.
pub fn with_utf8_bom(content: &str) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(content.len() + 3);
    bytes.extend_from_slice(&[0xEF, 0xBB, 0xBF]);
    bytes.extend_from_slice(content.as_bytes());
    bytes
}
