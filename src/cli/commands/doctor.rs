//! `doctor`: report helper tools without installing anything.

use crate::{
    bundler::{Error, ToolKind, ToolRegistry},
    cli::RuntimeConfig,
    error::Result,
};

/// Prints one line per tool. Exits 1 if any tool is unavailable.
pub async fn doctor(config: &RuntimeConfig) -> Result<i32> {
    let mut registry = ToolRegistry::new(config.tool_environment()?);
    println!("Tools directory: {}", config.tools_dir().display());

    let mut missing = 0;
    for kind in ToolKind::ALL {
        match registry.resolve_with(*kind, false).await {
            Ok(handle) => println!(
                "✓ {:<12} {}",
                kind.name(),
                handle.executable().display()
            ),
            Err(e @ (Error::MissingTool { .. } | Error::Configuration(_))) => {
                missing += 1;
                println!("✗ {:<12} {}", kind.name(), e);
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(if missing == 0 { 0 } else { 1 })
}
