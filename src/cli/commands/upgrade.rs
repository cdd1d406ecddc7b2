//! `upgrade`: refresh installed managed tools.

use crate::{
    bundler::{ToolKind, ToolRegistry},
    cli::RuntimeConfig,
    error::{CliError, Result},
};

/// Upgrades the named tools, or every installed managed tool when `names`
/// is empty.
pub async fn upgrade(config: &RuntimeConfig, names: &[String]) -> Result<i32> {
    let env = config.tool_environment()?;

    let kinds = if names.is_empty() {
        let mut installed = Vec::new();
        for kind in ToolKind::ALL {
            let tool = match kind.describe(&env) {
                Ok(tool) => tool,
                Err(e) => {
                    log::debug!("Skipping {}: {}", kind, e);
                    continue;
                }
            };
            if tool.is_managed() && tool.exists(&env).await {
                installed.push(*kind);
            } else {
                log::debug!("Skipping {}: not an installed managed tool", kind);
            }
        }
        if installed.is_empty() {
            log::info!("No managed tools are installed in {}", env.tools_dir().display());
        }
        installed
    } else {
        names
            .iter()
            .map(|name| {
                ToolKind::from_name(name).ok_or_else(|| CliError::InvalidArguments {
                    reason: format!(
                        "unknown tool `{}`; known tools: {}",
                        name,
                        ToolKind::ALL
                            .iter()
                            .map(|k| k.name())
                            .collect::<Vec<_>>()
                            .join(", ")
                    ),
                })
            })
            .collect::<std::result::Result<Vec<_>, _>>()?
    };

    let mut registry = ToolRegistry::new(env);
    for kind in kinds {
        registry.upgrade(kind).await?;
        log::info!("✓ Upgraded {}", kind);
    }
    Ok(0)
}
