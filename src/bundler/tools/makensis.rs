//! makensis - the NSIS compiler.
//!
//! Not downloadable as a standalone binary; users install it with their
//! package manager (e.g. `apt-get install nsis`), so it is looked up on `PATH`.

use super::{ManagedTool, ToolKind, ToolSource};
use std::path::Path;

pub(super) const NAME: &str = "makensis";

pub(super) fn describe(tools_dir: &Path) -> ManagedTool {
    ManagedTool::new(
        ToolKind::Makensis,
        "NSIS (makensis)",
        NAME.to_string(),
        ToolSource::System,
        tools_dir,
    )
}
