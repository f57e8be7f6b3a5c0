//! Export command implementation

use anyhow::{Context, Result};

use crate::cli::{ExportArgs, GlobalArgs};
use crate::commands::common;
use crate::context::RuntimeContext;

/// Execute the export command
pub(crate) async fn execute(args: &ExportArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let view = ctx.parse_view(&args.view)?;

    let progress = common::spinner(format!(
        "Exporting dependency tree for view '{}'",
        view
    ));
    let result = common::build_tree(&ctx, &view).await;
    common::finish(progress);
    let tree = result?;

    std::fs::write(&args.file, tree.to_dot())
        .with_context(|| format!("Failed to write {}", args.file.display()))?;
    println!("Graph saved to: {}", args.file.display());
    Ok(())
}
