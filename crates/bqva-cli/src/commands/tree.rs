//! Tree command implementation

use anyhow::{Context, Result};
use bqva_analyzer::Reconciler;

use crate::cli::{GlobalArgs, TreeArgs, TreeOutput};
use crate::commands::common;
use crate::commands::render::{self, Palette};
use crate::context::RuntimeContext;

/// Execute the tree command
pub(crate) async fn execute(args: &TreeArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let view = ctx.parse_view(&args.view)?;

    let progress = common::spinner(format!("Fetching dependency tree for view '{}'", view));
    let result = async {
        let tree = common::build_tree(&ctx, &view).await?;
        let status = if args.status {
            let status = Reconciler::new(ctx.gateway())
                .status(&tree)
                .await
                .context("Failed to read authorization status")?;
            Some(status)
        } else {
            None
        };
        Ok::<_, anyhow::Error>((tree, status))
    }
    .await;
    common::finish(progress);
    let (tree, status) = result?;

    match args.output {
        TreeOutput::Text => {
            let palette = Palette::detect();
            if !args.no_key {
                println!("{}", render::format_key(palette));
            }
            print!("{}", render::format_tree(&tree, status.as_ref(), palette));
        }
        TreeOutput::Json => {
            let json = render::tree_json(&tree, status.as_ref());
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        TreeOutput::Dot => print!("{}", tree.to_dot()),
    }
    Ok(())
}
