//! Helpers shared by the commands

use anyhow::{Context, Result};
use bqva_analyzer::{ReconcileAction, Reconciler, TreeBuilder};
use bqva_core::{DependencyTree, ObjectRef};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::IsTerminal;
use std::time::Duration;

use crate::cli::{GlobalArgs, ReconcileArgs, ReportOutput};
use crate::commands::render::{self, Palette};
use crate::context::RuntimeContext;

/// A spinner on stderr, only when stderr is interactive
pub(crate) fn spinner(message: String) -> Option<ProgressBar> {
    if !std::io::stderr().is_terminal() {
        return None;
    }
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.yellow} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    Some(pb)
}

pub(crate) fn finish(spinner: Option<ProgressBar>) {
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }
}

/// Resolve the dependency tree of `view`
pub(crate) async fn build_tree(ctx: &RuntimeContext, view: &ObjectRef) -> Result<DependencyTree> {
    TreeBuilder::new(ctx.resolver())
        .build(view)
        .await
        .with_context(|| format!("Failed to build dependency tree for '{}'", view))
}

/// Shared body of `authorize` and `revoke`
pub(crate) async fn reconcile(
    args: &ReconcileArgs,
    global: &GlobalArgs,
    action: ReconcileAction,
) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let view = ctx.parse_view(&args.view)?;

    let message = match action {
        ReconcileAction::Authorize => format!(
            "Applying nested authorized view permissions for view '{}'",
            view
        ),
        ReconcileAction::Revoke => format!(
            "Revoking nested authorized view permissions for view '{}'",
            view
        ),
    };
    let progress = spinner(message);
    let reconciler = Reconciler::new(ctx.gateway()).dry_run(args.dry_run);
    let result = async {
        let tree = build_tree(&ctx, &view).await?;
        let report = match action {
            ReconcileAction::Authorize => reconciler.apply(&tree).await,
            ReconcileAction::Revoke => reconciler.revoke(&tree).await,
        }
        .with_context(|| format!("Failed to {} authorized views for '{}'", action, view))?;
        Ok::<_, anyhow::Error>((tree, report))
    }
    .await;
    finish(progress);

    // Writes made before a failure are kept.
    ctx.persist()?;
    let (tree, report) = result?;

    match args.output {
        ReportOutput::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        ReportOutput::Text => {
            let palette = Palette::detect();
            let status = reconciler
                .status(&tree)
                .await
                .context("Failed to read authorization status")?;
            print!("{}", render::format_report(&report, palette));
            println!();
            print!("{}", render::format_tree(&tree, Some(&status), palette));
        }
    }
    Ok(())
}
