//! Revoke command implementation

use anyhow::Result;
use bqva_analyzer::ReconcileAction;

use crate::cli::{GlobalArgs, ReconcileArgs};
use crate::commands::common;

/// Execute the revoke command
pub(crate) async fn execute(args: &ReconcileArgs, global: &GlobalArgs) -> Result<()> {
    common::reconcile(args, global, ReconcileAction::Revoke).await
}
