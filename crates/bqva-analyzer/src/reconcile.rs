//! Authorized-view reconciliation over a dependency tree
//!
//! Every decision is local to one `(child, parent)` edge: the child's
//! dataset must authorize the parent view unless both live in the same
//! dataset. Access lists are rewritten whole; nothing already written is
//! undone when a later edge fails.

use crate::error::AnalyzerResult;
use bqva_core::{find_view_grant, AccessEntry, DatasetRef, DependencyTree, NodeId, ObjectRef};
use bqva_warehouse::AccessControlGateway;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Which reconciliation was run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconcileAction {
    Authorize,
    Revoke,
}

impl fmt::Display for ReconcileAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReconcileAction::Authorize => write!(f, "authorize"),
            ReconcileAction::Revoke => write!(f, "revoke"),
        }
    }
}

/// What happened on one edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeOutcome {
    /// Parent and child share a dataset; nothing to grant or revoke
    SameDataset,
    /// The grant was already present
    AlreadyAuthorized,
    /// The grant was added (or would be, in a dry run)
    Granted,
    /// The grant was removed (or would be, in a dry run)
    Revoked,
    /// There was no grant to remove
    NotAuthorized,
}

impl EdgeOutcome {
    /// Whether the edge changed (or would change) an access list.
    pub fn is_change(self) -> bool {
        matches!(self, EdgeOutcome::Granted | EdgeOutcome::Revoked)
    }

    pub fn label(self) -> &'static str {
        match self {
            EdgeOutcome::SameDataset => "same dataset",
            EdgeOutcome::AlreadyAuthorized => "already authorized",
            EdgeOutcome::Granted => "granted",
            EdgeOutcome::Revoked => "revoked",
            EdgeOutcome::NotAuthorized => "not authorized",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EdgeReport {
    pub child: ObjectRef,
    pub parent: ObjectRef,
    pub outcome: EdgeOutcome,
}

/// Result of one reconciliation run, edges in level order.
#[derive(Debug, Clone, Serialize)]
pub struct ReconcileReport {
    pub action: ReconcileAction,
    pub dry_run: bool,
    pub started_at: DateTime<Utc>,
    pub edges: Vec<EdgeReport>,
}

impl ReconcileReport {
    fn new(action: ReconcileAction, dry_run: bool) -> Self {
        Self {
            action,
            dry_run,
            started_at: Utc::now(),
            edges: Vec::new(),
        }
    }

    /// Number of edges that changed (or would change) an access list.
    pub fn changes(&self) -> usize {
        self.edges.iter().filter(|e| e.outcome.is_change()).count()
    }

    pub fn count(&self, outcome: EdgeOutcome) -> usize {
        self.edges.iter().filter(|e| e.outcome == outcome).count()
    }
}

/// Per-node authorization state: `None` for the root, otherwise whether the
/// node's dataset lets its parent view read it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationStatus {
    by_node: Vec<Option<bool>>,
}

impl AuthorizationStatus {
    pub fn get(&self, id: NodeId) -> Option<bool> {
        self.by_node.get(id.index()).copied().flatten()
    }

    /// Whether every edge is authorized.
    pub fn all_authorized(&self) -> bool {
        self.by_node.iter().all(|s| s.unwrap_or(true))
    }
}

/// Access lists a dry run would have written, by dataset.
type StagedLists = HashMap<DatasetRef, Vec<AccessEntry>>;

/// Grants and revokes authorized-view entries through a gateway.
pub struct Reconciler<'a> {
    gateway: &'a dyn AccessControlGateway,
    dry_run: bool,
}

impl<'a> Reconciler<'a> {
    pub fn new(gateway: &'a dyn AccessControlGateway) -> Self {
        Self {
            gateway,
            dry_run: false,
        }
    }

    /// Read access lists and report, but never write them. Changes a dry run
    /// would have made are remembered for the rest of the run, so a later
    /// edge on the same dataset sees them.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Make every child dataset authorize its parent view.
    pub async fn apply(&self, tree: &DependencyTree) -> AnalyzerResult<ReconcileReport> {
        log::info!("Applying permissions...");
        let mut report = ReconcileReport::new(ReconcileAction::Authorize, self.dry_run);
        let mut staged = HashMap::new();

        for edge in tree.edges() {
            let child = tree.object(edge.child).reference();
            let parent = tree.object(edge.parent).reference();

            let outcome = if child.same_dataset(parent) {
                log::info!(
                    "{}: same project/dataset as '{}', no action required",
                    child,
                    parent
                );
                EdgeOutcome::SameDataset
            } else {
                self.authorize_edge(child, parent, &mut staged).await?
            };

            report.edges.push(EdgeReport {
                child: child.clone(),
                parent: parent.clone(),
                outcome,
            });
        }
        Ok(report)
    }

    async fn authorize_edge(
        &self,
        child: &ObjectRef,
        parent: &ObjectRef,
        staged: &mut StagedLists,
    ) -> AnalyzerResult<EdgeOutcome> {
        let dataset = child.dataset_ref();
        let mut entries = self.read_list(&dataset, staged).await?;
        if find_view_grant(&entries, parent).is_some() {
            log::info!("{}: parent object '{}' is already authorized", child, parent);
            return Ok(EdgeOutcome::AlreadyAuthorized);
        }

        log::info!(
            "{}: authorizing view '{}' with dataset '{}'",
            child,
            parent,
            dataset
        );
        entries.push(AccessEntry::authorized_view(parent.clone()));
        self.write_list(dataset, entries, staged).await?;
        Ok(EdgeOutcome::Granted)
    }

    /// Remove the grants `apply` would have made.
    pub async fn revoke(&self, tree: &DependencyTree) -> AnalyzerResult<ReconcileReport> {
        log::info!("Revoking permissions...");
        let mut report = ReconcileReport::new(ReconcileAction::Revoke, self.dry_run);
        let mut staged = HashMap::new();

        for edge in tree.edges() {
            let child = tree.object(edge.child).reference();
            let parent = tree.object(edge.parent).reference();

            let outcome = if child.same_dataset(parent) {
                EdgeOutcome::SameDataset
            } else {
                self.revoke_edge(child, parent, &mut staged).await?
            };

            report.edges.push(EdgeReport {
                child: child.clone(),
                parent: parent.clone(),
                outcome,
            });
        }
        Ok(report)
    }

    async fn revoke_edge(
        &self,
        child: &ObjectRef,
        parent: &ObjectRef,
        staged: &mut StagedLists,
    ) -> AnalyzerResult<EdgeOutcome> {
        let dataset = child.dataset_ref();
        let mut entries = self.read_list(&dataset, staged).await?;
        let Some(position) = find_view_grant(&entries, parent) else {
            log::debug!("{}: parent object '{}' is not authorized", child, parent);
            return Ok(EdgeOutcome::NotAuthorized);
        };

        log::info!(
            "{}: revoking view '{}' from dataset '{}'",
            child,
            parent,
            dataset
        );
        entries.remove(position);
        self.write_list(dataset, entries, staged).await?;
        Ok(EdgeOutcome::Revoked)
    }

    /// The dataset's list as this run last left it.
    async fn read_list(
        &self,
        dataset: &DatasetRef,
        staged: &StagedLists,
    ) -> AnalyzerResult<Vec<AccessEntry>> {
        if let Some(entries) = staged.get(dataset) {
            return Ok(entries.clone());
        }
        Ok(self.gateway.get_access_list(dataset).await?)
    }

    async fn write_list(
        &self,
        dataset: DatasetRef,
        entries: Vec<AccessEntry>,
        staged: &mut StagedLists,
    ) -> AnalyzerResult<()> {
        if self.dry_run {
            staged.insert(dataset, entries);
        } else {
            self.gateway.set_access_list(&dataset, entries).await?;
        }
        Ok(())
    }

    /// Authorization state of every node, reading each dataset's list once.
    pub async fn status(&self, tree: &DependencyTree) -> AnalyzerResult<AuthorizationStatus> {
        let mut lists: HashMap<DatasetRef, Vec<AccessEntry>> = HashMap::new();
        let mut by_node = vec![None; tree.len()];

        for edge in tree.edges() {
            let child = tree.object(edge.child).reference();
            let parent = tree.object(edge.parent).reference();

            let authorized = if child.same_dataset(parent) {
                true
            } else {
                let dataset = child.dataset_ref();
                if !lists.contains_key(&dataset) {
                    let entries = self.gateway.get_access_list(&dataset).await?;
                    lists.insert(dataset.clone(), entries);
                }
                lists
                    .get(&dataset)
                    .is_some_and(|entries| find_view_grant(entries, parent).is_some())
            };
            by_node[edge.child.index()] = Some(authorized);
        }
        Ok(AuthorizationStatus { by_node })
    }
}

#[cfg(test)]
#[path = "reconcile_test.rs"]
mod tests;
