//! bqva-analyzer: view dependency analysis and access reconciliation
//!
//! [`TreeBuilder`] resolves a view and everything its query reads into a
//! [`DependencyTree`](bqva_core::DependencyTree); [`Reconciler`] walks that
//! tree and grants or revokes the authorized-view entries each
//! cross-dataset edge needs.

pub(crate) mod builder;
pub(crate) mod error;
pub(crate) mod reconcile;

#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;

pub use builder::TreeBuilder;
pub use error::{AnalyzerError, AnalyzerResult};
pub use reconcile::{
    AuthorizationStatus, EdgeOutcome, EdgeReport, ReconcileAction, ReconcileReport, Reconciler,
};
