//! Error types for bqva-analyzer

use bqva_core::CoreError;
use bqva_warehouse::WarehouseError;
use thiserror::Error;

/// Analysis and reconciliation errors
#[derive(Error, Debug)]
pub enum AnalyzerError {
    /// A001: The object to analyze is not a view
    #[error("[A001] '{object}' is a {kind}; only views can be analyzed")]
    InvalidKind { object: String, kind: &'static str },

    /// A002: A view depends on itself through its query chain
    #[error("[A002] Cyclic view dependency: {}", path.join(" -> "))]
    CyclicDependency { path: Vec<String> },

    /// Collaborator failure, surfaced unchanged
    #[error(transparent)]
    Warehouse(#[from] WarehouseError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl AnalyzerError {
    /// Whether a referenced object or dataset could not be found.
    pub fn is_not_found(&self) -> bool {
        matches!(self, AnalyzerError::Warehouse(e) if e.is_not_found())
    }

    /// Whether an access-control write was denied or conflicted.
    pub fn is_access_control(&self) -> bool {
        matches!(self, AnalyzerError::Warehouse(e) if e.is_access_control())
    }
}

/// Result type alias for AnalyzerError
pub type AnalyzerResult<T> = Result<T, AnalyzerError>;
