//! Error types for bqva-warehouse

use bqva_core::CoreError;
use thiserror::Error;

/// Warehouse operation errors
#[derive(Error, Debug)]
pub enum WarehouseError {
    /// Object or dataset does not exist, or the caller cannot see it (W001)
    #[error("[W001] Not found: {0}")]
    NotFound(String),

    /// The caller may not read or change the resource (W002)
    #[error("[W002] Permission denied: {0}")]
    PermissionDenied(String),

    /// The resource changed since it was read (W003)
    #[error("[W003] Conflicting update: {0}")]
    Conflict(String),

    /// Network or HTTP client failure (W004)
    #[error("[W004] Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Any other non-success API response (W005)
    #[error("[W005] API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// The API answered with something we could not interpret (W006)
    #[error("[W006] Invalid response: {0}")]
    InvalidResponse(String),

    /// Mutex poisoned (W007)
    #[error("[W007] Warehouse mutex poisoned: {0}")]
    MutexPoisoned(String),

    /// Catalog file could not be read, parsed or written (W008)
    #[error("[W008] Catalog error: {0}")]
    Catalog(String),

    /// An identifier returned by the warehouse failed validation (W009)
    #[error("[W009] {0}")]
    Identifier(#[from] CoreError),
}

impl WarehouseError {
    /// Whether this is a NotFoundError.
    pub fn is_not_found(&self) -> bool {
        matches!(self, WarehouseError::NotFound(_))
    }

    /// Whether this is an AccessControlError (denied or conflicting write).
    pub fn is_access_control(&self) -> bool {
        matches!(
            self,
            WarehouseError::PermissionDenied(_) | WarehouseError::Conflict(_)
        )
    }
}

/// Result type alias for WarehouseError
pub type WarehouseResult<T> = Result<T, WarehouseError>;
