//! Collaborator traits consumed by the analyzer

use crate::error::WarehouseResult;
use async_trait::async_trait;
use bqva_core::{AccessEntry, CatalogObject, DatasetRef, ObjectRef};

/// Looks up catalog objects.
///
/// Implementations must be Send + Sync for async operation.
#[async_trait]
pub trait MetadataResolver: Send + Sync {
    /// Fetch the kind, identity and (for views) query text of `reference`.
    ///
    /// Fails with `WarehouseError::NotFound` when the object does not exist
    /// or is not visible to the caller.
    async fn resolve(&self, reference: &ObjectRef) -> WarehouseResult<CatalogObject>;
}

/// Reads and replaces a dataset's access-control list as a whole.
#[async_trait]
pub trait AccessControlGateway: Send + Sync {
    /// The dataset's current entries, in stored order
    async fn get_access_list(&self, dataset: &DatasetRef) -> WarehouseResult<Vec<AccessEntry>>;

    /// Replace the dataset's entries with `entries`
    async fn set_access_list(
        &self,
        dataset: &DatasetRef,
        entries: Vec<AccessEntry>,
    ) -> WarehouseResult<()>;

    /// Backend identifier for logging
    fn backend_name(&self) -> &'static str;
}
