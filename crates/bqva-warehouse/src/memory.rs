//! In-process warehouse backend
//!
//! Holds datasets, their objects and access lists behind a mutex, and keeps
//! an audit log of every trait call so callers can check exactly which
//! remote operations a run would have made.

use crate::error::{WarehouseError, WarehouseResult};
use crate::traits::{AccessControlGateway, MetadataResolver};
use async_trait::async_trait;
use bqva_core::{AccessEntry, CatalogObject, DatasetRef, ObjectKind, ObjectRef, TableId};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

/// One recorded trait call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WarehouseCall {
    Resolve(ObjectRef),
    GetAccess(DatasetRef),
    SetAccess(DatasetRef),
}

/// Contents of one dataset.
#[derive(Debug, Clone, Default)]
pub(crate) struct DatasetState {
    pub(crate) access: Vec<AccessEntry>,
    pub(crate) read_only: bool,
    pub(crate) objects: BTreeMap<TableId, ObjectKind>,
}

#[derive(Debug, Default)]
struct State {
    datasets: BTreeMap<DatasetRef, DatasetState>,
    calls: Vec<WarehouseCall>,
}

/// In-memory implementation of both warehouse traits.
#[derive(Debug, Default)]
pub struct MemoryWarehouse {
    state: Mutex<State>,
}

impl MemoryWarehouse {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> WarehouseResult<MutexGuard<'_, State>> {
        self.state
            .lock()
            .map_err(|e| WarehouseError::MutexPoisoned(e.to_string()))
    }

    /// Create an empty dataset if it does not exist yet.
    pub fn add_dataset(&self, dataset: DatasetRef) -> WarehouseResult<()> {
        self.lock()?.datasets.entry(dataset).or_default();
        Ok(())
    }

    /// Store `object`, creating its dataset when needed.
    pub fn insert_object(&self, object: CatalogObject) -> WarehouseResult<()> {
        let reference = object.reference().clone();
        let mut state = self.lock()?;
        state
            .datasets
            .entry(reference.dataset_ref())
            .or_default()
            .objects
            .insert(reference.table, object.kind().clone());
        Ok(())
    }

    /// Seed a dataset's access list without recording a call.
    pub fn seed_access(&self, dataset: DatasetRef, entries: Vec<AccessEntry>) -> WarehouseResult<()> {
        self.lock()?.datasets.entry(dataset).or_default().access = entries;
        Ok(())
    }

    /// Make writes to `dataset` fail with `PermissionDenied`.
    pub fn set_read_only(&self, dataset: &DatasetRef, read_only: bool) -> WarehouseResult<()> {
        let mut state = self.lock()?;
        let entry = state
            .datasets
            .get_mut(dataset)
            .ok_or_else(|| WarehouseError::NotFound(format!("dataset {}", dataset)))?;
        entry.read_only = read_only;
        Ok(())
    }

    /// Current access list of `dataset`, without recording a call.
    pub fn access_snapshot(&self, dataset: &DatasetRef) -> WarehouseResult<Option<Vec<AccessEntry>>> {
        Ok(self.lock()?.datasets.get(dataset).map(|d| d.access.clone()))
    }

    /// Every call made so far, oldest first.
    pub fn calls(&self) -> WarehouseResult<Vec<WarehouseCall>> {
        Ok(self.lock()?.calls.clone())
    }

    pub fn clear_calls(&self) -> WarehouseResult<()> {
        self.lock()?.calls.clear();
        Ok(())
    }

    /// Copy of every dataset, in identity order.
    pub(crate) fn datasets(&self) -> WarehouseResult<Vec<(DatasetRef, DatasetState)>> {
        Ok(self
            .lock()?
            .datasets
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }

    pub(crate) fn insert_dataset(&self, dataset: DatasetRef, contents: DatasetState) -> WarehouseResult<()> {
        self.lock()?.datasets.insert(dataset, contents);
        Ok(())
    }
}

#[async_trait]
impl MetadataResolver for MemoryWarehouse {
    async fn resolve(&self, reference: &ObjectRef) -> WarehouseResult<CatalogObject> {
        let mut state = self.lock()?;
        state.calls.push(WarehouseCall::Resolve(reference.clone()));

        let kind = state
            .datasets
            .get(&reference.dataset_ref())
            .and_then(|d| d.objects.get(&reference.table))
            .ok_or_else(|| WarehouseError::NotFound(format!("object {}", reference)))?;
        Ok(CatalogObject::new(reference.clone(), kind.clone()))
    }
}

#[async_trait]
impl AccessControlGateway for MemoryWarehouse {
    async fn get_access_list(&self, dataset: &DatasetRef) -> WarehouseResult<Vec<AccessEntry>> {
        let mut state = self.lock()?;
        state.calls.push(WarehouseCall::GetAccess(dataset.clone()));

        state
            .datasets
            .get(dataset)
            .map(|d| d.access.clone())
            .ok_or_else(|| WarehouseError::NotFound(format!("dataset {}", dataset)))
    }

    async fn set_access_list(
        &self,
        dataset: &DatasetRef,
        entries: Vec<AccessEntry>,
    ) -> WarehouseResult<()> {
        let mut state = self.lock()?;
        state.calls.push(WarehouseCall::SetAccess(dataset.clone()));

        let target = state
            .datasets
            .get_mut(dataset)
            .ok_or_else(|| WarehouseError::NotFound(format!("dataset {}", dataset)))?;
        if target.read_only {
            return Err(WarehouseError::PermissionDenied(format!(
                "cannot update access list of dataset {}",
                dataset
            )));
        }
        target.access = entries;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
#[path = "memory_test.rs"]
mod tests;
