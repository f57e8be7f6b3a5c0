//! Offline YAML catalog backend
//!
//! A catalog file describes datasets, their access lists and the tables and
//! views they hold. It loads into a [`MemoryWarehouse`] and can be written
//! back after access lists were changed.
//!
//! ```yaml
//! datasets:
//!   - project: my-project
//!     dataset: reporting
//!     access:
//!       - role: OWNER
//!         member: { entity_type: specialGroup, entity_id: projectOwners }
//!       - view: { project: my-project, dataset: marts, table: sales }
//!     objects:
//!       - name: orders
//!         kind: table
//!       - name: recent_orders
//!         kind: view
//!         dialect: standard
//!         query: SELECT * FROM reporting.orders
//! ```

use crate::error::{WarehouseError, WarehouseResult};
use crate::memory::{DatasetState, MemoryWarehouse};
use bqva_core::{AccessEntry, DatasetId, DatasetRef, ObjectKind, ProjectId, TableId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

/// Root of a catalog file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogFile {
    #[serde(default)]
    pub datasets: Vec<DatasetSpec>,
}

/// One dataset and its contents
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatasetSpec {
    pub project: ProjectId,
    pub dataset: DatasetId,

    /// Reject access-list writes, as a dataset the caller cannot administer
    #[serde(default, skip_serializing_if = "is_false")]
    pub read_only: bool,

    #[serde(default)]
    pub access: Vec<AccessEntry>,

    #[serde(default)]
    pub objects: Vec<ObjectSpec>,
}

/// A table or view inside a dataset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectSpec {
    pub name: TableId,
    #[serde(flatten)]
    pub kind: ObjectKind,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl CatalogFile {
    /// Read and parse a catalog file
    pub fn load(path: &Path) -> WarehouseResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            WarehouseError::Catalog(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::parse(&content)
            .map_err(|e| WarehouseError::Catalog(format!("{}: {}", path.display(), e)))
    }

    /// Parse catalog YAML
    pub fn parse(content: &str) -> WarehouseResult<Self> {
        let catalog: CatalogFile = serde_yaml::from_str(content)
            .map_err(|e| WarehouseError::Catalog(e.to_string()))?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Write the catalog as YAML
    pub fn save(&self, path: &Path) -> WarehouseResult<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| WarehouseError::Catalog(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| {
            WarehouseError::Catalog(format!("failed to write {}: {}", path.display(), e))
        })
    }

    fn validate(&self) -> WarehouseResult<()> {
        let mut seen = BTreeSet::new();
        for spec in &self.datasets {
            let key = DatasetRef::new(spec.project.clone(), spec.dataset.clone());
            if !seen.insert(key.clone()) {
                return Err(WarehouseError::Catalog(format!(
                    "dataset {} is listed more than once",
                    key
                )));
            }

            let mut names = BTreeSet::new();
            for object in &spec.objects {
                if !names.insert(&object.name) {
                    return Err(WarehouseError::Catalog(format!(
                        "object {}.{} is listed more than once",
                        key, object.name
                    )));
                }
            }
        }
        Ok(())
    }

    /// Build an in-memory warehouse holding this catalog
    pub fn into_warehouse(self) -> WarehouseResult<MemoryWarehouse> {
        let warehouse = MemoryWarehouse::new();
        for spec in self.datasets {
            let key = DatasetRef::new(spec.project, spec.dataset);
            let state = DatasetState {
                access: spec.access,
                read_only: spec.read_only,
                objects: spec
                    .objects
                    .into_iter()
                    .map(|o| (o.name, o.kind))
                    .collect(),
            };
            warehouse.insert_dataset(key, state)?;
        }
        log::debug!("Loaded catalog into memory warehouse");
        Ok(warehouse)
    }

    /// Capture the current contents of `warehouse`
    pub fn from_warehouse(warehouse: &MemoryWarehouse) -> WarehouseResult<Self> {
        let datasets = warehouse
            .datasets()?
            .into_iter()
            .map(|(key, state)| DatasetSpec {
                project: key.project,
                dataset: key.dataset,
                read_only: state.read_only,
                access: state.access,
                objects: state
                    .objects
                    .into_iter()
                    .map(|(name, kind)| ObjectSpec { name, kind })
                    .collect(),
            })
            .collect();
        Ok(Self { datasets })
    }
}

#[cfg(test)]
#[path = "catalog_file_test.rs"]
mod tests;
