//! bqva-warehouse - Warehouse abstraction layer for bqva
//!
//! This crate provides the `MetadataResolver` and `AccessControlGateway`
//! traits together with three implementations: an in-memory warehouse,
//! a YAML catalog file that loads into it, and the BigQuery REST API.

pub mod bigquery;
pub mod catalog_file;
pub mod error;
pub mod memory;
pub mod traits;

pub use bigquery::{BigQueryClient, FALLBACK_TOKEN_ENV};
pub use catalog_file::CatalogFile;
pub use error::{WarehouseError, WarehouseResult};
pub use memory::{MemoryWarehouse, WarehouseCall};
pub use traits::{AccessControlGateway, MetadataResolver};
