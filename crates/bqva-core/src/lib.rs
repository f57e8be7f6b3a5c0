//! bqva-core - Core library for the BigQuery view analyzer
//!
//! This crate provides the shared data model used across all bqva
//! components: validated identifiers, catalog objects, dataset access
//! entries, the dependency-tree arena and configuration parsing.

pub mod access;
pub mod catalog;
pub mod config;
pub mod error;
pub mod identifier;
mod newtype_string;
pub mod tree;

pub use access::{find_view_grant, AccessEntity, AccessEntry};
pub use catalog::{CatalogObject, ObjectKind, QueryDialect};
pub use config::{BackendConfig, Config};
pub use error::{CoreError, CoreResult};
pub use identifier::{DatasetId, DatasetRef, ObjectRef, ProjectId, TableId};
pub use tree::{DependencyNode, DependencyTree, Edge, NodeId};
