//! Runtime context for CLI commands

use anyhow::{Context, Result};
use bqva_core::{BackendConfig, Config, ObjectRef, ProjectId};
use bqva_warehouse::{
    AccessControlGateway, BigQueryClient, CatalogFile, MemoryWarehouse, MetadataResolver,
    WarehouseCall,
};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cli::GlobalArgs;

/// Where metadata and access lists come from
pub(crate) enum Backend {
    BigQuery(BigQueryClient),
    Catalog {
        warehouse: MemoryWarehouse,
        path: PathBuf,
    },
}

/// Runtime context containing the configured backend and default project
pub(crate) struct RuntimeContext {
    pub backend: Backend,
    pub default_project: Option<ProjectId>,
}

impl RuntimeContext {
    /// Create a new runtime context from global arguments
    pub fn new(args: &GlobalArgs) -> Result<Self> {
        let config = match &args.config {
            Some(path) => Config::load(path).context("Failed to load configuration file")?,
            None => {
                let cwd = std::env::current_dir().context("Failed to determine working directory")?;
                Config::discover(&cwd).context("Failed to load configuration")?
            }
        };
        let config = match &args.catalog {
            Some(path) => config.with_catalog(path.clone()),
            None => config,
        };

        let default_project = config
            .resolve_default_project(args.project.as_deref())
            .context("Invalid default project")?;

        let backend = match &config.backend {
            BackendConfig::BigQuery {
                endpoint,
                token_env,
                timeout_secs,
            } => {
                let client =
                    BigQueryClient::from_env(endpoint, token_env, Duration::from_secs(*timeout_secs))
                        .context("Failed to create BigQuery client")?;
                Backend::BigQuery(client)
            }
            BackendConfig::Catalog { path } => Backend::Catalog {
                warehouse: load_catalog(path)?,
                path: path.clone(),
            },
        };
        log::debug!("Using {} backend", backend.name());

        Ok(Self {
            backend,
            default_project,
        })
    }

    pub fn resolver(&self) -> &dyn MetadataResolver {
        match &self.backend {
            Backend::BigQuery(client) => client,
            Backend::Catalog { warehouse, .. } => warehouse,
        }
    }

    pub fn gateway(&self) -> &dyn AccessControlGateway {
        match &self.backend {
            Backend::BigQuery(client) => client,
            Backend::Catalog { warehouse, .. } => warehouse,
        }
    }

    /// Parse a `[PROJECT:]DATASET.VIEW` argument
    pub fn parse_view(&self, text: &str) -> Result<ObjectRef> {
        ObjectRef::parse(text, self.default_project.as_ref())
            .with_context(|| format!("Invalid view '{}'", text))
    }

    /// Write changed access lists back to the catalog file, if one is in use
    pub fn persist(&self) -> Result<()> {
        if let Backend::Catalog { warehouse, path } = &self.backend {
            let written = warehouse
                .calls()?
                .iter()
                .any(|call| matches!(call, WarehouseCall::SetAccess(_)));
            if !written {
                return Ok(());
            }
            CatalogFile::from_warehouse(warehouse)
                .and_then(|catalog| catalog.save(path))
                .with_context(|| format!("Failed to save catalog {}", path.display()))?;
            log::debug!("Saved catalog to {}", path.display());
        }
        Ok(())
    }
}

impl Backend {
    fn name(&self) -> &'static str {
        match self {
            Backend::BigQuery(client) => client.backend_name(),
            Backend::Catalog { warehouse, .. } => warehouse.backend_name(),
        }
    }
}

fn load_catalog(path: &Path) -> Result<MemoryWarehouse> {
    let warehouse = CatalogFile::load(path)
        .and_then(CatalogFile::into_warehouse)
        .with_context(|| format!("Failed to load catalog {}", path.display()))?;
    Ok(warehouse)
}
