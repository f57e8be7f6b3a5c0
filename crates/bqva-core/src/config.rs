//! Configuration types and parsing for bqva.yml

use crate::error::{CoreError, CoreResult};
use crate::identifier::ProjectId;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File names looked up by [`Config::discover`], in order.
pub const CONFIG_FILE_NAMES: &[&str] = &["bqva.yml", "bqva.yaml"];

/// Environment variable consulted for the default project when neither the
/// command line nor the config file names one.
pub const DEFAULT_PROJECT_ENV: &str = "GOOGLE_CLOUD_PROJECT";

/// Tool configuration from bqva.yml
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Project used for identities written as `dataset.view`
    #[serde(default)]
    pub default_project: Option<ProjectId>,

    /// Where metadata and access lists come from
    #[serde(default)]
    pub backend: BackendConfig,
}

/// Warehouse backend selector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BackendConfig {
    /// BigQuery v2 REST API
    BigQuery {
        #[serde(default = "default_endpoint")]
        endpoint: String,

        /// Environment variable holding an OAuth2 access token
        #[serde(default = "default_token_env")]
        token_env: String,

        #[serde(default = "default_timeout_secs")]
        timeout_secs: u64,
    },

    /// Offline YAML catalog file
    Catalog { path: PathBuf },
}

impl Default for BackendConfig {
    fn default() -> Self {
        BackendConfig::BigQuery {
            endpoint: default_endpoint(),
            token_env: default_token_env(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_endpoint() -> String {
    "https://bigquery.googleapis.com/bigquery/v2".to_string()
}

fn default_token_env() -> String {
    "BQVA_ACCESS_TOKEN".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let mut config: Config =
            serde_yaml::from_str(&content).map_err(|e| CoreError::ConfigParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        config.validate()?;

        if let Some(dir) = path.parent() {
            config.resolve_relative_paths(dir);
        }
        Ok(config)
    }

    /// Load bqva.yml / bqva.yaml from `dir`, or the defaults when neither exists
    pub fn discover(dir: &Path) -> CoreResult<Self> {
        match CONFIG_FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|p| p.exists())
        {
            Some(path) => {
                log::debug!("Loading configuration from {}", path.display());
                Self::load(&path)
            }
            None => Ok(Self::default()),
        }
    }

    /// Pick the default project: explicit override, then the config file,
    /// then `GOOGLE_CLOUD_PROJECT`.
    pub fn resolve_default_project(&self, flag: Option<&str>) -> CoreResult<Option<ProjectId>> {
        if let Some(project) = flag {
            return ProjectId::new(project).map(Some);
        }
        if let Some(project) = &self.default_project {
            return Ok(Some(project.clone()));
        }
        match std::env::var(DEFAULT_PROJECT_ENV) {
            Ok(value) if !value.trim().is_empty() => ProjectId::new(value.trim()).map(Some),
            _ => Ok(None),
        }
    }

    /// Replace the backend with an offline catalog file
    pub fn with_catalog(mut self, path: impl Into<PathBuf>) -> Self {
        self.backend = BackendConfig::Catalog { path: path.into() };
        self
    }

    /// Validate the configuration
    fn validate(&self) -> CoreResult<()> {
        match &self.backend {
            BackendConfig::BigQuery {
                endpoint,
                token_env,
                timeout_secs,
            } => {
                if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                    return Err(CoreError::ConfigInvalid {
                        message: format!("backend.endpoint must be an http(s) URL, got '{}'", endpoint),
                    });
                }
                if token_env.is_empty() {
                    return Err(CoreError::ConfigInvalid {
                        message: "backend.token_env cannot be empty".to_string(),
                    });
                }
                if *timeout_secs == 0 {
                    return Err(CoreError::ConfigInvalid {
                        message: "backend.timeout_secs must be greater than zero".to_string(),
                    });
                }
            }
            BackendConfig::Catalog { path } => {
                if path.as_os_str().is_empty() {
                    return Err(CoreError::ConfigInvalid {
                        message: "backend.path cannot be empty".to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Make a relative catalog path relative to the config file's directory
    fn resolve_relative_paths(&mut self, base: &Path) {
        if let BackendConfig::Catalog { path } = &mut self.backend {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
