//! Error types for bqva-core

use thiserror::Error;

/// Core error type for bqva
#[derive(Error, Debug)]
pub enum CoreError {
    /// C001: A project, dataset or table segment is empty or contains a separator
    #[error("[C001] Invalid {kind} '{value}': {reason}")]
    InvalidIdentifier {
        kind: &'static str,
        value: String,
        reason: &'static str,
    },

    /// C002: A view identity does not split into project, dataset and name
    #[error("[C002] Invalid reference '{value}': expected [PROJECT:]DATASET.NAME")]
    InvalidReference { value: String },

    /// C003: No project in the reference and no default project configured
    #[error("[C003] No project given for '{value}' and no default project is configured")]
    MissingProject { value: String },

    /// C004: The root of a dependency tree must be a view
    #[error("[C004] Dependency tree root '{object}' is a table, not a view")]
    RootNotView { object: String },

    /// C005: Only views have dependencies
    #[error("[C005] Cannot attach '{child}' below table '{parent}'")]
    ChildOfTable { parent: String, child: String },

    /// C006: Node index does not belong to the tree
    #[error("[C006] Unknown tree node #{index}")]
    UnknownNode { index: usize },

    /// C007: Configuration file not found
    #[error("[C007] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// C008: Failed to parse configuration file
    #[error("[C008] Failed to parse config {path}: {message}")]
    ConfigParseError { path: String, message: String },

    /// C009: Invalid configuration value
    #[error("[C009] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// C010: IO error with file path context
    #[error("[C010] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
