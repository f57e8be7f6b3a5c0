//! CLI command implementations

pub(crate) mod authorize;
pub(crate) mod common;
pub(crate) mod export;
pub(crate) mod render;
pub(crate) mod revoke;
pub(crate) mod tree;
