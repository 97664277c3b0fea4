//! Shared error types for the services crate.

use thiserror::Error;

use apprentice_core::config::ConfigError;
use storage::sources::SourceError;

/// Errors emitted by `DashboardService`.
///
/// Engine math itself cannot fail; the only fallible edges are querying
/// the external stores and validating the configuration table.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DashboardError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}
