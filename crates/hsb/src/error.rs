//! CLI error types.

use hsb_build::{BuildError, LoadError};
use hsb_config::ConfigError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Templates(#[from] LoadError),

    #[error("{0}")]
    Build(#[from] BuildError),
}
