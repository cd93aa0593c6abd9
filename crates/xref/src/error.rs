//! CLI error types.

use xref_config::ConfigError;
use xref_markup::{PostProcessError, SettingsError};

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Settings(#[from] SettingsError),

    #[error("{0}")]
    PostProcess(#[from] PostProcessError),
}
