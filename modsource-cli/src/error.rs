use thiserror::Error;

/// Errors that can occur during CLI command execution.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// Configuration file error
    #[error("{0}")]
    Config(#[from] modsource_catalog::ConfigError),

    /// Sync pipeline error
    #[error("{0}")]
    Sync(#[from] modsource_fetch::SyncError),

    /// Catalog write error
    #[error("{0}")]
    Output(#[from] modsource_catalog::OutputError),

    /// Runtime creation error
    #[error("Runtime error: {0}")]
    Runtime(String),
}
