use std::path::PathBuf;

/// Monolithic error type for the harness.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The configuration file could not be read.
    #[error("failed to read config file {}: {}", .0.display(), .1)]
    ConfigRead(PathBuf, #[source] std::io::Error),

    /// The configuration file is not valid TOML for the expected schema.
    #[error("failed to parse config file {}: {}", .0.display(), .1)]
    ConfigParse(PathBuf, #[source] toml::de::Error),

    /// Tracing was used before being initialized.
    #[error("tracing not initialized")]
    TracingNotInitialized,

    /// The tracing filter could not be swapped.
    #[error("failed to reload tracing filter: {0}")]
    TracingReload(String),

    /// An error raised by the evaluation engine.
    #[error(transparent)]
    Core(#[from] exemplar_core::Error),
}
