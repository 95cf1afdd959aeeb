use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A source could not be read, or a value has the wrong type.
    #[error("config: {0}")]
    Figment(#[from] figment::Error),

    /// `--config` pointed at a file that is not there.
    #[error("config file {} not found", path.display())]
    MissingFile { path: PathBuf },

    #[error("config value {field} rejected: {reason}")]
    InvalidValue { field: String, reason: String },
}
