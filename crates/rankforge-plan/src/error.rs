use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlanError {
    #[error("failed to read catalogue {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid catalogue {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}
