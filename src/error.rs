use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid diagram document: {0}")]
    Document(#[from] serde_json::Error),

    #[error("failed to serialize output: {0}")]
    Output(#[source] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_yaml_ng::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
