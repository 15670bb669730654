use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to load resource {path}: {source}")]
    ResourceLoad {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid table tag: {0:?}")]
    InvalidTag(String),
}

pub type Result<T> = std::result::Result<T, HarnessError>;
