use std::path::PathBuf;
use thiserror::Error;

/// Failures shared by the templar crates
#[derive(Error, Debug)]
pub enum CommonError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config {}: {source}", .path.display())]
    InvalidConfig {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type CommonResult<T> = Result<T, CommonError>;
