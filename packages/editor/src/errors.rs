//! Error types for the editor

use thiserror::Error;

/// Failure of the key-value medium behind the version store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    #[error("Version name must not be empty")]
    EmptyName,

    #[error("Unknown application profile: {0}")]
    UnknownProfile(String),
}

pub type EditorResult<T> = Result<T, EditorError>;
