//! Error types shared by the library and the binary

use std::io;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PicPurgeError {
    /// The photo library rejected or failed a listing/deletion call
    #[error("Photo library error: {0}")]
    Library(String),

    /// The key-value store could not be read or written
    #[error("Storage error: {0}")]
    Storage(String),

    /// Photo access has not been granted
    #[error("Permission error: {0}")]
    Permission(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    /// A refill walk failed; shared between every caller awaiting that walk
    #[error("Sampling failed: {0}")]
    Sampling(Arc<PicPurgeError>),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PicPurgeError>;
