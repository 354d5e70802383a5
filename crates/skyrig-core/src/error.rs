//! Error types for the core crate.

use std::path::PathBuf;

use thiserror::Error;

/// Core error type.
#[derive(Error, Debug)]
pub enum CoreError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid data error
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Asset not found in the store
    #[error("Asset not found: {}", .0.display())]
    AssetNotFound(PathBuf),

    /// Settings value rejected
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),
}

/// Result type alias using our error type.
pub type Result<T> = std::result::Result<T, CoreError>;
