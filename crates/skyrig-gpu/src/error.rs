//! GPU error types.

use skyrig_core::{Backend, CoreError};
use thiserror::Error;

use crate::handle::{ResourceId, ResourceKind};

/// GPU-related errors.
#[derive(Error, Debug)]
pub enum GpuError {
    /// Device creation failed.
    #[error("Device creation failed: {0}")]
    DeviceCreation(String),

    /// Backend not available on this build.
    #[error("Backend not supported: {0}")]
    UnsupportedBackend(Backend),

    /// Resource allocation failed.
    #[error("Failed to allocate {kind:?} '{label}'")]
    AllocationFailed { kind: ResourceKind, label: String },

    /// Handle does not refer to a live resource of the expected kind.
    #[error("Invalid handle: {0:?}")]
    InvalidHandle(ResourceId),

    /// Operation not valid in the current state.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Swap chain no longer matches the window.
    #[error("Swap chain out of date")]
    SwapChainOutOfDate,

    /// Device was lost.
    #[error("Device lost")]
    DeviceLost,

    /// Asset access failed.
    #[error("Asset error: {0}")]
    Asset(#[from] CoreError),

    /// Image decoding failed.
    #[error("Image decode failed: {0}")]
    ImageDecode(String),
}

/// Result type alias.
pub type Result<T> = std::result::Result<T, GpuError>;
