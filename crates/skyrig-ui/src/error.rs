use skyrig_gpu::GpuError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum UiError {
    #[error("Font '{name}' is not a TrueType/OpenType font")]
    InvalidFont { name: String },

    #[error("UI is not initialized")]
    NotInitialized,

    #[error("UI GPU resources are already loaded")]
    AlreadyLoaded,

    #[error("UI GPU resources are not loaded")]
    NotLoaded,

    #[error("Unknown UI component {0}")]
    UnknownComponent(usize),

    #[error(transparent)]
    Gpu(#[from] GpuError),
}

pub type Result<T> = std::result::Result<T, UiError>;
