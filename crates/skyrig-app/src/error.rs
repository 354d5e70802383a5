//! Application and lifecycle errors.

use skyrig_animation::AnimationError;
use skyrig_core::CoreError;
use skyrig_gpu::GpuError;
use skyrig_platform::PlatformError;
use skyrig_ui::UiError;
use thiserror::Error;

use crate::lifecycle::Phase;

/// Failure reported by an [`App`](crate::App) callback.
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Gpu(#[from] GpuError),

    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error(transparent)]
    Animation(#[from] AnimationError),

    #[error(transparent)]
    Ui(#[from] UiError),

    /// The app was asked to do something its own state does not allow.
    #[error("{0}")]
    InvalidState(String),
}

/// Failure of a [`Lifecycle`](crate::Lifecycle) operation.
#[derive(Error, Debug)]
pub enum LifecycleError {
    /// Operation called in a phase that does not allow it. Nothing happened.
    #[error("Cannot {op} while {phase}")]
    InvalidTransition { op: &'static str, phase: Phase },

    /// Rejected device configuration or window settings. Nothing was torn
    /// down.
    #[error("Invalid configuration: {0}")]
    Config(#[from] CoreError),

    #[error("Initialization failed: {0}")]
    Init(#[source] AppError),

    #[error("Loading failed: {0}")]
    Load(#[source] AppError),

    /// A frame could not be drawn. The session cannot continue.
    #[error("Frame failed: {0}")]
    Frame(#[source] AppError),
}

impl LifecycleError {
    /// Returns `true` if the host loop must stop.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        !matches!(self, Self::InvalidTransition { .. } | Self::Config(_))
    }
}

pub type Result<T> = std::result::Result<T, LifecycleError>;
