//! Test harness for skyrig.
//!
//! Provides a headless host around the null renderer, an instrumented
//! [`ProbeApp`] that logs every lifecycle call, and an in-memory asset pack
//! builder.

pub mod assets;
pub mod harness;
pub mod probe;

pub use assets::AssetPackBuilder;
pub use harness::TestHost;
pub use probe::{CallLog, ProbeApp, ProbeOptions};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TestError {
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Animation error: {0}")]
    Animation(#[from] skyrig_animation::AnimationError),
}

pub type Result<T> = std::result::Result<T, TestError>;
