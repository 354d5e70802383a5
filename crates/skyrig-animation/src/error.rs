use skyrig_core::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnimationError {
    #[error("Failed to decode {what}: {reason}")]
    Decode { what: &'static str, reason: String },

    #[error("Failed to encode {what}: {reason}")]
    Encode { what: &'static str, reason: String },

    #[error("Invalid rig: {0}")]
    InvalidRig(String),

    #[error("Invalid clip '{name}': {reason}")]
    InvalidClip { name: String, reason: String },

    #[error("Clip '{clip}' animates {tracks} joints but the rig has {joints}")]
    JointCountMismatch {
        clip: String,
        tracks: usize,
        joints: usize,
    },

    #[error(transparent)]
    Asset(#[from] CoreError),
}

pub type Result<T> = std::result::Result<T, AnimationError>;
