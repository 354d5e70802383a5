//! Core types shared by every skyrig crate.
//!
//! This crate provides the foundational pieces the rest of the workspace
//! builds on:
//! - Display settings and device/quality configuration
//! - Resource directory layout and path resolution
//! - Asset stores (disk and in-memory)
//! - Small math helpers and GPU-friendly color type
//! - The engine-wide error type

pub mod assets;
pub mod error;
pub mod math;
pub mod paths;
pub mod settings;

pub use assets::{AssetStore, DiskAssets, MemoryAssets};
pub use error::{CoreError, Result};
pub use math::Color;
pub use paths::{ResourceDirectory, ResourcePaths};
pub use settings::{Backend, DeviceConfig, SampleCount, Settings};

/// Engine-wide constants
pub mod constants {
    /// Default number of swap chain images (and frames in flight).
    pub const DEFAULT_IMAGE_COUNT: u32 = 3;
    /// Upper bound accepted for the swap chain image count.
    pub const MAX_IMAGE_COUNT: u32 = 4;
}
