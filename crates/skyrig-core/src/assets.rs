//! Asset stores.
//!
//! Loaders read raw bytes through [`AssetStore`] so the same code path works
//! against the filesystem and against in-memory packs in tests.

use std::fs;
use std::path::{Path, PathBuf};

use hashbrown::HashMap;
use tracing::trace;

use crate::error::{CoreError, Result};

/// Source of raw asset bytes.
pub trait AssetStore: Send + Sync {
    /// Read the full contents of an asset.
    fn read(&self, path: &Path) -> Result<Vec<u8>>;

    /// Returns `true` if the asset exists.
    fn exists(&self, path: &Path) -> bool;
}

/// Assets read straight from the filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiskAssets;

impl AssetStore for DiskAssets {
    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        trace!("Reading asset {}", path.display());
        fs::read(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                CoreError::AssetNotFound(path.to_path_buf())
            } else {
                CoreError::Io(e)
            }
        })
    }

    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }
}

/// Assets held in memory, keyed by path.
#[derive(Debug, Default, Clone)]
pub struct MemoryAssets {
    files: HashMap<PathBuf, Vec<u8>>,
}

impl MemoryAssets {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an asset.
    pub fn insert(&mut self, path: impl Into<PathBuf>, bytes: Vec<u8>) {
        self.files.insert(path.into(), bytes);
    }

    /// Remove an asset, returning its bytes.
    pub fn remove(&mut self, path: &Path) -> Option<Vec<u8>> {
        self.files.remove(path)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl AssetStore for MemoryAssets {
    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| CoreError::AssetNotFound(path.to_path_buf()))
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_assets_round_trip() {
        let mut assets = MemoryAssets::new();
        assets.insert("a/b.bin", vec![1, 2, 3]);

        assert!(assets.exists(Path::new("a/b.bin")));
        assert_eq!(assets.read(Path::new("a/b.bin")).unwrap(), vec![1, 2, 3]);
        assert!(matches!(
            assets.read(Path::new("missing")),
            Err(CoreError::AssetNotFound(_))
        ));
    }

    #[test]
    fn disk_assets_missing_file() {
        let err = DiskAssets
            .read(Path::new("definitely/not/here.bin"))
            .unwrap_err();
        assert!(matches!(err, CoreError::AssetNotFound(_)));
    }
}
