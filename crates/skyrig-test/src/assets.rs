//! In-memory asset packs laid out like an on-disk resource root.

use std::io::Cursor;
use std::sync::Arc;

use image::{ImageFormat, Rgba, RgbaImage};
use skyrig_animation::{Clip, Rig};
use skyrig_core::{AssetStore, MemoryAssets, ResourceDirectory, ResourcePaths};

use crate::Result;

/// Builds a [`MemoryAssets`] keyed by resolved resource paths.
#[derive(Debug)]
pub struct AssetPackBuilder {
    paths: ResourcePaths,
    assets: MemoryAssets,
}

impl AssetPackBuilder {
    #[must_use]
    pub fn new(paths: ResourcePaths) -> Self {
        Self {
            paths,
            assets: MemoryAssets::new(),
        }
    }

    #[must_use]
    pub const fn paths(&self) -> &ResourcePaths {
        &self.paths
    }

    /// Raw bytes at `dir/name`.
    #[must_use]
    pub fn file(mut self, dir: ResourceDirectory, name: &str, bytes: Vec<u8>) -> Self {
        self.assets.insert(self.paths.resolve(dir, name), bytes);
        self
    }

    /// A solid-color PNG texture.
    pub fn texture(self, name: &str, width: u32, height: u32, color: [u8; 4]) -> Result<Self> {
        let image = RgbaImage::from_pixel(width, height, Rgba(color));
        let mut out = Cursor::new(Vec::new());
        image.write_to(&mut out, ImageFormat::Png)?;
        Ok(self.file(ResourceDirectory::Textures, name, out.into_inner()))
    }

    pub fn rig(self, name: &str, rig: &Rig) -> Result<Self> {
        Ok(self.file(ResourceDirectory::Animations, name, rig.to_bytes()?))
    }

    pub fn clip(self, name: &str, clip: &Clip) -> Result<Self> {
        Ok(self.file(ResourceDirectory::Animations, name, clip.to_bytes()?))
    }

    /// A font file with an OpenType header and no tables.
    #[must_use]
    pub fn font(self, name: &str) -> Self {
        let mut bytes = b"OTTO".to_vec();
        bytes.extend_from_slice(&[0; 8]);
        self.file(ResourceDirectory::Fonts, name, bytes)
    }

    /// Placeholder shader source.
    #[must_use]
    pub fn shader(self, name: &str) -> Self {
        let source = format!("// {name}\n").into_bytes();
        self.file(ResourceDirectory::Shaders, name, source)
    }

    #[must_use]
    pub fn build(self) -> MemoryAssets {
        self.assets
    }

    #[must_use]
    pub fn into_shared(self) -> Arc<dyn AssetStore> {
        Arc::new(self.assets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn files_land_under_resolved_paths() {
        let paths = ResourcePaths::with_root("/res");
        let assets = AssetPackBuilder::new(paths.clone())
            .texture("sky.png", 2, 2, [0, 0, 255, 255])
            .unwrap()
            .rig("rig.bin", &Rig::stick_figure())
            .unwrap()
            .font("Font.otf")
            .build();

        let png = assets
            .read(&paths.resolve(ResourceDirectory::Textures, "sky.png"))
            .unwrap();
        assert_eq!(image::load_from_memory(&png).unwrap().width(), 2);
        let rig = assets
            .read(&paths.resolve(ResourceDirectory::Animations, "rig.bin"))
            .unwrap();
        assert_eq!(Rig::from_bytes(&rig).unwrap().num_joints(), 17);
        assert!(assets
            .read(&paths.resolve(ResourceDirectory::Fonts, "Font.otf"))
            .unwrap()
            .starts_with(b"OTTO"));
    }
}
