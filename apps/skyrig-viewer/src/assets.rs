//! Asset names and the built-in asset pack.

use std::io::Cursor;
use std::sync::Arc;

use image::{ImageFormat, Rgba, RgbaImage};
use skyrig_animation::{Clip, Rig};
use skyrig_core::{AssetStore, MemoryAssets, ResourceDirectory, ResourcePaths};

use crate::skybox::FACE_TEXTURES;

pub const RIG: &str = "stormtrooper/skeleton.bin";
pub const CLIP: &str = "stormtrooper/animations/dance.bin";
pub const FONT: &str = "TitilliumText/TitilliumText-Bold.otf";

/// Shader stage files, relative to the shader directory.
pub const SKYBOX_SHADER: (&str, &str) = ("skybox.vert", "skybox.frag");
pub const SKELETON_SHADER: (&str, &str) = ("basic.vert", "basic.frag");
pub const PLANE_SHADER: (&str, &str) = ("plane.vert", "plane.frag");
pub const UI_SHADER: (&str, &str) = ("ui.vert", "ui.frag");

const FACE_SIZE: u32 = 8;

/// Everything the sample reads, generated in memory.
///
/// Sky faces are solid colors, the rig is the stick figure and the clip is
/// its dance.
pub fn builtin(paths: &ResourcePaths) -> anyhow::Result<Arc<dyn AssetStore>> {
    let mut assets = MemoryAssets::new();

    let rig = Rig::stick_figure();
    let clip = Clip::dance(&rig);
    assets.insert(paths.resolve(ResourceDirectory::Animations, RIG), rig.to_bytes()?);
    assets.insert(paths.resolve(ResourceDirectory::Animations, CLIP), clip.to_bytes()?);

    for (i, (_, name)) in FACE_TEXTURES.iter().enumerate() {
        let shade = u8::try_from(i * 32).unwrap_or(u8::MAX);
        let face = RgbaImage::from_pixel(FACE_SIZE, FACE_SIZE, Rgba([shade / 2, shade, 200, 255]));
        let mut png = Cursor::new(Vec::new());
        face.write_to(&mut png, ImageFormat::Png)?;
        assets.insert(paths.resolve(ResourceDirectory::Textures, name), png.into_inner());
    }

    let mut font = b"OTTO".to_vec();
    font.extend_from_slice(&[0; 8]);
    assets.insert(paths.resolve(ResourceDirectory::Fonts, FONT), font);

    Ok(Arc::new(assets))
}
