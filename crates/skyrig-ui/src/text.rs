//! Font validation, the glyph atlas and queued text.
//!
//! Glyphs are rendered as monospace cells from a 16x16 atlas covering the
//! Latin-1 range. Cell 0 is solid and doubles as the fill texel for panel
//! backgrounds.

use glam::Vec2;
use skyrig_core::Color;

use crate::error::{Result, UiError};
use crate::vertex::QuadBuilder;

pub const ATLAS_SIZE: u32 = 256;
const CELLS_PER_ROW: u32 = 16;
const CELL: u32 = ATLAS_SIZE / CELLS_PER_ROW;
/// Horizontal advance relative to the font size.
const ADVANCE_RATIO: f32 = 0.55;

/// How a run of text is drawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextDrawDesc {
    pub font: u32,
    pub color: Color,
    pub size: f32,
}

impl Default for TextDrawDesc {
    fn default() -> Self {
        Self {
            font: 0,
            color: Color::from_abgr(0xff00_ffff),
            size: 18.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct QueuedText {
    pub text: String,
    pub position: Vec2,
    pub desc: TextDrawDesc,
}

/// A loaded font and its single-channel atlas.
#[derive(Clone, Debug)]
pub struct Font {
    name: String,
    atlas: Vec<u8>,
}

impl Font {
    /// Accept TrueType (`0x00010000`, `true`) and CFF OpenType (`OTTO`) data.
    pub fn parse(name: &str, bytes: &[u8]) -> Result<Self> {
        let tag = bytes.get(..4).ok_or_else(|| UiError::InvalidFont {
            name: name.to_owned(),
        })?;
        let known = tag == b"OTTO" || tag == b"true" || tag == [0u8, 1, 0, 0];
        if !known {
            return Err(UiError::InvalidFont {
                name: name.to_owned(),
            });
        }
        Ok(Self {
            name: name.to_owned(),
            atlas: build_atlas(),
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// R8 atlas pixels, `ATLAS_SIZE` squared.
    #[must_use]
    pub fn atlas(&self) -> &[u8] {
        &self.atlas
    }

    /// Width in pixels of `text` at `size`.
    #[must_use]
    pub fn measure(text: &str, size: f32) -> f32 {
        #[allow(clippy::cast_precision_loss)]
        let chars = text.chars().count() as f32;
        chars * size * ADVANCE_RATIO
    }
}

fn build_atlas() -> Vec<u8> {
    let mut pixels = vec![0u8; (ATLAS_SIZE * ATLAS_SIZE) as usize];
    for code in 0..CELLS_PER_ROW * CELLS_PER_ROW {
        let printable = code == 0 || (code > 32 && code != 127 && !(128..=160).contains(&code));
        if !printable {
            continue;
        }
        let inset = if code == 0 { 0 } else { 2 };
        let x0 = (code % CELLS_PER_ROW) * CELL;
        let y0 = (code / CELLS_PER_ROW) * CELL;
        for y in y0 + inset..y0 + CELL - inset {
            for x in x0 + inset..x0 + CELL - inset {
                pixels[(y * ATLAS_SIZE + x) as usize] = 0xff;
            }
        }
    }
    pixels
}

fn cell_uv(code: u32) -> (Vec2, Vec2) {
    #[allow(clippy::cast_precision_loss)]
    let (x, y, cell, size) = (
        (code % CELLS_PER_ROW) as f32,
        (code / CELLS_PER_ROW) as f32,
        CELL as f32,
        ATLAS_SIZE as f32,
    );
    let min = Vec2::new(x * cell, y * cell) / size;
    (min, min + Vec2::splat(cell / size))
}

/// UV of the solid fill texel.
pub(crate) fn solid_uv() -> Vec2 {
    let (min, max) = cell_uv(0);
    (min + max) * 0.5
}

pub(crate) fn push_text(builder: &mut QuadBuilder, text: &str, origin: Vec2, desc: &TextDrawDesc) {
    let advance = desc.size * ADVANCE_RATIO;
    let color = desc.color.to_abgr();
    let mut pen = origin;
    for ch in text.chars() {
        if ch == '\n' {
            pen = Vec2::new(origin.x, pen.y + desc.size);
            continue;
        }
        let code = u32::from(ch);
        if code > 32 && code < CELLS_PER_ROW * CELLS_PER_ROW {
            let (uv_min, uv_max) = cell_uv(code);
            builder.quad(pen, pen + Vec2::new(advance, desc.size), uv_min, uv_max, color);
        }
        pen.x += advance;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn font_magic_is_checked() {
        assert!(Font::parse("a.otf", b"OTTO\0\0").is_ok());
        assert!(Font::parse("a.ttf", &[0, 1, 0, 0, 9]).is_ok());
        assert!(matches!(
            Font::parse("a.png", b"\x89PNG"),
            Err(UiError::InvalidFont { .. })
        ));
        assert!(Font::parse("empty", &[]).is_err());
    }

    #[test]
    fn atlas_has_solid_cell_and_blank_space() {
        let font = Font::parse("f", b"OTTO").unwrap();
        assert_eq!(font.atlas().len(), (ATLAS_SIZE * ATLAS_SIZE) as usize);
        assert_eq!(font.atlas()[0], 0xff);
        // cell for ' ' is empty
        let x = (32 % 16) * CELL + CELL / 2;
        let y = (32 / 16) * CELL + CELL / 2;
        assert_eq!(font.atlas()[(y * ATLAS_SIZE + x) as usize], 0);
    }

    #[test]
    fn spaces_advance_without_quads() {
        let mut builder = QuadBuilder::new(640, 480);
        push_text(&mut builder, "a b\nc", Vec2::ZERO, &TextDrawDesc::default());
        assert_eq!(builder.vertices.len(), 3 * 6);
    }
}
