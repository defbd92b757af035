//! Font atlas and glyph tables
//!
//! The atlas is built by the toolkit; the renderer only reads it. Glyph
//! corners are packed so that every glyph has bit-identical UVs, which is
//! what lets a backend recognise a glyph cell from its vertices alone.

use crate::draw_data::TextureId;
use crate::math::Vec2;
use std::sync::Arc;

/// Largest line width with a baked line texture
pub const TEX_LINES_WIDTH_MAX: usize = 63;

/// One glyph of a font's table
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Glyph {
    pub codepoint: u32,
    pub advance_x: f32,
    /// Quad relative to the pen position, unscaled
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
    /// Atlas UVs of the top-left and bottom-right corners
    pub u0: f32,
    pub v0: f32,
    pub u1: f32,
    pub v1: f32,
}

impl Glyph {
    /// Exact comparison against either stored corner
    pub fn matches_uv(&self, uv: Vec2) -> bool {
        (uv.x == self.u0 && uv.y == self.v0) || (uv.x == self.u1 && uv.y == self.v1)
    }

    pub fn as_char(&self) -> char {
        char::from_u32(self.codepoint).unwrap_or(char::REPLACEMENT_CHARACTER)
    }
}

/// A font baked into the atlas
#[derive(Clone, Debug, Default)]
pub struct Font {
    /// Family name handed to the text engine
    pub family: String,
    /// Size the font was baked at, in pixels
    pub font_size: f32,
    /// Per-font scale on top of the global font scale
    pub scale: f32,
    pub ascent: f32,
    pub descent: f32,
    pub glyphs: Vec<Glyph>,
    /// Raw font file, when the atlas was built from memory
    pub font_data: Option<Arc<[u8]>>,
}

impl Font {
    pub fn new(family: impl Into<String>, font_size: f32) -> Self {
        Self {
            family: family.into(),
            font_size,
            scale: 1.0,
            ascent: font_size,
            descent: 0.0,
            glyphs: Vec::new(),
            font_data: None,
        }
    }

    /// First glyph whose corner UV equals `uv`
    pub fn find_glyph_by_uv(&self, uv: Vec2) -> Option<&Glyph> {
        self.glyphs.iter().find(|g| g.matches_uv(uv))
    }

    pub fn find_glyph(&self, codepoint: u32) -> Option<&Glyph> {
        self.glyphs.iter().find(|g| g.codepoint == codepoint)
    }
}

/// Font atlas: fonts plus the reserved solid-fill regions
#[derive(Clone, Debug)]
pub struct FontAtlas {
    pub texture_id: TextureId,
    pub fonts: Vec<Font>,
    /// UV of the reserved white pixel used by untextured primitives
    pub tex_uv_white_pixel: Vec2,
    /// UVs of baked lines, (u0, v0, u1, v1) per width
    pub tex_uv_lines: Vec<[f32; 4]>,
}

impl Default for FontAtlas {
    fn default() -> Self {
        Self::new()
    }
}

impl FontAtlas {
    pub fn new() -> Self {
        Self {
            texture_id: TextureId::default(),
            fonts: Vec::new(),
            tex_uv_white_pixel: Vec2::ZERO,
            tex_uv_lines: Vec::with_capacity(TEX_LINES_WIDTH_MAX + 1),
        }
    }

    /// Assign a texture id when the host has not set one
    pub fn ensure_texture_id(&mut self) {
        if self.texture_id.is_null() {
            self.texture_id = TextureId(1);
            tracing::debug!("font atlas had no texture id, assigned {:?}", self.texture_id);
        }
    }

    pub fn is_white_pixel(&self, uv: Vec2) -> bool {
        uv.x == self.tex_uv_white_pixel.x && uv.y == self.tex_uv_white_pixel.y
    }

    pub fn is_line_uv(&self, uv: Vec2) -> bool {
        self.tex_uv_lines.iter().take(TEX_LINES_WIDTH_MAX + 1).any(|line| {
            (uv.x == line[0] && uv.y == line[1]) || (uv.x == line[2] && uv.y == line[3])
        })
    }

    /// UV sampled by solid geometry (white pixel or a baked line)
    pub fn is_solid_uv(&self, uv: Vec2) -> bool {
        self.is_white_pixel(uv) || self.is_line_uv(uv)
    }
}
