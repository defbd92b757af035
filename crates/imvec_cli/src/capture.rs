//! Frame capture files
//!
//! A capture is one frame of toolkit output serialized as JSON: the font
//! atlas metadata, display parameters, draw lists and optionally the pixels
//! of user textures so the software target can sample them.

use anyhow::{bail, Context, Result};
use imvec_core::{
    DrawCallback, DrawCmd, DrawData, DrawIdx, DrawList, ElementsCmd, Font, FontAtlas, Glyph, Io,
    PackedColor, TextureId, Vec2, Vertex,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Top-level capture file
#[derive(Debug, Deserialize, Serialize)]
pub struct Capture {
    #[serde(default)]
    pub display_pos: [f32; 2],
    pub display_size: [f32; 2],
    #[serde(default = "default_scale")]
    pub framebuffer_scale: [f32; 2],
    #[serde(default = "default_global_scale")]
    pub font_global_scale: f32,
    pub atlas: CaptureAtlas,
    #[serde(default)]
    pub lists: Vec<CaptureList>,
    /// Pixels of user textures, keyed by texture id
    #[serde(default)]
    pub textures: Vec<CaptureTexture>,
}

fn default_scale() -> [f32; 2] {
    [1.0, 1.0]
}

fn default_global_scale() -> f32 {
    1.0
}

#[derive(Debug, Deserialize, Serialize)]
pub struct CaptureAtlas {
    #[serde(default)]
    pub texture_id: usize,
    pub white_uv: [f32; 2],
    #[serde(default)]
    pub line_uvs: Vec<[f32; 4]>,
    #[serde(default)]
    pub fonts: Vec<CaptureFont>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct CaptureFont {
    #[serde(default)]
    pub family: String,
    pub size: f32,
    #[serde(default = "default_global_scale")]
    pub scale: f32,
    /// Defaults to the font size
    #[serde(default)]
    pub ascent: Option<f32>,
    #[serde(default)]
    pub glyphs: Vec<CaptureGlyph>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct CaptureGlyph {
    pub ch: char,
    #[serde(default)]
    pub advance: f32,
    /// x0, y0, x1, y1 relative to the pen
    pub bounds: [f32; 4],
    /// u0, v0, u1, v1
    pub uv: [f32; 4],
}

#[derive(Debug, Deserialize, Serialize)]
pub struct CaptureList {
    /// x, y, u, v per vertex
    pub vertices: Vec<[f32; 4]>,
    /// `RRGGBBAA` per vertex
    pub colors: Vec<String>,
    pub indices: Vec<DrawIdx>,
    pub commands: Vec<CaptureCommand>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CaptureCommand {
    Elements {
        count: u32,
        #[serde(default)]
        idx_offset: u32,
        #[serde(default)]
        vtx_offset: u32,
        texture: usize,
        clip: [f32; 4],
    },
    Reset,
    /// Host callback, replayed as a log line
    Callback { name: String },
}

#[derive(Debug, Deserialize, Serialize)]
pub struct CaptureTexture {
    pub texture_id: usize,
    pub width: u32,
    pub height: u32,
    /// Straight-alpha RGBA bytes, row major
    pub rgba: Vec<u8>,
}

/// A capture turned into toolkit data
pub struct Frame {
    pub io: Io,
    pub draw_data: DrawData,
    pub textures: Vec<CaptureTexture>,
}

impl Capture {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_json(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("Invalid capture JSON")
    }

    /// Framebuffer size in pixels
    pub fn framebuffer_size(&self) -> (u32, u32) {
        let w = (self.display_size[0] * self.framebuffer_scale[0]).ceil().max(1.0);
        let h = (self.display_size[1] * self.framebuffer_scale[1]).ceil().max(1.0);
        (w as u32, h as u32)
    }

    pub fn into_frame(self) -> Result<Frame> {
        let mut atlas = FontAtlas::new();
        atlas.texture_id = TextureId(self.atlas.texture_id);
        atlas.tex_uv_white_pixel = vec2(self.atlas.white_uv);
        atlas.tex_uv_lines = self.atlas.line_uvs;
        atlas.fonts = self.atlas.fonts.into_iter().map(font).collect();

        let mut io = Io::new(atlas);
        io.font_global_scale = self.font_global_scale;

        let lists = self
            .lists
            .into_iter()
            .enumerate()
            .map(|(i, list)| draw_list(list).with_context(|| format!("Invalid draw list {}", i)))
            .collect::<Result<Vec<_>>>()?;

        let mut draw_data = DrawData::new(lists, vec2(self.display_size));
        draw_data.display_pos = vec2(self.display_pos);
        draw_data.framebuffer_scale = vec2(self.framebuffer_scale);

        Ok(Frame {
            io,
            draw_data,
            textures: self.textures,
        })
    }
}

fn vec2(v: [f32; 2]) -> Vec2 {
    Vec2::new(v[0], v[1])
}

fn font(font: CaptureFont) -> Font {
    let mut out = Font::new(font.family, font.size);
    out.scale = font.scale;
    out.ascent = font.ascent.unwrap_or(font.size);
    out.glyphs = font
        .glyphs
        .into_iter()
        .map(|g| Glyph {
            codepoint: g.ch as u32,
            advance_x: g.advance,
            x0: g.bounds[0],
            y0: g.bounds[1],
            x1: g.bounds[2],
            y1: g.bounds[3],
            u0: g.uv[0],
            v0: g.uv[1],
            u1: g.uv[2],
            v1: g.uv[3],
        })
        .collect();
    out
}

fn draw_list(list: CaptureList) -> Result<DrawList> {
    if list.colors.len() != list.vertices.len() {
        bail!(
            "{} vertices but {} colors",
            list.vertices.len(),
            list.colors.len()
        );
    }

    let mut out = DrawList::new();
    for (v, col) in list.vertices.iter().zip(&list.colors) {
        let col = PackedColor::from_hex_rgba(col)
            .with_context(|| format!("Invalid color {:?}, expected RRGGBBAA", col))?;
        out.vtx_buffer
            .push(Vertex::new(Vec2::new(v[0], v[1]), Vec2::new(v[2], v[3]), col));
    }
    out.idx_buffer = list.indices;
    out.commands = list
        .commands
        .into_iter()
        .map(|cmd| match cmd {
            CaptureCommand::Elements {
                count,
                idx_offset,
                vtx_offset,
                texture,
                clip,
            } => DrawCmd::Elements(
                ElementsCmd::new(count, TextureId(texture), clip).with_offsets(idx_offset, vtx_offset),
            ),
            CaptureCommand::Reset => DrawCmd::ResetRenderState,
            CaptureCommand::Callback { name } => DrawCmd::Callback(DrawCallback::new(move |_, _| {
                tracing::info!("callback {}", name);
            })),
        })
        .collect();
    Ok(out)
}
