//! Shared fixtures for renderer integration tests

#![allow(dead_code)]

use imvec_core::{
    DrawCmd, DrawData, DrawIdx, DrawList, ElementsCmd, Font, FontAtlas, Glyph, Io, PackedColor,
    TextureId, Vec2, Vertex,
};
use imvec_paint::{PaintCommand, Point, RecordedFill, RecordingTarget, RecordingTextFactory};
use imvec_renderer::{Renderer, RendererConfig};
use std::rc::Rc;

pub const WIDTH: u32 = 200;
pub const HEIGHT: u32 = 100;
pub const WHITE_UV: Vec2 = Vec2 { x: 0.999, y: 0.999 };
pub const FULL_CLIP: [f32; 4] = [0.0, 0.0, WIDTH as f32, HEIGHT as f32];

pub fn glyph(ch: char, u0: f32) -> Glyph {
    Glyph {
        codepoint: ch as u32,
        advance_x: 7.0,
        x0: 0.0,
        y0: 3.0,
        x1: 6.0,
        y1: 13.0,
        u0,
        v0: 0.0,
        u1: u0 + 0.0625,
        v1: 0.125,
    }
}

/// Io with one 13px font holding 'A', 'B' and 'C'
pub fn io() -> Io {
    let mut atlas = FontAtlas::new();
    atlas.tex_uv_white_pixel = WHITE_UV;
    atlas.tex_uv_lines.push([0.5, 0.5, 0.5625, 0.5]);
    let mut font = Font::new("Inter", 13.0);
    font.ascent = 11.0;
    font.glyphs = vec![glyph('A', 0.0), glyph('B', 0.0625), glyph('C', 0.125)];
    atlas.fonts.push(font);
    Io::new(atlas)
}

pub struct Fixture {
    pub io: Io,
    pub target: RecordingTarget,
    pub text: Rc<RecordingTextFactory>,
    pub renderer: Renderer,
}

pub fn fixture() -> Fixture {
    fixture_with(RendererConfig::default())
}

pub fn fixture_with(config: RendererConfig) -> Fixture {
    let mut io = io();
    let mut target = RecordingTarget::new(WIDTH, HEIGHT);
    let text = Rc::new(RecordingTextFactory::new());
    let renderer = Renderer::init(&mut io, &mut target, text.clone(), config).unwrap();
    Fixture {
        io,
        target,
        text,
        renderer,
    }
}

impl Fixture {
    pub fn atlas(&self) -> TextureId {
        self.io.fonts.texture_id
    }

    pub fn render(&mut self, lists: Vec<DrawList>) -> imvec_renderer::FrameStats {
        let draw_data = DrawData::new(lists, Vec2::new(WIDTH as f32, HEIGHT as f32));
        self.renderer.begin_frame();
        self.renderer.render(&self.io, &mut self.target, &draw_data)
    }

    pub fn fills(&self) -> Vec<RecordedFill> {
        self.target
            .fills()
            .filter_map(|c| match c {
                PaintCommand::FillGeometry { fill, .. } => Some(fill.clone()),
                _ => None,
            })
            .collect()
    }

    /// Figure vertices of every fill, in order
    pub fn fill_figures(&self) -> Vec<Vec<Vec<Point>>> {
        self.target
            .fills()
            .filter_map(|c| match c {
                PaintCommand::FillGeometry { figures, .. } => {
                    Some(figures.iter().map(|f| f.vertices().collect()).collect())
                }
                _ => None,
            })
            .collect()
    }

    pub fn texts(&self) -> Vec<String> {
        self.target
            .texts()
            .filter_map(|c| match c {
                PaintCommand::DrawText { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }
}

/// Draw list builder
#[derive(Default)]
pub struct ListBuilder {
    list: DrawList,
    cmd_start: usize,
}

impl ListBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex(&mut self, x: f32, y: f32, uv: Vec2, col: PackedColor) -> DrawIdx {
        self.list.vtx_buffer.push(Vertex::new(Vec2::new(x, y), uv, col));
        (self.list.vtx_buffer.len() - 1) as DrawIdx
    }

    pub fn indices(&mut self, indices: &[DrawIdx]) -> &mut Self {
        self.list.idx_buffer.extend_from_slice(indices);
        self
    }

    pub fn triangle(&mut self, points: [(f32, f32); 3], col: PackedColor) -> &mut Self {
        let base = self.list.vtx_buffer.len() as DrawIdx;
        for (x, y) in points {
            self.vertex(x, y, WHITE_UV, col);
        }
        self.indices(&[base, base + 1, base + 2])
    }

    /// Axis-aligned quad with corner colors top-left, top-right, bottom-right, bottom-left
    pub fn quad(&mut self, min: (f32, f32), max: (f32, f32), colors: [PackedColor; 4]) -> &mut Self {
        self.quad_uv(min, max, WHITE_UV, WHITE_UV, colors)
    }

    pub fn quad_uv(
        &mut self,
        min: (f32, f32),
        max: (f32, f32),
        uv_min: Vec2,
        uv_max: Vec2,
        colors: [PackedColor; 4],
    ) -> &mut Self {
        let base = self.list.vtx_buffer.len() as DrawIdx;
        self.vertex(min.0, min.1, uv_min, colors[0]);
        self.vertex(max.0, min.1, Vec2::new(uv_max.x, uv_min.y), colors[1]);
        self.vertex(max.0, max.1, uv_max, colors[2]);
        self.vertex(min.0, max.1, Vec2::new(uv_min.x, uv_max.y), colors[3]);
        self.indices(&[base, base + 1, base + 2, base, base + 2, base + 3])
    }

    /// Glyph cell with the pen at `(x, y)`
    pub fn glyph(&mut self, g: &Glyph, x: f32, y: f32, col: PackedColor) -> &mut Self {
        self.quad_uv(
            (x + g.x0, y + g.y0),
            (x + g.x1, y + g.y1),
            Vec2::new(g.u0, g.v0),
            Vec2::new(g.u1, g.v1),
            [col; 4],
        )
    }

    /// Close a command over every index added since the previous one
    pub fn cmd(&mut self, texture_id: TextureId, clip: [f32; 4]) -> &mut Self {
        let count = self.list.idx_buffer.len() - self.cmd_start;
        let cmd = ElementsCmd::new(count as u32, texture_id, clip).with_offsets(self.cmd_start as u32, 0);
        self.list.commands.push(DrawCmd::Elements(cmd));
        self.cmd_start = self.list.idx_buffer.len();
        self
    }

    pub fn push(&mut self, cmd: DrawCmd) -> &mut Self {
        self.list.commands.push(cmd);
        self
    }

    pub fn build(&mut self) -> DrawList {
        std::mem::take(&mut self.list)
    }
}
