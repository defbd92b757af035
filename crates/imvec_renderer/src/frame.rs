//! Frame driver
//!
//! Walks every draw list and command of a frame. Element commands are
//! clipped, then their index window is consumed alternately by glyph
//! detection and polygon reconstruction until exhausted.

use crate::backend::DeviceObjects;
use crate::config::RendererConfig;
use crate::glyph::render_glyph_run;
use crate::polygon::render_polygon;
use crate::text_cache::TextFormatCache;
use imvec_core::{DrawCmd, DrawData, DrawIdx, DrawList, ElementsCmd, Io, TextureId, Vec2, Vertex};
use imvec_paint::{AntialiasMode, PixelSize, Rect, RenderTarget, Transform2D};
use serde::Serialize;

/// Counters for one rendered frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FrameStats {
    pub lists: usize,
    pub commands: usize,
    /// Element commands dropped by clipping or invalid ranges
    pub skipped_commands: usize,
    pub callbacks: usize,
    pub resets: usize,
    pub polygons: usize,
    pub solid_fills: usize,
    pub linear_fills: usize,
    pub radial_fills: usize,
    pub bitmap_fills: usize,
    pub outlines: usize,
    pub glyph_runs: usize,
    pub glyphs: usize,
    /// Glyph runs consumed without drawing because text resources were missing
    pub skipped_glyph_runs: usize,
    pub failed_resources: usize,
}

/// Index and vertex window of one element command
#[derive(Debug, Clone, Copy)]
pub struct CommandWindow<'a> {
    pub texture_id: TextureId,
    /// Indices relative to `vertices`
    pub indices: &'a [DrawIdx],
    pub vertices: &'a [Vertex],
}

/// Everything the per-command passes need for one frame
pub(crate) struct FrameContext<'a> {
    pub io: &'a Io,
    pub target: &'a mut dyn RenderTarget,
    pub device: &'a mut DeviceObjects,
    pub text: &'a mut TextFormatCache,
    pub config: &'a RendererConfig,
    /// Framebuffer bounds in draw data coordinates
    pub view: Rect,
    pub stats: FrameStats,
}

/// Project a command clip rect into framebuffer pixels
///
/// Returns `None` when nothing is left after clamping to the framebuffer.
pub fn project_clip_rect(clip: [f32; 4], clip_off: Vec2, clip_scale: Vec2, framebuffer: PixelSize) -> Option<Rect> {
    let min_x = ((clip[0] - clip_off.x) * clip_scale.x).max(0.0);
    let min_y = ((clip[1] - clip_off.y) * clip_scale.y).max(0.0);
    let max_x = ((clip[2] - clip_off.x) * clip_scale.x).min(framebuffer.width as f32);
    let max_y = ((clip[3] - clip_off.y) * clip_scale.y).min(framebuffer.height as f32);
    if max_x <= min_x || max_y <= min_y {
        return None;
    }
    Some(Rect::new(min_x, min_y, max_x, max_y))
}

/// Transform from draw data coordinates to framebuffer pixels
pub fn projection_transform(draw_data: &DrawData) -> Transform2D {
    Transform2D::translate(-draw_data.display_pos.x, -draw_data.display_pos.y).then(&Transform2D::scale(
        draw_data.framebuffer_scale.x,
        draw_data.framebuffer_scale.y,
    ))
}

/// Framebuffer bounds mapped back into draw data coordinates
pub fn view_rect(draw_data: &DrawData, framebuffer: PixelSize) -> Rect {
    let pixels = framebuffer.to_rect();
    let (pos, scale) = (draw_data.display_pos, draw_data.framebuffer_scale);
    Rect::new(
        pos.x + pixels.left / scale.x,
        pos.y + pixels.top / scale.y,
        pos.x + pixels.right / scale.x,
        pos.y + pixels.bottom / scale.y,
    )
}

fn setup_render_state(target: &mut dyn RenderTarget, projection: Transform2D) {
    target.set_antialias_mode(AntialiasMode::PerPrimitive);
    target.set_transform(projection);
}

pub(crate) fn render_draw_data(ctx: &mut FrameContext<'_>, draw_data: &DrawData) {
    let framebuffer = ctx.target.pixel_size();
    let projection = projection_transform(draw_data);
    setup_render_state(&mut *ctx.target, projection);

    for list in &draw_data.lists {
        ctx.stats.lists += 1;
        for cmd in &list.commands {
            ctx.stats.commands += 1;
            match cmd {
                DrawCmd::Callback(callback) => {
                    ctx.stats.callbacks += 1;
                    callback.invoke(list, cmd);
                }
                DrawCmd::ResetRenderState => {
                    ctx.stats.resets += 1;
                    setup_render_state(&mut *ctx.target, projection);
                }
                DrawCmd::Elements(elements) => {
                    render_elements(ctx, draw_data, list, elements, framebuffer, projection);
                }
            }
        }
    }
}

fn render_elements(
    ctx: &mut FrameContext<'_>,
    draw_data: &DrawData,
    list: &DrawList,
    elements: &ElementsCmd,
    framebuffer: PixelSize,
    projection: Transform2D,
) {
    let Some(clip) = project_clip_rect(
        elements.clip_rect,
        draw_data.display_pos,
        draw_data.framebuffer_scale,
        framebuffer,
    ) else {
        tracing::trace!("command clipped out: {:?}", elements.clip_rect);
        ctx.stats.skipped_commands += 1;
        return;
    };
    let Some((indices, vertices)) = list.window(elements) else {
        tracing::warn!(
            "Skipping command with out of range window: idx {}+{}, vtx offset {}",
            elements.idx_offset,
            elements.elem_count,
            elements.vtx_offset
        );
        ctx.stats.skipped_commands += 1;
        return;
    };
    if indices.is_empty() {
        return;
    }

    let window = CommandWindow {
        texture_id: elements.texture_id,
        indices,
        vertices,
    };

    // Clip rect is in framebuffer pixels
    ctx.target.set_transform(Transform2D::identity());
    ctx.target.push_axis_aligned_clip(clip, AntialiasMode::Aliased);
    ctx.target.set_transform(projection);

    let mut offset = 0;
    while offset < indices.len() {
        if ctx.config.text.enabled {
            let consumed = render_glyph_run(ctx, &window, offset);
            if consumed > 0 {
                offset += consumed;
                continue;
            }
        }
        offset += render_polygon(ctx, &window, offset);
    }

    ctx.target.pop_axis_aligned_clip();
}
