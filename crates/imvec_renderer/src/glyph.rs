//! Glyph detection and text runs
//!
//! The toolkit renders text as textured quads sampling the font atlas. A quad
//! whose first vertex UV is exactly a glyph corner in the atlas is treated as
//! a glyph cell, and consecutive cells of the same font form a run that is
//! handed to the text engine instead of being filled as geometry.

use crate::convert::to_native_color;
use crate::frame::{CommandWindow, FrameContext};
use imvec_core::{Io, PackedColor, Vec2};
use imvec_paint::Rect;
use smallvec::SmallVec;

/// Indices per glyph cell (two triangles)
pub const GLYPH_CELL_INDICES: usize = 6;

/// A glyph and its pen origin in draw data coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionedGlyph {
    pub ch: char,
    pub origin: Vec2,
}

/// Consecutive glyph cells of one font
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphRun {
    pub font_index: usize,
    /// Pixel size after font and global scale
    pub size: f32,
    /// Vertex color of the first glyph
    pub color: PackedColor,
    pub glyphs: SmallVec<[PositionedGlyph; 16]>,
}

impl GlyphRun {
    pub fn indices_consumed(&self) -> usize {
        self.glyphs.len() * GLYPH_CELL_INDICES
    }

    pub fn text(&self) -> String {
        self.glyphs.iter().map(|g| g.ch).collect()
    }
}

/// Detect a glyph run starting at `offset`
///
/// Returns `None` when the command does not sample the font atlas, when
/// `offset` is past the window, when the first UV is the white pixel or a
/// line texel, or when it matches no glyph.
pub fn extract_glyph_run(io: &Io, window: &CommandWindow<'_>, offset: usize) -> Option<GlyphRun> {
    let atlas = &io.fonts;
    if window.texture_id != atlas.texture_id {
        return None;
    }
    let first = window.vertices[*window.indices.get(offset)? as usize];
    if atlas.is_solid_uv(first.uv) {
        return None;
    }

    let (font_index, font) = atlas
        .fonts
        .iter()
        .enumerate()
        .find(|(_, font)| font.find_glyph_by_uv(first.uv).is_some())?;
    let scale = font.scale * io.font_global_scale;
    let baseline = (font.font_size - font.ascent) * scale;

    let mut glyphs = SmallVec::new();
    let mut i = offset;
    while i + GLYPH_CELL_INDICES <= window.indices.len() {
        let v = window.vertices[window.indices[i] as usize];
        let Some(glyph) = font.find_glyph_by_uv(v.uv) else {
            break;
        };
        glyphs.push(PositionedGlyph {
            ch: glyph.as_char(),
            origin: Vec2::new(v.pos.x - glyph.x0 * scale, v.pos.y - glyph.y0 * scale + baseline),
        });
        i += GLYPH_CELL_INDICES;
    }

    if glyphs.is_empty() {
        return None;
    }
    Some(GlyphRun {
        font_index,
        size: font.font_size * scale,
        color: first.col,
        glyphs,
    })
}

/// Draw the glyph run at `offset`, if any
///
/// Returns the indices consumed: six per glyph, zero when `offset` does not
/// start a glyph cell. A run whose text resources cannot be created is still
/// consumed.
pub(crate) fn render_glyph_run(ctx: &mut FrameContext<'_>, window: &CommandWindow<'_>, offset: usize) -> usize {
    let Some(run) = extract_glyph_run(ctx.io, window, offset) else {
        return 0;
    };
    let consumed = run.indices_consumed();
    ctx.stats.glyph_runs += 1;
    ctx.stats.glyphs += run.glyphs.len();

    let font = &ctx.io.fonts.fonts[run.font_index];
    let Some(format) = ctx
        .text
        .get_or_create(run.font_index, font, run.size, &ctx.config.text)
    else {
        ctx.stats.skipped_glyph_runs += 1;
        return consumed;
    };
    let Some(brush) = ctx.device.solid_brush.get() else {
        ctx.stats.skipped_glyph_runs += 1;
        return consumed;
    };

    tracing::trace!("glyph run {:?} at {}", run.text(), offset);
    brush.set_color(to_native_color(run.color));
    let view = ctx.view;
    let mut buf = [0u8; 4];
    for glyph in &run.glyphs {
        // Layout box runs from the pen to the far edge of the view
        let layout = Rect::new(
            glyph.origin.x,
            glyph.origin.y,
            view.right.max(glyph.origin.x),
            view.bottom.max(glyph.origin.y),
        );
        ctx.target
            .draw_text(glyph.ch.encode_utf8(&mut buf), &format, layout, brush);
    }
    consumed
}
