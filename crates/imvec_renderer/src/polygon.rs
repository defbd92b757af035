//! Polygon reconstruction
//!
//! The toolkit hands over flat triangle lists with per-vertex colors. The
//! native API only fills path geometry with a brush, so consecutive triangles
//! are grouped back into polygons and each polygon is shaded with the brush
//! that best approximates its vertex colors:
//!
//! | distinct colors | strategy | polygon size |
//! |---|---|---|
//! | 1 | solid brush | unbounded |
//! | 2 | linear gradient | up to `gradient_max_indices` |
//! | 3-4 | overlaid radial gradients, one per corner | up to `gradient_max_indices` |
//! | more | solid brush with the first vertex color | - |
//!
//! A triangle joins the polygon only if it shares an index with the triangle
//! right before it and the grown polygon still fits the table.

use crate::convert::{to_native_color, to_native_point};
use crate::frame::{CommandWindow, FrameContext};
use crate::gradient::{build_linear_gradient, build_radial_gradient};
use imvec_core::{DrawIdx, FontAtlas, PackedColor, Vertex};
use imvec_paint::{
    AntialiasMode, BitmapKey, Brush, Factory, FigureBegin, FigureEnd, FillMode, Handle, PaintError,
    PathGeometry, Transform2D,
};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::rc::Rc;

/// Color count to polygon size table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct ShadingPolicy {
    /// Most distinct colors a gradient approximation can blend
    #[serde(default = "default_max_blend_colors")]
    pub max_blend_colors: usize,
    /// Largest polygon, in indices, that gets a gradient
    #[serde(default = "default_gradient_max_indices")]
    pub gradient_max_indices: usize,
}

fn default_max_blend_colors() -> usize {
    4
}

fn default_gradient_max_indices() -> usize {
    6
}

impl Default for ShadingPolicy {
    fn default() -> Self {
        Self {
            max_blend_colors: default_max_blend_colors(),
            gradient_max_indices: default_gradient_max_indices(),
        }
    }
}

impl ShadingPolicy {
    /// Whether a polygon of `indices` indices with `colors` distinct colors can be shaded
    pub fn accepts(&self, colors: usize, indices: usize) -> bool {
        match colors {
            0 | 1 => true,
            c if c <= self.max_blend_colors => indices <= self.gradient_max_indices,
            _ => false,
        }
    }
}

/// A run of adjacent triangles filled as one shape
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon<'a> {
    /// Offset of the first index in the command's index window
    pub start: usize,
    pub indices: &'a [DrawIdx],
    /// Distinct vertex colors, in order of first appearance
    pub colors: SmallVec<[PackedColor; 4]>,
}

impl<'a> Polygon<'a> {
    /// Indices consumed, always a multiple of 3
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn triangles(&self) -> impl Iterator<Item = &'a [DrawIdx]> {
        self.indices.chunks_exact(3)
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// First three indices of the first triangle and the last index of the last
    pub fn corner_indices(&self) -> [DrawIdx; 4] {
        let i = self.indices;
        [i[0], i[1], i[2], i[i.len() - 1]]
    }
}

fn push_distinct(colors: &mut SmallVec<[PackedColor; 4]>, color: PackedColor) {
    if !colors.contains(&color) {
        colors.push(color);
    }
}

/// Group triangles starting at `start` into one polygon
///
/// Returns `None` when fewer than three indices remain. Every index must be
/// in range of `vertices`, which `DrawList::window` guarantees.
pub fn collect_polygon<'a>(
    indices: &'a [DrawIdx],
    vertices: &[Vertex],
    start: usize,
    policy: &ShadingPolicy,
) -> Option<Polygon<'a>> {
    let seed = indices.get(start..start.checked_add(3)?)?;
    let mut colors = SmallVec::new();
    for &i in seed {
        push_distinct(&mut colors, vertices[i as usize].col);
    }

    let mut end = start + 3;
    while let Some(next) = indices.get(end..end + 3) {
        let prev = &indices[end - 3..end];
        if !next.iter().any(|i| prev.contains(i)) {
            break;
        }

        let mut grown = colors.clone();
        for &i in next {
            push_distinct(&mut grown, vertices[i as usize].col);
        }
        if !policy.accepts(grown.len(), end + 3 - start) {
            break;
        }
        colors = grown;
        end += 3;
    }

    Some(Polygon {
        start,
        indices: &indices[start..end],
        colors,
    })
}

/// How a polygon is shaded
#[derive(Debug, Clone, PartialEq)]
pub enum ShadingStrategy {
    Solid(PackedColor),
    /// Two-color gradient along `from` to `to`
    Linear { from: Vertex, to: Vertex },
    /// One radial fill per pair, centered on the first vertex and fading out
    /// toward the second
    Radial { pairs: SmallVec<[(Vertex, Vertex); 4]> },
}

/// Pick the shading strategy from the polygon's color count and corners
///
/// Polygons with more colors than `policy` can blend fall back to a solid
/// fill with the first vertex color. Two-color polygons assume the toolkit's quad layout: when the first and
/// last corners share a color the gradient runs along the first edge,
/// otherwise along the second.
pub fn classify(polygon: &Polygon<'_>, vertices: &[Vertex], policy: &ShadingPolicy) -> ShadingStrategy {
    let [i0, i1, i2, i3] = polygon.corner_indices();
    let c0 = vertices[i0 as usize];
    let c1 = vertices[i1 as usize];
    let c2 = vertices[i2 as usize];
    let c3 = vertices[i3 as usize];

    match polygon.colors.len() {
        n if n > policy.max_blend_colors => ShadingStrategy::Solid(c0.col),
        1 => ShadingStrategy::Solid(c0.col),
        2 if c0.col == c3.col => ShadingStrategy::Linear { from: c0, to: c1 },
        2 => ShadingStrategy::Linear { from: c1, to: c2 },
        3 | 4 => {
            let mut pairs = SmallVec::new();
            pairs.push((c0, c2));
            pairs.push((c2, c0));
            pairs.push((c1, c3));
            // A lone triangle has no fourth corner
            if i3 != i2 {
                pairs.push((c3, c1));
            }
            ShadingStrategy::Radial { pairs }
        }
        _ => ShadingStrategy::Solid(c0.col),
    }
}

/// Whether the polygon samples a real texture instead of the atlas' solid texels
pub fn is_textured(atlas: &FontAtlas, window: &CommandWindow<'_>, polygon: &Polygon<'_>) -> bool {
    if window.texture_id != atlas.texture_id {
        return true;
    }
    let first = window.vertices[polygon.indices[0] as usize];
    !atlas.is_solid_uv(first.uv)
}

/// Bitmap brush transform mapping UV space onto the corners `a` and `b`
pub fn uv_transform(a: &Vertex, b: &Vertex) -> Option<Transform2D> {
    let sx = (b.pos.x - a.pos.x) / (b.uv.x - a.uv.x);
    let sy = (b.pos.y - a.pos.y) / (b.uv.y - a.uv.y);
    if !sx.is_finite() || !sy.is_finite() || sx == 0.0 || sy == 0.0 {
        return None;
    }
    Some(Transform2D {
        a: sx,
        b: 0.0,
        c: 0.0,
        d: sy,
        e: a.pos.x - a.uv.x * sx,
        f: a.pos.y - a.uv.y * sy,
    })
}

fn build_geometry(
    factory: &dyn Factory,
    polygon: &Polygon<'_>,
    vertices: &[Vertex],
) -> Result<Rc<PathGeometry>, PaintError> {
    let geometry = factory.create_path_geometry()?;
    let mut sink = geometry.open()?;
    sink.set_fill_mode(FillMode::Alternate);
    for tri in polygon.triangles() {
        let p0 = to_native_point(vertices[tri[0] as usize].pos);
        let p1 = to_native_point(vertices[tri[1] as usize].pos);
        let p2 = to_native_point(vertices[tri[2] as usize].pos);
        sink.begin_figure(p0, FigureBegin::Filled);
        sink.add_lines(&[p1, p2]);
        sink.end_figure(FigureEnd::Closed);
    }
    sink.close()?;
    Ok(geometry)
}

/// Reconstruct and fill one polygon starting at `start`
///
/// Returns the number of indices consumed. A trailing partial triangle is
/// consumed without drawing.
pub(crate) fn render_polygon(ctx: &mut FrameContext<'_>, window: &CommandWindow<'_>, start: usize) -> usize {
    let Some(polygon) = collect_polygon(window.indices, window.vertices, start, &ctx.config.shading) else {
        tracing::trace!("ignoring {} trailing indices", window.indices.len() - start);
        return window.indices.len() - start;
    };
    let consumed = polygon.len();
    ctx.stats.polygons += 1;

    let geometry = match ctx
        .device
        .factory()
        .and_then(|factory| build_geometry(factory.as_ref(), &polygon, window.vertices))
    {
        Ok(geometry) => geometry,
        Err(e) => {
            tracing::debug!("Skipping polygon at {}: {}", start, e);
            ctx.stats.failed_resources += 1;
            return consumed;
        }
    };

    let textured = is_textured(&ctx.io.fonts, window, &polygon);
    let [i0, _, i2, _] = polygon.corner_indices();
    let transform = if textured {
        uv_transform(&window.vertices[i0 as usize], &window.vertices[i2 as usize])
    } else {
        None
    };

    match transform {
        Some(transform) => fill_bitmap(ctx, &geometry, window, transform),
        None => {
            if textured {
                tracing::trace!("degenerate uv mapping at {}, shading by color", start);
            }
            let strategy = classify(&polygon, window.vertices, &ctx.config.shading);
            fill_shaded(ctx, &geometry, &strategy);
        }
    }

    if let Some(width) = ctx.config.debug.outline_width {
        if let Some(brush) = ctx.device.solid_brush.get() {
            brush.set_color(to_native_color(window.vertices[i0 as usize].col));
            ctx.target
                .draw_geometry(&geometry, Brush::Solid(brush), width, ctx.device.stroke_style.get());
            ctx.stats.outlines += 1;
        }
    }

    consumed
}

fn fill_shaded(ctx: &mut FrameContext<'_>, geometry: &PathGeometry, strategy: &ShadingStrategy) {
    match strategy {
        ShadingStrategy::Solid(color) => {
            let Some(brush) = ctx.device.solid_brush.get() else {
                ctx.stats.failed_resources += 1;
                return;
            };
            brush.set_color(to_native_color(*color));
            ctx.target.fill_geometry(geometry, Brush::Solid(brush));
            ctx.stats.solid_fills += 1;
        }
        ShadingStrategy::Linear { from, to } => {
            let mut slot = Handle::empty();
            if let Err(e) = build_linear_gradient(
                &mut *ctx.target,
                &mut ctx.device.gradient_stops,
                &mut slot,
                from.pos,
                to.pos,
                from.col,
                to.col,
            ) {
                tracing::debug!("Skipping linear gradient: {}", e);
                ctx.stats.failed_resources += 1;
                return;
            }
            if let Some(brush) = slot.get() {
                ctx.target.set_antialias_mode(AntialiasMode::Aliased);
                ctx.target.fill_geometry(geometry, Brush::Linear(brush));
                ctx.target.set_antialias_mode(AntialiasMode::PerPrimitive);
                ctx.stats.linear_fills += 1;
            }
        }
        ShadingStrategy::Radial { pairs } => {
            let mut slot = Handle::empty();
            for (corner, toward) in pairs {
                if let Err(e) = build_radial_gradient(
                    &mut *ctx.target,
                    &mut ctx.device.gradient_stops,
                    &mut slot,
                    corner.pos,
                    toward.pos,
                    corner.col,
                    corner.col.transparent(),
                ) {
                    tracing::debug!("Skipping radial gradient corner: {}", e);
                    ctx.stats.failed_resources += 1;
                    continue;
                }
                if let Some(brush) = slot.get() {
                    ctx.target.fill_geometry(geometry, Brush::Radial(brush));
                    ctx.stats.radial_fills += 1;
                }
                slot.release();
            }
        }
    }
}

fn fill_bitmap(ctx: &mut FrameContext<'_>, geometry: &PathGeometry, window: &CommandWindow<'_>, transform: Transform2D) {
    let mut slot = Handle::empty();
    match ctx
        .target
        .create_bitmap_brush(BitmapKey(window.texture_id.0), transform)
    {
        Ok(brush) => slot.attach(brush),
        Err(e) => {
            tracing::debug!("Skipping textured polygon: {}", e);
            ctx.stats.failed_resources += 1;
            return;
        }
    }
    if let Some(brush) = slot.get() {
        ctx.target.fill_geometry(geometry, Brush::Bitmap(brush));
        ctx.stats.bitmap_fills += 1;
    }
}
