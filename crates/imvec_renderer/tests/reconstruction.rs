//! Polygon reconstruction and glyph detection through the full frame path
//!
//! Every test renders draw data into a `RecordingTarget` and inspects the
//! recorded native calls.

mod common;

use common::{fixture, fixture_with, ListBuilder, FULL_CLIP, WHITE_UV};
use imvec_core::{DrawData, PackedColor, TextureId, Vec2};
use imvec_paint::{
    AntialiasMode, BitmapKey, Color, PaintCommand, Point, RecordedFill, Rect, RenderTarget,
    ResourceKind,
};
use imvec_renderer::RendererConfig;

const R: PackedColor = PackedColor::RED;
const G: PackedColor = PackedColor::GREEN;
const B: PackedColor = PackedColor::BLUE;
const W: PackedColor = PackedColor::WHITE;

/// Test that a uniform triangle becomes one solid fill of its own shape
#[test]
fn test_uniform_triangle_is_solid_fill() {
    let mut f = fixture();
    let atlas = f.atlas();
    let list = ListBuilder::new()
        .triangle([(10.0, 10.0), (50.0, 10.0), (30.0, 40.0)], R)
        .cmd(atlas, FULL_CLIP)
        .build();

    let stats = f.render(vec![list]);
    assert_eq!(stats.polygons, 1);
    assert_eq!(stats.solid_fills, 1);

    assert_eq!(f.fills(), vec![RecordedFill::Solid(Color::RED)]);
    assert_eq!(
        f.fill_figures(),
        vec![vec![vec![
            Point::new(10.0, 10.0),
            Point::new(50.0, 10.0),
            Point::new(30.0, 40.0)
        ]]]
    );
    let antialias = f.target.fills().find_map(|c| match c {
        PaintCommand::FillGeometry { antialias, .. } => Some(*antialias),
        _ => None,
    });
    assert_eq!(antialias, Some(AntialiasMode::PerPrimitive));
}

/// Test that a solid quad is filled once with both triangles as figures
#[test]
fn test_solid_quad_keeps_triangles() {
    let mut f = fixture();
    let atlas = f.atlas();
    let list = ListBuilder::new()
        .quad((0.0, 0.0), (20.0, 10.0), [G; 4])
        .cmd(atlas, FULL_CLIP)
        .build();

    f.render(vec![list]);
    let figures = f.fill_figures();
    assert_eq!(figures.len(), 1);
    assert_eq!(figures[0].len(), 2);
    assert_eq!(f.fills(), vec![RecordedFill::Solid(Color::GREEN)]);
}

/// Test that triangles sharing no index with their predecessor start a new polygon
#[test]
fn test_adjacency_break_splits_fills() {
    let mut f = fixture();
    let atlas = f.atlas();
    let list = ListBuilder::new()
        .triangle([(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)], R)
        .triangle([(20.0, 0.0), (30.0, 0.0), (30.0, 10.0)], R)
        .cmd(atlas, FULL_CLIP)
        .build();

    let stats = f.render(vec![list]);
    assert_eq!(stats.polygons, 2);
    assert_eq!(stats.solid_fills, 2);
    assert_eq!(f.fill_figures().len(), 2);
}

/// Test the linear gradient axis when the first and last corner share a color
#[test]
fn test_two_color_quad_first_edge() {
    let mut f = fixture();
    let atlas = f.atlas();
    let list = ListBuilder::new()
        .quad((0.0, 0.0), (40.0, 20.0), [R, B, B, R])
        .cmd(atlas, FULL_CLIP)
        .build();

    let stats = f.render(vec![list]);
    assert_eq!(stats.linear_fills, 1);

    let fills = f.fills();
    let RecordedFill::Linear { start, end, stops } = &fills[0] else {
        panic!("expected linear fill, got {:?}", fills[0]);
    };
    assert_eq!(*start, Point::new(0.0, 0.0));
    assert_eq!(*end, Point::new(40.0, 0.0));
    assert_eq!(stops[0].position, 0.0);
    assert_eq!(stops[0].color, Color::RED);
    assert_eq!(stops[1].position, 1.0);
    assert_eq!(stops[1].color, Color::BLUE);

    // Gradient fills are aliased, then the default mode comes back
    let modes: Vec<_> = f
        .target
        .commands()
        .iter()
        .filter_map(|c| match c {
            PaintCommand::FillGeometry { antialias, .. } => Some(*antialias),
            _ => None,
        })
        .collect();
    assert_eq!(modes, vec![AntialiasMode::Aliased]);
    assert!(matches!(
        f.target.commands().iter().rev().nth(1),
        Some(PaintCommand::SetAntialiasMode(AntialiasMode::PerPrimitive))
    ));
}

/// Test the linear gradient axis when the first and last corner differ
#[test]
fn test_two_color_quad_second_edge() {
    let mut f = fixture();
    let atlas = f.atlas();
    let list = ListBuilder::new()
        .quad((0.0, 0.0), (40.0, 20.0), [R, R, B, B])
        .cmd(atlas, FULL_CLIP)
        .build();

    f.render(vec![list]);
    let fills = f.fills();
    let RecordedFill::Linear { start, end, stops } = &fills[0] else {
        panic!("expected linear fill, got {:?}", fills[0]);
    };
    assert_eq!(*start, Point::new(40.0, 0.0));
    assert_eq!(*end, Point::new(40.0, 20.0));
    assert_eq!(stops[0].color, Color::RED);
    assert_eq!(stops[1].color, Color::BLUE);
}

/// Test that a four-color quad is approximated by four overlaid radial fills
#[test]
fn test_four_color_quad_radial_fills() {
    let mut f = fixture();
    let atlas = f.atlas();
    let list = ListBuilder::new()
        .quad((10.0, 10.0), (50.0, 30.0), [R, G, B, W])
        .cmd(atlas, FULL_CLIP)
        .build();

    let stats = f.render(vec![list]);
    assert_eq!(stats.polygons, 1);
    assert_eq!(stats.radial_fills, 4);

    let fills = f.fills();
    assert_eq!(fills.len(), 4);
    let RecordedFill::Radial {
        center,
        origin_offset,
        radius_x,
        radius_y,
        stops,
    } = &fills[0]
    else {
        panic!("expected radial fill, got {:?}", fills[0]);
    };
    assert_eq!(*center, Point::new(10.0, 10.0));
    assert_eq!(*origin_offset, Point::ZERO);
    assert_eq!((*radius_x, *radius_y), (40.0, 20.0));
    assert_eq!(stops[0].color, Color::RED);
    assert_eq!(stops[1].color, Color::RED.with_alpha(0.0));

    let centers: Vec<_> = fills
        .iter()
        .filter_map(|fill| match fill {
            RecordedFill::Radial { center, .. } => Some(*center),
            _ => None,
        })
        .collect();
    assert_eq!(
        centers,
        vec![
            Point::new(10.0, 10.0),
            Point::new(50.0, 30.0),
            Point::new(50.0, 10.0),
            Point::new(10.0, 30.0)
        ]
    );
}

/// Test that a three-color triangle gets one radial fill per corner
#[test]
fn test_three_color_triangle_radial_fills() {
    let mut f = fixture();
    let atlas = f.atlas();
    let mut builder = ListBuilder::new();
    let a = builder.vertex(0.0, 0.0, WHITE_UV, R);
    let b = builder.vertex(30.0, 0.0, WHITE_UV, G);
    let c = builder.vertex(0.0, 30.0, WHITE_UV, B);
    let list = builder.indices(&[a, b, c]).cmd(atlas, FULL_CLIP).build();

    let stats = f.render(vec![list]);
    assert_eq!(stats.radial_fills, 3);
}

/// Test that more colors than the blend limit fall back to the first vertex color
#[test]
fn test_too_many_colors_solid_fallback() {
    let mut f = fixture_with(RendererConfig::from_toml_str("[shading]\nmax_blend_colors = 2\n").unwrap());
    let atlas = f.atlas();
    let mut builder = ListBuilder::new();
    let a = builder.vertex(0.0, 0.0, WHITE_UV, R);
    let b = builder.vertex(30.0, 0.0, WHITE_UV, G);
    let c = builder.vertex(0.0, 30.0, WHITE_UV, B);
    let list = builder.indices(&[a, b, c]).cmd(atlas, FULL_CLIP).build();

    let stats = f.render(vec![list]);
    assert_eq!(stats.solid_fills, 1);
    assert_eq!(f.fills(), vec![RecordedFill::Solid(Color::RED)]);
}

/// Test that a quad sampling a user texture is filled with a bitmap brush
#[test]
fn test_textured_quad_bitmap_fill() {
    let mut f = fixture();
    let list = ListBuilder::new()
        .quad_uv((20.0, 20.0), (60.0, 40.0), Vec2::ZERO, Vec2::ONE, [W; 4])
        .cmd(TextureId(5), FULL_CLIP)
        .build();

    let stats = f.render(vec![list]);
    assert_eq!(stats.bitmap_fills, 1);
    assert_eq!(stats.glyph_runs, 0);

    let fills = f.fills();
    let RecordedFill::Bitmap { bitmap, transform } = &fills[0] else {
        panic!("expected bitmap fill, got {:?}", fills[0]);
    };
    assert_eq!(*bitmap, BitmapKey(5));
    assert_eq!(transform.transform_point(Point::ZERO), Point::new(20.0, 20.0));
    assert_eq!(transform.transform_point(Point::new(1.0, 1.0)), Point::new(60.0, 40.0));
}

/// Test that glyph cells in the atlas become one text draw per glyph
#[test]
fn test_glyph_run_draws_text() {
    let mut f = fixture();
    let atlas = f.atlas();
    let font = f.io.fonts.fonts[0].clone();
    let list = ListBuilder::new()
        .glyph(&font.glyphs[0], 10.0, 20.0, W)
        .glyph(&font.glyphs[1], 17.0, 20.0, W)
        .cmd(atlas, FULL_CLIP)
        .build();

    let stats = f.render(vec![list]);
    assert_eq!(stats.glyph_runs, 1);
    assert_eq!(stats.glyphs, 2);
    assert_eq!(stats.polygons, 0);
    assert_eq!(f.texts(), vec!["A".to_string(), "B".to_string()]);
    assert!(f.fills().is_empty());

    let first = f.target.texts().next().cloned();
    let Some(PaintCommand::DrawText {
        family,
        size,
        layout_rect,
        color,
        ..
    }) = first
    else {
        panic!("expected a text draw");
    };
    assert_eq!(family, "Inter");
    assert_eq!(size, 13.0);
    assert_eq!(color, Color::WHITE);
    // Pen at (10, 20), shifted down by size - ascent
    assert_eq!(layout_rect, Rect::new(10.0, 22.0, 200.0, 100.0));
}

/// Test that text layout follows the display offset instead of raw framebuffer pixels
#[test]
fn test_glyph_layout_with_display_offset() {
    let mut f = fixture();
    let atlas = f.atlas();
    let font = f.io.fonts.fonts[0].clone();
    let list = ListBuilder::new()
        .glyph(&font.glyphs[0], 250.0, 20.0, W)
        .cmd(atlas, [100.0, 0.0, 300.0, 100.0])
        .build();
    let mut draw_data = DrawData::new(vec![list], Vec2::new(200.0, 100.0));
    draw_data.display_pos = Vec2::new(100.0, 0.0);

    let stats = f.renderer.render(&f.io, &mut f.target, &draw_data);
    assert_eq!(stats.glyphs, 1);
    assert_eq!(stats.skipped_commands, 0);

    let layout = f.target.texts().find_map(|c| match c {
        PaintCommand::DrawText { layout_rect, .. } => Some(*layout_rect),
        _ => None,
    });
    assert_eq!(layout, Some(Rect::new(250.0, 22.0, 300.0, 100.0)));
    // Pen lands on framebuffer pixel 150
    assert_eq!(
        f.target.transform().transform_point(Point::new(250.0, 22.0)),
        Point::new(150.0, 22.0)
    );
}

/// Test that geometry after a glyph run in the same command is still reconstructed
#[test]
fn test_glyphs_then_rect() {
    let mut f = fixture();
    let atlas = f.atlas();
    let font = f.io.fonts.fonts[0].clone();
    let list = ListBuilder::new()
        .glyph(&font.glyphs[2], 0.0, 0.0, W)
        .quad((0.0, 20.0), (50.0, 30.0), [R; 4])
        .cmd(atlas, FULL_CLIP)
        .build();

    let stats = f.render(vec![list]);
    assert_eq!(stats.glyphs, 1);
    assert_eq!(stats.solid_fills, 1);
    assert_eq!(f.texts(), vec!["C".to_string()]);
}

/// Test that rectangles sampling the white pixel are never mistaken for text
#[test]
fn test_white_pixel_rect_is_not_text() {
    let mut f = fixture();
    let atlas = f.atlas();
    let list = ListBuilder::new()
        .quad((0.0, 0.0), (10.0, 10.0), [W; 4])
        .quad_uv(
            (0.0, 20.0),
            (10.0, 21.0),
            Vec2::new(0.5, 0.5),
            Vec2::new(0.5625, 0.5),
            [W; 4],
        )
        .cmd(atlas, FULL_CLIP)
        .build();

    let stats = f.render(vec![list]);
    assert_eq!(stats.glyph_runs, 0);
    assert!(f.texts().is_empty());
    assert_eq!(stats.solid_fills, 2);
}

/// Test that glyph-shaped quads on another texture are not text
#[test]
fn test_glyph_uvs_on_other_texture() {
    let mut f = fixture();
    let font = f.io.fonts.fonts[0].clone();
    let list = ListBuilder::new()
        .glyph(&font.glyphs[0], 0.0, 0.0, W)
        .cmd(TextureId(42), FULL_CLIP)
        .build();

    let stats = f.render(vec![list]);
    assert_eq!(stats.glyph_runs, 0);
    assert_eq!(stats.bitmap_fills, 1);
}

/// Test that a run is consumed without drawing when its text format fails
#[test]
fn test_text_format_failure_consumes_run() {
    let mut f = fixture();
    f.text.fail_resource(ResourceKind::TextFormat, true);
    let atlas = f.atlas();
    let font = f.io.fonts.fonts[0].clone();
    let list = ListBuilder::new()
        .glyph(&font.glyphs[0], 0.0, 0.0, W)
        .glyph(&font.glyphs[1], 7.0, 0.0, W)
        .cmd(atlas, FULL_CLIP)
        .build();

    let stats = f.render(vec![list.clone()]);
    assert_eq!(stats.glyph_runs, 1);
    assert_eq!(stats.skipped_glyph_runs, 1);
    assert_eq!(stats.polygons, 0);
    assert!(f.texts().is_empty());
    assert!(f.fills().is_empty());

    // The failure is cached, not retried
    f.text.fail_resource(ResourceKind::TextFormat, false);
    let stats = f.render(vec![list]);
    assert_eq!(stats.skipped_glyph_runs, 1);
    assert_eq!(f.text.stats().created(ResourceKind::TextFormat), 0);
}

/// Test that disabling text sends glyph cells down the polygon path
#[test]
fn test_text_disabled() {
    let mut config = RendererConfig::default();
    config.text.enabled = false;
    let mut f = fixture_with(config);
    let atlas = f.atlas();
    let font = f.io.fonts.fonts[0].clone();
    let list = ListBuilder::new()
        .glyph(&font.glyphs[0], 0.0, 0.0, W)
        .cmd(atlas, FULL_CLIP)
        .build();

    let stats = f.render(vec![list]);
    assert_eq!(stats.glyph_runs, 0);
    assert_eq!(stats.bitmap_fills, 1);
    assert_eq!(
        f.fills().first().map(|fill| matches!(fill, RecordedFill::Bitmap { bitmap, .. } if bitmap.0 == atlas.0)),
        Some(true)
    );
}

/// Test that the debug outline strokes every polygon
#[test]
fn test_debug_outline() {
    let mut config = RendererConfig::default();
    config.debug.outline_width = Some(1.5);
    let mut f = fixture_with(config);
    let atlas = f.atlas();
    let list = ListBuilder::new()
        .quad((0.0, 0.0), (10.0, 10.0), [R; 4])
        .triangle([(20.0, 0.0), (30.0, 0.0), (30.0, 10.0)], G)
        .cmd(atlas, FULL_CLIP)
        .build();

    let stats = f.render(vec![list]);
    assert_eq!(stats.outlines, 2);
    let widths: Vec<_> = f
        .target
        .commands()
        .iter()
        .filter_map(|c| match c {
            PaintCommand::DrawGeometry { stroke_width, .. } => Some(*stroke_width),
            _ => None,
        })
        .collect();
    assert_eq!(widths, vec![1.5, 1.5]);
}

/// Test that a failed geometry skips the polygon but consumes its indices
#[test]
fn test_geometry_failure_skips_polygon() {
    let mut f = fixture();
    f.target.fail_resource(ResourceKind::PathGeometry, true);
    let atlas = f.atlas();
    let list = ListBuilder::new()
        .triangle([(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)], R)
        .triangle([(20.0, 0.0), (30.0, 0.0), (30.0, 10.0)], R)
        .cmd(atlas, FULL_CLIP)
        .build();

    let stats = f.render(vec![list]);
    assert_eq!(stats.polygons, 2);
    assert_eq!(stats.failed_resources, 2);
    assert!(f.fills().is_empty());
    assert_eq!(f.target.clip_depth(), 0);
}

/// Test that a gradient failure does not stop later polygons
#[test]
fn test_gradient_failure_continues() {
    let mut f = fixture();
    f.target.fail_resource(ResourceKind::GradientStops, true);
    let atlas = f.atlas();
    let list = ListBuilder::new()
        .quad((0.0, 0.0), (10.0, 10.0), [R, B, B, R])
        .triangle([(20.0, 0.0), (30.0, 0.0), (30.0, 10.0)], G)
        .cmd(atlas, FULL_CLIP)
        .build();

    let stats = f.render(vec![list]);
    assert_eq!(stats.linear_fills, 0);
    assert_eq!(stats.failed_resources, 1);
    assert_eq!(f.fills(), vec![RecordedFill::Solid(Color::GREEN)]);
}

/// Test that a trailing partial triangle is ignored
#[test]
fn test_trailing_indices_ignored() {
    let mut f = fixture();
    let atlas = f.atlas();
    let mut builder = ListBuilder::new();
    builder.triangle([(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)], R);
    builder.indices(&[0, 1]);
    let list = builder.cmd(atlas, FULL_CLIP).build();

    let stats = f.render(vec![list]);
    assert_eq!(stats.polygons, 1);
    assert_eq!(f.fills().len(), 1);
}
