//! Integration tests for brushes across both reference targets
//!
//! The same resource calls are issued against the recording target (which
//! captures brush contents) and the software target (which rasterizes them).

use imvec_paint::{
    BitmapKey, Brush, Color, FigureBegin, FigureEnd, FillMode, GradientStop,
    LinearGradientBrushProperties, PaintCommand, PathGeometry, Point, RadialGradientBrushProperties,
    RecordedFill, RecordingTarget, RenderTarget, SoftwareTarget, Transform2D,
};
use std::rc::Rc;

fn quad(target: &dyn RenderTarget, size: f32) -> Rc<PathGeometry> {
    let geometry = target.factory().create_path_geometry().unwrap();
    let mut sink = geometry.open().unwrap();
    sink.set_fill_mode(FillMode::Alternate);
    sink.begin_figure(Point::new(0.0, 0.0), FigureBegin::Filled);
    sink.add_lines(&[
        Point::new(size, 0.0),
        Point::new(size, size),
        Point::new(0.0, size),
    ]);
    sink.end_figure(FigureEnd::Closed);
    sink.close().unwrap();
    geometry
}

fn fill_linear(target: &mut dyn RenderTarget) {
    let geometry = quad(target, 32.0);
    let stops = target
        .create_gradient_stop_collection(&[
            GradientStop::new(0.0, Color::RED),
            GradientStop::new(1.0, Color::BLUE),
        ])
        .unwrap();
    let brush = target
        .create_linear_gradient_brush(
            LinearGradientBrushProperties {
                start: Point::new(0.0, 0.0),
                end: Point::new(32.0, 0.0),
            },
            &stops,
        )
        .unwrap();
    target.fill_geometry(&geometry, Brush::Linear(&brush));
}

#[test]
fn test_linear_gradient_recorded() {
    let mut target = RecordingTarget::new(32, 32);
    fill_linear(&mut target);

    match target.fills().next() {
        Some(PaintCommand::FillGeometry { fill: RecordedFill::Linear { start, end, stops }, .. }) => {
            assert_eq!(*start, Point::new(0.0, 0.0));
            assert_eq!(*end, Point::new(32.0, 0.0));
            assert_eq!(stops[0].color, Color::RED);
            assert_eq!(stops[1].color, Color::BLUE);
        }
        other => panic!("expected a linear fill, got {:?}", other),
    };
}

#[test]
fn test_linear_gradient_rasterized() {
    let mut target = SoftwareTarget::new(32, 32).unwrap();
    fill_linear(&mut target);

    let left = target.pixel(0, 16).unwrap();
    let right = target.pixel(31, 16).unwrap();
    assert!(left[0] > 200 && left[2] < 60, "left {:?}", left);
    assert!(right[2] > 200 && right[0] < 60, "right {:?}", right);
}

#[test]
fn test_radial_gradient_fades_out() {
    let mut target = SoftwareTarget::new(32, 32).unwrap();
    let geometry = quad(&target, 32.0);
    let stops = target
        .create_gradient_stop_collection(&[
            GradientStop::new(0.0, Color::GREEN),
            GradientStop::new(1.0, Color::GREEN.with_alpha(0.0)),
        ])
        .unwrap();
    let brush = target
        .create_radial_gradient_brush(
            RadialGradientBrushProperties {
                center: Point::new(0.0, 0.0),
                origin_offset: Point::ZERO,
                radius_x: 32.0,
                radius_y: 32.0,
            },
            &stops,
        )
        .unwrap();
    target.fill_geometry(&geometry, Brush::Radial(&brush));

    let near = target.pixel(1, 1).unwrap();
    let far = target.pixel(31, 31).unwrap();
    assert!(near[3] > 200, "near {:?}", near);
    assert_eq!(far[3], 0);
}

#[test]
fn test_bitmap_brush_maps_unit_square() {
    let mut target = SoftwareTarget::new(8, 8).unwrap();
    // 2x1 bitmap: red, blue
    target
        .register_bitmap(BitmapKey(1), 2, 1, &[255, 0, 0, 255, 0, 0, 255, 255])
        .unwrap();
    let geometry = quad(&target, 8.0);
    let brush = target
        .create_bitmap_brush(BitmapKey(1), Transform2D::scale(8.0, 8.0))
        .unwrap();
    target.fill_geometry(&geometry, Brush::Bitmap(&brush));

    let left = target.pixel(0, 4).unwrap();
    let right = target.pixel(7, 4).unwrap();
    assert!(left[0] > 200, "left {:?}", left);
    assert!(right[2] > 200, "right {:?}", right);
}

#[test]
fn test_solid_brush_recolored_between_fills() {
    let mut target = RecordingTarget::new(8, 8);
    let geometry = quad(&target, 8.0);
    let brush = target.create_solid_color_brush(Color::ORANGE).unwrap();
    brush.set_color(Color::RED);
    target.fill_geometry(&geometry, Brush::Solid(&brush));
    brush.set_color(Color::BLUE);
    target.fill_geometry(&geometry, Brush::Solid(&brush));

    let colors: Vec<_> = target
        .fills()
        .map(|c| match c {
            PaintCommand::FillGeometry { fill: RecordedFill::Solid(color), .. } => *color,
            other => panic!("unexpected {:?}", other),
        })
        .collect();
    assert_eq!(colors, vec![Color::RED, Color::BLUE]);
}
