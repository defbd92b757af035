//! Two-color gradient brush builders
//!
//! Both builders share one two-entry stop buffer whose positions are fixed at
//! 0 and 1; only the colors are overwritten before each brush is created.

use crate::convert::{to_native_color, to_native_point};
use imvec_core::{PackedColor, Vec2};
use imvec_paint::{
    Color, GradientStop, Handle, LinearGradientBrush, LinearGradientBrushProperties, PaintError,
    Point, RadialGradientBrush, RadialGradientBrushProperties, RenderTarget,
};

/// Stop pair shared by every gradient of a render target binding
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradientStops {
    stops: [GradientStop; 2],
}

impl Default for GradientStops {
    fn default() -> Self {
        Self::new()
    }
}

impl GradientStops {
    pub const fn new() -> Self {
        Self {
            stops: [
                GradientStop::new(0.0, Color::WHITE),
                GradientStop::new(1.0, Color::WHITE),
            ],
        }
    }

    pub fn set_colors(&mut self, from: Color, to: Color) {
        self.stops[0].color = from;
        self.stops[1].color = to;
    }

    pub fn as_slice(&self) -> &[GradientStop] {
        &self.stops
    }
}

/// Linear gradient along `a` to `b`, attached into `slot`
pub fn build_linear_gradient(
    target: &mut dyn RenderTarget,
    stops: &mut GradientStops,
    slot: &mut Handle<LinearGradientBrush>,
    a: Vec2,
    b: Vec2,
    a_col: PackedColor,
    b_col: PackedColor,
) -> Result<(), PaintError> {
    stops.set_colors(to_native_color(a_col), to_native_color(b_col));
    let collection = target.create_gradient_stop_collection(stops.as_slice())?;
    let brush = target.create_linear_gradient_brush(
        LinearGradientBrushProperties {
            start: to_native_point(a),
            end: to_native_point(b),
        },
        &collection,
    )?;
    slot.attach(brush);
    Ok(())
}

/// Radial gradient centered on `a` with radii reaching `b` on each axis
pub fn build_radial_gradient(
    target: &mut dyn RenderTarget,
    stops: &mut GradientStops,
    slot: &mut Handle<RadialGradientBrush>,
    a: Vec2,
    b: Vec2,
    a_col: PackedColor,
    b_col: PackedColor,
) -> Result<(), PaintError> {
    stops.set_colors(to_native_color(a_col), to_native_color(b_col));
    let collection = target.create_gradient_stop_collection(stops.as_slice())?;
    let brush = target.create_radial_gradient_brush(
        RadialGradientBrushProperties {
            center: to_native_point(a),
            origin_offset: Point::ZERO,
            radius_x: (a.x - b.x).abs(),
            radius_y: (a.y - b.y).abs(),
        },
        &collection,
    )?;
    slot.attach(brush);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use imvec_paint::{RecordingTarget, ResourceKind};

    #[test]
    fn test_linear_builder() {
        let mut target = RecordingTarget::new(10, 10);
        let mut stops = GradientStops::new();
        let mut slot = Handle::empty();

        build_linear_gradient(
            &mut target,
            &mut stops,
            &mut slot,
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            PackedColor::RED,
            PackedColor::BLUE,
        )
        .unwrap();

        let brush = slot.get().unwrap();
        assert_eq!(brush.properties.end, Point::new(10.0, 0.0));
        assert_eq!(brush.stops.stops()[0], GradientStop::new(0.0, Color::RED));
        assert_eq!(brush.stops.stops()[1], GradientStop::new(1.0, Color::BLUE));
        assert_eq!(target.stats().created(ResourceKind::GradientStops), 1);
    }

    #[test]
    fn test_radial_radii() {
        let mut target = RecordingTarget::new(10, 10);
        let mut stops = GradientStops::new();
        let mut slot = Handle::empty();

        build_radial_gradient(
            &mut target,
            &mut stops,
            &mut slot,
            Vec2::new(8.0, 2.0),
            Vec2::new(2.0, 6.0),
            PackedColor::GREEN,
            PackedColor::GREEN.transparent(),
        )
        .unwrap();

        let props = slot.get().unwrap().properties;
        assert_eq!(props.center, Point::new(8.0, 2.0));
        assert_eq!((props.radius_x, props.radius_y), (6.0, 4.0));
        assert_eq!(props.origin_offset, Point::ZERO);
        assert_eq!(stops.as_slice()[1].color, Color::new(0.0, 1.0, 0.0, 0.0));
    }

    #[test]
    fn test_failure_leaves_slot_untouched() {
        let mut target = RecordingTarget::new(10, 10);
        let mut stops = GradientStops::new();
        let mut slot = Handle::empty();
        target.fail_resource(ResourceKind::LinearBrush, true);

        let result = build_linear_gradient(
            &mut target,
            &mut stops,
            &mut slot,
            Vec2::ZERO,
            Vec2::ONE,
            PackedColor::RED,
            PackedColor::BLUE,
        );
        assert_eq!(result, Err(PaintError::ResourceCreation("linear gradient brush")));
        assert!(!slot.is_some());
    }
}
