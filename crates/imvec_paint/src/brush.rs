//! Brushes and stroke styles
//!
//! Brushes are immutable once created, except for the solid color brush which
//! is recolored in place between fills.

use crate::color::Color;
use crate::geometry::{Point, Transform2D};
use smallvec::SmallVec;
use std::cell::Cell;
use std::rc::Rc;

/// Solid color brush, recolorable
#[derive(Debug)]
pub struct SolidColorBrush {
    color: Cell<Color>,
}

impl SolidColorBrush {
    pub fn new(color: Color) -> Self {
        Self {
            color: Cell::new(color),
        }
    }

    pub fn color(&self) -> Color {
        self.color.get()
    }

    pub fn set_color(&self, color: Color) {
        self.color.set(color);
    }
}

/// A gradient stop
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GradientStop {
    /// 0.0 to 1.0
    pub position: f32,
    pub color: Color,
}

impl GradientStop {
    pub const fn new(position: f32, color: Color) -> Self {
        Self { position, color }
    }
}

/// Immutable set of gradient stops shared by gradient brushes
#[derive(Clone, Debug, PartialEq)]
pub struct GradientStopCollection {
    stops: SmallVec<[GradientStop; 2]>,
}

impl GradientStopCollection {
    pub fn new(stops: &[GradientStop]) -> Self {
        Self {
            stops: SmallVec::from_slice(stops),
        }
    }

    pub fn stops(&self) -> &[GradientStop] {
        &self.stops
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearGradientBrushProperties {
    pub start: Point,
    pub end: Point,
}

/// Linear gradient brush along `start` to `end`
#[derive(Debug)]
pub struct LinearGradientBrush {
    pub properties: LinearGradientBrushProperties,
    pub stops: Rc<GradientStopCollection>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RadialGradientBrushProperties {
    pub center: Point,
    /// Offset of the gradient origin from the center
    pub origin_offset: Point,
    pub radius_x: f32,
    pub radius_y: f32,
}

/// Elliptical radial gradient brush
#[derive(Debug)]
pub struct RadialGradientBrush {
    pub properties: RadialGradientBrushProperties,
    pub stops: Rc<GradientStopCollection>,
}

/// Key of a bitmap known to a render target
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct BitmapKey(pub usize);

/// Brush painting a bitmap
///
/// `transform` maps normalized bitmap coordinates (0..1 on both axes) to
/// target space.
#[derive(Debug)]
pub struct BitmapBrush {
    pub bitmap: BitmapKey,
    pub transform: Transform2D,
}

/// Borrowed brush passed to fill calls
#[derive(Clone, Copy, Debug)]
pub enum Brush<'a> {
    Solid(&'a SolidColorBrush),
    Linear(&'a LinearGradientBrush),
    Radial(&'a RadialGradientBrush),
    Bitmap(&'a BitmapBrush),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LineJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrokeStyleProperties {
    pub line_join: LineJoin,
    pub miter_limit: f32,
}

impl Default for StrokeStyleProperties {
    fn default() -> Self {
        Self {
            line_join: LineJoin::Miter,
            miter_limit: 10.0,
        }
    }
}

/// Device-independent stroke style
#[derive(Debug)]
pub struct StrokeStyle {
    pub properties: StrokeStyleProperties,
}
