//! Render target, factory and text factory interfaces
//!
//! These are the seams between the renderer and a concrete 2D stack. All
//! calls happen on the thread that owns the target; a drawing session is not
//! reentrant, which `&mut self` on every drawing call enforces.

use crate::brush::{
    BitmapBrush, BitmapKey, Brush, GradientStop, GradientStopCollection, LinearGradientBrush,
    LinearGradientBrushProperties, RadialGradientBrush, RadialGradientBrushProperties,
    SolidColorBrush, StrokeStyle, StrokeStyleProperties,
};
use crate::color::Color;
use crate::geometry::{PixelSize, Rect, Transform2D};
use crate::path::PathGeometry;
use crate::text::{FontCollection, TextFormat};
use crate::Result;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

static NEXT_TARGET_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a render target instance
///
/// A recreated target (after a resize or device loss) gets a new id, which is
/// how resource owners notice their device objects went stale.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetId(u64);

impl TargetId {
    pub fn next() -> Self {
        Self(NEXT_TARGET_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AntialiasMode {
    #[default]
    PerPrimitive,
    Aliased,
}

/// Creates device-independent resources
pub trait Factory {
    fn create_path_geometry(&self) -> Result<Rc<PathGeometry>>;

    fn create_stroke_style(&self, properties: &StrokeStyleProperties) -> Result<Rc<StrokeStyle>>;
}

/// Creates text resources
pub trait TextFactory {
    /// Register in-memory font data under `family`
    fn create_font_collection(&self, family: &str, data: &Arc<[u8]>) -> Result<Rc<FontCollection>>;

    fn create_text_format(
        &self,
        family: &str,
        collection: Option<&Rc<FontCollection>>,
        size: f32,
        locale: &str,
    ) -> Result<Rc<TextFormat>>;
}

/// A surface the renderer draws into, plus its device-dependent resources
pub trait RenderTarget {
    fn target_id(&self) -> TargetId;

    /// Factory this target was created from
    fn factory(&self) -> Rc<dyn Factory>;

    fn pixel_size(&self) -> PixelSize;

    fn begin_draw(&mut self);

    /// Finish the drawing session; `RecreateTarget` means device loss
    fn end_draw(&mut self) -> Result<()>;

    fn clear(&mut self, color: Color);

    fn transform(&self) -> Transform2D;

    fn set_transform(&mut self, transform: Transform2D);

    fn antialias_mode(&self) -> AntialiasMode;

    fn set_antialias_mode(&mut self, mode: AntialiasMode);

    /// Clip to `rect`, transformed by the current transform at push time
    fn push_axis_aligned_clip(&mut self, rect: Rect, mode: AntialiasMode);

    fn pop_axis_aligned_clip(&mut self);

    fn create_solid_color_brush(&mut self, color: Color) -> Result<Rc<SolidColorBrush>>;

    fn create_gradient_stop_collection(
        &mut self,
        stops: &[GradientStop],
    ) -> Result<Rc<GradientStopCollection>>;

    fn create_linear_gradient_brush(
        &mut self,
        properties: LinearGradientBrushProperties,
        stops: &Rc<GradientStopCollection>,
    ) -> Result<Rc<LinearGradientBrush>>;

    fn create_radial_gradient_brush(
        &mut self,
        properties: RadialGradientBrushProperties,
        stops: &Rc<GradientStopCollection>,
    ) -> Result<Rc<RadialGradientBrush>>;

    fn create_bitmap_brush(
        &mut self,
        bitmap: BitmapKey,
        transform: Transform2D,
    ) -> Result<Rc<BitmapBrush>>;

    fn fill_geometry(&mut self, geometry: &PathGeometry, brush: Brush<'_>);

    /// Stroke the outline of a geometry
    fn draw_geometry(
        &mut self,
        geometry: &PathGeometry,
        brush: Brush<'_>,
        stroke_width: f32,
        style: Option<&StrokeStyle>,
    );

    /// Draw `text` laid out in `layout_rect`
    fn draw_text(&mut self, text: &str, format: &TextFormat, layout_rect: Rect, brush: &SolidColorBrush);
}
