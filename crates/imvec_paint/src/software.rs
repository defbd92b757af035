//! Software render target
//!
//! Rasterizes fills into a tiny-skia pixmap. Text is not shaped here; text
//! calls are counted and skipped.

use crate::brush::{
    BitmapBrush, BitmapKey, Brush, GradientStop, GradientStopCollection, LineJoin,
    LinearGradientBrush, LinearGradientBrushProperties, RadialGradientBrush,
    RadialGradientBrushProperties, SolidColorBrush, StrokeStyle,
};
use crate::color::Color;
use crate::geometry::{PixelSize, Point, Rect, Transform2D};
use crate::path::{FillMode, PathGeometry};
use crate::recording::RecordingFactory;
use crate::target::{AntialiasMode, Factory, RenderTarget, TargetId};
use crate::text::TextFormat;
use crate::{PaintError, Result};
use rustc_hash::FxHashMap;
use std::path::Path;
use std::rc::Rc;

fn to_skia_color(color: Color) -> tiny_skia::Color {
    tiny_skia::Color::from_rgba(
        color.r.clamp(0.0, 1.0),
        color.g.clamp(0.0, 1.0),
        color.b.clamp(0.0, 1.0),
        color.a.clamp(0.0, 1.0),
    )
    .unwrap_or(tiny_skia::Color::TRANSPARENT)
}

fn to_skia_transform(t: &Transform2D) -> tiny_skia::Transform {
    tiny_skia::Transform::from_row(t.a, t.b, t.c, t.d, t.e, t.f)
}

fn to_skia_stops(stops: &[GradientStop]) -> Vec<tiny_skia::GradientStop> {
    stops
        .iter()
        .map(|s| tiny_skia::GradientStop::new(s.position, to_skia_color(s.color)))
        .collect()
}

fn to_skia_point(p: Point) -> tiny_skia::Point {
    tiny_skia::Point::from_xy(p.x, p.y)
}

/// Render target backed by a CPU pixmap
pub struct SoftwareTarget {
    id: TargetId,
    pixmap: tiny_skia::Pixmap,
    factory: Rc<RecordingFactory>,
    bitmaps: FxHashMap<BitmapKey, tiny_skia::Pixmap>,
    transform: Transform2D,
    antialias: AntialiasMode,
    clip_stack: Vec<(Rect, AntialiasMode)>,
    mask: Option<tiny_skia::Mask>,
    skipped_text: usize,
}

impl SoftwareTarget {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let pixmap =
            tiny_skia::Pixmap::new(width, height).ok_or(PaintError::InvalidSize { width, height })?;
        Ok(Self {
            id: TargetId::next(),
            pixmap,
            factory: Rc::new(RecordingFactory::default()),
            bitmaps: FxHashMap::default(),
            transform: Transform2D::identity(),
            antialias: AntialiasMode::PerPrimitive,
            clip_stack: Vec::new(),
            mask: None,
            skipped_text: 0,
        })
    }

    /// Make an RGBA8 image (straight alpha) available to bitmap brushes
    pub fn register_bitmap(&mut self, key: BitmapKey, width: u32, height: u32, rgba: &[u8]) -> Result<()> {
        let mut pixmap =
            tiny_skia::Pixmap::new(width, height).ok_or(PaintError::InvalidSize { width, height })?;
        for (dst, src) in pixmap.pixels_mut().iter_mut().zip(rgba.chunks_exact(4)) {
            *dst = tiny_skia::ColorU8::from_rgba(src[0], src[1], src[2], src[3]).premultiply();
        }
        self.bitmaps.insert(key, pixmap);
        Ok(())
    }

    pub fn pixmap(&self) -> &tiny_skia::Pixmap {
        &self.pixmap
    }

    /// Straight-alpha RGBA of one pixel
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let c = self.pixmap.pixel(x, y)?.demultiply();
        Some([c.red(), c.green(), c.blue(), c.alpha()])
    }

    /// Text calls seen and not rasterized
    pub fn skipped_text(&self) -> usize {
        self.skipped_text
    }

    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<()> {
        self.pixmap
            .save_png(path)
            .map_err(|e| PaintError::Encode(e.to_string()))
    }

    fn rebuild_mask(&mut self) {
        let Some((rect, mode)) = self.clip_stack.last().copied() else {
            self.mask = None;
            return;
        };
        let mut mask = match tiny_skia::Mask::new(self.pixmap.width(), self.pixmap.height()) {
            Some(mask) => mask,
            None => {
                self.mask = None;
                return;
            }
        };
        if let Some(r) = tiny_skia::Rect::from_ltrb(rect.left, rect.top, rect.right, rect.bottom) {
            let path = tiny_skia::PathBuilder::from_rect(r);
            mask.fill_path(
                &path,
                tiny_skia::FillRule::Winding,
                mode == AntialiasMode::PerPrimitive,
                tiny_skia::Transform::identity(),
            );
        }
        // An empty clip leaves the mask fully transparent
        self.mask = Some(mask);
    }

    fn build_path(geometry: &PathGeometry) -> Option<tiny_skia::Path> {
        let mut pb = tiny_skia::PathBuilder::new();
        for figure in geometry.figures().iter() {
            pb.move_to(figure.start.x, figure.start.y);
            for p in &figure.points {
                pb.line_to(p.x, p.y);
            }
            if figure.closed {
                pb.close();
            }
        }
        pb.finish()
    }
}

fn shader<'a>(
    bitmaps: &'a FxHashMap<BitmapKey, tiny_skia::Pixmap>,
    brush: Brush<'_>,
) -> Option<tiny_skia::Shader<'a>> {
    match brush {
        Brush::Solid(b) => Some(tiny_skia::Shader::SolidColor(to_skia_color(b.color()))),
        Brush::Linear(b) => tiny_skia::LinearGradient::new(
            to_skia_point(b.properties.start),
            to_skia_point(b.properties.end),
            to_skia_stops(b.stops.stops()),
            tiny_skia::SpreadMode::Pad,
            tiny_skia::Transform::identity(),
        ),
        Brush::Radial(b) => {
            let p = &b.properties;
            if p.radius_x <= 0.0 || p.radius_y <= 0.0 {
                return None;
            }
            // Unit circle stretched to the ellipse
            let transform =
                tiny_skia::Transform::from_row(p.radius_x, 0.0, 0.0, p.radius_y, p.center.x, p.center.y);
            tiny_skia::RadialGradient::new(
                tiny_skia::Point::from_xy(p.origin_offset.x / p.radius_x, p.origin_offset.y / p.radius_y),
                tiny_skia::Point::zero(),
                1.0,
                to_skia_stops(b.stops.stops()),
                tiny_skia::SpreadMode::Pad,
                transform,
            )
        }
        Brush::Bitmap(b) => {
            let Some(bitmap) = bitmaps.get(&b.bitmap) else {
                tracing::warn!("bitmap {:?} is not registered", b.bitmap);
                return None;
            };
            let transform = tiny_skia::Transform::from_scale(
                1.0 / bitmap.width() as f32,
                1.0 / bitmap.height() as f32,
            )
            .post_concat(to_skia_transform(&b.transform));
            Some(tiny_skia::Pattern::new(
                bitmap.as_ref(),
                tiny_skia::SpreadMode::Pad,
                tiny_skia::FilterQuality::Bilinear,
                1.0,
                transform,
            ))
        }
    }
}

fn paint<'a>(
    bitmaps: &'a FxHashMap<BitmapKey, tiny_skia::Pixmap>,
    antialias: AntialiasMode,
    brush: Brush<'_>,
) -> Option<tiny_skia::Paint<'a>> {
    Some(tiny_skia::Paint {
        shader: shader(bitmaps, brush)?,
        anti_alias: antialias == AntialiasMode::PerPrimitive,
        ..Default::default()
    })
}

impl RenderTarget for SoftwareTarget {
    fn target_id(&self) -> TargetId {
        self.id
    }

    fn factory(&self) -> Rc<dyn Factory> {
        self.factory.clone()
    }

    fn pixel_size(&self) -> PixelSize {
        PixelSize::new(self.pixmap.width(), self.pixmap.height())
    }

    fn begin_draw(&mut self) {}

    fn end_draw(&mut self) -> Result<()> {
        if !self.clip_stack.is_empty() {
            tracing::warn!("end_draw with {} clips still pushed", self.clip_stack.len());
        }
        Ok(())
    }

    fn clear(&mut self, color: Color) {
        self.pixmap.fill(to_skia_color(color));
    }

    fn transform(&self) -> Transform2D {
        self.transform
    }

    fn set_transform(&mut self, transform: Transform2D) {
        self.transform = transform;
    }

    fn antialias_mode(&self) -> AntialiasMode {
        self.antialias
    }

    fn set_antialias_mode(&mut self, mode: AntialiasMode) {
        self.antialias = mode;
    }

    fn push_axis_aligned_clip(&mut self, rect: Rect, mode: AntialiasMode) {
        let t = &self.transform;
        let corners = [
            t.transform_point(Point::new(rect.left, rect.top)),
            t.transform_point(Point::new(rect.right, rect.top)),
            t.transform_point(Point::new(rect.right, rect.bottom)),
            t.transform_point(Point::new(rect.left, rect.bottom)),
        ];
        let mut device = corners[1..].iter().fold(
            Rect::new(corners[0].x, corners[0].y, corners[0].x, corners[0].y),
            |r, p| Rect::new(r.left.min(p.x), r.top.min(p.y), r.right.max(p.x), r.bottom.max(p.y)),
        );
        if let Some((outer, _)) = self.clip_stack.last() {
            device = device.intersect(outer);
        }
        self.clip_stack.push((device, mode));
        self.rebuild_mask();
    }

    fn pop_axis_aligned_clip(&mut self) {
        if self.clip_stack.pop().is_none() {
            tracing::warn!("pop_axis_aligned_clip without a matching push");
        }
        self.rebuild_mask();
    }

    fn create_solid_color_brush(&mut self, color: Color) -> Result<Rc<SolidColorBrush>> {
        Ok(Rc::new(SolidColorBrush::new(color)))
    }

    fn create_gradient_stop_collection(
        &mut self,
        stops: &[GradientStop],
    ) -> Result<Rc<GradientStopCollection>> {
        Ok(Rc::new(GradientStopCollection::new(stops)))
    }

    fn create_linear_gradient_brush(
        &mut self,
        properties: LinearGradientBrushProperties,
        stops: &Rc<GradientStopCollection>,
    ) -> Result<Rc<LinearGradientBrush>> {
        Ok(Rc::new(LinearGradientBrush {
            properties,
            stops: stops.clone(),
        }))
    }

    fn create_radial_gradient_brush(
        &mut self,
        properties: RadialGradientBrushProperties,
        stops: &Rc<GradientStopCollection>,
    ) -> Result<Rc<RadialGradientBrush>> {
        Ok(Rc::new(RadialGradientBrush {
            properties,
            stops: stops.clone(),
        }))
    }

    fn create_bitmap_brush(
        &mut self,
        bitmap: BitmapKey,
        transform: Transform2D,
    ) -> Result<Rc<BitmapBrush>> {
        if !self.bitmaps.contains_key(&bitmap) {
            return Err(PaintError::UnknownBitmap(bitmap.0));
        }
        Ok(Rc::new(BitmapBrush { bitmap, transform }))
    }

    fn fill_geometry(&mut self, geometry: &PathGeometry, brush: Brush<'_>) {
        let Some(path) = Self::build_path(geometry) else {
            return;
        };
        let rule = match geometry.fill_mode() {
            FillMode::Alternate => tiny_skia::FillRule::EvenOdd,
            FillMode::Winding => tiny_skia::FillRule::Winding,
        };
        let transform = to_skia_transform(&self.transform);
        let Some(paint) = paint(&self.bitmaps, self.antialias, brush) else {
            tracing::trace!("fill skipped, brush has no shader");
            return;
        };
        self.pixmap
            .fill_path(&path, &paint, rule, transform, self.mask.as_ref());
    }

    fn draw_geometry(
        &mut self,
        geometry: &PathGeometry,
        brush: Brush<'_>,
        stroke_width: f32,
        style: Option<&StrokeStyle>,
    ) {
        let Some(path) = Self::build_path(geometry) else {
            return;
        };
        let properties = style.map(|s| s.properties).unwrap_or_default();
        let stroke = tiny_skia::Stroke {
            width: stroke_width,
            miter_limit: properties.miter_limit,
            line_join: match properties.line_join {
                LineJoin::Miter => tiny_skia::LineJoin::Miter,
                LineJoin::Round => tiny_skia::LineJoin::Round,
                LineJoin::Bevel => tiny_skia::LineJoin::Bevel,
            },
            ..Default::default()
        };
        let transform = to_skia_transform(&self.transform);
        let Some(paint) = paint(&self.bitmaps, self.antialias, brush) else {
            return;
        };
        self.pixmap
            .stroke_path(&path, &paint, &stroke, transform, self.mask.as_ref());
    }

    fn draw_text(&mut self, text: &str, format: &TextFormat, _layout_rect: Rect, _brush: &SolidColorBrush) {
        tracing::trace!("text {:?} in {} {}px not rasterized", text, format.family, format.size);
        self.skipped_text += 1;
    }
}
