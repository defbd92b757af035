//! Recording render target
//!
//! Implements the native API by logging every drawing call as a
//! [`PaintCommand`] instead of rasterizing. Resource creation is counted per
//! [`ResourceKind`] and can be made to fail on demand, which makes the target
//! the observable end of the renderer in tests and in `imvec dump`.

use crate::brush::{
    BitmapBrush, BitmapKey, Brush, GradientStop, GradientStopCollection, LinearGradientBrush,
    LinearGradientBrushProperties, RadialGradientBrush, RadialGradientBrushProperties,
    SolidColorBrush, StrokeStyle, StrokeStyleProperties,
};
use crate::color::Color;
use crate::geometry::{PixelSize, Point, Rect, Transform2D};
use crate::path::{Figure, FillMode, PathGeometry};
use crate::target::{AntialiasMode, Factory, RenderTarget, TargetId, TextFactory};
use crate::text::{FontCollection, TextFormat};
use crate::{PaintError, Result};
use bitflags::bitflags;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::sync::Arc;

/// Kinds of native resources
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    PathGeometry,
    StrokeStyle,
    SolidBrush,
    GradientStops,
    LinearBrush,
    RadialBrush,
    BitmapBrush,
    FontCollection,
    TextFormat,
}

bitflags! {
    /// Set of resource kinds whose creation is made to fail
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    struct FailingKinds: u16 {
        const PATH_GEOMETRY = 1 << 0;
        const STROKE_STYLE = 1 << 1;
        const SOLID_BRUSH = 1 << 2;
        const GRADIENT_STOPS = 1 << 3;
        const LINEAR_BRUSH = 1 << 4;
        const RADIAL_BRUSH = 1 << 5;
        const BITMAP_BRUSH = 1 << 6;
        const FONT_COLLECTION = 1 << 7;
        const TEXT_FORMAT = 1 << 8;
    }
}

impl ResourceKind {
    fn flag(self) -> FailingKinds {
        match self {
            ResourceKind::PathGeometry => FailingKinds::PATH_GEOMETRY,
            ResourceKind::StrokeStyle => FailingKinds::STROKE_STYLE,
            ResourceKind::SolidBrush => FailingKinds::SOLID_BRUSH,
            ResourceKind::GradientStops => FailingKinds::GRADIENT_STOPS,
            ResourceKind::LinearBrush => FailingKinds::LINEAR_BRUSH,
            ResourceKind::RadialBrush => FailingKinds::RADIAL_BRUSH,
            ResourceKind::BitmapBrush => FailingKinds::BITMAP_BRUSH,
            ResourceKind::FontCollection => FailingKinds::FONT_COLLECTION,
            ResourceKind::TextFormat => FailingKinds::TEXT_FORMAT,
        }
    }

    fn name(self) -> &'static str {
        match self {
            ResourceKind::PathGeometry => "path geometry",
            ResourceKind::StrokeStyle => "stroke style",
            ResourceKind::SolidBrush => "solid color brush",
            ResourceKind::GradientStops => "gradient stop collection",
            ResourceKind::LinearBrush => "linear gradient brush",
            ResourceKind::RadialBrush => "radial gradient brush",
            ResourceKind::BitmapBrush => "bitmap brush",
            ResourceKind::FontCollection => "font collection",
            ResourceKind::TextFormat => "text format",
        }
    }
}

/// Number of successful creations per resource kind
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ResourceStats {
    created: [usize; 9],
}

impl ResourceStats {
    pub fn created(&self, kind: ResourceKind) -> usize {
        self.created[kind as usize]
    }
}

/// Creation counters and the failure switchboard shared by a target and its factory
#[derive(Debug, Default)]
struct Ledger {
    stats: Cell<ResourceStats>,
    failing: Cell<FailingKinds>,
}

impl Ledger {
    fn create<T>(&self, kind: ResourceKind, make: impl FnOnce() -> T) -> Result<Rc<T>> {
        if self.failing.get().contains(kind.flag()) {
            tracing::trace!("injected failure creating {}", kind.name());
            return Err(PaintError::ResourceCreation(kind.name()));
        }
        let mut stats = self.stats.get();
        stats.created[kind as usize] += 1;
        self.stats.set(stats);
        Ok(Rc::new(make()))
    }

    fn set_failing(&self, kind: ResourceKind, fail: bool) {
        let mut failing = self.failing.get();
        failing.set(kind.flag(), fail);
        self.failing.set(failing);
    }
}

/// Brush contents captured at fill time
#[derive(Clone, Debug, PartialEq)]
pub enum RecordedFill {
    Solid(Color),
    Linear {
        start: Point,
        end: Point,
        stops: Vec<GradientStop>,
    },
    Radial {
        center: Point,
        origin_offset: Point,
        radius_x: f32,
        radius_y: f32,
        stops: Vec<GradientStop>,
    },
    Bitmap {
        bitmap: BitmapKey,
        transform: Transform2D,
    },
}

impl From<Brush<'_>> for RecordedFill {
    fn from(brush: Brush<'_>) -> Self {
        match brush {
            Brush::Solid(b) => RecordedFill::Solid(b.color()),
            Brush::Linear(b) => RecordedFill::Linear {
                start: b.properties.start,
                end: b.properties.end,
                stops: b.stops.stops().to_vec(),
            },
            Brush::Radial(b) => RecordedFill::Radial {
                center: b.properties.center,
                origin_offset: b.properties.origin_offset,
                radius_x: b.properties.radius_x,
                radius_y: b.properties.radius_y,
                stops: b.stops.stops().to_vec(),
            },
            Brush::Bitmap(b) => RecordedFill::Bitmap {
                bitmap: b.bitmap,
                transform: b.transform,
            },
        }
    }
}

/// A recorded drawing call
#[derive(Clone, Debug, PartialEq)]
pub enum PaintCommand {
    BeginDraw,
    EndDraw,
    Clear(Color),
    SetTransform(Transform2D),
    SetAntialiasMode(AntialiasMode),
    PushClip {
        rect: Rect,
        mode: AntialiasMode,
    },
    PopClip,
    FillGeometry {
        figures: Vec<Figure>,
        fill_mode: FillMode,
        fill: RecordedFill,
        antialias: AntialiasMode,
    },
    DrawGeometry {
        figures: Vec<Figure>,
        fill: RecordedFill,
        stroke_width: f32,
    },
    DrawText {
        text: String,
        family: String,
        size: f32,
        layout_rect: Rect,
        color: Color,
    },
}

/// Factory half of the recording target
#[derive(Debug, Default)]
pub struct RecordingFactory {
    ledger: Rc<Ledger>,
    stroke_styles: RefCell<Vec<Weak<StrokeStyle>>>,
}

impl RecordingFactory {
    /// Stroke styles created by this factory that are still referenced
    pub fn live_stroke_styles(&self) -> usize {
        self.stroke_styles
            .borrow()
            .iter()
            .filter(|w| w.strong_count() > 0)
            .count()
    }
}

impl Factory for RecordingFactory {
    fn create_path_geometry(&self) -> Result<Rc<PathGeometry>> {
        self.ledger.create(ResourceKind::PathGeometry, PathGeometry::new)
    }

    fn create_stroke_style(&self, properties: &StrokeStyleProperties) -> Result<Rc<StrokeStyle>> {
        let style = self.ledger.create(ResourceKind::StrokeStyle, || StrokeStyle {
            properties: *properties,
        })?;
        self.stroke_styles.borrow_mut().push(Rc::downgrade(&style));
        Ok(style)
    }
}

/// Render target that records instead of drawing
pub struct RecordingTarget {
    id: TargetId,
    size: PixelSize,
    factory: Rc<RecordingFactory>,
    ledger: Rc<Ledger>,
    commands: Vec<PaintCommand>,
    transform: Transform2D,
    antialias: AntialiasMode,
    clip_stack: Vec<Rect>,
    drawing: bool,
    device_lost: bool,
    solid_brushes: Vec<Weak<SolidColorBrush>>,
}

impl RecordingTarget {
    pub fn new(width: u32, height: u32) -> Self {
        let ledger = Rc::new(Ledger::default());
        let factory = Rc::new(RecordingFactory {
            ledger: ledger.clone(),
            stroke_styles: RefCell::new(Vec::new()),
        });
        Self {
            id: TargetId::next(),
            size: PixelSize::new(width, height),
            factory,
            ledger,
            commands: Vec::new(),
            transform: Transform2D::identity(),
            antialias: AntialiasMode::PerPrimitive,
            clip_stack: Vec::new(),
            drawing: false,
            device_lost: false,
            solid_brushes: Vec::new(),
        }
    }

    /// Recorded commands
    pub fn commands(&self) -> &[PaintCommand] {
        &self.commands
    }

    /// Take ownership of recorded commands
    pub fn take_commands(&mut self) -> Vec<PaintCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Only the fill commands, in order
    pub fn fills(&self) -> impl Iterator<Item = &PaintCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, PaintCommand::FillGeometry { .. }))
    }

    /// Only the text commands, in order
    pub fn texts(&self) -> impl Iterator<Item = &PaintCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, PaintCommand::DrawText { .. }))
    }

    pub fn stats(&self) -> ResourceStats {
        self.ledger.stats.get()
    }

    pub fn recording_factory(&self) -> &Rc<RecordingFactory> {
        &self.factory
    }

    /// Make creation of `kind` fail (or succeed again)
    pub fn fail_resource(&self, kind: ResourceKind, fail: bool) {
        self.ledger.set_failing(kind, fail);
    }

    /// Solid brushes created by this target that are still referenced
    pub fn live_solid_brushes(&self) -> usize {
        self.solid_brushes.iter().filter(|w| w.strong_count() > 0).count()
    }

    pub fn clip_depth(&self) -> usize {
        self.clip_stack.len()
    }

    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    /// Simulate device loss: the next `end_draw` asks for recreation
    pub fn lose_device(&mut self) {
        self.device_lost = true;
    }

    /// Replace the underlying surface; the target gets a new identity
    pub fn recreate(&mut self, width: u32, height: u32) {
        self.id = TargetId::next();
        self.size = PixelSize::new(width, height);
        self.clip_stack.clear();
        self.transform = Transform2D::identity();
        self.antialias = AntialiasMode::PerPrimitive;
        self.drawing = false;
        self.device_lost = false;
        tracing::debug!("recording target recreated as {:?} ({}x{})", self.id, width, height);
    }
}

impl RenderTarget for RecordingTarget {
    fn target_id(&self) -> TargetId {
        self.id
    }

    fn factory(&self) -> Rc<dyn Factory> {
        self.factory.clone()
    }

    fn pixel_size(&self) -> PixelSize {
        self.size
    }

    fn begin_draw(&mut self) {
        self.drawing = true;
        self.commands.push(PaintCommand::BeginDraw);
    }

    fn end_draw(&mut self) -> Result<()> {
        self.drawing = false;
        self.commands.push(PaintCommand::EndDraw);
        if !self.clip_stack.is_empty() {
            tracing::warn!("end_draw with {} clips still pushed", self.clip_stack.len());
        }
        if self.device_lost {
            return Err(PaintError::RecreateTarget);
        }
        Ok(())
    }

    fn clear(&mut self, color: Color) {
        self.commands.push(PaintCommand::Clear(color));
    }

    fn transform(&self) -> Transform2D {
        self.transform
    }

    fn set_transform(&mut self, transform: Transform2D) {
        self.transform = transform;
        self.commands.push(PaintCommand::SetTransform(transform));
    }

    fn antialias_mode(&self) -> AntialiasMode {
        self.antialias
    }

    fn set_antialias_mode(&mut self, mode: AntialiasMode) {
        self.antialias = mode;
        self.commands.push(PaintCommand::SetAntialiasMode(mode));
    }

    fn push_axis_aligned_clip(&mut self, rect: Rect, mode: AntialiasMode) {
        self.clip_stack.push(rect);
        self.commands.push(PaintCommand::PushClip { rect, mode });
    }

    fn pop_axis_aligned_clip(&mut self) {
        if self.clip_stack.pop().is_none() {
            tracing::warn!("pop_axis_aligned_clip without a matching push");
        }
        self.commands.push(PaintCommand::PopClip);
    }

    fn create_solid_color_brush(&mut self, color: Color) -> Result<Rc<SolidColorBrush>> {
        let brush = self
            .ledger
            .create(ResourceKind::SolidBrush, || SolidColorBrush::new(color))?;
        self.solid_brushes.push(Rc::downgrade(&brush));
        Ok(brush)
    }

    fn create_gradient_stop_collection(
        &mut self,
        stops: &[GradientStop],
    ) -> Result<Rc<GradientStopCollection>> {
        self.ledger
            .create(ResourceKind::GradientStops, || GradientStopCollection::new(stops))
    }

    fn create_linear_gradient_brush(
        &mut self,
        properties: LinearGradientBrushProperties,
        stops: &Rc<GradientStopCollection>,
    ) -> Result<Rc<LinearGradientBrush>> {
        self.ledger.create(ResourceKind::LinearBrush, || LinearGradientBrush {
            properties,
            stops: stops.clone(),
        })
    }

    fn create_radial_gradient_brush(
        &mut self,
        properties: RadialGradientBrushProperties,
        stops: &Rc<GradientStopCollection>,
    ) -> Result<Rc<RadialGradientBrush>> {
        self.ledger.create(ResourceKind::RadialBrush, || RadialGradientBrush {
            properties,
            stops: stops.clone(),
        })
    }

    fn create_bitmap_brush(
        &mut self,
        bitmap: BitmapKey,
        transform: Transform2D,
    ) -> Result<Rc<BitmapBrush>> {
        self.ledger
            .create(ResourceKind::BitmapBrush, || BitmapBrush { bitmap, transform })
    }

    fn fill_geometry(&mut self, geometry: &PathGeometry, brush: Brush<'_>) {
        self.commands.push(PaintCommand::FillGeometry {
            figures: geometry.figures().clone(),
            fill_mode: geometry.fill_mode(),
            fill: brush.into(),
            antialias: self.antialias,
        });
    }

    fn draw_geometry(
        &mut self,
        geometry: &PathGeometry,
        brush: Brush<'_>,
        stroke_width: f32,
        _style: Option<&StrokeStyle>,
    ) {
        self.commands.push(PaintCommand::DrawGeometry {
            figures: geometry.figures().clone(),
            fill: brush.into(),
            stroke_width,
        });
    }

    fn draw_text(&mut self, text: &str, format: &TextFormat, layout_rect: Rect, brush: &SolidColorBrush) {
        self.commands.push(PaintCommand::DrawText {
            text: text.to_string(),
            family: format.family.clone(),
            size: format.size,
            layout_rect,
            color: brush.color(),
        });
    }
}

/// Text factory that hands out plain descriptors
#[derive(Debug, Default)]
pub struct RecordingTextFactory {
    ledger: Ledger,
}

impl RecordingTextFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> ResourceStats {
        self.ledger.stats.get()
    }

    pub fn fail_resource(&self, kind: ResourceKind, fail: bool) {
        self.ledger.set_failing(kind, fail);
    }
}

impl TextFactory for RecordingTextFactory {
    fn create_font_collection(&self, family: &str, data: &Arc<[u8]>) -> Result<Rc<FontCollection>> {
        self.ledger.create(ResourceKind::FontCollection, || FontCollection {
            family: family.to_string(),
            data: data.clone(),
        })
    }

    fn create_text_format(
        &self,
        family: &str,
        collection: Option<&Rc<FontCollection>>,
        size: f32,
        locale: &str,
    ) -> Result<Rc<TextFormat>> {
        self.ledger.create(ResourceKind::TextFormat, || TextFormat {
            family: family.to_string(),
            size,
            locale: locale.to_string(),
            collection: collection.cloned(),
        })
    }
}
