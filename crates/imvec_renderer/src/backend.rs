//! Backend lifecycle and device objects
//!
//! A [`Renderer`] registers itself in the toolkit's [`Io`], owns the text
//! format cache and keeps one set of [`DeviceObjects`] bound to the render
//! target it last drew to. When the target identity changes the binding is
//! released and rebuilt as a whole.

use crate::config::RendererConfig;
use crate::frame::{render_draw_data, view_rect, FrameContext, FrameStats};
use crate::gradient::GradientStops;
use crate::text_cache::TextFormatCache;
use crate::Result;
use imvec_core::{BackendFlags, DrawData, Io};
use imvec_paint::{
    Color, Factory, Handle, LineJoin, PaintError, RenderTarget, SolidColorBrush, StrokeStyle,
    StrokeStyleProperties, TargetId, TextFactory,
};
use std::rc::{Rc, Weak};

/// Name the renderer registers in [`Io`]
pub const BACKEND_NAME: &str = "imvec_renderer";

/// Resources tied to one render target
pub struct DeviceObjects {
    target_id: TargetId,
    factory: Weak<dyn Factory>,
    pub(crate) solid_brush: Handle<SolidColorBrush>,
    pub(crate) stroke_style: Handle<StrokeStyle>,
    pub(crate) gradient_stops: GradientStops,
}

impl DeviceObjects {
    /// Create the solid brush and stroke style for `target`
    pub fn create(target: &mut dyn RenderTarget) -> std::result::Result<Self, PaintError> {
        let factory = target.factory();
        let mut solid_brush = Handle::empty();
        solid_brush.attach(target.create_solid_color_brush(Color::ORANGE)?);
        let mut stroke_style = Handle::empty();
        stroke_style.attach(factory.create_stroke_style(&StrokeStyleProperties {
            line_join: LineJoin::Round,
            miter_limit: 0.0,
        })?);

        Ok(Self {
            target_id: target.target_id(),
            factory: Rc::downgrade(&factory),
            solid_brush,
            stroke_style,
            gradient_stops: GradientStops::new(),
        })
    }

    pub fn target_id(&self) -> TargetId {
        self.target_id
    }

    /// Factory of the bound target, if the platform layer still holds it
    pub fn factory(&self) -> std::result::Result<Rc<dyn Factory>, PaintError> {
        self.factory.upgrade().ok_or(PaintError::FactoryGone)
    }

    pub fn solid_brush(&self) -> &Handle<SolidColorBrush> {
        &self.solid_brush
    }

    pub fn stroke_style(&self) -> &Handle<StrokeStyle> {
        &self.stroke_style
    }

    pub fn gradient_stops(&self) -> &GradientStops {
        &self.gradient_stops
    }

    fn release(&mut self) {
        self.solid_brush.release();
        self.stroke_style.release();
    }
}

/// Renderer backend instance
pub struct Renderer {
    config: RendererConfig,
    text_cache: TextFormatCache,
    device: Option<DeviceObjects>,
    frame_count: u64,
}

impl Renderer {
    /// Register the renderer in `io` and create device objects for `target`
    ///
    /// # Panics
    ///
    /// Panics if `io` already has a renderer backend.
    pub fn init(
        io: &mut Io,
        target: &mut dyn RenderTarget,
        text_factory: Rc<dyn TextFactory>,
        config: RendererConfig,
    ) -> Result<Self> {
        assert!(
            !io.has_renderer_backend(),
            "Already initialized a renderer backend"
        );

        let mut renderer = Self {
            config,
            text_cache: TextFormatCache::new(text_factory),
            device: None,
            frame_count: 0,
        };
        renderer.create_device_objects(target)?;

        io.backend_renderer_name = Some(BACKEND_NAME);
        io.backend_flags |= BackendFlags::RENDERER_HAS_VTX_OFFSET;
        io.fonts.ensure_texture_id();
        tracing::debug!("Renderer initialized on target {:?}", target.target_id());
        Ok(renderer)
    }

    pub fn begin_frame(&mut self) {
        self.frame_count += 1;
        if self.device.is_none() {
            tracing::debug!("Frame {} starts without device objects", self.frame_count);
        }
    }

    /// Draw one frame into `target`
    ///
    /// Device objects are rebuilt first when `target` is not the target they
    /// were created for. If that fails the frame is dropped.
    pub fn render(&mut self, io: &Io, target: &mut dyn RenderTarget, draw_data: &DrawData) -> FrameStats {
        let stale = self
            .device
            .as_ref()
            .map_or(true, |device| device.target_id != target.target_id());
        if stale {
            if let Err(e) = self.create_device_objects(target) {
                tracing::warn!("Dropping frame {}: {}", self.frame_count, e);
                return FrameStats {
                    failed_resources: 1,
                    ..Default::default()
                };
            }
        }
        let Some(device) = self.device.as_mut() else {
            return FrameStats::default();
        };

        let view = view_rect(draw_data, target.pixel_size());
        let mut ctx = FrameContext {
            io,
            target,
            device,
            text: &mut self.text_cache,
            config: &self.config,
            view,
            stats: FrameStats::default(),
        };
        render_draw_data(&mut ctx, draw_data);
        tracing::trace!("Frame {} rendered: {:?}", self.frame_count, ctx.stats);
        ctx.stats
    }

    /// Unregister from `io` and release every resource
    pub fn shutdown(mut self, io: &mut Io) {
        self.destroy_device_objects();
        self.text_cache.clear();
        io.backend_renderer_name = None;
        io.backend_flags.remove(BackendFlags::RENDERER_HAS_VTX_OFFSET);
        tracing::debug!("Renderer shut down after {} frames", self.frame_count);
    }

    /// Bind to `target`, releasing the previous binding first
    pub fn create_device_objects(&mut self, target: &mut dyn RenderTarget) -> Result<()> {
        self.destroy_device_objects();
        self.device = Some(DeviceObjects::create(target)?);
        tracing::debug!("Device objects created for {:?}", target.target_id());
        Ok(())
    }

    pub fn destroy_device_objects(&mut self) {
        if let Some(mut device) = self.device.take() {
            device.release();
            tracing::debug!("Device objects released for {:?}", device.target_id);
        }
    }

    pub fn device_objects(&self) -> Option<&DeviceObjects> {
        self.device.as_ref()
    }

    pub fn text_cache(&self) -> &TextFormatCache {
        &self.text_cache
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}
