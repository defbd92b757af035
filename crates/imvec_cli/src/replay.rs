//! Replay a capture through a render target

use crate::capture::Frame;
use anyhow::{Context, Result};
use imvec_core::PackedColor;
use imvec_paint::{
    BitmapKey, PaintCommand, RecordingTarget, RecordingTextFactory, RenderTarget, SoftwareTarget,
};
use imvec_renderer::{to_native_color, FrameStats, Renderer, RendererConfig};
use std::rc::Rc;

/// Result of replaying one frame into the recording target
pub struct Recorded {
    pub commands: Vec<PaintCommand>,
    pub stats: FrameStats,
}

fn draw_frame(
    frame: &mut Frame,
    target: &mut dyn RenderTarget,
    config: RendererConfig,
    background: Option<PackedColor>,
) -> Result<FrameStats> {
    let mut renderer = Renderer::init(
        &mut frame.io,
        target,
        Rc::new(RecordingTextFactory::new()),
        config,
    )
    .context("Failed to initialize renderer")?;

    target.begin_draw();
    if let Some(background) = background {
        target.clear(to_native_color(background));
    }
    renderer.begin_frame();
    let stats = renderer.render(&frame.io, target, &frame.draw_data);
    target.end_draw().context("Failed to finish drawing")?;

    renderer.shutdown(&mut frame.io);
    Ok(stats)
}

pub fn record(mut frame: Frame, size: (u32, u32), config: RendererConfig) -> Result<Recorded> {
    let mut target = RecordingTarget::new(size.0, size.1);
    let stats = draw_frame(&mut frame, &mut target, config, None)?;
    Ok(Recorded {
        commands: target.take_commands(),
        stats,
    })
}

pub fn rasterize(
    mut frame: Frame,
    size: (u32, u32),
    config: RendererConfig,
    background: PackedColor,
) -> Result<(SoftwareTarget, FrameStats)> {
    let mut target = SoftwareTarget::new(size.0, size.1).context("Failed to create software target")?;
    for texture in &frame.textures {
        target
            .register_bitmap(
                BitmapKey(texture.texture_id),
                texture.width,
                texture.height,
                &texture.rgba,
            )
            .with_context(|| format!("Failed to register texture {}", texture.texture_id))?;
    }
    let stats = draw_frame(&mut frame, &mut target, config, Some(background))?;
    tracing::debug!("{} text draws skipped by the software target", target.skipped_text());
    Ok((target, stats))
}
