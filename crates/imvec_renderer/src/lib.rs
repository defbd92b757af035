//! imvec Renderer
//!
//! Translates per-frame immediate-mode draw data into retained 2D API calls.
//! The API has no per-vertex-color triangle primitive, so the renderer walks
//! each draw command's triangle list and rebuilds higher level shapes:
//!
//! - Glyph cells are matched against the font atlas and drawn as text
//! - Adjacent triangles are grouped into polygons and filled with a solid
//!   color, a two-color linear gradient or a blend of radial gradients
//! - Polygons sampling a real texture are filled with a bitmap brush
//!
//! # Example
//!
//! ```rust
//! use imvec_core::{DrawData, DrawList, DrawCmd, ElementsCmd, Io, PackedColor, Vec2, Vertex};
//! use imvec_paint::{RecordingTarget, RecordingTextFactory};
//! use imvec_renderer::{Renderer, RendererConfig};
//! use std::rc::Rc;
//!
//! let mut io = Io::default();
//! let mut target = RecordingTarget::new(100, 100);
//! let mut renderer = Renderer::init(
//!     &mut io,
//!     &mut target,
//!     Rc::new(RecordingTextFactory::new()),
//!     RendererConfig::default(),
//! )
//! .unwrap();
//!
//! let mut list = DrawList::new();
//! for (x, y) in [(10.0, 10.0), (50.0, 10.0), (10.0, 50.0)] {
//!     list.vtx_buffer.push(Vertex::new(Vec2::new(x, y), Vec2::ZERO, PackedColor::RED));
//! }
//! list.idx_buffer = vec![0, 1, 2];
//! list.commands.push(DrawCmd::Elements(ElementsCmd::new(
//!     3,
//!     io.fonts.texture_id,
//!     [0.0, 0.0, 100.0, 100.0],
//! )));
//!
//! renderer.begin_frame();
//! let stats = renderer.render(&io, &mut target, &DrawData::new(vec![list], Vec2::new(100.0, 100.0)));
//! assert_eq!(stats.solid_fills, 1);
//! renderer.shutdown(&mut io);
//! ```

pub mod backend;
pub mod config;
pub mod convert;
pub mod frame;
pub mod glyph;
pub mod gradient;
pub mod polygon;
pub mod text_cache;

pub use backend::{DeviceObjects, Renderer, BACKEND_NAME};
pub use config::{ConfigError, DebugConfig, RendererConfig, TextConfig};
pub use convert::{to_native_color, to_native_point, to_native_rect};
pub use frame::{project_clip_rect, projection_transform, view_rect, FrameStats};
pub use glyph::{extract_glyph_run, GlyphRun, PositionedGlyph};
pub use gradient::{build_linear_gradient, build_radial_gradient, GradientStops};
pub use polygon::{classify, collect_polygon, Polygon, ShadingPolicy, ShadingStrategy};
pub use text_cache::TextFormatCache;

use imvec_paint::PaintError;
use thiserror::Error;

/// Renderer errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RendererError {
    #[error("Failed to create device objects: {0}")]
    DeviceObjects(#[from] PaintError),
}

pub type Result<T> = std::result::Result<T, RendererError>;
