//! imvec Native 2D API
//!
//! A retained-mode 2D drawing API in the shape of the platform graphics
//! stacks the renderer targets: resources (brushes, stop collections, path
//! geometries, text formats) are created through a render target or a
//! factory, held by reference-counted handles, and drawn with immediate
//! fill calls.
//!
//! # Features
//!
//! - Solid, linear gradient, radial gradient and bitmap brushes
//! - Path geometry built through a geometry sink
//! - Axis-aligned clipping and antialias modes
//! - Text formats backed by in-memory font collections
//! - [`RecordingTarget`] logging every call, for tests and inspection
//! - [`SoftwareTarget`] rasterizing into a pixmap
//!
//! # Example
//!
//! ```rust
//! use imvec_paint::{Brush, Color, FigureBegin, FigureEnd, FillMode, Point, RecordingTarget, RenderTarget};
//!
//! let mut target = RecordingTarget::new(64, 64);
//! let geometry = target.factory().create_path_geometry().unwrap();
//! let mut sink = geometry.open().unwrap();
//! sink.set_fill_mode(FillMode::Alternate);
//! sink.begin_figure(Point::new(0.0, 0.0), FigureBegin::Filled);
//! sink.add_lines(&[Point::new(10.0, 0.0), Point::new(10.0, 10.0)]);
//! sink.end_figure(FigureEnd::Closed);
//! sink.close().unwrap();
//!
//! let brush = target.create_solid_color_brush(Color::RED).unwrap();
//! target.fill_geometry(&geometry, Brush::Solid(&brush));
//! assert_eq!(target.commands().len(), 1);
//! ```

pub mod brush;
pub mod color;
pub mod geometry;
pub mod handle;
pub mod path;
pub mod recording;
pub mod software;
pub mod target;
pub mod text;

pub use brush::{
    BitmapBrush, BitmapKey, Brush, GradientStop, GradientStopCollection, LinearGradientBrush,
    LinearGradientBrushProperties, RadialGradientBrush, RadialGradientBrushProperties,
    LineJoin, SolidColorBrush, StrokeStyle, StrokeStyleProperties,
};
pub use color::Color;
pub use geometry::{PixelSize, Point, Rect, Transform2D};
pub use handle::Handle;
pub use path::{Figure, FigureBegin, FigureEnd, FillMode, GeometrySink, PathGeometry};
pub use recording::{
    PaintCommand, RecordedFill, RecordingFactory, RecordingTarget, RecordingTextFactory,
    ResourceKind, ResourceStats,
};
pub use software::SoftwareTarget;
pub use target::{AntialiasMode, Factory, RenderTarget, TargetId, TextFactory};
pub use text::{FontCollection, TextFormat};

use thiserror::Error;

/// Native API errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PaintError {
    #[error("Failed to create {0}")]
    ResourceCreation(&'static str),

    #[error("Factory is no longer alive")]
    FactoryGone,

    #[error("Geometry already opened")]
    GeometryAlreadyOpen,

    #[error("Unbalanced figure in geometry sink")]
    UnbalancedFigure,

    #[error("Render target must be recreated")]
    RecreateTarget,

    #[error("Unknown bitmap: {0}")]
    UnknownBitmap(usize),

    #[error("Invalid target size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },

    #[error("Failed to encode image: {0}")]
    Encode(String),
}

pub type Result<T> = std::result::Result<T, PaintError>;
