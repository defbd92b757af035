//! Path geometry and its geometry sink
//!
//! A geometry is created empty, opened exactly once to obtain a
//! [`GeometrySink`], and becomes drawable when the sink is closed.

use crate::geometry::{Point, Rect};
use crate::{PaintError, Result};
use smallvec::SmallVec;
use std::cell::{Cell, Ref, RefCell};

/// Fill rule for overlapping figures
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FillMode {
    /// Even-odd
    #[default]
    Alternate,
    /// Non-zero
    Winding,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FigureBegin {
    Filled,
    Hollow,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FigureEnd {
    Open,
    Closed,
}

/// One contour of a path geometry
#[derive(Clone, Debug, PartialEq)]
pub struct Figure {
    pub start: Point,
    pub points: SmallVec<[Point; 3]>,
    pub filled: bool,
    pub closed: bool,
}

impl Figure {
    /// Start point followed by every line end point
    pub fn vertices(&self) -> impl Iterator<Item = Point> + '_ {
        std::iter::once(self.start).chain(self.points.iter().copied())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum GeometryState {
    Empty,
    Open,
    Closed,
}

/// Path geometry made of line figures
#[derive(Debug)]
pub struct PathGeometry {
    figures: RefCell<Vec<Figure>>,
    fill_mode: Cell<FillMode>,
    state: Cell<GeometryState>,
}

impl Default for PathGeometry {
    fn default() -> Self {
        Self::new()
    }
}

impl PathGeometry {
    pub fn new() -> Self {
        Self {
            figures: RefCell::new(Vec::new()),
            fill_mode: Cell::new(FillMode::Alternate),
            state: Cell::new(GeometryState::Empty),
        }
    }

    /// Open the geometry for writing; only possible once
    pub fn open(&self) -> Result<GeometrySink<'_>> {
        if self.state.get() != GeometryState::Empty {
            return Err(PaintError::GeometryAlreadyOpen);
        }
        self.state.set(GeometryState::Open);
        Ok(GeometrySink {
            geometry: self,
            fill_mode: FillMode::Alternate,
            figures: Vec::new(),
            current: None,
        })
    }

    pub fn is_closed(&self) -> bool {
        self.state.get() == GeometryState::Closed
    }

    pub fn fill_mode(&self) -> FillMode {
        self.fill_mode.get()
    }

    pub fn figures(&self) -> Ref<'_, Vec<Figure>> {
        self.figures.borrow()
    }

    pub fn figure_count(&self) -> usize {
        self.figures.borrow().len()
    }

    /// Axis-aligned bounds of every figure point
    pub fn bounds(&self) -> Option<Rect> {
        let figures = self.figures.borrow();
        let mut points = figures.iter().flat_map(|f| f.vertices().collect::<SmallVec<[Point; 4]>>());
        let first = points.next()?;
        let init = Rect::new(first.x, first.y, first.x, first.y);
        Some(points.fold(init, |r, p| {
            Rect::new(r.left.min(p.x), r.top.min(p.y), r.right.max(p.x), r.bottom.max(p.y))
        }))
    }
}

/// Writer for a [`PathGeometry`]; nothing is visible until [`close`](Self::close)
pub struct GeometrySink<'a> {
    geometry: &'a PathGeometry,
    fill_mode: FillMode,
    figures: Vec<Figure>,
    current: Option<Figure>,
}

impl<'a> GeometrySink<'a> {
    pub fn set_fill_mode(&mut self, mode: FillMode) {
        self.fill_mode = mode;
    }

    pub fn begin_figure(&mut self, start: Point, begin: FigureBegin) {
        if self.current.is_some() {
            tracing::warn!("begin_figure called with a figure still open, previous figure dropped");
        }
        self.current = Some(Figure {
            start,
            points: SmallVec::new(),
            filled: begin == FigureBegin::Filled,
            closed: false,
        });
    }

    pub fn add_lines(&mut self, points: &[Point]) {
        match self.current.as_mut() {
            Some(figure) => figure.points.extend_from_slice(points),
            None => tracing::warn!("add_lines called outside of a figure"),
        }
    }

    pub fn end_figure(&mut self, end: FigureEnd) {
        if let Some(mut figure) = self.current.take() {
            figure.closed = end == FigureEnd::Closed;
            self.figures.push(figure);
        }
    }

    /// Commit the figures into the geometry
    pub fn close(self) -> Result<()> {
        if self.current.is_some() {
            return Err(PaintError::UnbalancedFigure);
        }
        self.geometry.fill_mode.set(self.fill_mode);
        *self.geometry.figures.borrow_mut() = self.figures;
        self.geometry.state.set(GeometryState::Closed);
        Ok(())
    }
}
