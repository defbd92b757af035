//! Per-frame draw data produced by the toolkit
//!
//! A [`DrawData`] is an ordered list of [`DrawList`]s. Each list owns one
//! vertex buffer and one index buffer; its [`DrawCmd`]s reference ranges of
//! those buffers by offset. Index ranges are triangle lists.

use crate::color::PackedColor;
use crate::math::Vec2;
use std::fmt;
use std::ops::Range;
use std::rc::Rc;

/// Index type used by draw lists
pub type DrawIdx = u32;

/// Opaque texture identifier handed out by the host
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub usize);

impl TextureId {
    pub fn is_null(self) -> bool {
        self.0 == 0
    }
}

/// A single vertex: position, atlas UV and packed color
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[repr(C)]
pub struct Vertex {
    pub pos: Vec2,
    pub uv: Vec2,
    pub col: PackedColor,
}

impl Vertex {
    pub const fn new(pos: Vec2, uv: Vec2, col: PackedColor) -> Self {
        Self { pos, uv, col }
    }
}

/// Host callback embedded in a draw list
///
/// Invoked by the backend in place of geometry; the callback owns any state
/// changes it makes.
#[derive(Clone)]
pub struct DrawCallback(Rc<dyn Fn(&DrawList, &DrawCmd)>);

impl DrawCallback {
    pub fn new(f: impl Fn(&DrawList, &DrawCmd) + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub fn invoke(&self, list: &DrawList, cmd: &DrawCmd) {
        (self.0)(list, cmd)
    }
}

impl fmt::Debug for DrawCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DrawCallback").field(&Rc::as_ptr(&self.0)).finish()
    }
}

/// Indexed geometry command
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ElementsCmd {
    /// Number of indices (multiple of 3)
    pub elem_count: u32,
    /// Start offset in the list's index buffer
    pub idx_offset: u32,
    /// Start offset in the list's vertex buffer; indices are relative to it
    pub vtx_offset: u32,
    pub texture_id: TextureId,
    /// Clip rectangle as (x1, y1, x2, y2) in toolkit space
    pub clip_rect: [f32; 4],
}

impl ElementsCmd {
    pub fn new(elem_count: u32, texture_id: TextureId, clip_rect: [f32; 4]) -> Self {
        Self {
            elem_count,
            idx_offset: 0,
            vtx_offset: 0,
            texture_id,
            clip_rect,
        }
    }

    pub fn with_offsets(mut self, idx_offset: u32, vtx_offset: u32) -> Self {
        self.idx_offset = idx_offset;
        self.vtx_offset = vtx_offset;
        self
    }

    pub fn idx_range(&self) -> Range<usize> {
        let start = self.idx_offset as usize;
        start..start + self.elem_count as usize
    }
}

/// One entry of a draw list's command buffer
#[derive(Clone, Debug)]
pub enum DrawCmd {
    /// Triangles to reconstruct into vector geometry
    Elements(ElementsCmd),
    /// Request to reset the backend's render state
    ResetRenderState,
    /// Host callback, bypasses geometry reconstruction
    Callback(DrawCallback),
}

impl DrawCmd {
    pub fn elements(&self) -> Option<&ElementsCmd> {
        match self {
            DrawCmd::Elements(cmd) => Some(cmd),
            _ => None,
        }
    }
}

/// Vertex buffer, index buffer and the commands drawing from them
#[derive(Clone, Debug, Default)]
pub struct DrawList {
    pub vtx_buffer: Vec<Vertex>,
    pub idx_buffer: Vec<DrawIdx>,
    pub commands: Vec<DrawCmd>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index and vertex windows of an elements command
    ///
    /// Returns `None` when the command's ranges fall outside this list's
    /// buffers or an index points past the vertex window.
    pub fn window(&self, cmd: &ElementsCmd) -> Option<(&[DrawIdx], &[Vertex])> {
        let indices = self.idx_buffer.get(cmd.idx_range())?;
        let vertices = self.vtx_buffer.get(cmd.vtx_offset as usize..)?;
        if indices.iter().any(|&i| i as usize >= vertices.len()) {
            return None;
        }
        Some((indices, vertices))
    }
}

/// Everything needed to render one frame
#[derive(Clone, Debug)]
pub struct DrawData {
    pub lists: Vec<DrawList>,
    /// Top-left of the viewport in toolkit space
    pub display_pos: Vec2,
    pub display_size: Vec2,
    /// Toolkit units to framebuffer pixels
    pub framebuffer_scale: Vec2,
}

impl DrawData {
    pub fn new(lists: Vec<DrawList>, display_size: Vec2) -> Self {
        Self {
            lists,
            display_pos: Vec2::ZERO,
            display_size,
            framebuffer_scale: Vec2::ONE,
        }
    }

    pub fn total_vtx_count(&self) -> usize {
        self.lists.iter().map(|l| l.vtx_buffer.len()).sum()
    }

    pub fn total_idx_count(&self) -> usize {
        self.lists.iter().map(|l| l.idx_buffer.len()).sum()
    }
}
