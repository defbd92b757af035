//! imvec Core Data Model
//!
//! The read-only side of the renderer: everything the immediate-mode toolkit
//! produces each frame and hands to a backend.
//!
//! - **Draw data**: draw lists owning a vertex and an index buffer, with draw
//!   commands referencing ranges of those buffers
//! - **Font atlas**: glyph tables with atlas UVs, the white pixel and the
//!   line texture UVs used to tell solid fills from textured quads
//! - **Io**: the toolkit slot a renderer backend registers itself in
//!
//! # Example
//!
//! ```rust
//! use imvec_core::{DrawCmd, DrawData, DrawList, ElementsCmd, PackedColor, TextureId, Vec2, Vertex};
//!
//! let white = PackedColor::WHITE;
//! let mut list = DrawList::new();
//! list.vtx_buffer = vec![
//!     Vertex::new(Vec2::new(0.0, 0.0), Vec2::ZERO, white),
//!     Vertex::new(Vec2::new(10.0, 0.0), Vec2::ZERO, white),
//!     Vertex::new(Vec2::new(10.0, 10.0), Vec2::ZERO, white),
//! ];
//! list.idx_buffer = vec![0, 1, 2];
//! list.commands.push(DrawCmd::Elements(ElementsCmd::new(3, TextureId(1), [0.0, 0.0, 100.0, 100.0])));
//!
//! let draw_data = DrawData::new(vec![list], Vec2::new(100.0, 100.0));
//! assert_eq!(draw_data.total_idx_count(), 3);
//! ```

pub mod color;
pub mod draw_data;
pub mod font_atlas;
pub mod io;
pub mod math;

pub use color::PackedColor;
pub use draw_data::{DrawCallback, DrawCmd, DrawData, DrawIdx, DrawList, ElementsCmd, TextureId, Vertex};
pub use font_atlas::{Font, FontAtlas, Glyph, TEX_LINES_WIDTH_MAX};
pub use io::{BackendFlags, Io};
pub use math::Vec2;
