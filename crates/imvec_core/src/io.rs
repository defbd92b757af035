//! Toolkit io slot shared with the renderer backend

use crate::font_atlas::FontAtlas;
use bitflags::bitflags;

bitflags! {
    /// Capabilities a backend advertises to the toolkit
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct BackendFlags: u32 {
        /// Backend honors `ElementsCmd::vtx_offset`, allowing large meshes
        const RENDERER_HAS_VTX_OFFSET = 1 << 0;
    }
}

/// The part of the toolkit's io the renderer reads and registers in
#[derive(Clone, Debug)]
pub struct Io {
    pub fonts: FontAtlas,
    /// Scale applied to every font on top of its own scale
    pub font_global_scale: f32,
    /// Name of the installed renderer backend, `None` when no backend is set
    pub backend_renderer_name: Option<&'static str>,
    pub backend_flags: BackendFlags,
}

impl Default for Io {
    fn default() -> Self {
        Self::new(FontAtlas::new())
    }
}

impl Io {
    pub fn new(fonts: FontAtlas) -> Self {
        Self {
            fonts,
            font_global_scale: 1.0,
            backend_renderer_name: None,
            backend_flags: BackendFlags::empty(),
        }
    }

    pub fn has_renderer_backend(&self) -> bool {
        self.backend_renderer_name.is_some()
    }
}
