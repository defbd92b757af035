//! Text formats and font collections

use std::rc::Rc;
use std::sync::Arc;

/// Fonts registered from memory under one family name
#[derive(Debug)]
pub struct FontCollection {
    pub family: String,
    pub data: Arc<[u8]>,
}

/// Font family, size and locale used to draw text
#[derive(Debug)]
pub struct TextFormat {
    pub family: String,
    /// Em size in pixels
    pub size: f32,
    pub locale: String,
    /// Custom collection the family is resolved from, system fonts otherwise
    pub collection: Option<Rc<FontCollection>>,
}
