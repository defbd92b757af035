//! Text format cache
//!
//! Text formats are expensive to create and are reused for the lifetime of
//! the renderer. Entries are keyed by font index and pixel size. A failed
//! creation is cached as `None` and never retried. When the font at an index
//! changes family or data, every entry for that index is dropped.

use crate::config::TextConfig;
use imvec_core::Font;
use imvec_paint::{FontCollection, TextFactory, TextFormat};
use rustc_hash::FxHashMap;
use std::rc::Rc;
use std::sync::Arc;

/// What a font index resolved to when its entries were created
#[derive(Debug)]
struct FontIdentity {
    family: String,
    data: Option<Arc<[u8]>>,
}

impl FontIdentity {
    fn of(font: &Font) -> Self {
        Self {
            family: font.family.clone(),
            data: font.font_data.clone(),
        }
    }

    fn matches(&self, font: &Font) -> bool {
        let same_data = match (&self.data, &font.font_data) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };
        same_data && self.family == font.family
    }
}

/// Text formats and in-memory font collections owned by one renderer
pub struct TextFormatCache {
    factory: Rc<dyn TextFactory>,
    /// (font index, size bits) -> format (Some = created, None = failed)
    formats: FxHashMap<(usize, u32), Option<Rc<TextFormat>>>,
    /// font index -> collection built from the font's own bytes
    collections: FxHashMap<usize, Option<Rc<FontCollection>>>,
    identities: FxHashMap<usize, FontIdentity>,
}

impl TextFormatCache {
    pub fn new(factory: Rc<dyn TextFactory>) -> Self {
        Self {
            factory,
            formats: FxHashMap::default(),
            collections: FxHashMap::default(),
            identities: FxHashMap::default(),
        }
    }

    /// Look up or lazily create the format for `font` at `size` pixels
    pub fn get_or_create(
        &mut self,
        font_index: usize,
        font: &Font,
        size: f32,
        config: &TextConfig,
    ) -> Option<Rc<TextFormat>> {
        self.check_identity(font_index, font);
        let key = (font_index, size.to_bits());
        if let Some(entry) = self.formats.get(&key) {
            return entry.clone();
        }

        let family = if font.family.is_empty() {
            config.default_family.as_str()
        } else {
            font.family.as_str()
        };
        let collection = self.collection(font_index, font, family);
        let format = match self
            .factory
            .create_text_format(family, collection.as_ref(), size, &config.locale)
        {
            Ok(format) => {
                tracing::debug!("Created text format {} {}px for font {}", family, size, font_index);
                Some(format)
            }
            Err(e) => {
                tracing::warn!("Failed to create text format {} {}px: {}", family, size, e);
                None
            }
        };
        self.formats.insert(key, format.clone());
        format
    }

    fn check_identity(&mut self, font_index: usize, font: &Font) {
        match self.identities.get(&font_index) {
            Some(identity) if identity.matches(font) => return,
            Some(identity) => {
                tracing::debug!(
                    "Font {} changed from {:?} to {:?}, dropping its text formats",
                    font_index,
                    identity.family,
                    font.family
                );
                self.formats.retain(|(index, _), _| *index != font_index);
                self.collections.remove(&font_index);
            }
            None => {}
        }
        self.identities.insert(font_index, FontIdentity::of(font));
    }

    fn collection(&mut self, font_index: usize, font: &Font, family: &str) -> Option<Rc<FontCollection>> {
        let data = font.font_data.as_ref()?;
        self.collections
            .entry(font_index)
            .or_insert_with(|| match self.factory.create_font_collection(family, data) {
                Ok(collection) => Some(collection),
                Err(e) => {
                    tracing::warn!("Failed to register font data for {}: {}, using system fonts", family, e);
                    None
                }
            })
            .clone()
    }

    /// Number of cached entries, failures included
    pub fn len(&self) -> usize {
        self.formats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formats.is_empty()
    }

    pub fn clear(&mut self) {
        self.formats.clear();
        self.collections.clear();
        self.identities.clear();
    }
}
