use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::assets::color::Rgba8;
use crate::edit::model::{FontFace, GenericFamily};
use crate::foundation::error::{EditorError, EditorResult};

/// Font face bytes resolved for one [`FontFace`].
#[derive(Clone)]
pub struct ResolvedFont {
    /// Raw font file bytes (may be a collection).
    pub bytes: Arc<Vec<u8>>,
    /// Face index inside `bytes`.
    pub index: u32,
    /// Family name reported by the font file.
    pub family: String,
}

impl std::fmt::Debug for ResolvedFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedFont")
            .field("bytes_len", &self.bytes.len())
            .field("index", &self.index)
            .field("family", &self.family)
            .finish()
    }
}

/// Face lookup over a `fontdb` database: system fonts plus an optional fonts directory.
pub struct FontBook {
    db: usvg::fontdb::Database,
}

impl std::fmt::Debug for FontBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontBook")
            .field("faces", &self.db.len())
            .finish()
    }
}

impl Default for FontBook {
    fn default() -> Self {
        Self::load(None, true)
    }
}

impl FontBook {
    /// Book with no faces; callers add fonts with [`FontBook::add_font_data`].
    pub fn empty() -> Self {
        Self {
            db: usvg::fontdb::Database::new(),
        }
    }

    /// Build a book from system fonts (when `system` is set) and `fonts_dir`.
    #[tracing::instrument]
    pub fn load(fonts_dir: Option<&Path>, system: bool) -> Self {
        let mut db = usvg::fontdb::Database::new();
        if system {
            db.load_system_fonts();
        }
        if let Some(dir) = fonts_dir {
            load_fonts_from_dir(&mut db, dir);
            load_fonts_from_dir(&mut db, &dir.join("fonts"));
        }
        tracing::debug!(faces = db.len(), "font book loaded");
        Self { db }
    }

    /// Register one font file from memory.
    pub fn add_font_data(&mut self, bytes: Vec<u8>) {
        self.db.load_font_data(bytes);
    }

    /// Number of faces known to the book.
    pub fn len(&self) -> usize {
        self.db.len()
    }

    /// Return `true` when the book has no faces.
    pub fn is_empty(&self) -> bool {
        self.db.is_empty()
    }

    /// Resolve `face` to font bytes.
    ///
    /// Lookup order: the named family, its generic family, then any face in the book.
    pub fn resolve(&self, face: FontFace) -> EditorResult<ResolvedFont> {
        use usvg::fontdb::{Family, Query, Stretch, Style, Weight};

        let generic = match face.generic() {
            GenericFamily::SansSerif => Family::SansSerif,
            GenericFamily::Serif => Family::Serif,
            GenericFamily::Monospace => Family::Monospace,
            GenericFamily::Cursive => Family::Cursive,
        };
        let families = [Family::Name(face.family_name()), generic];
        let query = Query {
            families: &families,
            weight: Weight::NORMAL,
            stretch: Stretch::Normal,
            style: Style::Normal,
        };

        let id = self
            .db
            .query(&query)
            .or_else(|| self.db.faces().next().map(|f| f.id))
            .ok_or_else(|| {
                EditorError::font(format!("no font face available for \"{}\"", face.family_name()))
            })?;

        let family = self
            .db
            .face(id)
            .and_then(|info| info.families.first().map(|(name, _)| name.clone()))
            .unwrap_or_else(|| face.family_name().to_string());

        let (bytes, index) = self
            .db
            .with_face_data(id, |data, index| (data.to_vec(), index))
            .ok_or_else(|| EditorError::font(format!("font data for \"{family}\" is unreadable")))?;

        if family != face.family_name() {
            tracing::debug!(requested = face.family_name(), resolved = %family, "font fallback");
        }

        Ok(ResolvedFont {
            bytes: Arc::new(bytes),
            index,
            family,
        })
    }
}

fn load_fonts_from_dir(db: &mut usvg::fontdb::Database, dir: &Path) {
    let Ok(rd) = std::fs::read_dir(dir) else {
        return;
    };

    for entry in rd.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
            continue;
        };
        let ext = ext.to_ascii_lowercase();
        if ext != "ttf" && ext != "otf" && ext != "ttc" {
            continue;
        }
        if let Err(e) = db.load_font_file(&path) {
            tracing::warn!(path = %path.display(), error = %e, "skipping unreadable font file");
        }
    }
}

/// Stateful helper for building Parley text layouts from resolved font bytes.
pub struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<Rgba8>,
    registered: HashMap<(String, u32, usize), String>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    /// Construct a new layout engine with fresh Parley contexts.
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            registered: HashMap::new(),
        }
    }

    fn family_for(&mut self, font: &ResolvedFont) -> EditorResult<String> {
        let key = (font.family.clone(), font.index, font.bytes.len());
        if let Some(name) = self.registered.get(&key) {
            return Ok(name.clone());
        }

        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font.bytes.as_ref().clone()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| EditorError::font("no font families registered from font bytes"))?;

        let family_name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| EditorError::font("registered font family has no name"))?
            .to_string();
        self.registered.insert(key, family_name.clone());
        Ok(family_name)
    }

    /// Shape and lay out one unwrapped line of text.
    pub fn layout_line(
        &mut self,
        text: &str,
        font: &ResolvedFont,
        size_px: f32,
        brush: Rgba8,
    ) -> EditorResult<parley::Layout<Rgba8>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(EditorError::validation(
                "text size must be finite and > 0",
            ));
        }

        let family_name = self.family_for(font)?;

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family_name)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<Rgba8> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fonts.rs"]
mod tests;
