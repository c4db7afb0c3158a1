//! Glyph metrics: the read-only view of a pre-rasterized font.
//!
//! Layout only needs per-character widths, kerning pairs, and a few
//! font-wide figures. Those are reached through [`GlyphMetrics`];
//! [`FontData`] is the in-memory implementation holding the glyph map,
//! atlas pages, kerning table and an optional drop-shadow face.
//!
//! ## Derived figures
//!
//! ```text
//! mean_glyph_width  = mean(rect.width)   over all glyphs
//! max_glyph_height  = max(rect.height)   over all glyphs
//! monospaced        = max(width) - min(width) < 1px
//! ```

use rustc_hash::FxHashMap;

// ── Atlas pages ─────────────────────────────────────────────────────

/// Opaque handle to an uploaded texture, owned by the renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct TextureHandle(pub u64);

/// An atlas page: a texture handle plus its pixel size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Texture {
    pub handle: TextureHandle,
    pub width: u32,
    pub height: u32,
}

impl Texture {
    pub fn new(handle: TextureHandle, width: u32, height: u32) -> Self {
        Self { handle, width, height }
    }

    /// Convert a pixel rect on this page to normalized UV coordinates.
    ///
    /// Returns `(uv_min, uv_max)`.
    pub fn uv(&self, rect: &GlyphRect) -> ([f32; 2], [f32; 2]) {
        let w = self.width.max(1) as f32;
        let h = self.height.max(1) as f32;
        (
            [rect.x as f32 / w, rect.y as f32 / h],
            [(rect.x + rect.width) as f32 / w, (rect.y + rect.height) as f32 / h],
        )
    }
}

// ── Glyphs ──────────────────────────────────────────────────────────

/// Pixel-space rectangle of a glyph within its atlas page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct GlyphRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl GlyphRect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }
}

/// A rasterized glyph.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Glyph {
    pub rect: GlyphRect,
    /// Distance from the line top to the glyph's top edge, in pixels.
    pub y_offset: i32,
    /// Index of the atlas page holding the bitmap.
    pub page: usize,
}

impl Glyph {
    pub fn new(rect: GlyphRect, y_offset: i32, page: usize) -> Self {
        Self { rect, y_offset, page }
    }
}

// ── Metrics seam ────────────────────────────────────────────────────

/// What the layout engine needs to know about a font.
pub trait GlyphMetrics {
    /// Look up a glyph. `None` means the character is not in the font
    /// and contributes nothing to layout.
    fn glyph(&self, c: char) -> Option<&Glyph>;

    /// Signed kerning adjustment for the pair `(left, right)`, in pixels.
    fn kerning_pair(&self, _left: char, _right: char) -> i32 {
        0
    }

    fn mean_glyph_width(&self) -> f32;

    fn max_glyph_height(&self) -> f32;

    fn is_naturally_monospaced(&self) -> bool;
}

/// Kerning correction for the character at `index` of `chars`.
///
/// The right-hand partner is the following character; for the last
/// character it is `next_word_head`, the first character of a word
/// fragment that directly follows (a crumbled word), if any.
pub fn kerning_correction<M: GlyphMetrics + ?Sized>(
    metrics: &M,
    chars: &[char],
    index: usize,
    next_word_head: Option<char>,
) -> i32 {
    let Some(&left) = chars.get(index) else {
        return 0;
    };
    let right = match chars.get(index + 1) {
        Some(&c) => c,
        None => match next_word_head {
            Some(c) => c,
            None => return 0,
        },
    };
    metrics.kerning_pair(left, right)
}

// ── Font data ───────────────────────────────────────────────────────

/// In-memory font: glyph map, atlas pages, kerning, shadow face.
#[derive(Clone, Debug)]
pub struct FontData {
    glyphs: FxHashMap<char, Glyph>,
    pages: Vec<Texture>,
    kerning: FxHashMap<(char, char), i32>,
    mean_glyph_width: f32,
    max_glyph_height: f32,
    naturally_monospaced: bool,
    drop_shadow: Option<Box<FontData>>,
}

impl FontData {
    pub fn builder() -> FontDataBuilder {
        FontDataBuilder::default()
    }

    /// Atlas page by index.
    pub fn page(&self, index: usize) -> Option<&Texture> {
        self.pages.get(index)
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }

    /// The face used to draw drop shadows, if the font has one.
    pub fn drop_shadow(&self) -> Option<&FontData> {
        self.drop_shadow.as_deref()
    }
}

impl GlyphMetrics for FontData {
    fn glyph(&self, c: char) -> Option<&Glyph> {
        self.glyphs.get(&c)
    }

    fn kerning_pair(&self, left: char, right: char) -> i32 {
        self.kerning.get(&(left, right)).copied().unwrap_or(0)
    }

    fn mean_glyph_width(&self) -> f32 {
        self.mean_glyph_width
    }

    fn max_glyph_height(&self) -> f32 {
        self.max_glyph_height
    }

    fn is_naturally_monospaced(&self) -> bool {
        self.naturally_monospaced
    }
}

/// Builder for [`FontData`]. Font-wide figures are derived in `build`.
#[derive(Default)]
pub struct FontDataBuilder {
    glyphs: FxHashMap<char, Glyph>,
    pages: Vec<Texture>,
    kerning: FxHashMap<(char, char), i32>,
    drop_shadow: Option<FontData>,
}

impl FontDataBuilder {
    pub fn page(mut self, texture: Texture) -> Self {
        self.pages.push(texture);
        self
    }

    pub fn glyph(mut self, c: char, glyph: Glyph) -> Self {
        self.glyphs.insert(c, glyph);
        self
    }

    pub fn kerning(mut self, left: char, right: char, pixels: i32) -> Self {
        self.kerning.insert((left, right), pixels);
        self
    }

    pub fn drop_shadow(mut self, face: FontData) -> Self {
        self.drop_shadow = Some(face);
        self
    }

    pub fn build(self) -> FontData {
        let count = self.glyphs.len();
        let (mut min_w, mut max_w, mut sum_w, mut max_h) = (u32::MAX, 0u32, 0u64, 0u32);
        for glyph in self.glyphs.values() {
            min_w = min_w.min(glyph.rect.width);
            max_w = max_w.max(glyph.rect.width);
            sum_w += u64::from(glyph.rect.width);
            max_h = max_h.max(glyph.rect.height);
        }

        let mean_glyph_width = if count == 0 { 0.0 } else { sum_w as f32 / count as f32 };
        let naturally_monospaced = count > 0 && max_w - min_w < 1;

        log::debug!(
            "Font data built: {count} glyphs, {} pages, mean width {mean_glyph_width:.2}, max height {max_h}",
            self.pages.len(),
        );

        FontData {
            glyphs: self.glyphs,
            pages: self.pages,
            kerning: self.kerning,
            mean_glyph_width,
            max_glyph_height: max_h as f32,
            naturally_monospaced,
            drop_shadow: self.drop_shadow.map(Box::new),
        }
    }
}

// ===================================================================
// Tests
// ===================================================================
