//! `Font`: font data plus an options stack; the public entry point.
//!
//! ```text
//! Font::print(text, max_width, alignment, position, sink)
//!   │
//!   ├─ process_text ──► ProcessedText
//!   ├─ lock_to_pixel(position)
//!   ├─ sink.begin(position)
//!   ├─ layout(..., QuadEmitter)      one quad per glyph, shadow first
//!   └─ sink.end()
//! ```
//!
//! Every call reads the top of the options stack.

use crate::draw::{DrawSink, Quad};
use crate::error::TextError;
use crate::layout::{self, Alignment, GlyphSink, MeasureOnly, PlacedGlyph, ProcessedText, Size};
use crate::measure::Measurer;
use crate::metrics::{FontData, GlyphMetrics};
use crate::options::{OptionsStack, RenderOptions};

pub struct Font {
    data: FontData,
    options: OptionsStack,
}

impl Font {
    pub fn new(data: FontData) -> Self {
        Self::with_options(data, RenderOptions::default())
    }

    pub fn with_options(data: FontData, options: RenderOptions) -> Self {
        Self {
            data,
            options: OptionsStack::new(options),
        }
    }

    pub fn data(&self) -> &FontData {
        &self.data
    }

    // ── Options ─────────────────────────────────────────────────────

    /// The options in force.
    pub fn options(&self) -> &RenderOptions {
        self.options.current()
    }

    pub fn options_mut(&mut self) -> &mut RenderOptions {
        self.options.current_mut()
    }

    pub fn push_options(&mut self, options: RenderOptions) {
        self.options.push(options);
    }

    /// Push a copy of the current options, to be edited and later popped.
    pub fn push_options_clone(&mut self) {
        self.options.push_clone();
    }

    pub fn pop_options(&mut self) -> Result<RenderOptions, TextError> {
        self.options.pop()
    }

    pub fn options_depth(&self) -> usize {
        self.options.depth()
    }

    // ── Metrics ─────────────────────────────────────────────────────

    fn measurer(&self) -> Measurer<'_, FontData> {
        Measurer::new(&self.data, self.options.current())
    }

    pub fn line_spacing(&self) -> f32 {
        self.measurer().line_spacing()
    }

    pub fn is_monospacing_active(&self) -> bool {
        self.measurer().is_monospacing_active()
    }

    pub fn mono_space_width(&self) -> f32 {
        self.measurer().mono_space_width()
    }

    // ── Layout ──────────────────────────────────────────────────────

    /// Tokenize and measure `text` for repeated printing.
    ///
    /// The result is tied to the options in force now; re-process after
    /// changing spacing or monospacing.
    pub fn process_text(&self, text: &str, max_width: f32, alignment: Alignment) -> ProcessedText {
        ProcessedText::new(text, max_width, alignment, self.measurer())
    }

    pub fn measure(&self, text: &str, max_width: f32, alignment: Alignment) -> Size {
        let mut processed = self.process_text(text, max_width, alignment);
        self.measure_processed(&mut processed)
    }

    pub fn measure_processed(&self, processed: &mut ProcessedText) -> Size {
        layout::layout(processed, self.measurer(), &mut MeasureOnly)
    }

    /// Size of `text` laid out without wrapping.
    pub fn measure_line(&self, text: &str, alignment: Alignment) -> Size {
        layout::layout_line(text, alignment, self.measurer(), &mut MeasureOnly)
    }

    /// Pen positions of every drawn character, relative to the origin.
    pub fn layout_glyphs(&self, processed: &mut ProcessedText) -> Vec<PlacedGlyph> {
        let mut glyphs = Vec::new();
        layout::layout(processed, self.measurer(), &mut glyphs);
        glyphs
    }

    // ── Printing ────────────────────────────────────────────────────

    pub fn print<D: DrawSink + ?Sized>(
        &self,
        text: &str,
        max_width: f32,
        alignment: Alignment,
        position: [f32; 2],
        sink: &mut D,
    ) -> Size {
        let mut processed = self.process_text(text, max_width, alignment);
        self.print_processed(&mut processed, position, sink)
    }

    pub fn print_processed<D: DrawSink + ?Sized>(
        &self,
        processed: &mut ProcessedText,
        position: [f32; 2],
        sink: &mut D,
    ) -> Size {
        let options = self.options.current();
        sink.begin(lock_to_pixel(position, options));
        let mut emitter = QuadEmitter {
            face: &self.data,
            options,
            sink: &mut *sink,
        };
        let size = layout::layout(processed, self.measurer(), &mut emitter);
        sink.end();
        size
    }

    /// Print without wrapping; see [`layout::layout_line`].
    pub fn print_line<D: DrawSink + ?Sized>(
        &self,
        text: &str,
        alignment: Alignment,
        position: [f32; 2],
        sink: &mut D,
    ) -> Size {
        let options = self.options.current();
        sink.begin(lock_to_pixel(position, options));
        let mut emitter = QuadEmitter {
            face: &self.data,
            options,
            sink: &mut *sink,
        };
        let size = layout::layout_line(text, alignment, self.measurer(), &mut emitter);
        sink.end();
        size
    }
}

/// Blend a position towards whole pixels by `lock_to_pixel_ratio`.
pub fn lock_to_pixel(position: [f32; 2], options: &RenderOptions) -> [f32; 2] {
    if !options.lock_to_pixel {
        return position;
    }
    let r = options.lock_to_pixel_ratio;
    position.map(|p| (1.0 - r) * p + r * p.round_ties_even())
}

// ── Quad emission ───────────────────────────────────────────────────

/// Turns pen positions into quads for a draw sink.
struct QuadEmitter<'a, D: DrawSink + ?Sized> {
    face: &'a FontData,
    options: &'a RenderOptions,
    sink: &'a mut D,
}

impl<D: DrawSink + ?Sized> GlyphSink for QuadEmitter<'_, D> {
    fn glyph(&mut self, c: char, x: f32, y: f32) {
        render_glyph(self.face, self.options, c, x, y, false, &mut *self.sink);
    }
}

/// Emit the quad for `c` at pen position `(x, y)` on `face`, preceded
/// by its shadow when one is enabled.
///
/// A shadow glyph is centred on the glyph it shades.
fn render_glyph<D: DrawSink + ?Sized>(
    face: &FontData,
    options: &RenderOptions,
    c: char,
    mut x: f32,
    mut y: f32,
    is_shadow: bool,
    sink: &mut D,
) {
    let Some(glyph) = face.glyph(c) else {
        return;
    };
    let (width, height) = (glyph.rect.width as f32, glyph.rect.height as f32);
    let y_offset = glyph.y_offset as f32;

    if is_shadow {
        x -= (width * 0.5).trunc();
        y -= (height * 0.5 + y_offset).trunc();
    }

    if options.drop_shadow_active {
        if let Some(shadow) = face.drop_shadow() {
            let mean = shadow.mean_glyph_width();
            render_glyph(
                shadow,
                options,
                c,
                x + mean * options.drop_shadow_offset[0] + width * 0.5,
                y + mean * options.drop_shadow_offset[1] + height * 0.5 + y_offset,
                true,
                sink,
            );
        }
    }

    let Some(page) = face.page(glyph.page) else {
        log::warn!("Glyph {c:?} refers to missing atlas page {}", glyph.page);
        return;
    };
    let (uv_min, uv_max) = page.uv(&glyph.rect);
    let color = if is_shadow {
        [1.0, 1.0, 1.0, options.drop_shadow_opacity]
    } else {
        options.color
    };

    sink.draw_quad(&Quad {
        min: [x, y + y_offset],
        max: [x + width, y + y_offset + height],
        uv_min,
        uv_max,
        color,
        texture: page.handle,
    });
}

// ===================================================================
// Tests
// ===================================================================
