//! Advance widths shared by node measurement and glyph placement.
//!
//! Measuring and drawing both go through [`Measurer`], so a node's
//! measured length is exactly the sum of the advances used to draw it.

use crate::metrics::{kerning_correction, GlyphMetrics};
use crate::options::{Monospacing, RenderOptions};

/// A font paired with the options in force for one call.
pub struct Measurer<'a, M: GlyphMetrics + ?Sized> {
    pub metrics: &'a M,
    pub options: &'a RenderOptions,
}

impl<'a, M: GlyphMetrics + ?Sized> Clone for Measurer<'a, M> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, M: GlyphMetrics + ?Sized> Copy for Measurer<'a, M> {}

impl<'a, M: GlyphMetrics + ?Sized> Measurer<'a, M> {
    pub fn new(metrics: &'a M, options: &'a RenderOptions) -> Self {
        Self { metrics, options }
    }

    pub fn is_monospacing_active(&self) -> bool {
        match self.options.monospacing {
            Monospacing::Yes => true,
            Monospacing::No => false,
            Monospacing::Natural => self.metrics.is_naturally_monospaced(),
        }
    }

    pub fn mono_space_width(&self) -> f32 {
        (1.0 + (1.0 + self.options.character_spacing) * self.metrics.mean_glyph_width()).ceil()
    }

    /// Vertical advance between lines.
    pub fn line_spacing(&self) -> f32 {
        (self.metrics.max_glyph_height() * self.options.line_spacing).ceil()
    }

    /// Width of a single space character.
    pub fn space_width(&self) -> f32 {
        if self.is_monospacing_active() {
            self.mono_space_width()
        } else {
            (self.metrics.mean_glyph_width() * self.options.word_spacing).ceil()
        }
    }

    /// Advance for `chars[index]`, or `None` if the font lacks the glyph.
    pub fn char_advance(&self, chars: &[char], index: usize, next_word_head: Option<char>) -> Option<f32> {
        let glyph = self.metrics.glyph(*chars.get(index)?)?;
        if self.is_monospacing_active() {
            return Some(self.mono_space_width());
        }
        let kerning = kerning_correction(self.metrics, chars, index, next_word_head) as f32;
        Some(
            (glyph.rect.width as f32
                + self.metrics.mean_glyph_width() * self.options.character_spacing
                + kerning)
                .ceil(),
        )
    }

    /// Natural width of a run of word characters.
    pub fn word_width(&self, chars: &[char], next_word_head: Option<char>) -> f32 {
        (0..chars.len())
            .filter_map(|i| self.char_advance(chars, i, next_word_head))
            .sum()
    }
}

// ===================================================================
// Tests
// ===================================================================
