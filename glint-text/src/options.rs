//! Render options and the options stack.
//!
//! `RenderOptions` is a plain value. Spacing factors are fractions of
//! the font's mean glyph width; line spacing is a fraction of the
//! tallest glyph. The justification constants tune how lines are
//! stretched or squeezed to the bounding width.
//!
//! Options can be loaded from JSON; omitted fields take their defaults:
//!
//! ```text
//! { "word_spacing": 1.2, "monospacing": "yes" }
//! ```

use serde::{Deserialize, Serialize};

use crate::error::TextError;

// ── Monospacing ─────────────────────────────────────────────────────

/// Whether characters advance by one fixed width.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Monospacing {
    /// Monospace only if the font itself is monospaced.
    Natural,
    /// Always monospace.
    Yes,
    /// Never monospace.
    No,
}

impl Default for Monospacing {
    fn default() -> Self {
        Self::Natural
    }
}

// ── Render options ──────────────────────────────────────────────────

/// Options consulted by every measure and print call.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// RGBA text color, each channel in [0.0, 1.0].
    pub color: [f32; 4],
    /// Extra space between characters, as a fraction of mean glyph width.
    pub character_spacing: f32,
    /// Width of a space, as a fraction of mean glyph width.
    pub word_spacing: f32,
    /// Line advance, as a fraction of the tallest glyph.
    pub line_spacing: f32,
    pub monospacing: Monospacing,
    pub drop_shadow_active: bool,
    /// Shadow offset, as a fraction of the shadow face's mean glyph width.
    pub drop_shadow_offset: [f32; 2],
    pub drop_shadow_opacity: f32,
    /// Snap print positions towards whole pixels.
    pub lock_to_pixel: bool,
    /// 0 = no snapping, 1 = full snapping.
    pub lock_to_pixel_ratio: f32,
    /// Share of expansion pixels given to character gaps (0..=1).
    pub justify_character_weight_for_expand: f32,
    /// Share of contraction pixels taken from character gaps (0..=1).
    pub justify_character_weight_for_contract: f32,
    /// Largest expansion, as a fraction of the bounding width.
    pub justify_cap_expand: f32,
    /// Largest contraction, as a fraction of the bounding width.
    pub justify_cap_contract: f32,
    /// How strongly contraction is disfavoured against expansion.
    pub justify_contraction_penalty: f32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            color: [1.0, 1.0, 1.0, 1.0],
            character_spacing: 0.05,
            word_spacing: 0.9,
            line_spacing: 1.0,
            monospacing: Monospacing::Natural,
            drop_shadow_active: false,
            drop_shadow_offset: [0.16, 0.16],
            drop_shadow_opacity: 0.5,
            lock_to_pixel: false,
            lock_to_pixel_ratio: 1.0,
            justify_character_weight_for_expand: 0.08,
            justify_character_weight_for_contract: 0.2,
            justify_cap_expand: 0.5,
            justify_cap_contract: 0.1,
            justify_contraction_penalty: 2.0,
        }
    }
}

impl RenderOptions {
    /// Parse options from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, TextError> {
        let options: RenderOptions = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, TextError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check that every tuning constant is inside its legal range.
    pub fn validate(&self) -> Result<(), TextError> {
        unit_range("justify_character_weight_for_expand", self.justify_character_weight_for_expand)?;
        unit_range("justify_character_weight_for_contract", self.justify_character_weight_for_contract)?;
        unit_range("justify_cap_expand", self.justify_cap_expand)?;
        unit_range("justify_cap_contract", self.justify_cap_contract)?;
        unit_range("lock_to_pixel_ratio", self.lock_to_pixel_ratio)?;
        unit_range("drop_shadow_opacity", self.drop_shadow_opacity)?;

        if self.justify_contraction_penalty.is_nan() || self.justify_contraction_penalty < 0.0 {
            return Err(TextError::InvalidOptionValue {
                field: "justify_contraction_penalty",
                reason: format!("must be >= 0, got {}", self.justify_contraction_penalty),
            });
        }
        if self.line_spacing.is_nan() || self.line_spacing <= 0.0 {
            return Err(TextError::InvalidOptionValue {
                field: "line_spacing",
                reason: format!("must be > 0, got {}", self.line_spacing),
            });
        }
        Ok(())
    }
}

fn unit_range(field: &'static str, value: f32) -> Result<(), TextError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(TextError::InvalidOptionValue {
            field,
            reason: format!("must be within 0..=1, got {value}"),
        })
    }
}

// ── Options stack ───────────────────────────────────────────────────

/// Stack of render options. Never empty; the last entry is current.
#[derive(Clone, Debug)]
pub struct OptionsStack {
    entries: Vec<RenderOptions>,
}

impl Default for OptionsStack {
    fn default() -> Self {
        Self::new(RenderOptions::default())
    }
}

impl OptionsStack {
    pub fn new(base: RenderOptions) -> Self {
        Self { entries: vec![base] }
    }

    /// The current (top) options.
    pub fn current(&self) -> &RenderOptions {
        // `entries` always holds at least the base entry.
        &self.entries[self.entries.len() - 1]
    }

    pub fn current_mut(&mut self) -> &mut RenderOptions {
        let top = self.entries.len() - 1;
        &mut self.entries[top]
    }

    pub fn push(&mut self, options: RenderOptions) {
        self.entries.push(options);
    }

    /// Push a copy of the current options, so edits can be undone by `pop`.
    pub fn push_clone(&mut self) {
        let top = self.current().clone();
        self.entries.push(top);
    }

    /// Pop the current options, returning them.
    ///
    /// Fails when only the base entry is left.
    pub fn pop(&mut self) -> Result<RenderOptions, TextError> {
        if self.entries.len() <= 1 {
            return Err(TextError::OptionsStackUnderflow);
        }
        self.entries.pop().ok_or(TextError::OptionsStackUnderflow)
    }

    pub fn depth(&self) -> usize {
        self.entries.len()
    }
}

// ===================================================================
// Tests
// ===================================================================
