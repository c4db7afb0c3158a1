//! Line layout: one pass that both measures and places glyphs.
//!
//! ```text
//! &str ──► TextNodeList::parse ──► measure ──► crumble overlong words
//!                                                   │
//!                                             ProcessedText
//!                                                   │
//!                            layout(processed, measurer, sink)
//!                                 │ per line: align / justify
//!                                 ▼
//!                        GlyphSink::glyph(c, x, y)  +  Size
//! ```
//!
//! Measuring and drawing share [`layout`]; a [`MeasureOnly`] sink
//! skips glyph placement but walks every line the same way, so the
//! measured size always matches what is drawn.

use serde::{Deserialize, Serialize};

use crate::justify::{justify_line, spread_one, split_even, word_gaps};
use crate::measure::Measurer;
use crate::metrics::GlyphMetrics;
use crate::node::{NodeId, NodeKind, TextNodeList};
use crate::options::RenderOptions;

// ── Alignment ───────────────────────────────────────────────────────

/// Horizontal alignment of each line within the bounding width.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Left,
    Right,
    Center,
    Justify,
}

impl Default for Alignment {
    fn default() -> Self {
        Self::Left
    }
}

/// Width and height of laid-out text, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

// ── Glyph sinks ─────────────────────────────────────────────────────

/// Receives pen positions for each drawn character.
pub trait GlyphSink {
    /// `false` for sinks that only want the size.
    const RENDERS: bool = true;

    fn glyph(&mut self, c: char, x: f32, y: f32);
}

/// Sink for measure-only passes.
pub struct MeasureOnly;

impl GlyphSink for MeasureOnly {
    const RENDERS: bool = false;

    fn glyph(&mut self, _c: char, _x: f32, _y: f32) {}
}

/// A character and the pen position it is drawn at.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacedGlyph {
    pub c: char,
    pub x: f32,
    pub y: f32,
}

impl GlyphSink for Vec<PlacedGlyph> {
    fn glyph(&mut self, c: char, x: f32, y: f32) {
        self.push(PlacedGlyph { c, x, y });
    }
}

// ── Processed text ──────────────────────────────────────────────────

/// Tokenized and measured text with its bounds, ready to be laid out
/// any number of times.
#[derive(Clone, Debug)]
pub struct ProcessedText {
    nodes: TextNodeList,
    max_width: f32,
    alignment: Alignment,
}

impl ProcessedText {
    /// Tokenize and measure `text`, crumbling words that are at least
    /// `max_width` wide so they can wrap mid-word.
    pub fn new<M: GlyphMetrics + ?Sized>(
        text: &str,
        max_width: f32,
        alignment: Alignment,
        measurer: Measurer<'_, M>,
    ) -> Self {
        let mut nodes = TextNodeList::parse(text);
        nodes.measure(measurer);

        let crumbled = nodes.crumble_overflowing(max_width);
        if crumbled > 0 {
            nodes.measure(measurer);
        }

        log::debug!(
            "Processed text: {} nodes, {crumbled} words crumbled, max width {max_width}",
            nodes.len(),
        );

        Self {
            nodes,
            max_width,
            alignment,
        }
    }

    pub fn nodes(&self) -> &TextNodeList {
        &self.nodes
    }

    pub fn max_width(&self) -> f32 {
        self.max_width
    }

    pub fn alignment(&self) -> Alignment {
        self.alignment
    }
}

// ── Line helpers ────────────────────────────────────────────────────

/// Whether the space at `id` should end the line because the word
/// after it would not fit.
///
/// Only a single trailing space is considered: a space followed by
/// another space is kept, as runs of spaces are deliberate.
pub(crate) fn skip_trailing_space(
    list: &TextNodeList,
    id: NodeId,
    length_so_far: f32,
    bound: f32,
) -> bool {
    let node = &list[id];
    if node.kind != NodeKind::Space {
        return false;
    }
    node.next()
        .and_then(|next| list.get(next))
        .is_some_and(|next| {
            next.kind == NodeKind::Word
                && node.modified_length() + next.modified_length() + length_so_far > bound
        })
}

/// Natural length of the line starting at `start`, ignoring tweaks.
pub(crate) fn line_length(list: &TextNodeList, start: NodeId, max_width: f32) -> f32 {
    let mut consumed = false;
    let mut length = 0.0f32;
    let mut cursor = Some(start);

    while let Some(id) = cursor {
        let node = &list[id];
        if node.kind == NodeKind::LineBreak {
            break;
        }
        if consumed && skip_trailing_space(list, id, length, max_width) {
            break;
        }
        if length + node.length <= max_width || !consumed {
            consumed = true;
            length += node.length;
        } else {
            break;
        }
        cursor = node.next();
    }
    length
}

/// Horizontal start of the line at `start`; justifies it when asked.
fn start_line(
    list: &mut TextNodeList,
    start: NodeId,
    max_width: f32,
    alignment: Alignment,
    options: &RenderOptions,
) -> f32 {
    match alignment {
        Alignment::Left => 0.0,
        Alignment::Right if max_width.is_finite() => {
            -(line_length(list, start, max_width) - max_width).ceil()
        }
        // Without a finite bound the line ends at the origin.
        Alignment::Right => -line_length(list, start, max_width).ceil(),
        Alignment::Center => -(0.5 * line_length(list, start, max_width)).ceil(),
        Alignment::Justify => {
            justify_line(list, start, max_width, options);
            0.0
        }
    }
}

/// Place the characters of a word node, spreading its tweak over the
/// gaps between them.
fn render_word<M, S>(
    list: &TextNodeList,
    id: NodeId,
    mut x: f32,
    y: f32,
    measurer: Measurer<'_, M>,
    sink: &mut S,
) where
    M: GlyphMetrics + ?Sized,
    S: GlyphSink + ?Sized,
{
    let node = &list[id];
    if node.kind != NodeKind::Word {
        return;
    }

    let (per_gap, mut leftover) = split_even(node.length_tweak, word_gaps(list, id));
    let next_head = list.next_word_head(id);
    let chars = node.chars();

    for (i, &c) in chars.iter().enumerate() {
        let Some(advance) = measurer.char_advance(chars, i, next_head) else {
            continue;
        };
        sink.glyph(c, x, y);
        x += advance + per_gap as f32 + spread_one(&mut leftover) as f32;
    }
}

// ── Layout driver ───────────────────────────────────────────────────

/// Lay out processed text, feeding glyph positions to `sink`.
///
/// Tweaks from earlier passes are discarded first. Returns the widest
/// line length and the total height.
pub fn layout<M, S>(processed: &mut ProcessedText, measurer: Measurer<'_, M>, sink: &mut S) -> Size
where
    M: GlyphMetrics + ?Sized,
    S: GlyphSink + ?Sized,
{
    let line_spacing = measurer.line_spacing();
    let max_width = processed.max_width;
    let alignment = processed.alignment;
    let list = &mut processed.nodes;

    list.reset_tweaks();

    let mut max_measured = 0.0f32;
    let mut x = 0.0f32;
    let mut y = 0.0f32;
    let mut lines = 1usize;

    if let Some(head) = list.head() {
        x = start_line(list, head, max_width, alignment, measurer.options);
    }

    let mut consumed = false;
    let mut length = 0.0f32;
    let mut cursor = list.head();

    while let Some(id) = cursor {
        let node = &list[id];
        let modified = node.modified_length();
        let mut next_start = node.next();
        let mut new_line = false;

        if node.kind == NodeKind::LineBreak {
            new_line = true;
        } else if consumed && skip_trailing_space(list, id, length, max_width) {
            new_line = true;
        } else if length + modified <= max_width || !consumed {
            consumed = true;
            if S::RENDERS {
                render_word(list, id, x + length, y, measurer, sink);
            }
            length += modified;
            max_measured = max_measured.max(length);
        } else {
            // Overflow: this node opens the next line.
            new_line = true;
            next_start = Some(id);
        }

        if new_line {
            y += line_spacing;
            x = 0.0;
            length = 0.0;
            consumed = false;
            lines += 1;

            if let Some(start) = next_start {
                x = start_line(list, start, max_width, alignment, measurer.options);
            }
        }

        cursor = next_start;
    }

    log::debug!("Laid out {lines} lines, {max_measured} x {}", y + line_spacing);

    Size {
        width: max_measured,
        height: y + line_spacing,
    }
}

// ── Single-line driver ──────────────────────────────────────────────

fn is_break(c: char) -> bool {
    c == '\r' || c == '\n'
}

/// Only U+0020 takes the space width here; other whitespace is treated
/// like any other character and advances only if the font maps it.
fn is_space(c: char) -> bool {
    c == ' '
}

fn unbounded_advance<M: GlyphMetrics + ?Sized>(chars: &[char], index: usize, measurer: Measurer<'_, M>) -> f32 {
    if measurer.is_monospacing_active() {
        measurer.mono_space_width()
    } else if is_space(chars[index]) {
        measurer.space_width()
    } else {
        measurer.char_advance(chars, index, None).unwrap_or(0.0)
    }
}

/// Start offset of the line beginning at `from`.
fn unbounded_line_start<M: GlyphMetrics + ?Sized>(
    chars: &[char],
    from: usize,
    alignment: Alignment,
    measurer: Measurer<'_, M>,
) -> f32 {
    let measure = || -> f32 {
        (from..chars.len())
            .take_while(|&i| !is_break(chars[i]))
            .map(|i| unbounded_advance(chars, i, measurer))
            .sum()
    };
    match alignment {
        Alignment::Right => -measure(),
        Alignment::Center => -(0.5 * measure()).trunc(),
        Alignment::Left | Alignment::Justify => 0.0,
    }
}

/// Lay out text without wrapping; only explicit breaks start new lines.
///
/// Right-aligned lines end at x = 0 and centred lines are centred on
/// it. Justify behaves like Left. Unlike [`layout`], a tab or other
/// non-space whitespace gets no space width: it advances by its glyph,
/// or not at all when the font lacks it.
pub fn layout_line<M, S>(text: &str, alignment: Alignment, measurer: Measurer<'_, M>, sink: &mut S) -> Size
where
    M: GlyphMetrics + ?Sized,
    S: GlyphSink + ?Sized,
{
    let chars: Vec<char> = text.replace("\r\n", "\r").chars().collect();
    let line_spacing = measurer.line_spacing();

    let mut min_x = f32::MAX;
    let mut max_x = f32::MIN;
    let mut x = unbounded_line_start(&chars, 0, alignment, measurer);
    let mut y = 0.0f32;

    for (i, &c) in chars.iter().enumerate() {
        if is_break(c) {
            y += line_spacing;
            x = unbounded_line_start(&chars, i + 1, alignment, measurer);
            continue;
        }

        min_x = min_x.min(x);
        if S::RENDERS && !is_space(c) && measurer.metrics.glyph(c).is_some() {
            sink.glyph(c, x, y);
        }
        x += unbounded_advance(&chars, i, measurer);
        max_x = max_x.max(x);
    }

    let width = if min_x == f32::MAX { 0.0 } else { max_x - min_x };
    Size {
        width,
        height: y + line_spacing,
    }
}

// ===================================================================
// Tests
// ===================================================================
