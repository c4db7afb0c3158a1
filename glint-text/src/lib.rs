//! # glint-text
//!
//! Text layout for pre-rasterized bitmap fonts: word wrap, alignment,
//! full justification, monospacing and kerning, producing positioned
//! glyph quads for a draw sink.
//!
//! ## Architecture
//!
//! ```text
//! &str ──► TextNodeList (Word / Space / LineBreak arena)
//!              │  measure (Measurer: GlyphMetrics + RenderOptions)
//!              │  crumble words wider than the bound
//!              ▼
//!         ProcessedText ──► layout() ── per line ──► justify_line()
//!                              │
//!                              ▼
//!                 GlyphSink ── QuadEmitter ──► DrawSink (begin / quad / end)
//! ```
//!
//! - **`node`**: text nodes and the node list arena, tokenizing and crumbling.
//! - **`metrics`**: the glyph metrics seam and in-memory `FontData`.
//! - **`measure`**: advances shared by measuring and drawing.
//! - **`justify`**: the per-line justification solver.
//! - **`layout`**: the line layout / measure driver.
//! - **`options`**: render options and the options stack.
//! - **`draw`**: the draw-sink seam.
//! - **`font`**: `Font`, the entry point tying them together.

pub mod draw;
pub mod error;
pub mod font;
pub mod justify;
pub mod layout;
pub mod measure;
pub mod metrics;
pub mod node;
pub mod options;

// Re-exports for ergonomic use.
pub use draw::{DrawSink, Quad};
pub use error::TextError;
pub use font::{lock_to_pixel, Font};
pub use layout::{Alignment, GlyphSink, MeasureOnly, PlacedGlyph, ProcessedText, Size};
pub use measure::Measurer;
pub use metrics::{FontData, FontDataBuilder, Glyph, GlyphMetrics, GlyphRect, Texture, TextureHandle};
pub use node::{NodeId, NodeKind, TextNode, TextNodeList};
pub use options::{Monospacing, OptionsStack, RenderOptions};
