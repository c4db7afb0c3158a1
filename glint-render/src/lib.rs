//! # glint-render
//!
//! GPU-ready output for `glint-text`: a draw sink that turns glyph
//! quads into per-texture batches of `wgpu` instance data.
//!
//! ## Architecture
//!
//! ```text
//!  Font::print(..., &mut QuadBatch)
//!       │  begin(offset) / draw_quad / end
//!       ▼
//!  QuadBatch ──► Vec<GlyphBatch { texture, Vec<GlyphInstance> }>
//!       │
//!       ▼
//!  queue.write_buffer(bytemuck::cast_slice(&instances))
//! ```
//!
//! ## Crate modules
//!
//! - [`vertex`]: `GlyphInstance` and its vertex buffer layout
//! - [`batch`]: `QuadBatch`, the draw sink

pub mod batch;
pub mod vertex;

// Re-exports for convenience
pub use batch::{BatchError, GlyphBatch, QuadBatch};
pub use vertex::GlyphInstance;
