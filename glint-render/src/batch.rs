//! `QuadBatch`: a draw sink that groups glyph instances by texture.
//!
//! ```text
//! begin(offset) ─► draw_quad(q) ─► ... ─► end()
//!                      │
//!                      ▼
//!   GlyphBatch { texture, instances: Vec<GlyphInstance> }   one per atlas page
//! ```
//!
//! Batches keep the order in which their textures were first used, so a
//! renderer can issue one instanced draw per batch. Nested `begin`
//! brackets translate relative to the enclosing one.

use glint_text::{DrawSink, Quad, TextureHandle};
use thiserror::Error;

use crate::vertex::GlyphInstance;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum BatchError {
    #[error("Cannot finish the batch: {depth} begin bracket(s) still open")]
    UnclosedBegin { depth: usize },
}

/// Instances sharing one atlas texture.
#[derive(Clone, Debug, PartialEq)]
pub struct GlyphBatch {
    pub texture: TextureHandle,
    pub instances: Vec<GlyphInstance>,
}

#[derive(Debug, Default)]
pub struct QuadBatch {
    batches: Vec<GlyphBatch>,
    /// Accumulated offset of each open `begin`.
    offsets: Vec<[f32; 2]>,
}

impl QuadBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn batches(&self) -> &[GlyphBatch] {
        &self.batches
    }

    /// Total instances across all batches.
    pub fn instance_count(&self) -> usize {
        self.batches.iter().map(|b| b.instances.len()).sum()
    }

    pub fn is_recording(&self) -> bool {
        !self.offsets.is_empty()
    }

    /// Take the recorded batches, leaving the batch empty.
    pub fn finish(&mut self) -> Result<Vec<GlyphBatch>, BatchError> {
        if self.is_recording() {
            return Err(BatchError::UnclosedBegin {
                depth: self.offsets.len(),
            });
        }
        log::debug!(
            "Quad batch finished: {} instances in {} batches",
            self.instance_count(),
            self.batches.len(),
        );
        Ok(std::mem::take(&mut self.batches))
    }

    pub fn clear(&mut self) {
        self.batches.clear();
        self.offsets.clear();
    }

    fn current_offset(&self) -> [f32; 2] {
        self.offsets.last().copied().unwrap_or([0.0, 0.0])
    }

    fn batch_for(&mut self, texture: TextureHandle) -> &mut Vec<GlyphInstance> {
        let index = match self.batches.iter().position(|b| b.texture == texture) {
            Some(index) => index,
            None => {
                self.batches.push(GlyphBatch {
                    texture,
                    instances: Vec::new(),
                });
                self.batches.len() - 1
            }
        };
        &mut self.batches[index].instances
    }
}

impl DrawSink for QuadBatch {
    fn begin(&mut self, offset: [f32; 2]) {
        if self.is_recording() {
            log::warn!("Nested begin at depth {}", self.offsets.len());
        }
        let base = self.current_offset();
        self.offsets.push([base[0] + offset[0], base[1] + offset[1]]);
    }

    fn draw_quad(&mut self, quad: &Quad) {
        if !self.is_recording() {
            log::warn!("Quad drawn outside a begin/end bracket");
        }
        let instance = GlyphInstance::from_quad(quad, self.current_offset());
        self.batch_for(quad.texture).push(instance);
    }

    fn end(&mut self) {
        if self.offsets.pop().is_none() {
            log::warn!("end() without a matching begin()");
        }
    }
}

// ===================================================================
// Tests
// ===================================================================
