//! The draw-sink seam between layout and whatever renders the quads.

use crate::metrics::TextureHandle;

/// One textured glyph rectangle in the sink's coordinate space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quad {
    /// Top-left corner.
    pub min: [f32; 2],
    /// Bottom-right corner.
    pub max: [f32; 2],
    pub uv_min: [f32; 2],
    pub uv_max: [f32; 2],
    pub color: [f32; 4],
    pub texture: TextureHandle,
}

impl Quad {
    /// Corners in drawing order: top-left, bottom-left, bottom-right,
    /// top-right.
    pub fn corners(&self) -> [[f32; 2]; 4] {
        [
            self.min,
            [self.min[0], self.max[1]],
            self.max,
            [self.max[0], self.min[1]],
        ]
    }

    pub fn size(&self) -> [f32; 2] {
        [self.max[0] - self.min[0], self.max[1] - self.min[1]]
    }
}

/// Receives quads from a print call.
///
/// Every print brackets its quads in `begin(offset)` / `end()`; quad
/// coordinates are relative to `offset`.
pub trait DrawSink {
    fn begin(&mut self, offset: [f32; 2]);

    fn draw_quad(&mut self, quad: &Quad);

    fn end(&mut self);
}

impl<D: DrawSink + ?Sized> DrawSink for &mut D {
    fn begin(&mut self, offset: [f32; 2]) {
        (**self).begin(offset);
    }

    fn draw_quad(&mut self, quad: &Quad) {
        (**self).draw_quad(quad);
    }

    fn end(&mut self) {
        (**self).end();
    }
}
