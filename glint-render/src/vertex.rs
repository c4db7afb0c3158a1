//! GPU instance data for glyph quads.
//!
//! `GlyphInstance` derives `bytemuck::Pod` + `Zeroable` for zero-copy
//! upload; it is drawn as an instance of a unit quad.

use bytemuck::{Pod, Zeroable};
use glint_text::Quad;
use wgpu::{BufferAddress, VertexAttribute, VertexBufferLayout, VertexFormat, VertexStepMode};

/// Per-instance data for one glyph quad.
///
/// 48 bytes per instance.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct GlyphInstance {
    /// Top-left corner in pixels, after the `begin` translation.
    pub position: [f32; 2],
    /// Width and height in pixels.
    pub size: [f32; 2],
    /// Atlas UV top-left.
    pub uv_min: [f32; 2],
    /// Atlas UV bottom-right.
    pub uv_max: [f32; 2],
    /// RGBA color, each channel in [0.0, 1.0].
    pub color: [f32; 4],
}

impl GlyphInstance {
    /// Instance for `quad`, translated by `offset`.
    pub fn from_quad(quad: &Quad, offset: [f32; 2]) -> Self {
        Self {
            position: [quad.min[0] + offset[0], quad.min[1] + offset[1]],
            size: quad.size(),
            uv_min: quad.uv_min,
            uv_max: quad.uv_max,
            color: quad.color,
        }
    }

    pub fn layout() -> VertexBufferLayout<'static> {
        static ATTRS: &[VertexAttribute] = &[
            // location(1) = position
            VertexAttribute {
                offset: 0,
                shader_location: 1,
                format: VertexFormat::Float32x2,
            },
            // location(2) = size
            VertexAttribute {
                offset: 8,
                shader_location: 2,
                format: VertexFormat::Float32x2,
            },
            // location(3) = uv_min
            VertexAttribute {
                offset: 16,
                shader_location: 3,
                format: VertexFormat::Float32x2,
            },
            // location(4) = uv_max
            VertexAttribute {
                offset: 24,
                shader_location: 4,
                format: VertexFormat::Float32x2,
            },
            // location(5) = color
            VertexAttribute {
                offset: 32,
                shader_location: 5,
                format: VertexFormat::Float32x4,
            },
        ];
        VertexBufferLayout {
            array_stride: std::mem::size_of::<GlyphInstance>() as BufferAddress,
            step_mode: VertexStepMode::Instance,
            attributes: ATTRS,
        }
    }
}

// ===================================================================
// Tests
// ===================================================================
