//! Vertex formats written into the canvas staging buffer.

use crate::color::Color;
use crate::rect::Rect;

/// A vertex with a position in logical pixels and a straight RGBA color.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ColorVertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl ColorVertex {
    pub fn new(x: f32, y: f32, color: Color) -> Self {
        Self {
            position: [x, y],
            color: color.to_array(),
        }
    }

    /// Two triangles covering `rect`.
    pub fn quad(rect: &Rect, color: Color) -> [ColorVertex; 6] {
        let top_left = Self::new(rect.left(), rect.top(), color);
        let top_right = Self::new(rect.right(), rect.top(), color);
        let bottom_left = Self::new(rect.left(), rect.bottom(), color);
        let bottom_right = Self::new(rect.right(), rect.bottom(), color);
        [
            top_left,
            top_right,
            bottom_left,
            top_right,
            bottom_right,
            bottom_left,
        ]
    }

    /// Vertex buffer layout matching the color shader.
    #[cfg(feature = "wgpu")]
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 2] = [
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x2,
            },
            wgpu::VertexAttribute {
                offset: 8,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x4,
            },
        ];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<ColorVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }
}
