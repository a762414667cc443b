//! Pooled draw command records.

use std::rc::Weak;

use super::material::Material;

/// Topology of the vertices referenced by a draw command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveType {
    Points,
    Lines,
    LineStrip,
    Triangles,
    TriangleStrip,
}

impl PrimitiveType {
    /// Number of vertices consumed by `primitive_count` primitives, clamped
    /// to `u32::MAX`.
    pub fn vertex_count(self, primitive_count: u32) -> u32 {
        if primitive_count == 0 {
            return 0;
        }
        match self {
            PrimitiveType::Points => primitive_count,
            PrimitiveType::Lines => primitive_count.saturating_mul(2),
            PrimitiveType::LineStrip => primitive_count.saturating_add(1),
            PrimitiveType::Triangles => primitive_count.saturating_mul(3),
            PrimitiveType::TriangleStrip => primitive_count.saturating_add(2),
        }
    }

    /// Number of whole primitives formed by `vertex_count` vertices.
    pub fn primitive_count(self, vertex_count: usize) -> u32 {
        let count = match self {
            PrimitiveType::Points => vertex_count,
            PrimitiveType::Lines => vertex_count / 2,
            PrimitiveType::LineStrip => vertex_count.saturating_sub(1),
            PrimitiveType::Triangles => vertex_count / 3,
            PrimitiveType::TriangleStrip => vertex_count.saturating_sub(2),
        };
        count as u32
    }
}

/// One primitive-range submission in the canvas' command pool.
///
/// Records are allocated once with the pool and overwritten in place each
/// frame. The material is borrowed, not owned: it belongs to whoever queued
/// the command and must outlive the frame's `execute`.
#[derive(Clone)]
pub struct DrawCommand {
    pub primitive_type: PrimitiveType,
    /// First vertex, counted in the command's vertex stride.
    pub start: u32,
    pub primitive_count: u32,
    pub material: Option<Weak<dyn Material>>,
}

impl DrawCommand {
    pub(crate) fn empty() -> Self {
        Self {
            primitive_type: PrimitiveType::Triangles,
            start: 0,
            primitive_count: 0,
            material: None,
        }
    }
}

impl std::fmt::Debug for DrawCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DrawCommand")
            .field("primitive_type", &self.primitive_type)
            .field("start", &self.start)
            .field("primitive_count", &self.primitive_count)
            .field("has_material", &self.material.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_counts() {
        assert_eq!(PrimitiveType::Points.vertex_count(4), 4);
        assert_eq!(PrimitiveType::Lines.vertex_count(4), 8);
        assert_eq!(PrimitiveType::LineStrip.vertex_count(4), 5);
        assert_eq!(PrimitiveType::Triangles.vertex_count(2), 6);
        assert_eq!(PrimitiveType::TriangleStrip.vertex_count(2), 4);
        assert_eq!(PrimitiveType::TriangleStrip.vertex_count(0), 0);
    }

    #[test]
    fn test_vertex_counts_saturate() {
        assert_eq!(PrimitiveType::Triangles.vertex_count(u32::MAX), u32::MAX);
        assert_eq!(PrimitiveType::Lines.vertex_count(u32::MAX / 2 + 1), u32::MAX);
        assert_eq!(PrimitiveType::LineStrip.vertex_count(u32::MAX), u32::MAX);
        assert_eq!(PrimitiveType::TriangleStrip.vertex_count(u32::MAX - 1), u32::MAX);
        assert_eq!(PrimitiveType::Points.vertex_count(u32::MAX), u32::MAX);
    }

    #[test]
    fn test_primitive_counts_drop_partial_primitives() {
        assert_eq!(PrimitiveType::Triangles.primitive_count(7), 2);
        assert_eq!(PrimitiveType::Lines.primitive_count(3), 1);
        assert_eq!(PrimitiveType::TriangleStrip.primitive_count(1), 0);
        assert_eq!(PrimitiveType::LineStrip.primitive_count(0), 0);
    }
}
