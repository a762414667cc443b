//! Packed geometric primitives shared by layout, hit-testing and rendering.

/// A two-dimensional size in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// A two-dimensional point.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle stored as four packed `f32` components.
///
/// The component order is fixed (`x`, `y`, `width`, `height`) so a rect can
/// be handed to the GPU as a `[f32; 4]` without conversion. `right` and
/// `bottom` are always derived from the current components, never stored.
///
/// Width and height are expected to be non-negative. Negative extents are
/// not rejected; they simply invert the containment test.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_size(size: Size) -> Self {
        Self::new(0.0, 0.0, size.width, size.height)
    }

    /// Build a rect from its packed component array.
    pub fn from_array(data: [f32; 4]) -> Self {
        bytemuck::cast(data)
    }

    /// The packed component array, in `x, y, width, height` order.
    pub fn as_array(&self) -> &[f32; 4] {
        bytemuck::cast_ref(self)
    }

    pub fn as_array_mut(&mut self) -> &mut [f32; 4] {
        bytemuck::cast_mut(self)
    }

    /// Synonym for `x`.
    pub fn left(&self) -> f32 {
        self.x
    }

    /// Synonym for `y`.
    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn offset(&self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    /// Snap every component to the nearest whole pixel.
    pub fn round(&self) -> Self {
        Self::new(
            self.x.round(),
            self.y.round(),
            self.width.round(),
            self.height.round(),
        )
    }

    /// Whether the point lies inside the rect. Both edges are inclusive.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.left() && x <= self.right() && y >= self.top() && y <= self.bottom()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_default_is_zeroed() {
        let rect = Rect::default();
        assert_eq!(rect.as_array(), &[0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_rect_packed_order() {
        let rect = Rect::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(rect.as_array(), &[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(Rect::from_array([1.0, 2.0, 3.0, 4.0]), rect);
        assert_eq!(std::mem::size_of::<Rect>(), 16);
    }

    #[test]
    fn test_rect_packed_write_updates_fields() {
        let mut rect = Rect::default();
        rect.as_array_mut()[2] = 40.0;
        rect.as_array_mut()[3] = 25.0;
        assert_eq!(rect.width, 40.0);
        assert_eq!(rect.height, 25.0);
    }

    #[test]
    fn test_rect_edges_track_mutation() {
        let mut rect = Rect::new(10.0, 20.0, 100.0, 50.0);
        assert_eq!(rect.left(), 10.0);
        assert_eq!(rect.top(), 20.0);
        assert_eq!(rect.right(), 110.0);
        assert_eq!(rect.bottom(), 70.0);

        rect.x = -5.0;
        rect.width = 15.0;
        rect.y = 3.0;
        rect.height = 0.5;
        assert_eq!(rect.left(), -5.0);
        assert_eq!(rect.right(), 10.0);
        assert_eq!(rect.top(), 3.0);
        assert_eq!(rect.bottom(), 3.5);
    }

    #[test]
    fn test_rect_contains_is_inclusive() {
        let rect = Rect::new(10.0, 10.0, 100.0, 50.0);

        // Corners and edges
        assert!(rect.contains(10.0, 10.0));
        assert!(rect.contains(110.0, 60.0));
        assert!(rect.contains(110.0, 10.0));
        assert!(rect.contains(10.0, 60.0));
        assert!(rect.contains(50.0, 10.0));

        // Interior
        assert!(rect.contains(50.0, 30.0));

        // Just outside
        assert!(!rect.contains(9.999, 30.0));
        assert!(!rect.contains(110.001, 30.0));
        assert!(!rect.contains(50.0, 9.999));
        assert!(!rect.contains(50.0, 60.001));
    }

    #[test]
    fn test_rect_negative_extent_contains_nothing_inside() {
        let rect = Rect::new(10.0, 10.0, -5.0, -5.0);
        assert!(!rect.contains(7.0, 7.0));
        assert!(!rect.contains(12.0, 12.0));
    }

    #[test]
    fn test_rect_zero_size_contains_its_origin() {
        let rect = Rect::new(4.0, 4.0, 0.0, 0.0);
        assert!(rect.contains(4.0, 4.0));
        assert!(!rect.contains(4.0, 4.1));
    }

    #[test]
    fn test_rect_offset_and_round() {
        let rect = Rect::new(1.4, 2.6, 10.5, 3.49).offset(1.0, -1.0);
        assert_eq!(rect, Rect::new(2.4, 1.6, 10.5, 3.49));
        assert_eq!(rect.round(), Rect::new(2.0, 2.0, 11.0, 3.0));
    }
}
