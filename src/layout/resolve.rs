use super::{Anchor, MajorAxis};
use crate::rect::Size;

/// The space an element is laid out in.
///
/// `design` is the extent the element was authored against and `resolved` is
/// the extent it actually occupies this frame. For top-level elements these
/// are the layer's layout size and the display size; for nested elements they
/// are the parent's configured and resolved sizes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Container {
    pub reference: Size,
    pub design: Size,
    pub resolved: Size,
}

/// Width and height multipliers for an element's configured size.
///
/// Both single-axis policies use the reference *height* as numerator, so a
/// `Horizontal` element scales by `reference.height / display.width`.
pub(crate) fn scale_factors(axis: MajorAxis, reference: Size, display: Size) -> (f32, f32) {
    match axis {
        MajorAxis::None => (1.0, 1.0),
        MajorAxis::Vertical => {
            let height_scale = reference.height / display.height;
            (height_scale, height_scale)
        }
        MajorAxis::Horizontal => {
            let width_scale = reference.height / display.width;
            (width_scale, width_scale)
        }
        MajorAxis::Both => {
            let width_scale = reference.height / display.width;
            let height_scale = reference.height / display.height;
            (width_scale, height_scale)
        }
    }
}

/// Resolve a configured position along one axis.
pub(crate) fn anchor_position(anchor: Anchor, position: f32, design: f32, resolved: f32) -> f32 {
    match anchor {
        Anchor::None | Anchor::Near => position,
        Anchor::Middle => resolved * 0.5 + (position - design * 0.5),
        Anchor::Far => resolved - (design - position),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    const REFERENCE: Size = Size::new(640.0, 480.0);

    #[test]
    fn test_scale_none_is_identity() {
        let display = Size::new(1920.0, 1080.0);
        assert_eq!(scale_factors(MajorAxis::None, REFERENCE, display), (1.0, 1.0));
    }

    #[test]
    fn test_scale_vertical_uses_display_height() {
        let display = Size::new(1000.0, 960.0);
        let (sx, sy) = scale_factors(MajorAxis::Vertical, REFERENCE, display);
        assert!(approx_eq(sx, 0.5));
        assert!(approx_eq(sy, 0.5));
    }

    #[test]
    fn test_scale_horizontal_divides_reference_height_by_display_width() {
        // 480 / 960, not 640 / 960
        let display = Size::new(960.0, 100.0);
        let (sx, sy) = scale_factors(MajorAxis::Horizontal, REFERENCE, display);
        assert!(approx_eq(sx, 0.5));
        assert!(approx_eq(sy, 0.5));
    }

    #[test]
    fn test_scale_horizontal_at_design_size_is_not_one() {
        let (sx, _) = scale_factors(MajorAxis::Horizontal, REFERENCE, REFERENCE);
        assert!(approx_eq(sx, 0.75));
    }

    #[test]
    fn test_scale_both_is_per_axis() {
        let display = Size::new(1920.0, 240.0);
        let (sx, sy) = scale_factors(MajorAxis::Both, REFERENCE, display);
        assert!(approx_eq(sx, 0.25));
        assert!(approx_eq(sy, 2.0));
    }

    #[test]
    fn test_anchor_near_and_none_keep_position() {
        assert_eq!(anchor_position(Anchor::None, 10.0, 640.0, 800.0), 10.0);
        assert_eq!(anchor_position(Anchor::Near, 10.0, 640.0, 800.0), 10.0);
    }

    #[test]
    fn test_anchor_far_keeps_distance_to_far_edge() {
        // 40px from the right edge of a 640px design stays 40px from 800
        assert!(approx_eq(anchor_position(Anchor::Far, 600.0, 640.0, 800.0), 760.0));
    }

    #[test]
    fn test_anchor_middle_keeps_distance_to_center() {
        // 20px left of center
        assert!(approx_eq(
            anchor_position(Anchor::Middle, 300.0, 640.0, 800.0),
            380.0
        ));
    }

    #[test]
    fn test_anchor_unchanged_container_is_identity() {
        for anchor in [Anchor::None, Anchor::Near, Anchor::Middle, Anchor::Far] {
            assert!(approx_eq(anchor_position(anchor, 123.0, 640.0, 640.0), 123.0));
        }
    }
}
