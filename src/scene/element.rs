use std::fmt;

use crate::layout::{anchor_position, scale_factors, Alignment, Anchor, Container, MajorAxis};
use crate::rect::{Point, Rect, Size};

use super::decoration::Decoration;

/// A rectangular node of the scene graph.
///
/// The public fields describe the element as authored: a design-time
/// position and size, the axis its size follows, and how it is anchored to
/// its container. The resolved [`Rect`] is recomputed from them by every
/// layout pass and is relative to the parent element (or the layer for
/// top-level elements). Its size is always the configured size; the display
/// scale chosen by the major axis is kept alongside as [`UIElement::scale`].
///
/// Children are not drawn clipped to their parent; content that spills out
/// of its container stays visible.
pub struct UIElement {
    rect: Rect,
    scale: Size,
    pub alpha: f32,
    pub hidden: bool,
    /// Normalized pivot point, `(0.5, 0.5)` is the center.
    pub pivot: Point,
    pub position: Point,
    pub size: Size,
    pub major_axis: MajorAxis,
    pub horizontal_anchor: Anchor,
    pub vertical_anchor: Anchor,
    /// Alignment used by the content decoration.
    pub alignment: Alignment,
    pub background: Option<Box<dyn Decoration>>,
    pub content: Option<Box<dyn Decoration>>,
    pub foreground: Option<Box<dyn Decoration>>,
}

impl UIElement {
    pub fn new() -> Self {
        Self {
            rect: Rect::default(),
            scale: Size::new(1.0, 1.0),
            alpha: 1.0,
            hidden: false,
            pivot: Point::new(0.5, 0.5),
            position: Point::new(0.0, 0.0),
            size: Size::new(1.0, 1.0),
            major_axis: MajorAxis::Both,
            horizontal_anchor: Anchor::None,
            vertical_anchor: Anchor::None,
            alignment: Alignment::Left,
            background: None,
            content: None,
            foreground: None,
        }
    }

    pub fn with_position(mut self, x: f32, y: f32) -> Self {
        self.position = Point::new(x, y);
        self
    }

    pub fn with_size(mut self, width: f32, height: f32, major_axis: MajorAxis) -> Self {
        self.size = Size::new(width, height);
        self.major_axis = major_axis;
        self
    }

    pub fn with_anchors(mut self, horizontal: Anchor, vertical: Anchor) -> Self {
        self.horizontal_anchor = horizontal;
        self.vertical_anchor = vertical;
        self
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    pub fn with_pivot(mut self, x: f32, y: f32) -> Self {
        self.pivot = Point::new(x, y);
        self
    }

    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn with_background(mut self, decoration: impl Decoration + 'static) -> Self {
        self.background = Some(Box::new(decoration));
        self
    }

    pub fn with_content(mut self, decoration: impl Decoration + 'static) -> Self {
        self.content = Some(Box::new(decoration));
        self
    }

    pub fn with_foreground(mut self, decoration: impl Decoration + 'static) -> Self {
        self.foreground = Some(Box::new(decoration));
        self
    }

    /// Geometry resolved by the last layout pass, relative to the parent.
    pub fn rect(&self) -> &Rect {
        &self.rect
    }

    pub fn x(&self) -> f32 {
        self.rect.x
    }

    pub fn y(&self) -> f32 {
        self.rect.y
    }

    pub fn width(&self) -> f32 {
        self.rect.width
    }

    pub fn height(&self) -> f32 {
        self.rect.height
    }

    /// Width and height display scale picked by the major axis during the
    /// last layout pass. `(1, 1)` for `MajorAxis::None`.
    pub fn scale(&self) -> Size {
        self.scale
    }

    /// Resolve this element's rect inside `container` for a display of
    /// `display` size.
    pub(crate) fn resolve_layout(
        &mut self,
        container: &Container,
        display: Size,
        pixel_adjust: bool,
    ) {
        let (width_scale, height_scale) =
            scale_factors(self.major_axis, container.reference, display);
        self.scale = Size::new(width_scale, height_scale);

        let x = anchor_position(
            self.horizontal_anchor,
            self.position.x,
            container.design.width,
            container.resolved.width,
        );
        let y = anchor_position(
            self.vertical_anchor,
            self.position.y,
            container.design.height,
            container.resolved.height,
        );

        let rect = Rect::new(x, y, self.size.width, self.size.height);
        self.rect = if pixel_adjust { rect.round() } else { rect };
    }

    /// The container this element presents to its children.
    pub(crate) fn child_container(&self, reference: Size) -> Container {
        Container {
            reference,
            design: self.size,
            resolved: self.rect.size(),
        }
    }
}

impl Default for UIElement {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for UIElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UIElement")
            .field("rect", &self.rect)
            .field("scale", &self.scale)
            .field("alpha", &self.alpha)
            .field("hidden", &self.hidden)
            .field("position", &self.position)
            .field("size", &self.size)
            .field("major_axis", &self.major_axis)
            .field("horizontal_anchor", &self.horizontal_anchor)
            .field("vertical_anchor", &self.vertical_anchor)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    fn layer_container(display: Size) -> Container {
        Container {
            reference: Size::new(640.0, 480.0),
            design: Size::new(640.0, 480.0),
            resolved: display,
        }
    }

    #[test]
    fn test_element_defaults() {
        let element = UIElement::new();
        assert_eq!(element.alpha, 1.0);
        assert!(!element.hidden);
        assert_eq!(element.pivot, Point::new(0.5, 0.5));
        assert_eq!(element.size, Size::new(1.0, 1.0));
        assert_eq!(element.major_axis, MajorAxis::Both);
        assert_eq!(element.horizontal_anchor, Anchor::None);
        assert_eq!(element.rect(), &Rect::default());
        assert_eq!(element.scale(), Size::new(1.0, 1.0));
    }

    #[test]
    fn test_resolve_none_copies_configuration() {
        let display = Size::new(1280.0, 720.0);
        let mut element = UIElement::new()
            .with_position(10.0, 10.0)
            .with_size(100.0, 50.0, MajorAxis::None);

        element.resolve_layout(&layer_container(display), display, false);

        assert_eq!(element.rect(), &Rect::new(10.0, 10.0, 100.0, 50.0));
        assert_eq!(element.scale(), Size::new(1.0, 1.0));
    }

    #[test]
    fn test_resolve_keeps_configured_size_for_every_axis() {
        let display = Size::new(1280.0, 960.0);
        for axis in [
            MajorAxis::None,
            MajorAxis::Horizontal,
            MajorAxis::Vertical,
            MajorAxis::Both,
        ] {
            let mut element = UIElement::new()
                .with_position(10.0, 10.0)
                .with_size(100.0, 50.0, axis);

            element.resolve_layout(&layer_container(display), display, false);

            assert_eq!(
                element.rect(),
                &Rect::new(10.0, 10.0, 100.0, 50.0),
                "{axis}"
            );
        }
    }

    #[test]
    fn test_resolve_both_at_design_size_keeps_size() {
        let display = Size::new(640.0, 480.0);
        let mut element = UIElement::new()
            .with_position(10.0, 10.0)
            .with_size(100.0, 50.0, MajorAxis::Both);

        element.resolve_layout(&layer_container(display), display, false);

        assert_eq!(element.rect(), &Rect::new(10.0, 10.0, 100.0, 50.0));
    }

    #[test]
    fn test_resolve_records_axis_scale() {
        let display = Size::new(1920.0, 240.0);
        let mut vertical = UIElement::new().with_size(100.0, 50.0, MajorAxis::Vertical);
        let mut both = UIElement::new().with_size(100.0, 50.0, MajorAxis::Both);

        vertical.resolve_layout(&layer_container(display), display, false);
        both.resolve_layout(&layer_container(display), display, false);

        assert!(approx_eq(vertical.scale().width, 2.0));
        assert!(approx_eq(vertical.scale().height, 2.0));
        assert!(approx_eq(both.scale().width, 0.25));
        assert!(approx_eq(both.scale().height, 2.0));
    }

    #[test]
    fn test_resolve_is_not_cumulative() {
        let display = Size::new(960.0, 960.0);
        let mut element = UIElement::new().with_size(100.0, 100.0, MajorAxis::Horizontal);

        element.resolve_layout(&layer_container(display), display, false);
        element.resolve_layout(&layer_container(display), display, false);

        assert_eq!(element.width(), 100.0);
        assert!(approx_eq(element.scale().width, 0.5));
    }

    #[test]
    fn test_resolve_far_anchor_follows_display_edge() {
        let display = Size::new(800.0, 600.0);
        let mut element = UIElement::new()
            .with_position(600.0, 440.0)
            .with_size(40.0, 40.0, MajorAxis::None)
            .with_anchors(Anchor::Far, Anchor::Far);

        element.resolve_layout(&layer_container(display), display, false);

        assert!(approx_eq(element.x(), 760.0));
        assert!(approx_eq(element.y(), 560.0));
    }

    #[test]
    fn test_resolve_pixel_adjust_rounds() {
        let display = Size::new(1000.0, 960.0);
        let mut element = UIElement::new()
            .with_position(10.4, 10.6)
            .with_size(50.5, 25.5, MajorAxis::Vertical);

        element.resolve_layout(&layer_container(display), display, true);

        // 50.5 and 25.5 round away from zero
        assert_eq!(element.rect(), &Rect::new(10.0, 11.0, 51.0, 26.0));
    }

    #[test]
    fn test_child_container_uses_configured_and_resolved_size() {
        let display = Size::new(1000.0, 960.0);
        let mut element = UIElement::new().with_size(200.0, 100.0, MajorAxis::Vertical);
        element.resolve_layout(&layer_container(display), display, false);

        let container = element.child_container(Size::new(640.0, 480.0));
        assert_eq!(container.design, Size::new(200.0, 100.0));
        assert_eq!(container.resolved, Size::new(200.0, 100.0));
        assert_eq!(container.reference, Size::new(640.0, 480.0));
    }
}
