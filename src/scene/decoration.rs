//! Per-element render contributions.

use std::rc::Rc;

use crate::color::Color;
use crate::error::CanvasError;
use crate::rect::Rect;
use crate::renderer::{Canvas, Material};

/// Something an element draws for itself: a background, its content, or a
/// foreground drawn over its children.
pub trait Decoration {
    /// `bounds` is the element's resolved rect in layer space and `alpha`
    /// its effective alpha (its own alpha times every ancestor's).
    fn on_render(&self, canvas: &mut Canvas, bounds: &Rect, alpha: f32) -> Result<(), CanvasError>;
}

/// Fills the element's bounds with a single color.
pub struct SolidFill {
    color: Color,
    material: Rc<dyn Material>,
}

impl SolidFill {
    pub fn new(color: Color, material: Rc<dyn Material>) -> Self {
        Self { color, material }
    }

    pub fn color(&self) -> Color {
        self.color
    }
}

impl Decoration for SolidFill {
    fn on_render(&self, canvas: &mut Canvas, bounds: &Rect, alpha: f32) -> Result<(), CanvasError> {
        canvas.draw_rect(
            bounds,
            self.color.with_alpha_multiplied(alpha),
            &self.material,
        )
    }
}
