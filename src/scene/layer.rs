//! Root container of a scene graph.
//!
//! A [`Layer`] owns every element below it in an [`ElementTree`] and drives
//! the three per-frame walks:
//!
//! 1. [`Layer::refresh_layout`] resolves each element's rect for the current
//!    display size
//! 2. [`Layer::on_render`] queues every visible element's decorations on a
//!    [`Canvas`], multiplying alpha down the tree
//! 3. [`Layer::find_element`] answers pointer queries against the resolved
//!    geometry
//!
//! Any mutation made through the layer marks it as needing layout, and the
//! render and hit-test walks refuse to run on stale geometry.

use bitflags::bitflags;

use crate::error::{Error, SceneError};
use crate::layout::{Container, LayoutContext};
use crate::rect::{Point, Size};
use crate::renderer::Canvas;
use crate::tree::{ElementId, ElementTree};

use super::element::UIElement;

/// Default design size a layer is authored against.
pub const DEFAULT_LAYOUT_SIZE: Size = Size::new(640.0, 480.0);

bitflags! {
    /// Pending work on a layer.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
    pub struct ChangeFlags: u8 {
        const NEEDS_LAYOUT = 1 << 0;
    }
}

pub struct Layer {
    /// Multiplier applied to the alpha of every element in the layer.
    pub alpha: f32,
    pub hidden: bool,
    pixel_adjust: bool,
    layout_size: Size,
    tree: ElementTree,
    children: Vec<ElementId>,
    flags: ChangeFlags,
}

impl Layer {
    pub fn new() -> Self {
        Self {
            alpha: 1.0,
            hidden: false,
            pixel_adjust: true,
            layout_size: DEFAULT_LAYOUT_SIZE,
            tree: ElementTree::new(),
            children: Vec::new(),
            flags: ChangeFlags::NEEDS_LAYOUT,
        }
    }

    pub fn with_layout_size(mut self, width: f32, height: f32) -> Self {
        self.set_layout_size(Size::new(width, height));
        self
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_pixel_adjust(mut self, pixel_adjust: bool) -> Self {
        self.set_pixel_adjust(pixel_adjust);
        self
    }

    /// Whether resolved geometry is rounded to whole pixels.
    pub fn pixel_adjust(&self) -> bool {
        self.pixel_adjust
    }

    pub fn set_pixel_adjust(&mut self, pixel_adjust: bool) {
        if self.pixel_adjust != pixel_adjust {
            self.pixel_adjust = pixel_adjust;
            self.mark_dirty();
        }
    }

    pub fn layout_size(&self) -> Size {
        self.layout_size
    }

    pub fn set_layout_size(&mut self, size: Size) {
        if self.layout_size != size {
            self.layout_size = size;
            self.mark_dirty();
        }
    }

    /// Append a top-level element. Later children paint over earlier ones.
    pub fn add_child(&mut self, element: UIElement) -> ElementId {
        let id = self.tree.insert(element);
        self.children.push(id);
        self.mark_dirty();
        id
    }

    /// Append `element` as the last child of `parent`.
    pub fn add_element_child(
        &mut self,
        parent: ElementId,
        element: UIElement,
    ) -> Result<ElementId, SceneError> {
        if !self.tree.contains(parent) {
            return Err(SceneError::UnknownElement(parent));
        }
        let id = self.tree.insert(element);
        if !self.tree.attach(id, parent) {
            self.tree.remove(id);
            return Err(SceneError::UnknownElement(parent));
        }
        self.mark_dirty();
        Ok(id)
    }

    /// Remove an element and its subtree. Returns the number of elements
    /// removed.
    pub fn remove(&mut self, id: ElementId) -> Result<usize, SceneError> {
        if !self.tree.contains(id) {
            return Err(SceneError::UnknownElement(id));
        }
        self.children.retain(|&child| child != id);
        let removed = self.tree.remove(id);
        self.mark_dirty();
        log::debug!("Removed {} element(s) from layer", removed);
        Ok(removed)
    }

    /// Remove every element. Ids handed out before are no longer valid.
    pub fn clear(&mut self) {
        let removed = self.tree.len();
        self.tree.clear();
        self.children.clear();
        self.mark_dirty();
        log::debug!("Cleared {} element(s) from layer", removed);
    }

    pub fn element(&self, id: ElementId) -> Option<&UIElement> {
        self.tree.get(id)
    }

    /// Mutable access to an element; the layer will need a new layout pass.
    pub fn element_mut(&mut self, id: ElementId) -> Option<&mut UIElement> {
        let element = self.tree.get_mut(id)?;
        self.flags.insert(ChangeFlags::NEEDS_LAYOUT);
        Some(element)
    }

    /// Top-level elements in paint order.
    pub fn children(&self) -> &[ElementId] {
        &self.children
    }

    /// Children of `id` in paint order.
    pub fn element_children(&self, id: ElementId) -> &[ElementId] {
        self.tree.children(id)
    }

    pub fn tree(&self) -> &ElementTree {
        &self.tree
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    pub fn needs_layout(&self) -> bool {
        self.flags.contains(ChangeFlags::NEEDS_LAYOUT)
    }

    fn mark_dirty(&mut self) {
        self.flags.insert(ChangeFlags::NEEDS_LAYOUT);
    }

    /// Resolve every element's rect for the display in `ctx`.
    ///
    /// Top-level elements are placed against the layer's layout size and the
    /// display; nested elements against their parent's configured and
    /// resolved sizes. The recorded major-axis scale always uses the layer's
    /// layout size as the reference. Hidden elements are laid out too.
    pub fn refresh_layout(&mut self, ctx: &LayoutContext) {
        let display = ctx.display();
        let container = Container {
            reference: self.layout_size,
            design: self.layout_size,
            resolved: display,
        };

        for &id in &self.children {
            layout_element(
                &mut self.tree,
                id,
                &container,
                display,
                self.layout_size,
                self.pixel_adjust,
            );
        }

        self.flags.remove(ChangeFlags::NEEDS_LAYOUT);
        log::trace!(
            "Layer layout refreshed for {}x{} ({} elements)",
            display.width,
            display.height,
            self.tree.len()
        );
    }

    /// Queue every visible element on `canvas`.
    ///
    /// Per element the order is background, content, children, foreground.
    /// Each decoration receives the element's rect in layer space and the
    /// product of its own alpha with every ancestor's and the layer's.
    pub fn on_render(&mut self, canvas: &mut Canvas) -> Result<(), Error> {
        if self.needs_layout() {
            return Err(SceneError::LayoutStale.into());
        }
        if self.hidden {
            return Ok(());
        }

        let origin = Point::new(0.0, 0.0);
        for &id in &self.children {
            render_element(&self.tree, id, canvas, origin, self.alpha)?;
        }

        Ok(())
    }

    /// Deepest, frontmost visible element containing `(x, y)` in layer
    /// coordinates.
    pub fn find_element(&self, x: f32, y: f32) -> Result<Option<ElementId>, SceneError> {
        if self.needs_layout() {
            return Err(SceneError::LayoutStale);
        }
        if self.hidden {
            return Ok(None);
        }

        Ok(self
            .children
            .iter()
            .rev()
            .find_map(|&id| hit_test(&self.tree, id, x, y)))
    }
}

impl Default for Layer {
    fn default() -> Self {
        Self::new()
    }
}

fn layout_element(
    tree: &mut ElementTree,
    id: ElementId,
    container: &Container,
    display: Size,
    reference: Size,
    pixel_adjust: bool,
) {
    let Some(element) = tree.get_mut(id) else {
        return;
    };
    element.resolve_layout(container, display, pixel_adjust);
    let child_container = element.child_container(reference);

    // Index loop: the tree is borrowed mutably by each recursion
    for index in 0..tree.children(id).len() {
        let child = tree.children(id)[index];
        layout_element(tree, child, &child_container, display, reference, pixel_adjust);
    }
}

fn render_element(
    tree: &ElementTree,
    id: ElementId,
    canvas: &mut Canvas,
    origin: Point,
    inherited_alpha: f32,
) -> Result<(), Error> {
    let Some(element) = tree.get(id) else {
        return Err(SceneError::UnknownElement(id).into());
    };
    if element.hidden {
        return Ok(());
    }

    let alpha = inherited_alpha * element.alpha;
    let bounds = element.rect().offset(origin.x, origin.y);

    if let Some(background) = &element.background {
        background.on_render(canvas, &bounds, alpha)?;
    }
    if let Some(content) = &element.content {
        content.on_render(canvas, &bounds, alpha)?;
    }

    let child_origin = bounds.origin();
    for &child in tree.children(id) {
        render_element(tree, child, canvas, child_origin, alpha)?;
    }

    if let Some(foreground) = &element.foreground {
        foreground.on_render(canvas, &bounds, alpha)?;
    }
    Ok(())
}

/// `x`/`y` are relative to the element's parent. Children are only tested
/// when the point lies inside the element itself.
fn hit_test(tree: &ElementTree, id: ElementId, x: f32, y: f32) -> Option<ElementId> {
    let element = tree.get(id)?;
    if element.hidden || !element.rect().contains(x, y) {
        return None;
    }

    let (local_x, local_y) = (x - element.x(), y - element.y());
    let hit_child = tree
        .children(id)
        .iter()
        .rev()
        .find_map(|&child| hit_test(tree, child, local_x, local_y));

    Some(hit_child.unwrap_or(id))
}
