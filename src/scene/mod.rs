//! The retained scene graph: a [`Layer`] owning a tree of [`UIElement`]s,
//! each carrying optional [`Decoration`]s.

mod decoration;
mod element;
mod layer;

pub use decoration::{Decoration, SolidFill};
pub use element::UIElement;
pub use layer::{ChangeFlags, Layer, DEFAULT_LAYOUT_SIZE};
