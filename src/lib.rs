//! Retained-mode 2D scene graph with a batched draw-command canvas.
//!
//! A frame runs in three phases:
//!
//! ```ignore
//! layer.refresh_layout(&LayoutContext::from_display(width, height)?);
//! layer.on_render(&mut canvas)?;
//! canvas.execute(&mut RenderArgs::new(&mut gpu, display))?;
//! canvas.flush();
//! ```
//!
//! Pointer queries go through [`Layer::find_element`](scene::Layer::find_element)
//! between layout passes.

pub mod color;
pub mod error;
pub mod layout;
pub mod rect;
pub mod render_stats;
pub mod renderer;
pub mod scene;
pub mod tree;

pub use error::{Error, Result};

pub mod prelude {
    pub use crate::color::Color;
    pub use crate::error::{CanvasError, Error, LayoutError, SceneError};
    pub use crate::layout::{Alignment, Anchor, LayoutContext, MajorAxis};
    pub use crate::rect::{Point, Rect, Size};
    pub use crate::renderer::{
        Canvas, CanvasConfig, GpuContext, Material, PrimitiveType, ProgramId, ProgramMaterial,
        RecordingContext, RenderArgs,
    };
    #[cfg(feature = "wgpu")]
    pub use crate::renderer::WgpuContext;
    pub use crate::scene::{Decoration, Layer, SolidFill, UIElement};
    pub use crate::tree::ElementId;
}
