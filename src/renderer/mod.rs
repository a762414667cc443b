//! Batched draw pipeline.
//!
//! # Architecture
//!
//! - Scene elements queue geometry on a [`Canvas`] during the render pass
//! - Each queued [`DrawCommand`] references the [`Material`] it is drawn with
//! - [`Canvas::execute`] issues the commands through a [`GpuContext`],
//!   bracketing each run of same-material commands with one pair of
//!   material hooks
//!
//! Two contexts are provided: [`RecordingContext`] (headless, records calls)
//! and, with the `wgpu` feature, [`WgpuContext`].

mod canvas;
mod commands;
mod context;
mod material;
pub mod recording;
mod vertex;
#[cfg(feature = "wgpu")]
mod wgpu_backend;

pub use canvas::{Canvas, CanvasConfig, ExecuteStats, DEFAULT_CAPACITY, DRAW_COMMAND_CAPACITY};
pub use commands::{DrawCommand, PrimitiveType};
pub use context::{BufferId, BufferUsage, GpuBuffer, GpuContext, ProgramId, RenderArgs};
pub use material::{Material, ProgramMaterial};
pub use recording::{GpuCall, RecordingContext};
pub use vertex::ColorVertex;
#[cfg(feature = "wgpu")]
pub use wgpu_backend::WgpuContext;
