//! The GPU-facing capabilities the canvas consumes.
//!
//! A [`GpuContext`] owns the real GPU objects. The canvas only ever refers to
//! them through [`BufferId`] and [`ProgramId`] handles, so the same batching
//! code drives a `wgpu` device or the headless [`RecordingContext`].
//!
//! [`RecordingContext`]: super::RecordingContext

use crate::rect::Size;

use super::commands::PrimitiveType;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct BufferId(pub u32);

/// A shader program (pipeline) registered with a context.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ProgramId(pub u32);

/// How often the contents of a buffer are expected to change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferUsage {
    /// Written once, drawn many times.
    Static,
    /// Rewritten every frame.
    Dynamic,
    /// Written once, drawn a few times.
    Stream,
}

/// GPU state, buffer objects and draw calls.
pub trait GpuContext {
    /// Create a buffer object with no storage yet.
    fn create_buffer(&mut self, usage: BufferUsage) -> BufferId;

    /// Allocate `capacity` bytes of storage for a buffer, discarding any
    /// previous contents.
    fn reserve_buffer(&mut self, buffer: BufferId, capacity: usize);

    /// Copy `data` into the buffer starting at `offset` bytes.
    fn upload_buffer(&mut self, buffer: BufferId, offset: usize, data: &[u8]);

    /// Release a buffer. Unknown ids are ignored.
    fn dispose_buffer(&mut self, buffer: BufferId);

    /// Make `buffer` the source of vertex data for subsequent draws.
    fn bind_array_buffer(&mut self, buffer: BufferId);

    /// Select the program used by subsequent draws.
    fn use_program(&mut self, program: ProgramId);

    /// Draw `primitive_count` primitives starting at vertex `start`.
    fn draw_primitive(&mut self, primitive_type: PrimitiveType, start: u32, primitive_count: u32);
}

/// Arguments threaded through a canvas execute and its material hooks.
pub struct RenderArgs<'a> {
    pub context: &'a mut dyn GpuContext,
    /// Size of the surface being rendered to.
    pub display: Size,
}

impl<'a> RenderArgs<'a> {
    pub fn new(context: &'a mut dyn GpuContext, display: Size) -> Self {
        Self { context, display }
    }
}

/// A buffer object owned through a context.
#[derive(Debug)]
pub struct GpuBuffer {
    id: BufferId,
    size: usize,
}

impl GpuBuffer {
    pub fn initialize(context: &mut dyn GpuContext, usage: BufferUsage) -> Self {
        Self {
            id: context.create_buffer(usage),
            size: 0,
        }
    }

    /// Bind the buffer and allocate `capacity` bytes for it.
    pub fn reserve(&mut self, context: &mut dyn GpuContext, capacity: usize) {
        context.bind_array_buffer(self.id);
        context.reserve_buffer(self.id, capacity);
        self.size = capacity;
    }

    pub fn upload(&self, context: &mut dyn GpuContext, offset: usize, data: &[u8]) {
        context.upload_buffer(self.id, offset, data);
    }

    pub fn dispose(self, context: &mut dyn GpuContext) {
        context.dispose_buffer(self.id);
    }

    pub fn id(&self) -> BufferId {
        self.id
    }

    pub fn size(&self) -> usize {
        self.size
    }
}
