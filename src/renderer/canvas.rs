//! Batched primitive rendering for a two-dimensional display.
//!
//! During a frame, scene elements append vertex data to the canvas' CPU
//! staging buffer and claim records from a fixed pool of [`DrawCommand`]s.
//! [`Canvas::execute`] uploads the staging buffer to its GPU mirror and issues
//! the commands in submission order, firing material hooks only where the
//! material changes between consecutive commands. [`Canvas::flush`] then
//! resets the frame in O(1).

use std::rc::{Rc, Weak};

use crate::color::Color;
use crate::error::CanvasError;
use crate::rect::Rect;
use crate::render_stats;

use super::commands::{DrawCommand, PrimitiveType};
use super::context::{BufferUsage, GpuBuffer, GpuContext, RenderArgs};
use super::material::Material;
use super::vertex::ColorVertex;

/// Default size in bytes of the staging buffer and its GPU mirror.
pub const DEFAULT_CAPACITY: usize = 1024 * 16;

/// Default number of draw command records in the pool.
pub const DRAW_COMMAND_CAPACITY: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasConfig {
    /// Size in bytes used by `Canvas::initialize_default`.
    pub capacity: usize,
    /// Number of draw command records; fixed for the canvas' lifetime.
    pub draw_command_capacity: usize,
    /// Usage hint for the GPU mirror of the staging buffer.
    pub buffer_usage: BufferUsage,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            draw_command_capacity: DRAW_COMMAND_CAPACITY,
            buffer_usage: BufferUsage::Dynamic,
        }
    }
}

impl CanvasConfig {
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn draw_command_capacity(mut self, draw_command_capacity: usize) -> Self {
        self.draw_command_capacity = draw_command_capacity;
        self
    }

    pub fn buffer_usage(mut self, buffer_usage: BufferUsage) -> Self {
        self.buffer_usage = buffer_usage;
        self
    }
}

/// What one `execute` call issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExecuteStats {
    pub draw_calls: usize,
    /// Number of contiguous same-material command runs.
    pub material_runs: usize,
}

pub struct Canvas {
    config: CanvasConfig,
    /// Size in bytes of the staging buffer and its GPU mirror.
    capacity: usize,
    staging: Vec<u8>,
    /// Bytes of `staging` written this frame.
    used: usize,
    gpu_buffer: Option<GpuBuffer>,
    draw_commands: Vec<DrawCommand>,
    /// Logical length of `draw_commands`; entries past it are stale.
    command_count: usize,
}

impl Canvas {
    pub fn new() -> Self {
        Self::with_config(CanvasConfig::default())
    }

    pub fn with_config(config: CanvasConfig) -> Self {
        Self {
            config,
            capacity: 0,
            staging: Vec::new(),
            used: 0,
            gpu_buffer: None,
            draw_commands: vec![DrawCommand::empty(); config.draw_command_capacity],
            command_count: 0,
        }
    }

    /// Allocate the staging buffer and its GPU mirror.
    ///
    /// Only grows: a request that fits the current capacity does nothing.
    /// Growing discards anything queued this frame.
    pub fn initialize(&mut self, context: &mut dyn GpuContext, capacity: usize) -> &mut Self {
        if capacity > self.capacity {
            if let Some(old) = self.gpu_buffer.take() {
                old.dispose(context);
            }

            let mut buffer = GpuBuffer::initialize(context, self.config.buffer_usage);
            buffer.reserve(context, capacity);

            log::debug!(
                "Canvas buffers allocated: {} -> {} bytes ({:?})",
                self.capacity,
                capacity,
                buffer.id()
            );

            self.staging = vec![0; capacity];
            self.gpu_buffer = Some(buffer);
            self.capacity = capacity;
            self.used = 0;
            self.command_count = 0;
        }

        self
    }

    /// `initialize` with the configured default capacity.
    pub fn initialize_default(&mut self, context: &mut dyn GpuContext) -> &mut Self {
        let capacity = self.config.capacity;
        self.initialize(context, capacity)
    }

    /// Release the GPU buffer and reset all sizes. Safe to call repeatedly.
    pub fn dispose(&mut self, context: &mut dyn GpuContext) {
        if let Some(buffer) = self.gpu_buffer.take() {
            log::debug!("Canvas disposed ({:?})", buffer.id());
            buffer.dispose(context);
        }

        self.staging = Vec::new();
        self.capacity = 0;
        self.used = 0;
        self.command_count = 0;
    }

    /// Forget every queued command. Pool records and staging bytes are left
    /// as they are and simply overwritten by the next frame.
    pub fn flush(&mut self) {
        self.command_count = 0;
        self.used = 0;
    }

    /// Queue a draw over vertices the caller placed in the GPU buffer.
    pub fn push_command(
        &mut self,
        material: &Rc<dyn Material>,
        primitive_type: PrimitiveType,
        start: u32,
        primitive_count: u32,
    ) -> Result<(), CanvasError> {
        if self.gpu_buffer.is_none() {
            return Err(CanvasError::NotInitialized);
        }
        self.claim_command(Rc::downgrade(material), primitive_type, start, primitive_count)
    }

    /// Append vertices to the staging buffer and queue a draw over them.
    ///
    /// The write is aligned to the vertex stride so the command's start can
    /// be expressed as a vertex index. Trailing vertices that do not form a
    /// whole primitive are not drawn.
    pub fn push_vertices<V: bytemuck::Pod>(
        &mut self,
        material: &Rc<dyn Material>,
        primitive_type: PrimitiveType,
        vertices: &[V],
    ) -> Result<(), CanvasError> {
        if self.gpu_buffer.is_none() {
            return Err(CanvasError::NotInitialized);
        }

        let stride = std::mem::size_of::<V>();
        let primitive_count = primitive_type.primitive_count(vertices.len());
        if stride == 0 || primitive_count == 0 {
            return Ok(());
        }

        let bytes: &[u8] = bytemuck::cast_slice(vertices);
        let offset = self.used.next_multiple_of(stride);
        let available = self.capacity.saturating_sub(offset);
        if bytes.len() > available {
            log::warn!(
                "Canvas staging buffer full: {} bytes requested, {} available",
                bytes.len(),
                available
            );
            render_stats::record_command_rejected();
            return Err(CanvasError::StagingOverflow {
                requested: bytes.len(),
                available,
            });
        }

        let start = (offset / stride) as u32;
        self.claim_command(Rc::downgrade(material), primitive_type, start, primitive_count)?;

        self.staging[offset..offset + bytes.len()].copy_from_slice(bytes);
        self.used = offset + bytes.len();
        Ok(())
    }

    /// Draw a solid rectangle as two triangles.
    pub fn draw_rect(
        &mut self,
        rect: &Rect,
        color: Color,
        material: &Rc<dyn Material>,
    ) -> Result<(), CanvasError> {
        self.push_vertices(
            material,
            PrimitiveType::Triangles,
            &ColorVertex::quad(rect, color),
        )
    }

    fn claim_command(
        &mut self,
        material: Weak<dyn Material>,
        primitive_type: PrimitiveType,
        start: u32,
        primitive_count: u32,
    ) -> Result<(), CanvasError> {
        let Some(command) = self.draw_commands.get_mut(self.command_count) else {
            log::warn!(
                "Canvas draw command pool exhausted ({} commands)",
                self.draw_commands.len()
            );
            render_stats::record_command_rejected();
            return Err(CanvasError::CommandPoolExhausted {
                capacity: self.draw_commands.len(),
            });
        };

        command.primitive_type = primitive_type;
        command.start = start;
        command.primitive_count = primitive_count;
        command.material = Some(material);
        self.command_count += 1;

        log::trace!(
            "Queued draw command {}: {:?} start={} count={}",
            self.command_count - 1,
            primitive_type,
            start,
            primitive_count
        );
        Ok(())
    }

    /// Upload this frame's vertex data and issue every queued command.
    ///
    /// A material's begin hook fires when its run starts and its end hook
    /// fires once when the run ends, so state changes scale with the number
    /// of material runs rather than the number of commands. If a command's
    /// material has been dropped the active run is ended and the frame is
    /// aborted with [`CanvasError::MaterialReleased`].
    pub fn execute(&mut self, args: &mut RenderArgs<'_>) -> Result<ExecuteStats, CanvasError> {
        let buffer = self.gpu_buffer.as_ref().ok_or(CanvasError::NotInitialized)?;

        if self.used > 0 {
            buffer.upload(args.context, 0, &self.staging[..self.used]);
        }
        args.context.bind_array_buffer(buffer.id());

        let mut stats = ExecuteStats::default();
        let mut last_material: Option<Rc<dyn Material>> = None;

        for (index, command) in self.draw_commands[..self.command_count].iter().enumerate() {
            let Some(material) = command.material.as_ref().and_then(Weak::upgrade) else {
                if let Some(last) = last_material.take() {
                    last.on_end_render(args);
                }
                log::warn!("Draw command {} references a released material", index);
                return Err(CanvasError::MaterialReleased { index });
            };

            let same_run = last_material
                .as_ref()
                .is_some_and(|last| Rc::ptr_eq(last, &material));
            if !same_run {
                if let Some(last) = last_material.take() {
                    last.on_end_render(args);
                }
                material.on_begin_render(args);
                last_material = Some(material);
                stats.material_runs += 1;
            }

            // Per-instance uniforms and attribute layout belong to the material
            args.context.draw_primitive(
                command.primitive_type,
                command.start,
                command.primitive_count,
            );
            stats.draw_calls += 1;
        }

        if let Some(last) = last_material {
            last.on_end_render(args);
        }

        log::debug!(
            "Canvas executed {} draw calls in {} material runs ({} bytes)",
            stats.draw_calls,
            stats.material_runs,
            self.used
        );
        render_stats::record_frame_executed(&stats);

        Ok(stats)
    }

    pub fn is_initialized(&self) -> bool {
        self.gpu_buffer.is_some()
    }

    /// Size in bytes of the staging buffer and its GPU mirror.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn command_count(&self) -> usize {
        self.command_count
    }

    pub fn draw_command_capacity(&self) -> usize {
        self.draw_commands.len()
    }

    /// The commands queued this frame, in submission order.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.draw_commands[..self.command_count]
    }

    /// Bytes of vertex data written this frame.
    pub fn used_bytes(&self) -> usize {
        self.used
    }

    pub fn staged_bytes(&self) -> &[u8] {
        &self.staging[..self.used]
    }

    pub fn gpu_buffer(&self) -> Option<&GpuBuffer> {
        self.gpu_buffer.as_ref()
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Canvas {
    fn drop(&mut self) {
        if let Some(buffer) = &self.gpu_buffer {
            log::warn!("Canvas dropped without dispose; {:?} leaked", buffer.id());
        }
    }
}
