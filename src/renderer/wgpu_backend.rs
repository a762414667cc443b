//! [`GpuContext`] implementation on top of `wgpu`.
//!
//! `wgpu` only accepts draw calls inside a render pass, while the canvas issues
//! them from `execute`. Buffer work (allocation, uploads) happens immediately
//! through the device and queue. Pass work (program selection, vertex buffer
//! binding, draws) is recorded and replayed into a pass by
//! [`WgpuContext::replay`].
//!
//! A program's primitive topology is fixed by its pipeline, so the primitive
//! type of a draw only determines how many vertices it covers.

use std::ops::Range;
use std::sync::Arc;

use wgpu::util::DeviceExt;
use wgpu::{BindGroup, Buffer, BufferUsages, Device, Queue, RenderPipeline};

use crate::error::BackendError;

use super::commands::PrimitiveType;
use super::context::{BufferId, BufferUsage, GpuContext, ProgramId};
use super::vertex::ColorVertex;

/// Uniform block of the color shader.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct ViewportUniforms {
    size: [f32; 2],
    _pad: [f32; 2],
}

struct BufferSlot {
    usage: BufferUsage,
    buffer: Option<Buffer>,
}

struct Program {
    pipeline: RenderPipeline,
    bind_group: Option<BindGroup>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PassOp {
    SetProgram(ProgramId),
    SetVertexBuffer(BufferId),
    Draw(Range<u32>),
}

pub struct WgpuContext {
    device: Arc<Device>,
    queue: Arc<Queue>,
    buffers: Vec<Option<BufferSlot>>,
    programs: Vec<Program>,
    viewport_buffer: Buffer,
    ops: Vec<PassOp>,
}

impl WgpuContext {
    pub fn new(device: Arc<Device>, queue: Arc<Queue>) -> Self {
        let viewport_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Strata Viewport Uniforms"),
            contents: bytemuck::cast_slice(&[ViewportUniforms {
                size: [640.0, 480.0],
                _pad: [0.0, 0.0],
            }]),
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
        });

        Self {
            device,
            queue,
            buffers: Vec::new(),
            programs: Vec::new(),
            viewport_buffer,
            ops: Vec::new(),
        }
    }

    /// Create a context on the first available adapter, without a surface.
    pub fn headless() -> Result<Self, BackendError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::LowPower,
            compatible_surface: None,
            force_fallback_adapter: false,
        }))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("Strata Device"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            memory_hints: wgpu::MemoryHints::default(),
            experimental_features: wgpu::ExperimentalFeatures::default(),
            trace: wgpu::Trace::Off,
        }))?;

        Ok(Self::new(Arc::new(device), Arc::new(queue)))
    }

    pub fn device(&self) -> &Arc<Device> {
        &self.device
    }

    pub fn queue(&self) -> &Arc<Queue> {
        &self.queue
    }

    /// Update the viewport size the color program maps pixels against.
    pub fn set_viewport_size(&self, width: f32, height: f32) {
        self.queue.write_buffer(
            &self.viewport_buffer,
            0,
            bytemuck::cast_slice(&[ViewportUniforms {
                size: [width, height],
                _pad: [0.0, 0.0],
            }]),
        );
    }

    /// Register an externally built pipeline as a program.
    pub fn register_program(
        &mut self,
        pipeline: RenderPipeline,
        bind_group: Option<BindGroup>,
    ) -> ProgramId {
        let id = ProgramId(self.programs.len() as u32);
        self.programs.push(Program {
            pipeline,
            bind_group,
        });
        id
    }

    /// Build the triangle-list program for [`ColorVertex`] geometry.
    pub fn create_color_program(&mut self, format: wgpu::TextureFormat) -> ProgramId {
        let shader = self
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("Strata Color Shader"),
                source: wgpu::ShaderSource::Wgsl(include_str!("color.wgsl").into()),
            });

        let bind_group_layout =
            self.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("Strata Color Bind Group Layout"),
                    entries: &[wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::VERTEX,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: None,
                        },
                        count: None,
                    }],
                });

        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Strata Color Bind Group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: self.viewport_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = self
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Strata Color Pipeline Layout"),
                bind_group_layouts: &[&bind_group_layout],
                immediate_size: 0,
            });

        let pipeline = self
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("Strata Color Pipeline"),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    buffers: &[ColorVertex::desc()],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format,
                        blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: None, // No culling for 2D
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview_mask: None,
                cache: None,
            });

        self.register_program(pipeline, Some(bind_group))
    }

    /// Issue every recorded pass operation into `pass`, then forget them.
    pub fn replay(&mut self, pass: &mut wgpu::RenderPass<'_>) {
        for op in self.ops.drain(..) {
            match op {
                PassOp::SetProgram(id) => match self.programs.get(id.0 as usize) {
                    Some(program) => {
                        pass.set_pipeline(&program.pipeline);
                        if let Some(bind_group) = &program.bind_group {
                            pass.set_bind_group(0, bind_group, &[]);
                        }
                    }
                    None => log::warn!("Unknown program {:?}", id),
                },
                PassOp::SetVertexBuffer(id) => {
                    match self
                        .buffers
                        .get(id.0 as usize)
                        .and_then(|slot| slot.as_ref())
                        .and_then(|slot| slot.buffer.as_ref())
                    {
                        Some(buffer) => pass.set_vertex_buffer(0, buffer.slice(..)),
                        None => log::warn!("Bound {:?} has no storage", id),
                    }
                }
                PassOp::Draw(vertices) => pass.draw(vertices, 0..1),
            }
        }
    }

    /// Number of recorded operations waiting for `replay`.
    pub fn pending_ops(&self) -> usize {
        self.ops.len()
    }

    fn slot_mut(&mut self, id: BufferId) -> Option<&mut BufferSlot> {
        self.buffers.get_mut(id.0 as usize).and_then(|s| s.as_mut())
    }
}

/// Vertex range of a draw, clamped to `u32::MAX`.
fn draw_range(primitive_type: PrimitiveType, start: u32, primitive_count: u32) -> Range<u32> {
    start..start.saturating_add(primitive_type.vertex_count(primitive_count))
}

fn buffer_usages(usage: BufferUsage) -> BufferUsages {
    // Every hint maps to the same wgpu usage; the queue handles staging
    match usage {
        BufferUsage::Static | BufferUsage::Dynamic | BufferUsage::Stream => {
            BufferUsages::VERTEX | BufferUsages::COPY_DST
        }
    }
}

fn align_to_copy(size: usize) -> u64 {
    (size as u64).next_multiple_of(wgpu::COPY_BUFFER_ALIGNMENT)
}

impl GpuContext for WgpuContext {
    fn create_buffer(&mut self, usage: BufferUsage) -> BufferId {
        let id = BufferId(self.buffers.len() as u32);
        self.buffers.push(Some(BufferSlot {
            usage,
            buffer: None,
        }));
        id
    }

    fn reserve_buffer(&mut self, buffer: BufferId, capacity: usize) {
        let device = self.device.clone();
        let Some(slot) = self.slot_mut(buffer) else {
            log::warn!("Reserve on unknown {:?}", buffer);
            return;
        };

        if let Some(old) = slot.buffer.take() {
            old.destroy();
        }
        slot.buffer = Some(device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Strata Canvas Buffer"),
            size: align_to_copy(capacity),
            usage: buffer_usages(slot.usage),
            mapped_at_creation: false,
        }));
    }

    fn upload_buffer(&mut self, buffer: BufferId, offset: usize, data: &[u8]) {
        let queue = self.queue.clone();
        let Some(target) = self.slot_mut(buffer).and_then(|s| s.buffer.as_ref()) else {
            log::warn!("Upload to {:?} without storage", buffer);
            return;
        };

        // Copies must be a multiple of COPY_BUFFER_ALIGNMENT; pad the tail
        let aligned = align_to_copy(data.len()) as usize;
        if aligned == data.len() {
            queue.write_buffer(target, offset as u64, data);
        } else {
            let mut padded = data.to_vec();
            padded.resize(aligned, 0);
            queue.write_buffer(target, offset as u64, &padded);
        }
    }

    fn dispose_buffer(&mut self, buffer: BufferId) {
        if let Some(slot) = self.buffers.get_mut(buffer.0 as usize) {
            if let Some(BufferSlot {
                buffer: Some(gpu), ..
            }) = slot.take()
            {
                gpu.destroy();
            }
        }
    }

    fn bind_array_buffer(&mut self, buffer: BufferId) {
        self.ops.push(PassOp::SetVertexBuffer(buffer));
    }

    fn use_program(&mut self, program: ProgramId) {
        self.ops.push(PassOp::SetProgram(program));
    }

    fn draw_primitive(&mut self, primitive_type: PrimitiveType, start: u32, primitive_count: u32) {
        self.ops
            .push(PassOp::Draw(draw_range(primitive_type, start, primitive_count)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draw_range() {
        assert_eq!(draw_range(PrimitiveType::Triangles, 6, 2), 6..12);
        assert_eq!(draw_range(PrimitiveType::Triangles, u32::MAX - 3, 2), u32::MAX - 3..u32::MAX);
    }
}
