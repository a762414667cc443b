//! A headless [`GpuContext`] that records every call it receives.
//!
//! Buffers are plain byte vectors, so uploads can be inspected after a frame.

use super::commands::PrimitiveType;
use super::context::{BufferId, BufferUsage, GpuContext, ProgramId};

/// One call made against a [`RecordingContext`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GpuCall {
    CreateBuffer {
        buffer: BufferId,
        usage: BufferUsage,
    },
    ReserveBuffer {
        buffer: BufferId,
        capacity: usize,
    },
    UploadBuffer {
        buffer: BufferId,
        offset: usize,
        len: usize,
    },
    DisposeBuffer(BufferId),
    BindArrayBuffer(BufferId),
    UseProgram(ProgramId),
    DrawPrimitive {
        primitive_type: PrimitiveType,
        start: u32,
        primitive_count: u32,
    },
}

#[derive(Debug, Default)]
pub struct RecordingContext {
    calls: Vec<GpuCall>,
    buffers: Vec<Option<Vec<u8>>>,
}

impl RecordingContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[GpuCall] {
        &self.calls
    }

    /// Only the draw calls, in issue order.
    pub fn draw_calls(&self) -> Vec<&GpuCall> {
        self.calls
            .iter()
            .filter(|c| matches!(c, GpuCall::DrawPrimitive { .. }))
            .collect()
    }

    /// Current contents of a live buffer.
    pub fn buffer_contents(&self, buffer: BufferId) -> Option<&[u8]> {
        self.buffers
            .get(buffer.0 as usize)
            .and_then(|b| b.as_deref())
    }

    pub fn live_buffers(&self) -> usize {
        self.buffers.iter().filter(|b| b.is_some()).count()
    }

    /// Forget recorded calls, keeping buffers alive.
    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }
}

impl GpuContext for RecordingContext {
    fn create_buffer(&mut self, usage: BufferUsage) -> BufferId {
        let buffer = BufferId(self.buffers.len() as u32);
        self.buffers.push(Some(Vec::new()));
        self.calls.push(GpuCall::CreateBuffer { buffer, usage });
        buffer
    }

    fn reserve_buffer(&mut self, buffer: BufferId, capacity: usize) {
        if let Some(Some(data)) = self.buffers.get_mut(buffer.0 as usize) {
            *data = vec![0; capacity];
        }
        self.calls.push(GpuCall::ReserveBuffer { buffer, capacity });
    }

    fn upload_buffer(&mut self, buffer: BufferId, offset: usize, bytes: &[u8]) {
        if let Some(Some(data)) = self.buffers.get_mut(buffer.0 as usize) {
            let end = (offset + bytes.len()).min(data.len());
            if offset < end {
                data[offset..end].copy_from_slice(&bytes[..end - offset]);
            }
        }
        self.calls.push(GpuCall::UploadBuffer {
            buffer,
            offset,
            len: bytes.len(),
        });
    }

    fn dispose_buffer(&mut self, buffer: BufferId) {
        if let Some(slot) = self.buffers.get_mut(buffer.0 as usize) {
            *slot = None;
        }
        self.calls.push(GpuCall::DisposeBuffer(buffer));
    }

    fn bind_array_buffer(&mut self, buffer: BufferId) {
        self.calls.push(GpuCall::BindArrayBuffer(buffer));
    }

    fn use_program(&mut self, program: ProgramId) {
        self.calls.push(GpuCall::UseProgram(program));
    }

    fn draw_primitive(&mut self, primitive_type: PrimitiveType, start: u32, primitive_count: u32) {
        self.calls.push(GpuCall::DrawPrimitive {
            primitive_type,
            start,
            primitive_count,
        });
    }
}
