//! Error types for layout configuration, scene traversal and the canvas.

use thiserror::Error;

use crate::tree::ElementId;

/// A layout vocabulary value that is not part of its closed enumeration, or
/// a display that cannot be laid out against.
///
/// This indicates a mis-authored scene and is never defaulted.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("invalid major axis: {0:?}")]
    InvalidMajorAxis(String),
    #[error("invalid anchor: {0:?}")]
    InvalidAnchor(String),
    #[error("invalid alignment: {0:?}")]
    InvalidAlignment(String),
    /// Display extents must be finite and greater than zero.
    #[error("invalid display size {width}x{height}")]
    InvalidDisplaySize { width: f32, height: f32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CanvasError {
    /// Every draw-command record in the pool is in use for this frame.
    #[error("draw command pool exhausted ({capacity} commands)")]
    CommandPoolExhausted { capacity: usize },
    /// The staging buffer cannot hold the submitted vertex data.
    #[error("staging buffer overflow: {requested} bytes requested, {available} available")]
    StagingOverflow { requested: usize, available: usize },
    /// The canvas has no buffers; `initialize` has not run or `dispose` has.
    #[error("canvas used before initialize")]
    NotInitialized,
    /// The material referenced by a queued command was dropped before execute.
    #[error("material for draw command {index} was released")]
    MaterialReleased { index: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SceneError {
    /// The layer was mutated since its last layout pass.
    #[error("scene geometry is stale; refresh_layout must run first")]
    LayoutStale,
    #[error("element {0:?} does not belong to this layer")]
    UnknownElement(ElementId),
}

/// Failure to bring up the `wgpu` backend.
#[cfg(feature = "wgpu")]
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("no suitable GPU adapter found: {0}")]
    AdapterNotFound(#[from] wgpu::RequestAdapterError),
    #[error("failed to request GPU device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error(transparent)]
    Canvas(#[from] CanvasError),
    #[error(transparent)]
    Scene(#[from] SceneError),
    #[cfg(feature = "wgpu")]
    #[error(transparent)]
    Backend(#[from] BackendError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
