//! Renderer boundary: per-level instance buffers and instanced draws.
//!
//! The core never talks to a GPU API directly. Engine bridges implement
//! [`InstanceRenderer`]; the core creates one buffer per level at enable
//! time, uploads each level's matrices once per frame and issues one
//! instanced draw per level.
//!
//! ```text
//!  level k matrices ──upload──► buffer k (5^k × 64 bytes) ──draw_instanced──► GPU
//!                                                  mesh, material, bounds,
//!                                                  instance_count = 5^k
//! ```
//!
//! Matrices are uploaded as raw column-major `f32` data, 16 floats per
//! instance, which matches `float4x4`/`mat4x4<f32>` structured buffers.

use thiserror::Error;
use tracing::{debug, warn};

use crate::constants::{level_len, MATRIX_STRIDE_BYTES};
use crate::error::{FractalError, FractalResult};
use crate::hierarchy::FractalHierarchy;
use crate::types::BoundingSphere;

/// Opaque mesh handle, passed through to the renderer unchanged.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct MeshHandle(pub u64);

/// Opaque material handle, passed through to the renderer unchanged.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct MaterialHandle(pub u64);

/// Failures reported by a renderer backend.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RenderError {
  #[error("buffer of {requested} bytes exceeds the remaining {available} bytes of GPU memory")]
  OutOfMemory { requested: usize, available: usize },

  #[error("renderer backend error: {0}")]
  Backend(String),
}

/// One instanced draw of a single level.
#[derive(Debug)]
pub struct DrawInstanced<'a, B> {
  pub mesh: MeshHandle,
  pub material: MaterialHandle,
  pub bounds: BoundingSphere,
  pub instance_count: usize,
  /// Per-instance matrices, already uploaded this frame.
  pub buffer: &'a B,
}

/// Callback interface for rendering backends.
///
/// # Example (wgpu)
///
/// ```ignore
/// impl InstanceRenderer for WgpuFractalRenderer {
///     type Buffer = wgpu::Buffer;
///
///     fn create_buffer(&mut self, level: usize, count: usize, stride: usize)
///         -> Result<wgpu::Buffer, RenderError> {
///         Ok(self.device.create_buffer(&wgpu::BufferDescriptor {
///             label: Some("fractal level"),
///             size: (count * stride) as u64,
///             usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
///             mapped_at_creation: false,
///         }))
///     }
///
///     fn upload(&mut self, buffer: &mut wgpu::Buffer, data: &[u8]) {
///         self.queue.write_buffer(buffer, 0, data);
///     }
///     // ...
/// }
/// ```
pub trait InstanceRenderer {
  /// GPU-visible structured buffer handle.
  type Buffer;

  /// Create a buffer holding `count` elements of `stride` bytes.
  fn create_buffer(&mut self, level: usize, count: usize, stride: usize) -> Result<Self::Buffer, RenderError>;

  /// Replace the buffer contents. `data.len()` equals `count * stride`.
  fn upload(&mut self, buffer: &mut Self::Buffer, data: &[u8]);

  /// Issue an instanced draw reading per-instance matrices from the buffer.
  fn draw_instanced(&mut self, draw: DrawInstanced<'_, Self::Buffer>);

  /// Free a buffer created by this renderer.
  fn release_buffer(&mut self, buffer: Self::Buffer);
}

/// One instance buffer per hierarchy level.
#[derive(Debug)]
pub struct InstanceBuffers<B> {
  buffers: Vec<B>,
}

impl<B> InstanceBuffers<B> {
  /// Create buffers for levels `0..depth`, all or nothing.
  ///
  /// If any level fails, the buffers already created are released before the
  /// error is returned.
  pub fn create<R>(renderer: &mut R, depth: usize) -> FractalResult<Self>
  where
    R: InstanceRenderer<Buffer = B>,
  {
    let mut buffers = Vec::with_capacity(depth);
    for level in 0..depth {
      let count = level_len(level);
      match renderer.create_buffer(level, count, MATRIX_STRIDE_BYTES) {
        Ok(buffer) => buffers.push(buffer),
        Err(source) => {
          warn!(level, count, error = %source, "instance buffer creation failed, releasing created levels");
          for buffer in buffers.drain(..) {
            renderer.release_buffer(buffer);
          }
          return Err(FractalError::BufferCreation { level, count, source });
        }
      }
    }
    debug!(depth, "instance buffers created");
    Ok(Self { buffers })
  }

  /// Number of levels with a live buffer.
  #[inline]
  pub fn depth(&self) -> usize {
    self.buffers.len()
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.buffers.is_empty()
  }

  #[inline]
  pub fn get(&self, level: usize) -> Option<&B> {
    self.buffers.get(level)
  }

  /// Release every buffer. Safe to call more than once.
  pub fn release<R>(&mut self, renderer: &mut R)
  where
    R: InstanceRenderer<Buffer = B>,
  {
    for buffer in self.buffers.drain(..) {
      renderer.release_buffer(buffer);
    }
  }
}

/// Upload every level's matrices and issue its instanced draw.
///
/// Must be called only after the frame's level chain has completed. Returns
/// the number of instances drawn.
pub fn export_frame<R: InstanceRenderer>(
  renderer: &mut R,
  buffers: &mut InstanceBuffers<R::Buffer>,
  hierarchy: &FractalHierarchy,
  mesh: MeshHandle,
  material: MaterialHandle,
  bounds: BoundingSphere,
) -> FractalResult<usize> {
  if buffers.depth() != hierarchy.depth() {
    return Err(FractalError::DepthMismatch {
      hierarchy: hierarchy.depth(),
      buffers: buffers.depth(),
    });
  }

  let mut instances = 0;
  for (level, buffer) in hierarchy.levels().iter().zip(buffers.buffers.iter_mut()) {
    renderer.upload(buffer, bytemuck::cast_slice(level.matrices()));
    renderer.draw_instanced(DrawInstanced {
      mesh,
      material,
      bounds,
      instance_count: level.len(),
      buffer: &*buffer,
    });
    instances += level.len();
  }
  Ok(instances)
}

#[cfg(test)]
#[path = "presentation_test.rs"]
mod presentation_test;
