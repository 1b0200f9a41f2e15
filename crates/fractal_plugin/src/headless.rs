//! In-memory renderer for headless runs, benchmarks and tests.
//!
//! Buffers are plain byte vectors and draws are recorded instead of
//! submitted. An optional byte budget makes buffer creation fail the way a
//! GPU running out of memory would.

use std::collections::HashMap;

use glam::Mat4;

use crate::constants::MATRIX_STRIDE_BYTES;
use crate::presentation::{DrawInstanced, InstanceRenderer, MaterialHandle, MeshHandle, RenderError};
use crate::types::BoundingSphere;

/// Buffer handle owned by the caller until released.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct HeadlessBuffer {
  id: u64,
}

impl HeadlessBuffer {
  pub fn id(&self) -> u64 {
    self.id
  }
}

struct StoredBuffer {
  level: usize,
  count: usize,
  stride: usize,
  data: Vec<u8>,
}

/// Draw call captured by [`HeadlessRenderer`].
#[derive(Clone, Debug, PartialEq)]
pub struct RecordedDraw {
  pub level: usize,
  pub buffer_id: u64,
  pub mesh: MeshHandle,
  pub material: MaterialHandle,
  pub bounds: BoundingSphere,
  pub instance_count: usize,
}

#[derive(Default)]
pub struct HeadlessRenderer {
  next_id: u64,
  budget_bytes: Option<usize>,
  allocated_bytes: usize,
  buffers: HashMap<u64, StoredBuffer>,
  draws: Vec<RecordedDraw>,
  uploads: u64,
}

impl HeadlessRenderer {
  pub fn new() -> Self {
    Self::default()
  }

  /// Limit total buffer memory; creation beyond it fails with `OutOfMemory`.
  pub fn with_budget(mut self, bytes: usize) -> Self {
    self.budget_bytes = Some(bytes);
    self
  }

  /// Buffers created and not yet released.
  pub fn live_buffer_count(&self) -> usize {
    self.buffers.len()
  }

  pub fn allocated_bytes(&self) -> usize {
    self.allocated_bytes
  }

  /// Total uploads performed.
  pub fn upload_count(&self) -> u64 {
    self.uploads
  }

  pub fn draws(&self) -> &[RecordedDraw] {
    &self.draws
  }

  /// Take recorded draws, leaving the log empty.
  pub fn take_draws(&mut self) -> Vec<RecordedDraw> {
    std::mem::take(&mut self.draws)
  }

  /// Raw bytes of a live buffer.
  pub fn buffer_bytes(&self, id: u64) -> Option<&[u8]> {
    self.buffers.get(&id).map(|stored| stored.data.as_slice())
  }

  /// Live buffer contents decoded as instance matrices.
  pub fn buffer_matrices(&self, id: u64) -> Option<Vec<Mat4>> {
    self.buffers.get(&id).map(|stored| {
      stored
        .data
        .chunks_exact(MATRIX_STRIDE_BYTES)
        .map(bytemuck::pod_read_unaligned::<Mat4>)
        .collect()
    })
  }

  /// `(count, stride)` a live buffer was created with.
  pub fn buffer_layout(&self, id: u64) -> Option<(usize, usize)> {
    self.buffers.get(&id).map(|stored| (stored.count, stored.stride))
  }
}

impl InstanceRenderer for HeadlessRenderer {
  type Buffer = HeadlessBuffer;

  fn create_buffer(&mut self, level: usize, count: usize, stride: usize) -> Result<HeadlessBuffer, RenderError> {
    let requested = count * stride;
    if let Some(budget) = self.budget_bytes {
      let available = budget.saturating_sub(self.allocated_bytes);
      if requested > available {
        return Err(RenderError::OutOfMemory { requested, available });
      }
    }

    let id = self.next_id;
    self.next_id += 1;
    self.allocated_bytes += requested;
    self.buffers.insert(
      id,
      StoredBuffer {
        level,
        count,
        stride,
        data: vec![0; requested],
      },
    );
    Ok(HeadlessBuffer { id })
  }

  fn upload(&mut self, buffer: &mut HeadlessBuffer, data: &[u8]) {
    if let Some(stored) = self.buffers.get_mut(&buffer.id) {
      debug_assert_eq!(data.len(), stored.data.len(), "upload must fill the buffer exactly");
      stored.data.clear();
      stored.data.extend_from_slice(data);
      self.uploads += 1;
    }
  }

  fn draw_instanced(&mut self, draw: DrawInstanced<'_, HeadlessBuffer>) {
    let level = self.buffers.get(&draw.buffer.id).map_or(usize::MAX, |stored| stored.level);
    self.draws.push(RecordedDraw {
      level,
      buffer_id: draw.buffer.id,
      mesh: draw.mesh,
      material: draw.material,
      bounds: draw.bounds,
      instance_count: draw.instance_count,
    });
  }

  fn release_buffer(&mut self, buffer: HeadlessBuffer) {
    if let Some(stored) = self.buffers.remove(&buffer.id) {
      self.allocated_bytes -= stored.count * stored.stride;
    }
  }
}
