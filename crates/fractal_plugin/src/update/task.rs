//! LevelUpdateTask - per-level world transform propagation.
//!
//! ```text
//!            parent level (read-only, already updated this frame)
//!   ┌───────┬───────┬───────┐
//!   │  p0   │  p1   │  ...  │
//!   └───┬───┴───┬───┴───────┘
//!       │       └────────────────────────┐
//!   ┌───┴───┬───────┬───────┬──────┬─────┴─┬───────┬──
//!   │  c0   │  c1   │  c2   │  c3  │  c4   │  c5   │ ...   level being updated
//!   └───────┴───────┴───────┴──────┴───────┴───────┴──
//!        every child reads only parents[i / 5] and writes only itself
//! ```
//!
//! Per node:
//! 1. `spin += delta`
//! 2. `world_rot = parent_rot * (local_rot * spin_about_up(spin))`
//! 3. `world_pos = parent_pos + parent_rot * (1.5 * scale * direction)`
//! 4. `matrix = T(world_pos) * R(world_rot) * S(scale)`

use glam::Mat4;
use rayon::prelude::*;

use crate::config::ExecutionMode;
use crate::constants::{parent_index, BRANCHING, CHILD_OFFSET};
use crate::types::{compose_instance_matrix, rotation_about_local_up, PartState, RootTransform};

/// Below this many nodes per rayon job, splitting costs more than it saves.
const MIN_PARALLEL_CHUNK: usize = 64;

/// Advance the root from the host transform.
///
/// The root has no parent: its rotation is the host rotation composed with
/// its own spin, its position is the host position and its scale is the host
/// object scale.
#[inline]
pub fn update_root(root: &mut PartState, host: &RootTransform, spin_angle_delta: f64) -> Mat4 {
  root.spin_angle += spin_angle_delta;
  root.world_rotation =
    (host.rotation * (root.local_rotation * rotation_about_local_up(root.spin_angle))).normalize();
  root.world_position = host.position;
  compose_instance_matrix(root.world_position, root.world_rotation, host.scale)
}

/// Advance one non-root part from its already-updated parent.
#[inline]
pub fn update_part(parent: &PartState, part: &mut PartState, spin_angle_delta: f64, scale: f32) -> Mat4 {
  part.spin_angle += spin_angle_delta;
  part.world_rotation = (parent.world_rotation
    * (part.local_rotation * rotation_about_local_up(part.spin_angle)))
  .normalize();
  part.world_position =
    parent.world_position + parent.world_rotation * (CHILD_OFFSET * scale * part.direction);
  compose_instance_matrix(part.world_position, part.world_rotation, scale)
}

/// Update work for one level.
///
/// Borrows the parent level shared and the level itself exclusively, so
/// the only way to build a task is after every writer of the parent level
/// has finished.
pub struct LevelUpdateTask<'a> {
  parents: &'a [PartState],
  parts: &'a mut [PartState],
  matrices: &'a mut [Mat4],
  /// Spin increment broadcast to every node this frame.
  pub spin_angle_delta: f64,
  /// Uniform scale of this level.
  pub scale: f32,
}

impl<'a> LevelUpdateTask<'a> {
  pub fn new(
    parents: &'a [PartState],
    parts: &'a mut [PartState],
    matrices: &'a mut [Mat4],
    spin_angle_delta: f64,
    scale: f32,
  ) -> Self {
    debug_assert_eq!(parts.len(), parents.len() * BRANCHING, "level must be 5x its parent");
    debug_assert_eq!(parts.len(), matrices.len(), "one matrix per part");
    Self {
      parents,
      parts,
      matrices,
      spin_angle_delta,
      scale,
    }
  }

  /// Number of nodes this task updates.
  #[inline]
  pub fn len(&self) -> usize {
    self.parts.len()
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.parts.is_empty()
  }

  /// Update a single node.
  #[inline]
  pub fn execute(&mut self, index: usize) {
    let parent = &self.parents[parent_index(index)];
    self.matrices[index] = update_part(parent, &mut self.parts[index], self.spin_angle_delta, self.scale);
  }

  /// Run to completion. Returns once every node of the level is written.
  pub fn run(self, mode: ExecutionMode) {
    match mode {
      ExecutionMode::Parallel => self.run_parallel(),
      ExecutionMode::Sequential => self.run_sequential(),
    }
  }

  /// Index-order reference implementation.
  pub fn run_sequential(mut self) {
    for index in 0..self.len() {
      self.execute(index);
    }
  }

  /// Spread nodes over rayon's pool. Blocks until all of them are done.
  pub fn run_parallel(self) {
    let Self {
      parents,
      parts,
      matrices,
      spin_angle_delta,
      scale,
    } = self;

    parts
      .par_iter_mut()
      .zip(matrices.par_iter_mut())
      .enumerate()
      .with_min_len(MIN_PARALLEL_CHUNK)
      .for_each(|(index, (part, matrix))| {
        *matrix = update_part(&parents[parent_index(index)], part, spin_angle_delta, scale);
      });
  }
}

#[cfg(test)]
#[path = "task_test.rs"]
mod task_test;
