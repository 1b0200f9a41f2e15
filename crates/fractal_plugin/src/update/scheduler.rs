//! UpdateScheduler - drives one frame down the level chain.
//!
//! ```text
//!  host transform ──► root (sync) ──► level 1 ──► level 2 ──► ... ──► level d-1
//!                                        │           │                  │
//!                                   par_iter     par_iter           par_iter
//!                                        └─ barrier ─┴─ barrier ── ... ─┘
//! ```
//!
//! Each level is a rayon parallel-for that returns only when all of its nodes
//! are written. The loop launching the next level is the barrier, so level k
//! never observes a partially updated level k-1.

use smallvec::SmallVec;
use web_time::Instant;

use crate::config::{spin_angle_delta, ExecutionMode, FractalConfig};
use crate::constants::{DEFAULT_SPIN_SPEED_DEGREES, LEVEL_SCALE_FACTOR, MAX_DEPTH};
use crate::hierarchy::FractalHierarchy;
use crate::types::{BoundingSphere, RootTransform};

use super::task::{update_root, LevelUpdateTask};

/// Host inputs for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameInput {
  /// Seconds since the previous frame.
  pub delta_time: f32,
  /// Root transform from the host, read once per frame.
  pub root: RootTransform,
}

impl FrameInput {
  pub fn new(delta_time: f32, root: RootTransform) -> Self {
    Self { delta_time, root }
  }
}

/// Timing and size of one completed frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameStats {
  /// Nodes updated (all levels).
  pub node_count: usize,
  /// Spin increment applied to every node, in radians.
  pub spin_angle_delta: f64,
  /// Update time per level in microseconds, root first.
  pub level_us: SmallVec<[u64; MAX_DEPTH]>,
  /// Whole chain in microseconds.
  pub total_us: u64,
}

/// Result of a fully propagated frame, ready for export.
#[derive(Clone, Debug, PartialEq)]
pub struct CompletedFrame {
  /// Shared culling bound for every level's draw.
  pub bounds: BoundingSphere,
  pub stats: FrameStats,
}

/// Frame driver for a [`FractalHierarchy`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UpdateScheduler {
  spin_speed_degrees: f32,
  execution: ExecutionMode,
}

impl Default for UpdateScheduler {
  fn default() -> Self {
    Self::new(DEFAULT_SPIN_SPEED_DEGREES, ExecutionMode::default())
  }
}

impl UpdateScheduler {
  pub fn new(spin_speed_degrees: f32, execution: ExecutionMode) -> Self {
    Self {
      spin_speed_degrees,
      execution,
    }
  }

  pub fn from_config(config: &FractalConfig) -> Self {
    Self::new(config.spin_speed_degrees, config.execution)
  }

  #[inline]
  pub fn execution(&self) -> ExecutionMode {
    self.execution
  }

  /// Spin increment in radians for a frame of `delta_time` seconds.
  #[inline]
  pub fn spin_angle_delta(&self, delta_time: f32) -> f64 {
    spin_angle_delta(self.spin_speed_degrees, delta_time)
  }

  /// Propagate one frame through every level and block until done.
  ///
  /// On return every level's parts and matrices reflect this frame.
  #[cfg_attr(feature = "profiling", tracing::instrument(skip_all, name = "fractal::update_frame"))]
  pub fn run_frame(&self, hierarchy: &mut FractalHierarchy, input: &FrameInput) -> CompletedFrame {
    let frame_start = Instant::now();
    let spin_angle_delta = self.spin_angle_delta(input.delta_time);
    let mut level_us = SmallVec::new();

    {
      #[cfg(feature = "profiling")]
      let _span = tracing::info_span!("root_update").entered();

      let start = Instant::now();
      let (root, matrix) = hierarchy.root_mut();
      *matrix = update_root(root, &input.root, spin_angle_delta);
      level_us.push(start.elapsed().as_micros() as u64);
    }

    let mut scale = input.root.scale;
    for level in 1..hierarchy.depth() {
      #[cfg(feature = "profiling")]
      let _span = tracing::info_span!("level_update", level).entered();

      scale *= LEVEL_SCALE_FACTOR;
      let start = Instant::now();
      let (parents, current) = hierarchy.parent_and_child_mut(level);
      let (parts, matrices) = current.parts_and_matrices_mut();
      LevelUpdateTask::new(parents.parts(), parts, matrices, spin_angle_delta, scale).run(self.execution);
      level_us.push(start.elapsed().as_micros() as u64);
    }

    let bounds = BoundingSphere::around_root(hierarchy.root().world_position, input.root.scale);
    CompletedFrame {
      bounds,
      stats: FrameStats {
        node_count: hierarchy.node_count(),
        spin_angle_delta,
        level_us,
        total_us: frame_start.elapsed().as_micros() as u64,
      },
    }
  }
}

#[cfg(test)]
#[path = "scheduler_test.rs"]
mod scheduler_test;
