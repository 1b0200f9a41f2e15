//! FractalConfig - depth, render handles and animation settings.

use crate::constants::{DEFAULT_DEPTH, DEFAULT_SPIN_SPEED_DEGREES, MAX_DEPTH, MIN_DEPTH};
use crate::error::{FractalError, FractalResult};
use crate::presentation::{MaterialHandle, MeshHandle};

/// How a level's nodes are distributed over threads.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExecutionMode {
  /// Per-node work spread over rayon's pool.
  #[default]
  Parallel,

  /// Single-threaded, in index order. Reference path and the fallback for
  /// targets without worker threads.
  Sequential,
}

/// Configuration surface of a fractal component.
#[derive(Clone, Debug, PartialEq)]
pub struct FractalConfig {
  /// Number of levels including the root (1-8).
  pub depth: usize,

  /// Mesh drawn for every node, passed through to the renderer.
  pub mesh: MeshHandle,

  /// Material drawn for every node, passed through to the renderer.
  pub material: MaterialHandle,

  /// Self-rotation speed in degrees per second, shared by all nodes.
  pub spin_speed_degrees: f32,

  /// Threading of the per-level update.
  pub execution: ExecutionMode,
}

impl Default for FractalConfig {
  fn default() -> Self {
    Self {
      depth: DEFAULT_DEPTH,
      mesh: MeshHandle::default(),
      material: MaterialHandle::default(),
      spin_speed_degrees: DEFAULT_SPIN_SPEED_DEGREES,
      execution: ExecutionMode::default(),
    }
  }
}

impl FractalConfig {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_depth(mut self, depth: usize) -> Self {
    self.depth = depth;
    self
  }

  pub fn with_mesh(mut self, mesh: MeshHandle) -> Self {
    self.mesh = mesh;
    self
  }

  pub fn with_material(mut self, material: MaterialHandle) -> Self {
    self.material = material;
    self
  }

  pub fn with_spin_speed_degrees(mut self, degrees_per_second: f32) -> Self {
    self.spin_speed_degrees = degrees_per_second;
    self
  }

  pub fn with_execution(mut self, execution: ExecutionMode) -> Self {
    self.execution = execution;
    self
  }

  /// Reject configurations that cannot be constructed.
  pub fn validate(&self) -> FractalResult<()> {
    validate_depth(self.depth).map(|_| ())
  }

  /// Spin increment for a frame of `delta_time` seconds, in radians.
  #[inline]
  pub fn spin_angle_delta(&self, delta_time: f32) -> f64 {
    spin_angle_delta(self.spin_speed_degrees, delta_time)
  }
}

/// Spin increment in radians for `degrees_per_second` over `delta_time`.
#[inline]
pub fn spin_angle_delta(degrees_per_second: f32, delta_time: f32) -> f64 {
  f64::from(degrees_per_second).to_radians() * f64::from(delta_time)
}

/// Check a depth against `MIN_DEPTH..=MAX_DEPTH`.
pub fn validate_depth(depth: usize) -> FractalResult<usize> {
  if (MIN_DEPTH..=MAX_DEPTH).contains(&depth) {
    Ok(depth)
  } else {
    Err(FractalError::InvalidDepth {
      depth,
      min: MIN_DEPTH,
      max: MAX_DEPTH,
    })
  }
}

/// Clamp a raw slider/inspector value into the supported depth range.
pub fn clamp_depth(raw: i64) -> usize {
  raw.clamp(MIN_DEPTH as i64, MAX_DEPTH as i64) as usize
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
