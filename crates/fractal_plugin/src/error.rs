//! Error types for fractal construction, export and lifecycle misuse.

use std::collections::TryReserveError;

use thiserror::Error;

use crate::presentation::RenderError;

/// Result alias used throughout the crate.
pub type FractalResult<T> = Result<T, FractalError>;

#[derive(Debug, Error)]
pub enum FractalError {
  /// Configured depth is outside `MIN_DEPTH..=MAX_DEPTH`.
  #[error("fractal depth {depth} is outside the supported range {min}..={max}")]
  InvalidDepth { depth: usize, min: usize, max: usize },

  /// Hierarchy and instance buffers were built for different depths.
  #[error("hierarchy has depth {hierarchy} but instance buffers were built for depth {buffers}")]
  DepthMismatch { hierarchy: usize, buffers: usize },

  /// Host allocation for a level's arrays failed.
  #[error("failed to allocate {len} parts for level {level}")]
  AllocationFailed {
    level: usize,
    len: usize,
    #[source]
    source: TryReserveError,
  },

  /// The renderer could not provide a level's instance buffer.
  #[error("failed to create instance buffer for level {level} ({count} instances)")]
  BufferCreation {
    level: usize,
    count: usize,
    #[source]
    source: RenderError,
  },

  /// Update requested before enable or after disable.
  #[error("fractal update requested while the hierarchy is not constructed")]
  NotConstructed,

  /// A scheduled frame has not been completed yet.
  #[error("previous fractal frame is still in flight")]
  FrameInFlight,

  /// `end_update` called without a matching `begin_update`.
  #[error("no fractal frame is in flight")]
  NoFrameInFlight,

  /// The worker running a scheduled frame went away without returning state.
  #[error("frame worker exited without returning the hierarchy")]
  FrameWorkerLost,
}
