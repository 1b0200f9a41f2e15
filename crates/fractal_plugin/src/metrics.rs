//! Engine-agnostic frame metrics for the fractal update.
//!
//! Feature-gated and runtime-toggled. Without `--features metrics` every
//! `record_*` call is a no-op.
//!
//! # Usage
//!
//! ```ignore
//! use fractal_plugin::metrics::{FrameMetrics, COLLECT_METRICS};
//!
//! // Runtime toggle:
//! COLLECT_METRICS.store(false, Ordering::Relaxed);
//!
//! metrics.record_frame(&stats, instances);
//! println!("avg frame: {:.1}us", metrics.avg_frame_us());
//! ```

use std::collections::VecDeque;
#[cfg(feature = "metrics")]
use std::sync::atomic::Ordering;
use std::sync::atomic::AtomicBool;

use crate::constants::MAX_DEPTH;
use crate::update::FrameStats;

/// Runtime toggle for metrics collection.
pub static COLLECT_METRICS: AtomicBool = AtomicBool::new(true);

/// True when compiled with `metrics` and not switched off at runtime.
#[inline]
pub fn is_enabled() -> bool {
  #[cfg(feature = "metrics")]
  {
    COLLECT_METRICS.load(Ordering::Relaxed)
  }
  #[cfg(not(feature = "metrics"))]
  {
    false
  }
}

/// Fixed-capacity history, oldest values evicted first.
#[derive(Debug, Clone)]
pub struct RollingWindow<T> {
  buffer: VecDeque<T>,
  capacity: usize,
}

impl<T> RollingWindow<T> {
  pub fn new(capacity: usize) -> Self {
    Self {
      buffer: VecDeque::with_capacity(capacity),
      capacity,
    }
  }

  /// Push a new value, evicting the oldest if at capacity.
  pub fn push(&mut self, value: T) {
    if self.buffer.len() >= self.capacity {
      self.buffer.pop_front();
    }
    self.buffer.push_back(value);
  }

  pub fn len(&self) -> usize {
    self.buffer.len()
  }

  pub fn is_empty(&self) -> bool {
    self.buffer.is_empty()
  }

  pub fn clear(&mut self) {
    self.buffer.clear();
  }

  /// Oldest to newest.
  pub fn iter(&self) -> impl Iterator<Item = &T> {
    self.buffer.iter()
  }

  pub fn last(&self) -> Option<&T> {
    self.buffer.back()
  }
}

impl RollingWindow<u64> {
  pub fn sum(&self) -> u64 {
    self.buffer.iter().sum()
  }

  pub fn average(&self) -> f64 {
    if self.buffer.is_empty() {
      0.0
    } else {
      self.sum() as f64 / self.buffer.len() as f64
    }
  }

  pub fn min_max(&self) -> Option<(u64, u64)> {
    let min = self.buffer.iter().min()?;
    let max = self.buffer.iter().max()?;
    Some((*min, *max))
  }
}

impl Default for RollingWindow<u64> {
  fn default() -> Self {
    Self::new(128) // ~2 seconds at 60fps
  }
}

/// Update cost of the fractal over recent frames.
#[derive(Debug, Clone, Default)]
pub struct FrameMetrics {
  /// Whole update chain per frame, microseconds.
  pub frame_timings: RollingWindow<u64>,
  /// Per-level history, index = level.
  pub level_timings: [RollingWindow<u64>; MAX_DEPTH],

  pub last_frame_us: u64,
  /// Frames recorded since creation.
  pub frames_updated: u64,
  /// Instances handed to the renderer since creation.
  pub instances_exported: u64,
}

impl FrameMetrics {
  pub fn new() -> Self {
    Self::default()
  }

  /// Record one completed and exported frame.
  pub fn record_frame(&mut self, stats: &FrameStats, instances: usize) {
    if !is_enabled() {
      return;
    }

    self.frame_timings.push(stats.total_us);
    for (window, &us) in self.level_timings.iter_mut().zip(stats.level_us.iter()) {
      window.push(us);
    }
    self.last_frame_us = stats.total_us;
    self.frames_updated += 1;
    self.instances_exported += instances as u64;
  }

  /// Clear timing history. Cumulative counters are kept.
  pub fn reset(&mut self) {
    self.frame_timings.clear();
    for window in &mut self.level_timings {
      window.clear();
    }
    self.last_frame_us = 0;
  }

  pub fn avg_frame_us(&self) -> f64 {
    self.frame_timings.average()
  }

  /// Average update time of one level, 0 for levels never recorded.
  pub fn avg_level_us(&self, level: usize) -> f64 {
    self.level_timings.get(level).map_or(0.0, RollingWindow::average)
  }
}

#[cfg(all(test, feature = "metrics"))]
mod tests {
  use smallvec::smallvec;

  use super::*;

  fn stats(level_us: &[u64], total_us: u64) -> FrameStats {
    FrameStats {
      node_count: 31,
      spin_angle_delta: 0.01,
      level_us: level_us.iter().copied().collect(),
      total_us,
    }
  }

  #[test]
  fn test_rolling_window() {
    let mut window = RollingWindow::new(3);
    assert!(window.is_empty());

    window.push(10u64);
    window.push(20);
    window.push(30);
    assert_eq!(window.sum(), 60);
    assert_eq!(window.average(), 20.0);

    // Oldest evicted
    window.push(40);
    assert_eq!(window.len(), 3);
    assert_eq!(window.sum(), 90);
    assert_eq!(window.min_max(), Some((20, 40)));
    assert_eq!(window.last(), Some(&40));
  }

  #[test]
  fn test_record_frame() {
    let mut metrics = FrameMetrics::new();

    metrics.record_frame(&stats(&[1, 10, 50], 100), 31);
    metrics.record_frame(&stats(&[3, 20, 70], 200), 31);

    assert_eq!(metrics.frames_updated, 2);
    assert_eq!(metrics.instances_exported, 62);
    assert_eq!(metrics.last_frame_us, 200);
    assert_eq!(metrics.avg_frame_us(), 150.0);
    assert_eq!(metrics.avg_level_us(0), 2.0);
    assert_eq!(metrics.avg_level_us(2), 60.0);
    assert_eq!(metrics.avg_level_us(5), 0.0);
  }

  #[test]
  fn test_reset_keeps_counters() {
    let mut metrics = FrameMetrics::new();
    metrics.record_frame(&FrameStats {
      level_us: smallvec![5],
      total_us: 5,
      ..Default::default()
    }, 1);

    metrics.reset();

    assert!(metrics.frame_timings.is_empty());
    assert_eq!(metrics.avg_level_us(0), 0.0);
    assert_eq!(metrics.frames_updated, 1);
  }
}
