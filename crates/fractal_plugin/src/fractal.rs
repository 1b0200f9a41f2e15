//! Fractal - the component lifecycle around hierarchy, scheduler and renderer.
//!
//! ```text
//!            enable()                        disable() / drop
//!  Disabled ─────────► Ready ◄──────────────► Disabled
//!                      │  ▲
//!        begin_update()│  │end_update()
//!                      ▼  │
//!                    InFlight
//! ```
//!
//! `update` runs a whole frame (propagate, then export) on the calling
//! thread. `begin_update`/`end_update` split the same work around other
//! main-thread work; the hierarchy lives on the rayon pool in between.

use tracing::{debug, info, warn};

use crate::config::{validate_depth, FractalConfig};
use crate::error::{FractalError, FractalResult};
use crate::hierarchy::FractalHierarchy;
use crate::metrics::FrameMetrics;
use crate::presentation::{export_frame, InstanceBuffers, InstanceRenderer};
use crate::threading::{FrameHandle, FrameId};
use crate::update::{FrameInput, FrameStats, UpdateScheduler};

/// Hierarchy and GPU buffers, present only while enabled.
struct Constructed<B> {
  buffers: InstanceBuffers<B>,
  /// `None` while a scheduled frame owns it.
  hierarchy: Option<FractalHierarchy>,
  in_flight: Option<FrameHandle>,
}

/// Animated fractal bound to one renderer.
pub struct Fractal<R: InstanceRenderer> {
  config: FractalConfig,
  scheduler: UpdateScheduler,
  renderer: R,
  metrics: FrameMetrics,
  constructed: Option<Constructed<R::Buffer>>,
}

impl<R: InstanceRenderer> Fractal<R> {
  /// Create a disabled component. Nothing is allocated until [`enable`](Self::enable).
  pub fn new(config: FractalConfig, renderer: R) -> Self {
    Self {
      scheduler: UpdateScheduler::from_config(&config),
      config,
      renderer,
      metrics: FrameMetrics::new(),
      constructed: None,
    }
  }

  /// Build the hierarchy and one instance buffer per level.
  ///
  /// All or nothing: on error the component stays disabled and holds no
  /// buffers. Enabling an enabled component does nothing.
  pub fn enable(&mut self) -> FractalResult<()> {
    if self.constructed.is_some() {
      return Ok(());
    }
    self.config.validate()?;

    let depth = self.config.depth;
    let hierarchy = FractalHierarchy::new(depth)?;
    let buffers = InstanceBuffers::create(&mut self.renderer, depth)?;

    info!(depth, nodes = hierarchy.node_count(), "fractal enabled");
    self.constructed = Some(Constructed {
      buffers,
      hierarchy: Some(hierarchy),
      in_flight: None,
    });
    Ok(())
  }

  /// Release the hierarchy and every instance buffer. Safe to call repeatedly.
  ///
  /// A frame still in flight is waited for and discarded.
  pub fn disable(&mut self) {
    let Some(mut constructed) = self.constructed.take() else {
      return;
    };
    if let Some(handle) = constructed.in_flight.take() {
      debug!(frame = handle.id().raw(), "discarding in-flight frame on disable");
      let _ = handle.complete();
    }
    constructed.buffers.release(&mut self.renderer);
    info!(depth = self.config.depth, "fractal disabled");
  }

  /// Change the depth. An enabled component is torn down and rebuilt.
  ///
  /// An invalid depth is rejected before anything is released.
  pub fn set_depth(&mut self, depth: usize) -> FractalResult<()> {
    validate_depth(depth)?;
    if depth == self.config.depth {
      return Ok(());
    }

    let was_enabled = self.is_enabled();
    let previous = self.config.depth;
    self.disable();
    self.config.depth = depth;
    if was_enabled {
      info!(from = previous, to = depth, "rebuilding fractal for new depth");
      self.enable()?;
    }
    Ok(())
  }

  /// Applies from the next frame on.
  pub fn set_spin_speed_degrees(&mut self, degrees_per_second: f32) {
    self.config.spin_speed_degrees = degrees_per_second;
    self.scheduler = UpdateScheduler::from_config(&self.config);
  }

  /// Propagate one frame and export it, blocking until done.
  pub fn update(&mut self, input: FrameInput) -> FractalResult<FrameStats> {
    let Some(constructed) = self.constructed.as_mut() else {
      warn!("fractal update before enable, ignoring frame");
      return Err(FractalError::NotConstructed);
    };
    let Some(hierarchy) = constructed.hierarchy.as_mut() else {
      return Err(FractalError::FrameInFlight);
    };

    let frame = self.scheduler.run_frame(hierarchy, &input);
    let instances = export_frame(
      &mut self.renderer,
      &mut constructed.buffers,
      hierarchy,
      self.config.mesh,
      self.config.material,
      frame.bounds,
    )?;
    self.metrics.record_frame(&frame.stats, instances);
    Ok(frame.stats)
  }

  /// Start propagating a frame on the worker pool.
  pub fn begin_update(&mut self, input: FrameInput) -> FractalResult<FrameId> {
    let Some(constructed) = self.constructed.as_mut() else {
      warn!("fractal update before enable, ignoring frame");
      return Err(FractalError::NotConstructed);
    };
    let Some(hierarchy) = constructed.hierarchy.take() else {
      return Err(FractalError::FrameInFlight);
    };

    let handle = self.scheduler.schedule(hierarchy, input);
    let id = handle.id();
    constructed.in_flight = Some(handle);
    Ok(id)
  }

  /// Wait for the frame started by [`begin_update`](Self::begin_update) and export it.
  ///
  /// If the worker is lost the hierarchy is gone with it, so the component
  /// is disabled before the error is returned.
  pub fn end_update(&mut self) -> FractalResult<FrameStats> {
    let Some(constructed) = self.constructed.as_mut() else {
      return Err(FractalError::NotConstructed);
    };
    let Some(handle) = constructed.in_flight.take() else {
      return Err(FractalError::NoFrameInFlight);
    };

    let (hierarchy, frame) = match handle.complete() {
      Ok(completed) => completed,
      Err(err) => {
        self.disable();
        return Err(err);
      }
    };

    let exported = export_frame(
      &mut self.renderer,
      &mut constructed.buffers,
      &hierarchy,
      self.config.mesh,
      self.config.material,
      frame.bounds,
    );
    constructed.hierarchy = Some(hierarchy);
    let instances = exported?;
    self.metrics.record_frame(&frame.stats, instances);
    Ok(frame.stats)
  }

  #[inline]
  pub fn is_enabled(&self) -> bool {
    self.constructed.is_some()
  }

  pub fn is_frame_in_flight(&self) -> bool {
    self.constructed.as_ref().is_some_and(|c| c.in_flight.is_some())
  }

  /// Current hierarchy, `None` while disabled or while a frame is in flight.
  pub fn hierarchy(&self) -> Option<&FractalHierarchy> {
    self.constructed.as_ref().and_then(|c| c.hierarchy.as_ref())
  }

  pub fn config(&self) -> &FractalConfig {
    &self.config
  }

  pub fn renderer(&self) -> &R {
    &self.renderer
  }

  pub fn renderer_mut(&mut self) -> &mut R {
    &mut self.renderer
  }

  pub fn metrics(&self) -> &FrameMetrics {
    &self.metrics
  }
}

impl<R: InstanceRenderer> Drop for Fractal<R> {
  fn drop(&mut self) {
    self.disable();
  }
}

#[cfg(test)]
#[path = "fractal_test.rs"]
mod fractal_test;
