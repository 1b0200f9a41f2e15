//! Schedule-then-complete frame updates on rayon.
//!
//! [`UpdateScheduler::schedule`] moves the hierarchy onto rayon's pool and
//! runs the whole level chain there. The caller keeps doing other frame work
//! and later calls [`FrameHandle::complete`], which blocks until the chain
//! finishes and hands the hierarchy back.
//!
//! # Usage
//!
//! ```ignore
//! let handle = scheduler.schedule(hierarchy, FrameInput::new(dt, root));
//!
//! // ... other main thread work ...
//!
//! let (hierarchy, frame) = handle.complete()?;
//! export_frame(&mut renderer, &mut buffers, &hierarchy, mesh, material, frame.bounds)?;
//! ```
//!
//! Ownership of the hierarchy moves into the job, so a second frame cannot
//! start until the first one has been completed.

use std::sync::atomic::{AtomicU64, Ordering};

use crossbeam_channel::{bounded, Receiver};
use tracing::warn;

use crate::config::ExecutionMode;
use crate::error::{FractalError, FractalResult};
use crate::hierarchy::FractalHierarchy;
use crate::update::{CompletedFrame, FrameInput, UpdateScheduler};

/// Identifier of a scheduled frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameId(u64);

impl FrameId {
  fn next() -> Self {
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    Self(COUNTER.fetch_add(1, Ordering::Relaxed))
  }

  pub fn raw(&self) -> u64 {
    self.0
  }
}

/// Pending frame. Dropping it without completing discards the hierarchy.
pub struct FrameHandle {
  id: FrameId,
  receiver: Receiver<(FractalHierarchy, CompletedFrame)>,
}

impl FrameHandle {
  pub fn id(&self) -> FrameId {
    self.id
  }

  /// True once the chain has finished and `complete` will not block.
  pub fn is_complete(&self) -> bool {
    !self.receiver.is_empty()
  }

  /// Block until every level is updated, returning the hierarchy.
  pub fn complete(self) -> FractalResult<(FractalHierarchy, CompletedFrame)> {
    self.receiver.recv().map_err(|_| {
      warn!(frame = self.id.raw(), "frame worker dropped without returning the hierarchy");
      FractalError::FrameWorkerLost
    })
  }
}

impl std::fmt::Debug for FrameHandle {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("FrameHandle")
      .field("id", &self.id)
      .field("complete", &self.is_complete())
      .finish()
  }
}

impl UpdateScheduler {
  /// Start a frame without waiting for it.
  ///
  /// In [`ExecutionMode::Sequential`] the frame runs inline on the calling
  /// thread and the returned handle is already complete.
  pub fn schedule(&self, hierarchy: FractalHierarchy, input: FrameInput) -> FrameHandle {
    let id = FrameId::next();
    let (sender, receiver) = bounded(1);
    let scheduler = *self;

    let job = move || {
      let mut hierarchy = hierarchy;
      let frame = scheduler.run_frame(&mut hierarchy, &input);
      // Receiver gone means the caller abandoned the frame.
      let _ = sender.send((hierarchy, frame));
    };

    match self.execution() {
      ExecutionMode::Parallel => rayon::spawn(job),
      ExecutionMode::Sequential => job(),
    }

    FrameHandle { id, receiver }
  }
}

// =============================================================================
// Tests
// =============================================================================
