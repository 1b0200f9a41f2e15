//! Flattened five-way hierarchy.
//!
//! One [`LevelBuffer`] per depth level. There are no node objects and no
//! parent pointers: relations are computed from indices (see
//! [`crate::constants`]).
//!
//! # Module Structure
//!
//! - [`level`]: `LevelBuffer` - parts and output matrices of one level

pub mod level;

pub use level::LevelBuffer;

use glam::Mat4;
use tracing::debug;

use crate::config::validate_depth;
use crate::constants::total_node_count;
use crate::error::{FractalError, FractalResult};
use crate::types::PartState;

/// All levels of one fractal, root first.
#[derive(Clone, Debug)]
pub struct FractalHierarchy {
  levels: Vec<LevelBuffer>,
}

impl FractalHierarchy {
  /// Build a hierarchy of `depth` levels.
  ///
  /// Depth is validated before anything is allocated. Construction is
  /// all-or-nothing: if any level fails to allocate, the levels built so far
  /// are dropped and the error is returned.
  pub fn new(depth: usize) -> FractalResult<Self> {
    let depth = validate_depth(depth)?;

    let mut levels = Vec::with_capacity(depth);
    for level in 0..depth {
      levels.push(LevelBuffer::allocate(level)?);
    }

    debug!(depth, nodes = total_node_count(depth), "fractal hierarchy constructed");
    Ok(Self { levels })
  }

  /// Number of levels including the root.
  #[inline]
  pub fn depth(&self) -> usize {
    self.levels.len()
  }

  /// Total node count across all levels.
  #[inline]
  pub fn node_count(&self) -> usize {
    self.levels.iter().map(LevelBuffer::len).sum()
  }

  #[inline]
  pub fn levels(&self) -> &[LevelBuffer] {
    &self.levels
  }

  #[inline]
  pub fn level(&self, level: usize) -> Option<&LevelBuffer> {
    self.levels.get(level)
  }

  #[inline]
  pub fn level_mut(&mut self, level: usize) -> Option<&mut LevelBuffer> {
    self.levels.get_mut(level)
  }

  /// The single root part.
  #[inline]
  pub fn root(&self) -> &PartState {
    &self.levels[0].parts()[0]
  }

  /// Mutable root part and its output matrix.
  pub fn root_mut(&mut self) -> (&mut PartState, &mut Mat4) {
    let (parts, matrices) = self.levels[0].parts_and_matrices_mut();
    (&mut parts[0], &mut matrices[0])
  }

  /// Read-only parent level alongside the mutable child level.
  ///
  /// # Panics
  /// If `level` is 0 or not below `depth()`.
  pub fn parent_and_child_mut(&mut self, level: usize) -> (&LevelBuffer, &mut LevelBuffer) {
    assert!(
      level > 0 && level < self.depth(),
      "level {} has no parent in a hierarchy of depth {}",
      level,
      self.depth()
    );
    let (before, after) = self.levels.split_at_mut(level);
    (&before[level - 1], &mut after[0])
  }

  /// Copy out every part's state.
  pub fn snapshot(&self) -> HierarchySnapshot {
    HierarchySnapshot {
      levels: self.levels.iter().map(|level| level.parts().to_vec()).collect(),
    }
  }

  /// Return to a previously captured state.
  pub fn restore(&mut self, snapshot: &HierarchySnapshot) -> FractalResult<()> {
    if snapshot.depth() != self.depth() {
      return Err(FractalError::DepthMismatch {
        hierarchy: self.depth(),
        buffers: snapshot.depth(),
      });
    }
    for (level, parts) in self.levels.iter_mut().zip(&snapshot.levels) {
      level.restore_parts(parts);
    }
    Ok(())
  }
}

/// Saved part state of a whole hierarchy.
#[derive(Clone, Debug, PartialEq)]
pub struct HierarchySnapshot {
  levels: Vec<Vec<PartState>>,
}

impl HierarchySnapshot {
  #[inline]
  pub fn depth(&self) -> usize {
    self.levels.len()
  }

  #[inline]
  pub fn level(&self, level: usize) -> Option<&[PartState]> {
    self.levels.get(level).map(Vec::as_slice)
  }
}
