//! LevelBuffer - one depth tier of parts plus its output matrices.

use glam::Mat4;

use crate::constants::{level_len, parent_index, BRANCHING};
use crate::error::{FractalError, FractalResult};
use crate::types::{PartState, Slot};

/// Fixed-size storage for one hierarchy level.
///
/// `parts` and `matrices` always have exactly `5^level` entries. Part `i`
/// is a child of part `i / 5` in the previous level.
#[derive(Clone, Debug)]
pub struct LevelBuffer {
  level: usize,
  parts: Vec<PartState>,
  matrices: Vec<Mat4>,
}

impl LevelBuffer {
  /// Allocate and populate a level from the slot templates.
  ///
  /// Allocation goes through `try_reserve_exact`, so running out of memory
  /// surfaces as [`FractalError::AllocationFailed`] instead of aborting.
  pub fn allocate(level: usize) -> FractalResult<Self> {
    let len = level_len(level);

    let mut parts = Vec::new();
    parts
      .try_reserve_exact(len)
      .map_err(|source| FractalError::AllocationFailed { level, len, source })?;
    let mut matrices = Vec::new();
    matrices
      .try_reserve_exact(len)
      .map_err(|source| FractalError::AllocationFailed { level, len, source })?;

    parts.resize(len, PartState::default());
    matrices.resize(len, Mat4::IDENTITY);

    let mut buffer = Self {
      level,
      parts,
      matrices,
    };
    buffer.populate();
    Ok(buffer)
  }

  /// Write slot templates: the root takes slot 0, every other level is laid
  /// out as contiguous blocks of five children per parent.
  fn populate(&mut self) {
    if self.level == 0 {
      self.parts[0] = PartState::from_slot(Slot::Up);
      return;
    }
    for siblings in self.parts.chunks_exact_mut(BRANCHING) {
      for (part, slot) in siblings.iter_mut().zip(Slot::ALL) {
        *part = PartState::from_slot(slot);
      }
    }
  }

  /// Depth of this level (0 = root).
  #[inline]
  pub fn level(&self) -> usize {
    self.level
  }

  #[inline]
  pub fn len(&self) -> usize {
    self.parts.len()
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.parts.is_empty()
  }

  #[inline]
  pub fn parts(&self) -> &[PartState] {
    &self.parts
  }

  /// Output matrices from the most recent update.
  #[inline]
  pub fn matrices(&self) -> &[Mat4] {
    &self.matrices
  }

  #[inline]
  pub fn part(&self, index: usize) -> Option<&PartState> {
    self.parts.get(index)
  }

  /// Parent index of `index`, or `None` for the root level.
  #[inline]
  pub fn parent_of(&self, index: usize) -> Option<usize> {
    (self.level > 0 && index < self.len()).then(|| parent_index(index))
  }

  /// Disjoint mutable views for an update task.
  #[inline]
  pub fn parts_and_matrices_mut(&mut self) -> (&mut [PartState], &mut [Mat4]) {
    (&mut self.parts, &mut self.matrices)
  }

  /// Overwrite parts from a snapshot of the same length.
  pub(crate) fn restore_parts(&mut self, parts: &[PartState]) {
    self.parts.copy_from_slice(parts);
  }
}

#[cfg(test)]
#[path = "level_test.rs"]
mod level_test;
