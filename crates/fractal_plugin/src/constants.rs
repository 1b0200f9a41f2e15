//! Layout constants for the five-way fractal hierarchy.
//!
//! The tree is never stored as linked nodes. Each depth level is one flat
//! array and parent/child relations are pure index arithmetic.
//!
//! # Level Layout
//!
//! ```text
//! level 0:  [ 0 ]                                            1 node
//!             │
//!             ├──────┬──────┬──────┬──────┐
//! level 1:  [ 0 ]  [ 1 ]  [ 2 ]  [ 3 ]  [ 4 ]                5 nodes
//!             │      │
//!             │      └──────────────────────────┐
//!             ├────┬────┬────┬────┐             ├────┬─ ...
//! level 2:  [ 0 ][ 1 ][ 2 ][ 3 ][ 4 ]         [ 5 ][ 6 ] ... 25 nodes
//!
//! parent_index = index / 5
//! child_slot   = index % 5
//! children(p)  = 5p .. 5p + 4
//! ```
//!
//! # Slot Templates
//!
//! ```text
//! slot  direction   local rotation
//!  0    up (+Y)     identity
//!  1    right (+X)  -90° about Z
//!  2    left (-X)   +90° about Z
//!  3    fwd (+Z)    +90° about X
//!  4    back (-Z)   -90° about X
//! ```
//!
//! Each slot rotation maps the parent's up axis onto the slot direction, so a
//! child always grows "outward" along its own local up.

use glam::{Quat, Vec3};

/// Children per node.
pub const BRANCHING: usize = 5;

/// Shallowest supported hierarchy (root only).
pub const MIN_DEPTH: usize = 1;

/// Deepest supported hierarchy (5^7 = 78125 leaves).
pub const MAX_DEPTH: usize = 8;

/// Depth used when none is configured.
pub const DEFAULT_DEPTH: usize = 4;

/// Child offset from its parent, in units of the child's own scale.
pub const CHILD_OFFSET: f32 = 1.5;

/// Scale multiplier applied per level below the root.
pub const LEVEL_SCALE_FACTOR: f32 = 0.5;

/// Bounding sphere radius in units of the root object scale.
pub const BOUNDS_RADIUS_FACTOR: f32 = 3.0;

/// Default spin speed in degrees per second.
pub const DEFAULT_SPIN_SPEED_DEGREES: f32 = 22.5;

/// Floats per instance matrix (one column-major 4x4).
pub const MATRIX_STRIDE_FLOATS: usize = 16;

/// Bytes per instance matrix in a GPU buffer.
pub const MATRIX_STRIDE_BYTES: usize = MATRIX_STRIDE_FLOATS * std::mem::size_of::<f32>();

/// Growth direction per child slot.
pub const SLOT_DIRECTIONS: [Vec3; BRANCHING] = [Vec3::Y, Vec3::X, Vec3::NEG_X, Vec3::Z, Vec3::NEG_Z];

/// sin(45°) = cos(45°), half-angle of a quarter turn.
const QUARTER_TURN_HALF: f32 = std::f32::consts::FRAC_1_SQRT_2;

/// Fixed local orientation per child slot.
pub const SLOT_ROTATIONS: [Quat; BRANCHING] = [
  Quat::IDENTITY,
  Quat::from_xyzw(0.0, 0.0, -QUARTER_TURN_HALF, QUARTER_TURN_HALF), // -90° Z
  Quat::from_xyzw(0.0, 0.0, QUARTER_TURN_HALF, QUARTER_TURN_HALF),  // +90° Z
  Quat::from_xyzw(QUARTER_TURN_HALF, 0.0, 0.0, QUARTER_TURN_HALF),  // +90° X
  Quat::from_xyzw(-QUARTER_TURN_HALF, 0.0, 0.0, QUARTER_TURN_HALF), // -90° X
];

/// Number of nodes in a level (5^level).
#[inline(always)]
pub const fn level_len(level: usize) -> usize {
  BRANCHING.pow(level as u32)
}

/// Total nodes across all levels of a hierarchy: (5^depth - 1) / 4.
#[inline(always)]
pub const fn total_node_count(depth: usize) -> usize {
  (BRANCHING.pow(depth as u32) - 1) / (BRANCHING - 1)
}

/// Index of a node's parent within the previous level.
#[inline(always)]
pub const fn parent_index(index: usize) -> usize {
  index / BRANCHING
}

/// Slot (0-4) a node occupies among its siblings.
#[inline(always)]
pub const fn child_slot(index: usize) -> usize {
  index % BRANCHING
}

/// Index of a parent's first child in the next level.
#[inline(always)]
pub const fn first_child_index(parent: usize) -> usize {
  parent * BRANCHING
}

/// Uniform scale of a level, halving once per level below the root.
#[inline]
pub fn level_scale(object_scale: f32, level: usize) -> f32 {
  (0..level).fold(object_scale, |scale, _| scale * LEVEL_SCALE_FACTOR)
}

#[cfg(test)]
#[path = "constants_test.rs"]
mod constants_test;
