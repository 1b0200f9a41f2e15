//! Core data types for the fractal hierarchy.

use std::f64::consts::TAU;

use glam::{Mat4, Quat, Vec3};

use crate::constants::{BOUNDS_RADIUS_FACTOR, BRANCHING, SLOT_DIRECTIONS, SLOT_ROTATIONS};

/// Position of a child among its parent's five children.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Slot {
  Up = 0,
  Right = 1,
  Left = 2,
  Forward = 3,
  Back = 4,
}

impl Slot {
  /// All slots in index order.
  pub const ALL: [Slot; BRANCHING] = [Slot::Up, Slot::Right, Slot::Left, Slot::Forward, Slot::Back];

  /// Slot occupied by the node at `index` within its level.
  #[inline]
  pub fn from_index(index: usize) -> Self {
    Self::ALL[index % BRANCHING]
  }

  #[inline]
  pub fn index(self) -> usize {
    self as usize
  }

  /// Growth direction in the parent's local frame.
  #[inline]
  pub fn direction(self) -> Vec3 {
    SLOT_DIRECTIONS[self as usize]
  }

  /// Fixed orientation relative to the parent.
  #[inline]
  pub fn local_rotation(self) -> Quat {
    SLOT_ROTATIONS[self as usize]
  }
}

/// Self-rotation around the local up axis for an accumulated spin angle.
///
/// The angle grows without bound over a long run. It is kept in `f64` and
/// wrapped into `[0, 2π)` before narrowing, so the resulting rotation keeps
/// full `f32` precision no matter how long the fractal has been spinning.
#[inline]
pub fn rotation_about_local_up(spin_angle: f64) -> Quat {
  Quat::from_rotation_y(spin_angle.rem_euclid(TAU) as f32)
}

/// Combined translate ∘ rotate ∘ uniform-scale instance transform.
#[inline]
pub fn compose_instance_matrix(position: Vec3, rotation: Quat, scale: f32) -> Mat4 {
  Mat4::from_scale_rotation_translation(Vec3::splat(scale), rotation, position)
}

/// State of one hierarchy node.
///
/// `direction` and `local_rotation` come from the slot template and never
/// change. `spin_angle` accumulates every frame. The world fields are
/// recomputed from the parent every frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PartState {
  /// Growth direction in the parent's frame.
  pub direction: Vec3,
  /// Fixed orientation relative to the parent.
  pub local_rotation: Quat,
  /// Accumulated self-rotation in radians (monotonic, never reset).
  pub spin_angle: f64,
  /// Derived world-space position.
  pub world_position: Vec3,
  /// Derived world-space orientation.
  pub world_rotation: Quat,
}

impl PartState {
  /// Fresh part populated from a slot template.
  pub fn from_slot(slot: Slot) -> Self {
    Self {
      direction: slot.direction(),
      local_rotation: slot.local_rotation(),
      spin_angle: 0.0,
      world_position: Vec3::ZERO,
      world_rotation: Quat::IDENTITY,
    }
  }

  /// Slot this part was populated from, if it matches a template exactly.
  pub fn slot(&self) -> Option<Slot> {
    Slot::ALL
      .into_iter()
      .find(|slot| slot.direction() == self.direction && slot.local_rotation() == self.local_rotation)
  }
}

impl Default for PartState {
  fn default() -> Self {
    Self::from_slot(Slot::Up)
  }
}

/// Host-provided transform of the fractal root, read once per frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RootTransform {
  pub position: Vec3,
  pub rotation: Quat,
  /// Uniform object scale of the root.
  pub scale: f32,
}

impl RootTransform {
  pub const IDENTITY: Self = Self {
    position: Vec3::ZERO,
    rotation: Quat::IDENTITY,
    scale: 1.0,
  };

  pub fn new(position: Vec3, rotation: Quat, scale: f32) -> Self {
    Self {
      position,
      rotation,
      scale,
    }
  }

  pub fn from_translation(position: Vec3) -> Self {
    Self {
      position,
      ..Self::IDENTITY
    }
  }
}

impl Default for RootTransform {
  fn default() -> Self {
    Self::IDENTITY
  }
}

/// Conservative culling bound shared by every level's draw.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingSphere {
  pub center: Vec3,
  pub radius: f32,
}

impl BoundingSphere {
  pub fn new(center: Vec3, radius: f32) -> Self {
    Self { center, radius }
  }

  /// Sphere around the root's world position, radius `3 * object_scale`.
  pub fn around_root(root_position: Vec3, object_scale: f32) -> Self {
    Self {
      center: root_position,
      radius: BOUNDS_RADIUS_FACTOR * object_scale,
    }
  }

  #[inline]
  pub fn contains_point(&self, point: Vec3) -> bool {
    self.center.distance_squared(point) <= self.radius * self.radius
  }

  /// Axis-aligned box enclosing the sphere, for backends that cull by AABB.
  pub fn to_aabb(&self) -> (Vec3, Vec3) {
    let extent = Vec3::splat(self.radius);
    (self.center - extent, self.center + extent)
  }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;
