use glam::{Quat, Vec3};

use super::*;
use crate::config::ExecutionMode;
use crate::constants::{total_node_count, MATRIX_STRIDE_BYTES};
use crate::headless::HeadlessRenderer;
use crate::presentation::{MaterialHandle, MeshHandle};
use crate::types::RootTransform;

fn config(depth: usize) -> FractalConfig {
  FractalConfig::new()
    .with_depth(depth)
    .with_mesh(MeshHandle(1))
    .with_material(MaterialHandle(2))
}

fn input() -> FrameInput {
  FrameInput::new(
    1.0 / 60.0,
    RootTransform::new(Vec3::new(0.0, 1.0, 0.0), Quat::from_rotation_y(0.3), 2.0),
  )
}

#[test]
fn test_update_before_enable_is_rejected() {
  let mut fractal = Fractal::new(config(3), HeadlessRenderer::new());

  assert!(matches!(fractal.update(input()), Err(FractalError::NotConstructed)));
  assert!(matches!(fractal.begin_update(input()), Err(FractalError::NotConstructed)));
  assert!(fractal.renderer().draws().is_empty());
}

#[test]
fn test_update_after_disable_is_rejected() {
  let mut fractal = Fractal::new(config(3), HeadlessRenderer::new());
  fractal.enable().unwrap();
  fractal.disable();

  assert!(matches!(fractal.update(input()), Err(FractalError::NotConstructed)));
}

#[test]
fn test_enable_builds_hierarchy_and_buffers() {
  let mut fractal = Fractal::new(config(4), HeadlessRenderer::new());
  fractal.enable().unwrap();

  assert!(fractal.is_enabled());
  assert_eq!(fractal.hierarchy().unwrap().node_count(), total_node_count(4));
  assert_eq!(fractal.renderer().live_buffer_count(), 4);
  assert_eq!(fractal.renderer().allocated_bytes(), total_node_count(4) * MATRIX_STRIDE_BYTES);
}

#[test]
fn test_invalid_depth_allocates_nothing() {
  for depth in [0, 9] {
    let mut fractal = Fractal::new(config(depth), HeadlessRenderer::new());

    let err = fractal.enable().unwrap_err();

    assert!(matches!(err, FractalError::InvalidDepth { .. }));
    assert!(!fractal.is_enabled());
    assert_eq!(fractal.renderer().live_buffer_count(), 0);
  }
}

#[test]
fn test_buffer_exhaustion_leaves_component_disabled() {
  // Room for levels 0..3 of a depth 5 fractal, not level 4.
  let budget = total_node_count(4) * MATRIX_STRIDE_BYTES;
  let mut fractal = Fractal::new(config(5), HeadlessRenderer::new().with_budget(budget));

  let err = fractal.enable().unwrap_err();

  assert!(matches!(err, FractalError::BufferCreation { level: 4, .. }));
  assert!(!fractal.is_enabled());
  assert!(fractal.hierarchy().is_none());
  assert_eq!(fractal.renderer().live_buffer_count(), 0);
}

#[test]
fn test_update_draws_every_level() {
  let mut fractal = Fractal::new(config(3), HeadlessRenderer::new());
  fractal.enable().unwrap();

  let stats = fractal.update(input()).unwrap();

  assert_eq!(stats.node_count, 31);
  assert_eq!(stats.level_us.len(), 3);
  let draws = fractal.renderer().draws();
  assert_eq!(draws.len(), 3);
  assert_eq!(draws.iter().map(|d| d.instance_count).collect::<Vec<_>>(), vec![1, 5, 25]);
  assert!(draws.iter().all(|d| d.mesh == MeshHandle(1) && d.material == MaterialHandle(2)));
  // Bounds follow the root, radius from the host scale.
  assert_eq!(draws[0].bounds.center, Vec3::new(0.0, 1.0, 0.0));
  assert_eq!(draws[0].bounds.radius, 6.0);
}

#[test]
fn test_set_depth_rebuilds_with_new_sizes() {
  let mut fractal = Fractal::new(config(5), HeadlessRenderer::new());
  fractal.enable().unwrap();
  fractal.update(input()).unwrap();

  fractal.set_depth(2).unwrap();

  let hierarchy = fractal.hierarchy().unwrap();
  assert_eq!(hierarchy.depth(), 2);
  assert_eq!(hierarchy.level(0).unwrap().len(), 1);
  assert_eq!(hierarchy.level(1).unwrap().len(), 5);
  assert_eq!(fractal.renderer().live_buffer_count(), 2);
  assert_eq!(fractal.renderer().allocated_bytes(), 6 * MATRIX_STRIDE_BYTES);
  // Fresh hierarchy: spin restarted.
  assert_eq!(hierarchy.root().spin_angle, 0.0);
}

#[test]
fn test_set_invalid_depth_keeps_current_state() {
  let mut fractal = Fractal::new(config(3), HeadlessRenderer::new());
  fractal.enable().unwrap();

  assert!(fractal.set_depth(12).is_err());

  assert_eq!(fractal.config().depth, 3);
  assert_eq!(fractal.hierarchy().unwrap().depth(), 3);
  assert_eq!(fractal.renderer().live_buffer_count(), 3);
}

#[test]
fn test_set_depth_while_disabled_only_updates_config() {
  let mut fractal = Fractal::new(config(3), HeadlessRenderer::new());

  fractal.set_depth(6).unwrap();

  assert!(!fractal.is_enabled());
  assert_eq!(fractal.renderer().live_buffer_count(), 0);
  fractal.enable().unwrap();
  assert_eq!(fractal.hierarchy().unwrap().depth(), 6);
}

#[test]
fn test_enable_disable_cycles() {
  let mut fractal = Fractal::new(config(4), HeadlessRenderer::new());

  for _ in 0..3 {
    fractal.enable().unwrap();
    fractal.enable().unwrap();
    assert_eq!(fractal.renderer().live_buffer_count(), 4);
    fractal.update(input()).unwrap();

    fractal.disable();
    fractal.disable();
    assert_eq!(fractal.renderer().live_buffer_count(), 0);
    assert_eq!(fractal.renderer().allocated_bytes(), 0);
  }
}

#[test]
fn test_begin_end_update_matches_blocking_update() {
  let mut blocking = Fractal::new(config(4), HeadlessRenderer::new());
  let mut split = Fractal::new(config(4), HeadlessRenderer::new());
  blocking.enable().unwrap();
  split.enable().unwrap();

  for _ in 0..4 {
    blocking.update(input()).unwrap();
    split.begin_update(input()).unwrap();
    assert!(split.is_frame_in_flight());
    split.end_update().unwrap();
  }

  for (a, b) in blocking.hierarchy().unwrap().levels().iter().zip(split.hierarchy().unwrap().levels()) {
    assert_eq!(a.matrices(), b.matrices());
  }
  assert_eq!(split.renderer().draws().len(), blocking.renderer().draws().len());
}

#[test]
fn test_overlapping_frames_are_rejected() {
  let mut fractal = Fractal::new(config(3), HeadlessRenderer::new());
  fractal.enable().unwrap();

  fractal.begin_update(input()).unwrap();

  assert!(matches!(fractal.begin_update(input()), Err(FractalError::FrameInFlight)));
  assert!(matches!(fractal.update(input()), Err(FractalError::FrameInFlight)));
  assert!(fractal.hierarchy().is_none());
  fractal.end_update().unwrap();
  assert!(matches!(fractal.end_update(), Err(FractalError::NoFrameInFlight)));
}

#[test]
fn test_disable_with_frame_in_flight_releases_everything() {
  let mut fractal = Fractal::new(
    config(5).with_execution(ExecutionMode::Parallel),
    HeadlessRenderer::new(),
  );
  fractal.enable().unwrap();
  fractal.begin_update(input()).unwrap();

  fractal.disable();

  assert!(!fractal.is_frame_in_flight());
  assert_eq!(fractal.renderer().live_buffer_count(), 0);
}

#[test]
fn test_spin_speed_change_applies_to_next_frame() {
  let mut fractal = Fractal::new(config(1), HeadlessRenderer::new());
  fractal.enable().unwrap();
  fractal.set_spin_speed_degrees(0.0);

  let stats = fractal.update(input()).unwrap();

  assert_eq!(stats.spin_angle_delta, 0.0);
  let rotation = fractal.hierarchy().unwrap().root().world_rotation;
  assert!(rotation.abs_diff_eq(Quat::from_rotation_y(0.3), 1e-6));
}
