use super::*;
use crate::constants::child_slot;

#[test]
fn test_root_level() {
  let level = LevelBuffer::allocate(0).unwrap();
  assert_eq!(level.level(), 0);
  assert_eq!(level.len(), 1);
  assert_eq!(level.matrices().len(), 1);
  assert_eq!(level.parts()[0].slot(), Some(Slot::Up));
  assert_eq!(level.parent_of(0), None);
}

#[test]
fn test_level_sizes() {
  for depth_level in 0..6 {
    let level = LevelBuffer::allocate(depth_level).unwrap();
    assert_eq!(level.len(), level_len(depth_level));
    assert_eq!(level.matrices().len(), level.len());
    assert!(!level.is_empty());
  }
}

/// Slot of every node is fixed by `index % 5`.
#[test]
fn test_slots_follow_index() {
  let level = LevelBuffer::allocate(3).unwrap();
  for (index, part) in level.parts().iter().enumerate() {
    let expected = Slot::ALL[child_slot(index)];
    assert_eq!(part.slot(), Some(expected), "Wrong template at index {}", index);
    assert_eq!(part.spin_angle, 0.0);
  }
}

#[test]
fn test_parent_of() {
  let level = LevelBuffer::allocate(2).unwrap();
  assert_eq!(level.parent_of(0), Some(0));
  assert_eq!(level.parent_of(4), Some(0));
  assert_eq!(level.parent_of(5), Some(1));
  assert_eq!(level.parent_of(24), Some(4));
  assert_eq!(level.parent_of(25), None);
}

#[test]
fn test_matrices_start_identity() {
  let level = LevelBuffer::allocate(1).unwrap();
  assert!(level.matrices().iter().all(|m| *m == Mat4::IDENTITY));
}
