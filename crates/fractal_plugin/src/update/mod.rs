//! Per-frame transform propagation.
//!
//! # Frame Stages
//!
//! 1. **Root**: synchronous, derives the root from the host transform
//! 2. **Levels 1..depth**: one [`LevelUpdateTask`] per level, parallel within
//!    the level, strictly ordered across levels
//! 3. **Export**: after the last level, all matrices describe one consistent
//!    frame (see [`crate::presentation`])

pub mod scheduler;
pub mod task;


pub use scheduler::{CompletedFrame, FrameInput, FrameStats, UpdateScheduler};
pub use task::{update_part, update_root, LevelUpdateTask};
