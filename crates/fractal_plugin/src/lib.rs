//! fractal_plugin - Engine independent animated fractal hierarchy
//!
//! A fractal of depth `d` is a five-way tree flattened into one array per
//! level (1, 5, 25, ... nodes). Every frame the root follows a host transform,
//! then each level is updated in parallel from its fully updated parent level,
//! and finally each level is drawn with a single instanced draw call.
//!
//! # Features
//!
//! - **Flat level arrays**: `parent = i / 5`, `slot = i % 5`, no pointers
//! - **Per-level parallelism**: rayon parallel-for per level, strict order
//!   across levels
//! - **Renderer boundary**: [`InstanceRenderer`] trait, one buffer and one
//!   draw per level, matrices uploaded as raw column-major `f32`
//! - **Headless renderer** for tests, benchmarks and servers
//!
//! # Example
//!
//! ```ignore
//! use fractal_plugin::{Fractal, FractalConfig, FrameInput, HeadlessRenderer, RootTransform};
//!
//! let mut fractal = Fractal::new(FractalConfig::new().with_depth(6), HeadlessRenderer::new());
//! fractal.enable()?;
//!
//! let stats = fractal.update(FrameInput::new(1.0 / 60.0, RootTransform::IDENTITY))?;
//! println!("{} nodes in {}us", stats.node_count, stats.total_us);
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod types;

pub use config::{clamp_depth, ExecutionMode, FractalConfig};
pub use constants::{level_len, total_node_count, BRANCHING, MAX_DEPTH, MIN_DEPTH};
pub use error::{FractalError, FractalResult};
pub use types::{BoundingSphere, PartState, RootTransform, Slot};

// Flattened level arrays
pub mod hierarchy;
pub use hierarchy::{FractalHierarchy, HierarchySnapshot, LevelBuffer};

// Per-frame propagation
pub mod update;
pub use update::{CompletedFrame, FrameInput, FrameStats, UpdateScheduler};

// Schedule-then-complete on the worker pool
pub mod threading;
pub use threading::{FrameHandle, FrameId};

// Renderer boundary
pub mod headless;
pub mod presentation;
pub use headless::HeadlessRenderer;
pub use presentation::{export_frame, InstanceBuffers, InstanceRenderer, MaterialHandle, MeshHandle, RenderError};

// Component lifecycle
pub mod fractal;
pub use fractal::Fractal;

pub mod metrics;
