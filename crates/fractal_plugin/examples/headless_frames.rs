//! Run a fractal headless for a few seconds of simulated time and print
//! per-level timings.
//!
//! ```text
//! cargo run --release --example headless_frames -- 7
//! ```

use fractal_plugin::{clamp_depth, Fractal, FractalConfig, FractalResult, FrameInput, HeadlessRenderer, RootTransform};
use glam::{Quat, Vec3};

const FRAMES: usize = 240;
const DELTA_TIME: f32 = 1.0 / 60.0;

fn main() -> FractalResult<()> {
  let depth = std::env::args()
    .nth(1)
    .and_then(|arg| arg.parse::<i64>().ok())
    .map_or(6, clamp_depth);

  let mut fractal = Fractal::new(FractalConfig::new().with_depth(depth), HeadlessRenderer::new());
  fractal.enable()?;

  let mut level_totals = vec![0u64; depth];
  let mut total_us = 0;
  for frame in 0..FRAMES {
    let t = frame as f32 * DELTA_TIME;
    let root = RootTransform::new(Vec3::new(t.sin(), 0.0, t.cos()), Quat::from_rotation_y(t * 0.5), 1.0);

    // Split update: other per-frame work would go between begin and end.
    fractal.begin_update(FrameInput::new(DELTA_TIME, root))?;
    let stats = fractal.end_update()?;
    fractal.renderer_mut().take_draws();

    for (sum, us) in level_totals.iter_mut().zip(&stats.level_us) {
      *sum += us;
    }
    total_us += stats.total_us;
  }

  let nodes = fractal.hierarchy().map_or(0, |h| h.node_count());
  println!("depth {depth}, {nodes} nodes, {FRAMES} frames");
  for (level, sum) in level_totals.iter().enumerate() {
    println!("  level {level}: {:>8.1}us avg", *sum as f64 / FRAMES as f64);
  }
  println!("  frame:   {:>8.1}us avg", total_us as f64 / FRAMES as f64);

  fractal.disable();
  Ok(())
}
