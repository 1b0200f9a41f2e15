//! Frame update benchmarks.
//!
//! Compares the sequential reference path against per-level rayon
//! parallelism for the deep end of the depth range, where level sizes go
//! from 3125 (depth 6) to 78125 (depth 8) leaf nodes.
//!
//! - **propagate**: level chain only, no export
//! - **frame**: propagate + upload + draw through the headless renderer

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use fractal_plugin::{
  total_node_count, ExecutionMode, Fractal, FractalConfig, FractalHierarchy, FrameInput, HeadlessRenderer,
  RootTransform, UpdateScheduler,
};
use glam::{Quat, Vec3};

const DEPTHS: [usize; 3] = [6, 7, 8];

const MODES: [(&str, ExecutionMode); 2] = [
  ("sequential", ExecutionMode::Sequential),
  ("parallel", ExecutionMode::Parallel),
];

fn frame_input() -> FrameInput {
  FrameInput::new(
    1.0 / 60.0,
    RootTransform::new(Vec3::new(0.0, 1.0, 0.0), Quat::from_rotation_y(0.5), 1.0),
  )
}

fn bench_propagate(c: &mut Criterion) {
  let mut group = c.benchmark_group("propagate");
  let input = frame_input();

  for depth in DEPTHS {
    group.throughput(Throughput::Elements(total_node_count(depth) as u64));

    for (name, mode) in MODES {
      let scheduler = UpdateScheduler::new(22.5, mode);
      let mut hierarchy = FractalHierarchy::new(depth).expect("valid depth");

      group.bench_with_input(BenchmarkId::new(name, depth), &depth, |b, _| {
        b.iter(|| black_box(scheduler.run_frame(&mut hierarchy, black_box(&input))))
      });
    }
  }

  group.finish();
}

fn bench_frame(c: &mut Criterion) {
  let mut group = c.benchmark_group("frame");
  group.sample_size(30);
  let input = frame_input();

  for depth in DEPTHS {
    group.throughput(Throughput::Elements(total_node_count(depth) as u64));

    for (name, mode) in MODES {
      let config = FractalConfig::new().with_depth(depth).with_execution(mode);
      let mut fractal = Fractal::new(config, HeadlessRenderer::new());
      fractal.enable().expect("headless enable");

      group.bench_with_input(BenchmarkId::new(name, depth), &depth, |b, _| {
        b.iter(|| {
          let stats = fractal.update(black_box(input)).expect("enabled");
          // Draw log grows every frame otherwise.
          fractal.renderer_mut().take_draws();
          black_box(stats)
        })
      });
    }
  }

  group.finish();
}

criterion_group!(benches, bench_propagate, bench_frame);
criterion_main!(benches);
