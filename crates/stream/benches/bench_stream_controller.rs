use std::hint::black_box;
use std::time::Instant;

use glam::Vec2;
use scenestream_common::{Bounds2, SceneRect};
use scenestream_kernel::World;
use scenestream_registry::{SceneDescriptor, SceneRegistry};
use scenestream_stream::{MemoryLoader, StreamConfig, StreamingController};

/// Square grid of 100x100 scenes covering `scene_count` cells.
fn make_registry(scene_count: usize) -> SceneRegistry {
    let side = (scene_count as f32).sqrt().ceil() as usize;
    SceneRegistry::from_descriptors((0..scene_count).map(|i| {
        let x = (i % side) as i32 * 100;
        let y = (i / side) as i32 * 100;
        SceneDescriptor::new(format!("scene_{i}"), SceneRect::new(x, y + 100, 100, 100))
    }))
    .expect("generated layout is valid")
}

fn bench_start(scene_count: usize, iterations: usize) {
    let world = World::new();
    let start = Instant::now();
    for _ in 0..iterations {
        let mut controller = StreamingController::new(
            make_registry(scene_count),
            StreamConfig::default(),
            MemoryLoader::new(),
        )
        .expect("default config is valid");
        let _ = black_box(controller.start(black_box(Vec2::ZERO), &world));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  start ({scene_count} scenes, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}"
    );
}

fn bench_tick(scene_count: usize, object_count: usize, iterations: usize) {
    let mut world = World::new();
    let mut controller = StreamingController::new(
        make_registry(scene_count),
        StreamConfig::default(),
        MemoryLoader::new(),
    )
    .expect("default config is valid");
    controller.start(Vec2::ZERO, &world).expect("start succeeds");

    for i in 0..object_count {
        let id = world.spawn_transferable(Bounds2::from_center_size(
            Vec2::new(10.0 + (i % 80) as f32, 10.0),
            Vec2::splat(1.0),
        ));
        controller.attach_object(0, id, &world).expect("scene 0 is bound");
    }

    let start = Instant::now();
    for i in 0..iterations {
        // Sweep the tracked position back and forth across the first rows.
        let x = (i % 400) as f32 * 2.0;
        let _ = black_box(controller.tick(black_box(Vec2::new(x, 50.0)), &world));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  tick ({scene_count} scenes, {object_count} objects, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}"
    );
}

fn main() {
    println!("=== Stream Controller Benchmarks ===\n");

    println!("Initial full pass:");
    bench_start(100, 1000);
    bench_start(1000, 100);
    bench_start(10000, 10);

    println!("\nBudgeted tick:");
    bench_tick(100, 50, 10000);
    bench_tick(1000, 50, 10000);
    bench_tick(10000, 500, 1000);

    println!("\n=== Done ===");
}
