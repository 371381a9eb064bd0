mod follow;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use glam::Vec2;
use tracing_subscriber::EnvFilter;

use follow::{FollowCamera, chase_step};
use scenestream_author::LayoutEditor;
use scenestream_common::{Bounds2, SceneRect};
use scenestream_kernel::World;
use scenestream_registry::{SceneDescriptor, SceneRegistry};
use scenestream_stream::{MemoryLoader, StreamConfig, StreamEvent, StreamingController};

#[derive(Parser)]
#[command(name = "scenestream-cli", about = "CLI tool for scene streaming layouts")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print crate versions
    Info,
    /// Write a grid-shaped scene layout to a JSON file
    NewLayout {
        /// Output path
        output: PathBuf,
        /// Scenes per row
        #[arg(long, default_value = "4")]
        columns: u32,
        /// Number of rows
        #[arg(long, default_value = "4")]
        rows: u32,
        /// Scene width
        #[arg(long, default_value = "100")]
        width: i32,
        /// Scene height
        #[arg(long, default_value = "100")]
        height: i32,
    },
    /// List the scenes in a layout file
    Inspect {
        /// Layout JSON path
        layout: PathBuf,
    },
    /// Walk a follow camera across a layout and report streaming activity
    Simulate {
        /// Layout JSON path (defaults to a generated 8x8 grid)
        #[arg(short, long)]
        layout: Option<PathBuf>,
        /// Stream config YAML path
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Number of ticks to run
        #[arg(short, long, default_value = "200")]
        ticks: u32,
        /// Camera destination x
        #[arg(long, default_value = "700")]
        target_x: f32,
        /// Camera destination y
        #[arg(long, default_value = "-700")]
        target_y: f32,
        /// Camera speed (units per tick)
        #[arg(long, default_value = "5")]
        speed: f32,
        /// Transferable objects that chase the camera
        #[arg(long, default_value = "3")]
        objects: usize,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("scenestream-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("registry: {}", scenestream_registry::crate_info());
            println!("stream: {}", scenestream_stream::crate_info());
        }
        Commands::NewLayout {
            output,
            columns,
            rows,
            width,
            height,
        } => {
            let registry = grid_layout(columns, rows, width, height)?;
            registry
                .save(&output)
                .with_context(|| format!("writing layout to {}", output.display()))?;
            println!("Wrote {} scenes to {}", registry.count(), output.display());
        }
        Commands::Inspect { layout } => {
            let registry = SceneRegistry::load(&layout)
                .with_context(|| format!("reading layout {}", layout.display()))?;
            inspect(&registry);
        }
        Commands::Simulate {
            layout,
            config,
            ticks,
            target_x,
            target_y,
            speed,
            objects,
        } => {
            let registry = match layout {
                Some(path) => SceneRegistry::load(&path)
                    .with_context(|| format!("reading layout {}", path.display()))?,
                None => grid_layout(8, 8, 100, 100)?,
            };
            let config = match config {
                Some(path) => {
                    let text = std::fs::read_to_string(&path)
                        .with_context(|| format!("reading config {}", path.display()))?;
                    serde_yaml::from_str(&text)
                        .with_context(|| format!("parsing config {}", path.display()))?
                }
                None => StreamConfig::default(),
            };
            simulate(
                registry,
                config,
                ticks,
                Vec2::new(target_x, target_y),
                speed,
                objects,
            )?;
        }
    }

    Ok(())
}

/// Grid of scenes whose top-left scene starts at the origin and grows right and down.
fn grid_layout(columns: u32, rows: u32, width: i32, height: i32) -> anyhow::Result<SceneRegistry> {
    let mut registry = SceneRegistry::new();
    let mut editor = LayoutEditor::new();
    for row in 0..rows as i32 {
        for column in 0..columns as i32 {
            let rect = SceneRect::new(column * width, -row * height, width, height);
            editor.push_scene(
                &mut registry,
                SceneDescriptor::new(format!("scene_{row}_{column}"), rect),
            )?;
        }
    }
    Ok(registry)
}

fn inspect(registry: &SceneRegistry) {
    println!("{} scenes", registry.count());
    for (index, scene) in registry.iter().enumerate() {
        let center = scene.altered_center();
        println!(
            "  [{index:>3}] {:<20} x={:<6} y={:<6} {}x{}  center=({:.1}, {:.1})",
            scene.assigned_name().unwrap_or("<unassigned>"),
            scene.rect.x,
            scene.rect.y,
            scene.rect.width,
            scene.rect.height,
            center.x,
            center.y,
        );
    }
    if let Some(extent) = registry.extent() {
        println!(
            "extent: ({:.0}, {:.0}) .. ({:.0}, {:.0})",
            extent.min.x, extent.min.y, extent.max.x, extent.max.y
        );
    }
}

fn simulate(
    registry: SceneRegistry,
    config: StreamConfig,
    ticks: u32,
    target: Vec2,
    speed: f32,
    object_count: usize,
) -> anyhow::Result<()> {
    let start = registry
        .get(0)
        .map(|s| s.altered_center())
        .unwrap_or(Vec2::ZERO);
    let mut camera = FollowCamera::new(start, speed);
    let mut world = World::new();
    tracing::info!(scenes = registry.count(), ?target, ticks, "starting simulation");
    let mut controller = StreamingController::new(registry, config, MemoryLoader::new())?;

    let events = controller.start(camera.position, &world)?;
    report(0, &events);

    let mut riders = Vec::new();
    if controller.binding(0).is_some() {
        for k in 0..object_count {
            let offset = Vec2::new(k as f32 * 3.0, 0.0);
            let id = world.spawn_transferable(Bounds2::from_center_size(
                start + offset,
                Vec2::splat(1.0),
            ));
            controller.attach_object(0, id, &world)?;
            riders.push(id);
        }
    }

    for tick in 1..=ticks {
        let tracked = camera.follow(target);
        for id in &riders {
            if let Some(bounds) = world.bounds(*id) {
                let step = chase_step(bounds.center(), tracked, speed * 0.9, 1.5);
                world.translate(*id, step);
            }
        }
        let events = controller.tick(tracked, &world)?;
        report(tick, &events);
    }

    let stats = controller.stats();
    println!(
        "Finished at ({:.1}, {:.1}): active scenes={}, live content={}, limbo={}",
        camera.position.x,
        camera.position.y,
        controller.active_scene_count(),
        controller.loader().live_count(),
        stats.limbo_objects,
    );
    for id in &riders {
        match controller.owner_of(*id) {
            Some(owner) => println!("  object {id}: {owner}"),
            None => println!("  object {id}: untracked"),
        }
    }
    Ok(())
}

fn report(tick: u32, events: &[StreamEvent]) {
    for event in events {
        match event {
            StreamEvent::Loaded { index } => println!("[{tick:>4}] load       scene {index}"),
            StreamEvent::Activated { index } => println!("[{tick:>4}] activate   scene {index}"),
            StreamEvent::Deactivated { index } => println!("[{tick:>4}] deactivate scene {index}"),
            StreamEvent::Unloaded { index } => println!("[{tick:>4}] unload     scene {index}"),
            StreamEvent::Transferred { object, from, to } => {
                println!("[{tick:>4}] transfer   {object}: {from} -> scene {to}")
            }
            StreamEvent::Parked { object, from } => {
                println!("[{tick:>4}] park       {object}: scene {from} -> limbo")
            }
        }
    }
}
