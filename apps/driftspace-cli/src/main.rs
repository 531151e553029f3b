use std::time::{Duration, Instant};

use clap::{Parser, Subcommand};
use glam::Vec3;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing_subscriber::EnvFilter;

use driftspace_grid::{ClusterGrid, GridConfig};
use driftspace_library::ResourceLibrary;
use driftspace_matter::ResourceArena;
use driftspace_render::DebugScene;
use driftspace_universe::{Universe, UniverseSelection};

#[derive(Parser)]
#[command(name = "driftspace-cli", about = "CLI tool for driftspace operations")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print engine version and crate info
    Info,
    /// Activate a universe and print its configuration
    Universe {
        /// Universe preset id (1-5); omit for the default universe
        #[arg(short, long)]
        id: Option<u32>,
        /// Pick a random non-hidden preset instead of an id
        #[arg(short, long, conflicts_with = "id")]
        random: bool,
        /// RNG seed for the random pick
        #[arg(short, long, default_value = "42")]
        seed: u64,
        /// Emit the full matter configuration as JSON
        #[arg(long)]
        json: bool,
    },
    /// Fly a simulated forward journey through the cluster stream
    Fly {
        /// Number of display ticks to simulate
        #[arg(short, long, default_value = "200")]
        ticks: u64,
        /// Universe preset id (1-5); omit for the default universe
        #[arg(short, long)]
        universe: Option<u32>,
        /// RNG seed for deterministic generation
        #[arg(short, long, default_value = "42")]
        seed: u64,
        /// Streaming radius in clusters around the viewpoint
        #[arg(long, default_value = "2")]
        radius: i64,
    },
}

fn selection(id: Option<u32>, random: bool) -> UniverseSelection {
    match (id, random) {
        (Some(id), _) => UniverseSelection::Id(id),
        (None, true) => UniverseSelection::Random,
        (None, false) => UniverseSelection::Default,
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("driftspace-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", driftspace_common::crate_info());
            println!("render: {}", driftspace_render::crate_info());
            println!("library: {}", driftspace_library::crate_info());
            println!("universe: {}", driftspace_universe::crate_info());
            println!("matter: {}", driftspace_matter::crate_info());
            println!("grid: {}", driftspace_grid::crate_info());
        }
        Commands::Universe {
            id,
            random,
            seed,
            json,
        } => {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut universe = Universe::new();
            universe.activate(selection(id, random), &mut rng);
            universe.apply()?;

            if json {
                println!("{}", serde_json::to_string_pretty(universe.config())?);
                return Ok(());
            }

            let modifiers = universe.modifiers();
            let config = universe.config();
            println!("Universe: {:?} (state {:?})", modifiers.universe_type, universe.state());
            println!(
                "  bloom intensity: {}, clear color: {:#08x}",
                config.global.bloom_intensity, config.global.clear_color
            );
            println!(
                "  budgets: starfield={}, nebula={}, galaxy={}",
                config.starfield.budget, config.nebula.budget, config.galaxy.budget
            );
            println!(
                "Spawn table ({} entries, total weight {}):",
                universe.spawn_table().len(),
                universe.spawn_table().total_weight()
            );
            for entry in universe.spawn_table().entries() {
                println!(
                    "  {:>3}  {:?} / {:?}",
                    entry.chances, entry.kind, entry.subkind
                );
            }
        }
        Commands::Fly {
            ticks,
            universe,
            seed,
            radius,
        } => {
            println!("Journey: seed={seed}, ticks={ticks}, radius={radius}");

            let mut rng = StdRng::seed_from_u64(seed);
            let mut cosmos = Universe::new();
            cosmos.activate(selection(universe, false), &mut rng);
            cosmos.apply()?;

            let library = ResourceLibrary::preloaded();
            let mut arena = ResourceArena::new();
            let mut scene = DebugScene::new();
            let mut grid = ClusterGrid::new(GridConfig {
                render_radius: radius,
                build_delay: Duration::ZERO,
                ..GridConfig::default()
            });

            let cluster_size = grid.config().cluster_size;
            let mut last = None;
            for tick in 0..ticks {
                // Quarter of a cluster per tick keeps the queue busy without
                // outrunning the drain.
                let position = Vec3::new(0.0, 0.0, tick as f32 * cluster_size * 0.25);
                let center = grid.current_cluster(position)?;
                if last != Some(center) {
                    let status = grid.clusters_status(center);
                    grid.dispose_clusters(&status.to_dispose, &mut arena, &mut scene);
                    grid.build_matters(&status.to_populate, &cosmos)?;
                    last = Some(center);
                    tracing::debug!(%center, "entered cluster");
                }
                grid.drain(
                    Instant::now(),
                    &cosmos,
                    &library,
                    &mut arena,
                    &mut scene,
                    &mut rng,
                )?;
            }

            let stats = grid.stats();
            println!(
                "Built {} clusters ({} matters, {} failed), disposed {}, discarded {} builds",
                stats.clusters_built,
                stats.matters_generated,
                stats.matters_failed,
                stats.clusters_disposed,
                stats.builds_discarded
            );
            println!(
                "Live: {} active clusters, {} renderables, {} geometries, {} materials",
                grid.active_clusters().len(),
                scene.visible_count(),
                arena.live_geometries(),
                arena.live_materials()
            );
        }
    }

    Ok(())
}
