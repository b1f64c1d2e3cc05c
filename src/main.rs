use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::time::Duration;

use traffic_simulator::render::{vehicle_report, MapRenderer, ScaledPositionToPixel};
use traffic_simulator::simulation::{demo_config, Command, Engine, Query, TimeInterval};

#[derive(Parser)]
#[command(name = "traffic_simulator")]
#[command(about = "Headless traffic simulation")]
struct Cli {
    /// Number of simulation ticks to run
    #[arg(long, default_value = "600")]
    ticks: u32,

    /// Time delta per tick in seconds
    #[arg(long, default_value = "0.05")]
    delta: f64,

    /// Simulated seconds between vehicle reports
    #[arg(long, default_value = "0.5")]
    log_interval: f64,

    /// Cruising speed vehicles accelerate towards
    #[arg(long)]
    target_speed: Option<f64>,

    /// Seed for randomised starting speeds
    #[arg(long)]
    seed: Option<u64>,

    /// Map characters per world unit
    #[arg(long, default_value = "0.5")]
    scale: f64,

    /// Draw the map with every vehicle report
    #[arg(long)]
    map: bool,

    /// Sleep for the tick interval between ticks
    #[arg(long)]
    realtime: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("warn,traffic_simulator=info"),
    )
    .init();

    let cli = Cli::parse();
    run_headless(&cli)
}

/// Run the simulation in headless mode (no graphics)
fn run_headless(cli: &Cli) -> Result<()> {
    let delta = TimeInterval::new(cli.delta).context("Invalid --delta")?;
    let pause = if cli.realtime {
        let pause = Duration::try_from_secs_f64(delta.seconds())
            .context("--delta is too long to sleep for with --realtime")?;
        Some(pause)
    } else {
        None
    };

    let mut config = demo_config();
    if let Some(target_speed) = cli.target_speed {
        config.kinematics.target_speed = target_speed;
    }
    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
        config.initial_speed_jitter = 2.0;
    }

    let engine = Engine::new(config).context("Invalid simulation configuration")?;
    let renderer = MapRenderer::new(ScaledPositionToPixel::new(cli.scale));

    info!("Running traffic simulation in headless mode...");
    info!("Running {} ticks of {}s", cli.ticks, cli.delta);

    let mut state = engine
        .run_query(Query::Init)
        .context("Failed to build the initial state")?;
    println!(
        "{}",
        renderer
            .render(&state, state.graph())
            .context("Failed to render the initial state")?
    );

    let mut since_report = 0.0;
    for _ in 0..cli.ticks {
        state = engine
            .handle_command(Command::Update(delta), &state)
            .with_context(|| format!("Tick {} failed", state.tick() + 1))?;

        since_report += delta.seconds();
        if since_report + 1e-9 >= cli.log_interval {
            since_report = 0.0;
            info!("--- t={:.2}s (tick {}) ---", state.time(), state.tick());
            for line in vehicle_report(&state) {
                info!("{}", line);
            }
            if cli.map {
                println!("{}", renderer.render(&state, state.graph())?);
            }
        }

        if let Some(pause) = pause {
            std::thread::sleep(pause);
        }
    }

    let stopped = state
        .vehicles()
        .iter()
        .filter(|vehicle| vehicle.motion.speed == 0.0)
        .count();
    let average_speed = if state.vehicles().is_empty() {
        0.0
    } else {
        state.vehicles().iter().map(|v| v.motion.speed).sum::<f64>() / state.vehicles().len() as f64
    };

    info!("=== SIMULATION COMPLETE ===");
    info!("Elapsed time: {:.2}s", state.time());
    info!("Ticks: {}", state.tick());
    info!("Total crossings: {}", state.graph().crossing_count());
    info!("Total connections: {}", state.graph().connection_count());
    info!("Vehicles: {}", state.vehicles().len());
    info!("Stopped vehicles: {}", stopped);
    info!("Average speed: {:.2}", average_speed);

    println!("{}", renderer.render(&state, state.graph())?);
    Ok(())
}
