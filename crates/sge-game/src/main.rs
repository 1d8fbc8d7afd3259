//! Headless DNA runner.
//!
//! Loads the configuration, builds (or loads) the scene, plays it for the
//! configured number of fixed-timestep frames and logs a population summary.
//!
//! Run with: `cargo run -p sge-game -- --frames 1200 --seed 7`

use std::process::ExitCode;

use clap::Parser;
use sge_config::{CliArgs, Config, ConfigError};
use sge_ecs::{InputState, TimeStep};
use sge_game::scripts::Unit;
use sge_game::{GameLoop, Population, load_scene};
use sge_render::HeadlessBackend;
use sge_scene::{NativeScript, Scene, SceneError};
use tracing::{error, info};

fn load_config(args: &CliArgs) -> Result<Config, ConfigError> {
    let dir = match &args.config {
        Some(dir) => dir.clone(),
        None => Config::default_dir()?,
    };
    let mut config = Config::load_or_create(&dir)?;
    config.apply_cli_overrides(args);
    Ok(config)
}

fn run(config: &Config) -> Result<(), SceneError> {
    let mut scene = load_scene(config)?;
    scene.on_scene_play();

    let fixed_dt = f64::from(config.simulation.fixed_dt);
    let mut game_loop = GameLoop::new(fixed_dt);
    let mut backend = HeadlessBackend::default();

    for _ in 0..config.simulation.frames {
        game_loop.tick_with(
            fixed_dt,
            |dt, _| {
                scene.update(TimeStep(dt as f32));
                scene
                    .world_mut()
                    .resource_mut::<InputState>()
                    .clear_transients();
            },
            |_| {},
        );
        scene.render(&mut backend);
    }

    let (alive, dead) = count_units(&mut scene);
    let births = scene
        .world()
        .get_resource::<Population>()
        .map_or(0, |p| p.births);
    info!(
        "Simulated {:.1}s over {} frames: {} units alive, {} dead, {} births",
        game_loop.total_sim_time(),
        game_loop.frame_count(),
        alive,
        dead,
        births
    );
    info!(
        "Rendered {} draw calls, {} instances",
        backend.draw_calls, backend.instances
    );

    scene.on_scene_stop();
    Ok(())
}

fn count_units(scene: &mut Scene) -> (usize, usize) {
    let world = scene.world_mut();
    let mut query = world.query::<&NativeScript>();
    query
        .iter(world)
        .filter_map(|script| script.get::<Unit>())
        .fold((0, 0), |(alive, dead), unit| {
            if unit.is_dead() {
                (alive, dead + 1)
            } else {
                (alive + 1, dead)
            }
        })
}

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config: {e}");
            return ExitCode::FAILURE;
        }
    };

    sge_log::init_logging(
        config.debug.log_dir.as_deref(),
        cfg!(debug_assertions),
        Some(&config),
    );
    info!(
        "DNA: seed {}, {} frames at {:.4}s",
        config.simulation.seed, config.simulation.frames, config.simulation.fixed_dt
    );

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Simulation failed: {e}");
            ExitCode::FAILURE
        }
    }
}
