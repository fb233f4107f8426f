//! Headless runner.
//!
//!   scroll_game [config.json] [replay.json]
//!
//! Builds the demo level, plays the replay (or the built-in one) through the
//! simulation and logs a summary. `RUST_LOG` controls verbosity.

use std::path::Path;
use std::process::ExitCode;

use scroll_core::config::{load_config_from_path, SimConfig};
use scroll_core::sprite::TextureRegistry;
use scroll_game::{demo_level, demo_replay, load_replay_from_path, run_replay, Simulation};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Scroll simulation starting...");

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => match load_config_from_path(Path::new(&path)) {
            Ok(config) => config,
            Err(err) => {
                log::error!("{err}");
                return ExitCode::FAILURE;
            }
        },
        None => SimConfig::default(),
    };
    let replay = match args.next() {
        Some(path) => match load_replay_from_path(Path::new(&path)) {
            Ok(replay) => replay,
            Err(err) => {
                log::error!("{err}");
                return ExitCode::FAILURE;
            }
        },
        None => demo_replay(),
    };

    let mut sim = match Simulation::new(config, &demo_level(), &TextureRegistry::new()) {
        Ok(sim) => sim,
        Err(err) => {
            log::error!("Failed to build simulation: {err}");
            return ExitCode::FAILURE;
        }
    };

    match run_replay(&mut sim, &replay) {
        Ok(summary) => {
            log::info!(
                "Finished {} ticks: actor at ({:.1}, {:.1}), offset {:.1}, {} jumps, {} entities removed, {} draw commands",
                summary.ticks,
                summary.final_position.x,
                summary.final_position.y,
                summary.scroll_offset,
                summary.jumps,
                summary.removed,
                summary.draw_commands
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("Run aborted: {err}");
            ExitCode::FAILURE
        }
    }
}
