//! Headless driver: feeds a replay through `Simulation::frame` into a
//! `CommandBuffer` and logs progress once per simulated second.

use glam::Vec2;
use scroll_core::error::SimError;
use scroll_core::render::{Color, CommandBuffer};

use crate::entity::EntityFlags;
use crate::level::{EntityDescriptor, LevelDescriptor};
use crate::replay::{ReplayFrame, ReplaySequence};
use crate::simulation::Simulation;

const BRICK: Color = [0.7, 0.3, 0.1, 1.0];
const BLOCK: Color = [0.95, 0.75, 0.1, 1.0];
const PIPE: Color = [0.1, 0.7, 0.2, 1.0];
const COIN: Color = [1.0, 0.9, 0.2, 1.0];
const CLOUD: Color = [1.0, 1.0, 1.0, 0.8];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub ticks: u64,
    pub draw_commands: usize,
    pub jumps: u32,
    pub removed: usize,
    pub final_position: Vec2,
    pub scroll_offset: f32,
}

/// Plays the whole replay. Stops the simulation when done or on the first error.
pub fn run_replay(
    sim: &mut Simulation,
    replay: &ReplaySequence,
) -> Result<RunSummary, SimError> {
    let ticks_per_second = (1.0 / replay.fixed_dt).round().max(1.0) as u64;
    let mut buffer = CommandBuffer::new();
    let mut summary = RunSummary::default();

    sim.play();
    for intent in replay.expanded_intents() {
        sim.set_intent(intent);
        buffer.clear();
        let report = match sim.frame(replay.fixed_dt, &mut buffer) {
            Ok(report) => report,
            Err(err) => {
                sim.stop();
                return Err(err);
            }
        };

        summary.ticks += 1;
        summary.draw_commands += buffer.len();
        summary.removed += report.removed.len();
        if report.events.jumped {
            summary.jumps += 1;
        }

        if summary.ticks % ticks_per_second == 0 {
            let actor = sim.actor();
            log::info!(
                "t={:.1}s pos=({:.1}, {:.1}) pose={:?} offset={:.1} entities={} draws={}",
                summary.ticks as f32 * replay.fixed_dt,
                actor.position.x,
                actor.position.y,
                actor.controller().map(|c| c.pose),
                sim.viewport().offset,
                sim.entities().len(),
                buffer.len()
            );
        }
    }
    sim.stop();

    summary.final_position = sim.actor().position;
    summary.scroll_offset = sim.viewport().offset;
    Ok(summary)
}

/// A short stretch of level with one of each kind of scenery.
pub fn demo_level() -> LevelDescriptor {
    let solid = EntityFlags::default();
    let brick = EntityFlags {
        destructible: true,
        ..solid
    };
    let coin = EntityFlags {
        solid: false,
        destructible: true,
        transparent: false,
    };
    let cloud = EntityFlags {
        transparent: true,
        ..solid
    };

    let entity = |name: &str, x: f32, y: f32, w: f32, h: f32, flags: EntityFlags, color: Color| {
        EntityDescriptor {
            name: name.to_string(),
            position: [x, y],
            size: [w, h],
            flags,
            color,
            sprite: None,
        }
    };

    LevelDescriptor {
        actor_start: [24.0, 0.0],
        actor_sprite: None,
        background: None,
        entities: vec![
            entity("cloud", 80.0, 180.0, 48.0, 16.0, cloud, CLOUD),
            entity("brick", 112.0, 56.0, 16.0, 16.0, brick, BRICK),
            entity("block", 128.0, 56.0, 16.0, 16.0, solid, BLOCK),
            entity("brick", 144.0, 56.0, 16.0, 16.0, brick, BRICK),
            entity("coin", 200.0, 24.0, 8.0, 8.0, coin, COIN),
            entity("coin", 216.0, 24.0, 8.0, 8.0, coin, COIN),
            entity("pipe", 280.0, 0.0, 32.0, 32.0, solid, PIPE),
            entity("pipe", 400.0, 0.0, 32.0, 48.0, solid, PIPE),
        ],
    }
}

/// Walk, hop under the bricks, sprint over the pipes, then turn back.
pub fn demo_replay() -> ReplaySequence {
    let frame = |right: bool, jump: bool, sprint: bool, repeat: u32| ReplayFrame {
        move_right: right,
        jump,
        sprint,
        repeat,
        ..ReplayFrame::default()
    };
    ReplaySequence {
        fixed_dt: 1.0 / 60.0,
        frames: vec![
            frame(true, false, false, 90),
            frame(true, true, false, 12),
            frame(true, false, false, 60),
            frame(true, false, true, 60),
            frame(true, true, true, 15),
            frame(true, false, true, 90),
            frame(false, false, false, 30),
            ReplayFrame {
                move_left: true,
                repeat: 60,
                ..ReplayFrame::default()
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scroll_core::config::SimConfig;
    use scroll_core::sprite::TextureRegistry;

    fn demo_simulation() -> Simulation {
        Simulation::new(SimConfig::default(), &demo_level(), &TextureRegistry::new())
            .expect("demo level builds")
    }

    #[test]
    fn demo_replay_runs_to_completion() {
        let mut sim = demo_simulation();
        let replay = demo_replay();
        let summary = run_replay(&mut sim, &replay).expect("demo run");

        assert_eq!(summary.ticks, replay.tick_count() as u64);
        assert!(summary.jumps >= 1);
        assert!(summary.final_position.x > demo_level().actor_start[0]);
        assert!(summary.draw_commands > 0);
        assert!(!sim.is_running());
    }

    #[test]
    fn failing_tick_stops_the_run() {
        let mut sim = demo_simulation();
        if let Some(controller) = sim.actor_mut().controller_mut() {
            controller.tuning.speed_delta = f32::NAN;
        }
        let err = run_replay(&mut sim, &demo_replay()).expect_err("NaN tuning should fail");
        assert!(matches!(err, SimError::NonFiniteState { .. }));
        assert!(!sim.is_running());
    }
}
