//! Recorded intent sequences for headless and deterministic runs.
//!
//! A replay file is a fixed tick length plus run-length encoded intent frames.
//! Expanding it yields one `IntentSnapshot` per tick.

use scroll_core::error::ConfigError;
use scroll_core::input::{Action, IntentSnapshot, IntentState};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct ReplaySequence {
    #[serde(default = "default_dt")]
    pub fixed_dt: f32,
    pub frames: Vec<ReplayFrame>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ReplayFrame {
    #[serde(default)]
    pub move_left: bool,
    #[serde(default)]
    pub move_right: bool,
    #[serde(default)]
    pub jump: bool,
    #[serde(default)]
    pub sprint: bool,
    /// Toggles the debug overlay once, on the first tick of this frame.
    #[serde(default)]
    pub debug: bool,
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

impl ReplaySequence {
    /// Replays the frames as press/release events, one snapshot per tick.
    /// The debug action is pressed on a frame's first tick and released after
    /// it, so each frame with `debug` set toggles exactly once.
    pub fn expanded_intents(&self) -> Vec<IntentSnapshot> {
        let mut state = IntentState::new();
        let mut out = Vec::with_capacity(self.tick_count());
        for frame in &self.frames {
            hold(&mut state, Action::MoveLeft, frame.move_left);
            hold(&mut state, Action::MoveRight, frame.move_right);
            hold(&mut state, Action::Jump, frame.jump);
            hold(&mut state, Action::Sprint, frame.sprint);
            if frame.debug {
                state.press(Action::Debug);
            }
            for _ in 0..frame.repeat.max(1) {
                out.push(state.snapshot());
                state.end_tick();
                state.release(Action::Debug);
            }
        }
        out
    }

    pub fn tick_count(&self) -> usize {
        self.frames.iter().map(|f| f.repeat.max(1) as usize).sum()
    }
}

fn hold(state: &mut IntentState, action: Action, held: bool) {
    if held {
        state.press(action);
    } else {
        state.release(action);
    }
}

pub fn load_replay_from_path(path: &Path) -> Result<ReplaySequence, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let replay: ReplaySequence = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    validate_replay(&replay)?;
    log::info!(
        "Loaded replay {} ({} ticks)",
        path.display(),
        replay.tick_count()
    );
    Ok(replay)
}

pub fn validate_replay(replay: &ReplaySequence) -> Result<(), ConfigError> {
    if !replay.fixed_dt.is_finite() || replay.fixed_dt <= 0.0 {
        return Err(ConfigError::Invalid(
            "replay fixed_dt must be > 0".to_string(),
        ));
    }
    if replay.frames.is_empty() {
        return Err(ConfigError::Invalid(
            "replay frames list is empty".to_string(),
        ));
    }
    Ok(())
}

const fn default_dt() -> f32 {
    1.0 / 60.0
}

const fn default_repeat() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityFlags;
    use crate::level::{EntityDescriptor, LevelDescriptor};
    use crate::simulation::Simulation;
    use scroll_core::config::SimConfig;
    use scroll_core::render::{CommandBuffer, BLACK};
    use scroll_core::sprite::TextureRegistry;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file_path(name_hint: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "scroll_replay_test_{}_{}_{}.json",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    fn sample_level() -> LevelDescriptor {
        let block = |name: &str, x: f32, y: f32, w: f32, h: f32| EntityDescriptor {
            name: name.to_string(),
            position: [x, y],
            size: [w, h],
            flags: EntityFlags::default(),
            color: BLACK,
            sprite: None,
        };
        LevelDescriptor {
            actor_start: [16.0, 0.0],
            actor_sprite: None,
            background: None,
            entities: vec![
                block("step", 160.0, 0.0, 32.0, 16.0),
                block("ledge", 240.0, 48.0, 64.0, 16.0),
                block("pipe", 360.0, 0.0, 32.0, 48.0),
            ],
        }
    }

    #[test]
    fn replay_file_parses_and_expands() {
        let path = temp_file_path("parse");
        fs::write(
            &path,
            r#"{
              "fixed_dt": 0.016666667,
              "frames": [
                { "move_right": true, "repeat": 3 },
                { "jump": true, "debug": true, "repeat": 2 }
              ]
            }"#,
        )
        .expect("write replay file");

        let replay = load_replay_from_path(&path).expect("replay should load");
        let expanded = replay.expanded_intents();
        assert_eq!(expanded.len(), 5);
        assert_eq!(replay.tick_count(), 5);
        assert!(expanded[0].move_right);
        assert!(expanded[3].jump_held);
        assert!(expanded[3].debug_toggle);
        assert!(!expanded[4].debug_toggle);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn consecutive_debug_frames_toggle_once_each() {
        let frame = |debug: bool, repeat: u32| ReplayFrame {
            jump: true,
            debug,
            repeat,
            ..Default::default()
        };
        let replay = ReplaySequence {
            fixed_dt: 0.02,
            frames: vec![frame(true, 2), frame(true, 1), frame(false, 2)],
        };
        let toggles: Vec<bool> = replay
            .expanded_intents()
            .iter()
            .map(|intent| intent.debug_toggle)
            .collect();
        assert_eq!(toggles, vec![true, false, true, false, false]);
        assert!(replay.expanded_intents().iter().all(|i| i.jump_held));
    }

    #[test]
    fn zero_repeat_still_plays_once() {
        let replay = ReplaySequence {
            fixed_dt: 0.02,
            frames: vec![ReplayFrame {
                sprint: true,
                repeat: 0,
                ..Default::default()
            }],
        };
        assert_eq!(replay.expanded_intents().len(), 1);
    }

    #[test]
    fn rejects_empty_frames_and_bad_dt() {
        let path = temp_file_path("empty");
        fs::write(&path, r#"{ "frames": [] }"#).expect("write replay file");
        let err = load_replay_from_path(&path).expect_err("empty replay should fail");
        assert!(err.to_string().contains("frames list is empty"));
        let _ = fs::remove_file(path);

        let replay = ReplaySequence {
            fixed_dt: 0.0,
            frames: vec![ReplayFrame::default()],
        };
        assert!(validate_replay(&replay).is_err());
    }

    #[test]
    fn replay_run_is_deterministic() {
        let path = temp_file_path("deterministic");
        fs::write(
            &path,
            r#"{
              "fixed_dt": 0.016666667,
              "frames": [
                { "move_right": true, "repeat": 60 },
                { "move_right": true, "jump": true, "repeat": 20 },
                { "move_right": true, "sprint": true, "repeat": 120 },
                { "move_left": true, "repeat": 45 }
              ]
            }"#,
        )
        .expect("write replay file");

        let replay = load_replay_from_path(&path).expect("replay should load");
        let intents = replay.expanded_intents();
        let level = sample_level();
        let textures = TextureRegistry::new();

        let mut run_a =
            Simulation::new(SimConfig::default(), &level, &textures).expect("simulation a");
        let mut run_b =
            Simulation::new(SimConfig::default(), &level, &textures).expect("simulation b");
        run_a.play();
        run_b.play();

        let mut frame_a = CommandBuffer::new();
        let mut frame_b = CommandBuffer::new();
        for intent in &intents {
            run_a.set_intent(*intent);
            run_b.set_intent(*intent);
            frame_a.clear();
            frame_b.clear();
            run_a
                .frame(replay.fixed_dt, &mut frame_a)
                .expect("tick a");
            run_b
                .frame(replay.fixed_dt, &mut frame_b)
                .expect("tick b");
            assert_eq!(frame_a.commands, frame_b.commands);
        }

        let a = run_a.actor();
        let b = run_b.actor();
        assert_eq!(a.position, b.position);
        assert_eq!(
            a.controller().map(|c| c.velocity),
            b.controller().map(|c| c.velocity)
        );
        assert_eq!(run_a.viewport().offset, run_b.viewport().offset);
        assert_eq!(run_a.entities().len(), run_b.entities().len());

        let _ = fs::remove_file(path);
    }
}
