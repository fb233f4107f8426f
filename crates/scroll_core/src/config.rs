//! Simulation tuning, passed into the simulation at construction.
//!
//! Every physics constant lives here instead of in process-wide state so two
//! simulations with different tuning can run side by side (replay comparisons,
//! tests). Velocities are world units per second; `speed_delta`, `gravity` and
//! `jump_boost` are velocity changes applied once per tick.

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::ConfigError;

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SimConfig {
    pub actor: ActorTuning,
    pub viewport: ViewportConfig,
    pub world: WorldBounds,
    pub collision: CollisionInset,
    /// Frame deltas above this are clamped. `None` keeps raw wall-clock deltas.
    pub max_frame_dt: Option<f32>,
    /// Initial debug overlay visibility.
    pub debug: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            actor: ActorTuning::default(),
            viewport: ViewportConfig::default(),
            world: WorldBounds::default(),
            collision: CollisionInset::default(),
            max_frame_dt: Some(0.25),
            debug: false,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct ActorTuning {
    pub width: f32,
    pub height: f32,
    pub walk_speed: f32,
    pub run_speed: f32,
    pub speed_delta: f32,
    pub jump_impulse: f32,
    pub jump_boost: f32,
    /// Seconds off the ground during which a jump may still start or be extended.
    pub jump_hold_threshold: f32,
    pub gravity: f32,
    pub max_fall_speed: f32,
    /// Walk cycle frames advanced per world unit travelled.
    pub walk_frames_per_unit: f32,
}

impl Default for ActorTuning {
    fn default() -> Self {
        Self {
            width: 16.0,
            height: 32.0,
            walk_speed: 150.0,
            run_speed: 300.0,
            speed_delta: 3.0,
            jump_impulse: 420.0,
            jump_boost: 36.0,
            jump_hold_threshold: 0.2,
            gravity: -18.0,
            max_fall_speed: -600.0,
            walk_frames_per_unit: 0.05,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct ViewportConfig {
    pub width: f32,
    pub height: f32,
    /// Device pixels per world unit, applied when emitting draw commands.
    pub aspect_ratio: f32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 256.0,
            height: 240.0,
            aspect_ratio: 1.0,
        }
    }
}

/// Edges of the playable area that are enforced without entity collision.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct WorldBounds {
    pub left: f32,
    pub right: Option<f32>,
    pub floor: Option<f32>,
    pub ceiling: Option<f32>,
}

impl Default for WorldBounds {
    fn default() -> Self {
        Self {
            left: 0.0,
            right: None,
            floor: Some(0.0),
            ceiling: None,
        }
    }
}

/// Overlap must exceed these margins before an axis counts as intersecting.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct CollisionInset {
    pub horizontal: f32,
    pub vertical: f32,
}

impl Default for CollisionInset {
    fn default() -> Self {
        Self {
            horizontal: 2.0,
            vertical: 5.0,
        }
    }
}

pub fn load_config_from_path(path: &Path) -> Result<SimConfig, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config: SimConfig = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    validate_config(&config)?;
    log::info!("Loaded simulation config from {}", path.display());
    Ok(config)
}

pub fn validate_config(config: &SimConfig) -> Result<(), ConfigError> {
    if let Some(field) = first_non_finite(config) {
        return Err(ConfigError::Invalid(format!("{field} must be finite")));
    }

    let actor = &config.actor;
    if actor.width <= 0.0 || actor.height <= 0.0 {
        return Err(ConfigError::Invalid(
            "actor width and height must be > 0".to_string(),
        ));
    }
    if actor.walk_speed <= 0.0 || actor.run_speed < actor.walk_speed {
        return Err(ConfigError::Invalid(
            "walk_speed must be > 0 and run_speed >= walk_speed".to_string(),
        ));
    }
    if actor.speed_delta <= 0.0 {
        return Err(ConfigError::Invalid("speed_delta must be > 0".to_string()));
    }
    if actor.gravity >= 0.0 {
        return Err(ConfigError::Invalid(
            "gravity must be negative (world is y-up)".to_string(),
        ));
    }
    if actor.max_fall_speed >= 0.0 {
        return Err(ConfigError::Invalid(
            "max_fall_speed must be negative".to_string(),
        ));
    }
    if actor.jump_impulse <= 0.0 || actor.jump_boost < 0.0 || actor.jump_hold_threshold < 0.0 {
        return Err(ConfigError::Invalid(
            "jump_impulse must be > 0, jump_boost and jump_hold_threshold >= 0".to_string(),
        ));
    }
    let viewport = &config.viewport;
    if viewport.width <= 0.0 || viewport.height <= 0.0 || viewport.aspect_ratio <= 0.0 {
        return Err(ConfigError::Invalid(
            "viewport width, height and aspect_ratio must be > 0".to_string(),
        ));
    }
    if let Some(right) = config.world.right {
        if right <= config.world.left {
            return Err(ConfigError::Invalid(format!(
                "world right bound {right} must exceed left bound {}",
                config.world.left
            )));
        }
    }
    if config.collision.horizontal < 0.0 || config.collision.vertical < 0.0 {
        return Err(ConfigError::Invalid(
            "collision insets must be >= 0".to_string(),
        ));
    }
    if let Some(max_dt) = config.max_frame_dt {
        if max_dt <= 0.0 {
            return Err(ConfigError::Invalid("max_frame_dt must be > 0".to_string()));
        }
    }
    Ok(())
}

/// NaN and infinity compare false against every bound, so they are caught here
/// before the range checks.
fn first_non_finite(config: &SimConfig) -> Option<&'static str> {
    let actor = &config.actor;
    let world = &config.world;
    let fields = [
        ("actor.width", Some(actor.width)),
        ("actor.height", Some(actor.height)),
        ("actor.walk_speed", Some(actor.walk_speed)),
        ("actor.run_speed", Some(actor.run_speed)),
        ("actor.speed_delta", Some(actor.speed_delta)),
        ("actor.jump_impulse", Some(actor.jump_impulse)),
        ("actor.jump_boost", Some(actor.jump_boost)),
        ("actor.jump_hold_threshold", Some(actor.jump_hold_threshold)),
        ("actor.gravity", Some(actor.gravity)),
        ("actor.max_fall_speed", Some(actor.max_fall_speed)),
        ("actor.walk_frames_per_unit", Some(actor.walk_frames_per_unit)),
        ("viewport.width", Some(config.viewport.width)),
        ("viewport.height", Some(config.viewport.height)),
        ("viewport.aspect_ratio", Some(config.viewport.aspect_ratio)),
        ("world.left", Some(world.left)),
        ("world.right", world.right),
        ("world.floor", world.floor),
        ("world.ceiling", world.ceiling),
        ("collision.horizontal", Some(config.collision.horizontal)),
        ("collision.vertical", Some(config.collision.vertical)),
        ("max_frame_dt", config.max_frame_dt),
    ];
    fields
        .into_iter()
        .find(|(_, value)| value.is_some_and(|v| !v.is_finite()))
        .map(|(name, _)| name)
}
