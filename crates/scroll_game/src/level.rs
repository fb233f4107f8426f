//! Level descriptors and the factory that turns them into entities.
//!
//! Descriptors are plain data (usually deserialized from JSON by whoever owns
//! the level files). Building them resolves texture names through the
//! `TextureRegistry` and fails fast on anything the simulation could not run
//! with, so a constructed scene never carries a dangling atlas handle.

use glam::Vec2;
use scroll_core::config::ActorTuning;
use scroll_core::error::SimError;
use scroll_core::render::{Color, BLACK};
use scroll_core::sprite::{Animation, SpritePlayer, SpriteSheet, TextureRegistry};
use serde::Deserialize;

use crate::actor::{ActorController, PoseSet};
use crate::entity::{Behavior, Entity, EntityFlags, EntityId};

pub const ACTOR_NAME: &str = "actor";
const ACTOR_COLOR: Color = [0.9, 0.2, 0.2, 1.0];

#[derive(Debug, Deserialize, Clone)]
pub struct LevelDescriptor {
    /// Bottom-left corner of the actor, y-up.
    pub actor_start: [f32; 2],
    #[serde(default)]
    pub actor_sprite: Option<ActorSpriteDescriptor>,
    #[serde(default)]
    pub background: Option<Color>,
    #[serde(default)]
    pub entities: Vec<EntityDescriptor>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EntityDescriptor {
    pub name: String,
    pub position: [f32; 2],
    pub size: [f32; 2],
    #[serde(default)]
    pub flags: EntityFlags,
    #[serde(default = "default_color")]
    pub color: Color,
    #[serde(default)]
    pub sprite: Option<SpriteDescriptor>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SpriteDescriptor {
    pub texture: String,
    /// Atlas frames to cycle through. One entry is a static frame.
    #[serde(default)]
    pub frames: Vec<u32>,
    #[serde(default)]
    pub origin: [f32; 2],
    pub frame_size: [f32; 2],
    #[serde(default)]
    pub padding: f32,
    #[serde(default)]
    pub cells_per_row: Option<u32>,
    #[serde(default = "default_zoom")]
    pub zoom: f32,
    /// Frames per second for sprites that animate without being driven.
    #[serde(default)]
    pub autoplay: Option<f32>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ActorSpriteDescriptor {
    #[serde(flatten)]
    pub sheet: SpriteDescriptor,
    #[serde(default)]
    pub poses: Option<PoseDescriptor>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PoseDescriptor {
    pub idle: Vec<u32>,
    pub walk: Vec<u32>,
    pub jump: Vec<u32>,
    pub skid: Vec<u32>,
}

impl PoseDescriptor {
    pub fn to_pose_set(&self) -> PoseSet {
        PoseSet {
            idle: animation_from(&self.idle),
            walk: animation_from(&self.walk),
            jump: animation_from(&self.jump),
            skid: animation_from(&self.skid),
        }
    }
}

impl SpriteDescriptor {
    pub fn build(&self, owner: &str, textures: &TextureRegistry) -> Result<SpritePlayer, SimError> {
        let image = textures
            .resolve(&self.texture)
            .ok_or_else(|| SimError::MissingTexture {
                entity: owner.to_string(),
                texture: self.texture.clone(),
            })?;
        let frame_size = Vec2::from(self.frame_size);
        if !positive(frame_size) {
            return Err(invalid(owner, "sprite frame_size must be > 0"));
        }
        if !self.zoom.is_finite() || self.zoom <= 0.0 {
            return Err(invalid(owner, "sprite zoom must be > 0"));
        }

        let mut sheet = SpriteSheet::new(image, frame_size);
        sheet.origin = Vec2::from(self.origin);
        sheet.padding = self.padding;
        sheet.cells_per_row = self.cells_per_row;
        sheet.zoom = self.zoom;

        let mut player = SpritePlayer::new(sheet, animation_from(&self.frames));
        player.autoplay = self.autoplay;
        Ok(player)
    }
}

impl EntityDescriptor {
    pub fn build(&self, id: EntityId, textures: &TextureRegistry) -> Result<Entity, SimError> {
        let position = Vec2::from(self.position);
        let size = Vec2::from(self.size);
        if !position.is_finite() {
            return Err(invalid(&self.name, "position must be finite"));
        }
        if !positive(size) {
            return Err(invalid(&self.name, "size must be > 0"));
        }

        let mut entity = Entity::new(id, &self.name, position, size)
            .with_flags(self.flags)
            .with_color(self.color);
        if let Some(sprite) = &self.sprite {
            entity = entity.with_sprite(sprite.build(&self.name, textures)?);
        }
        Ok(entity)
    }
}

impl LevelDescriptor {
    /// Builds the actor entity with the given tuning; its size comes from the tuning.
    pub fn build_actor(
        &self,
        id: EntityId,
        tuning: ActorTuning,
        textures: &TextureRegistry,
    ) -> Result<Entity, SimError> {
        let position = Vec2::from(self.actor_start);
        if !position.is_finite() {
            return Err(invalid(ACTOR_NAME, "actor_start must be finite"));
        }

        let mut controller = ActorController::new(tuning);
        let mut entity = Entity::new(
            id,
            ACTOR_NAME,
            position,
            Vec2::new(tuning.width, tuning.height),
        )
        .with_color(ACTOR_COLOR);

        if let Some(descriptor) = &self.actor_sprite {
            if let Some(poses) = &descriptor.poses {
                controller.poses = poses.to_pose_set();
            }
            let mut sprite = descriptor.sheet.build(ACTOR_NAME, textures)?;
            // The controller drives the actor's frames.
            sprite.autoplay = None;
            sprite.set_animation(controller.poses.get(controller.pose));
            entity = entity.with_sprite(sprite);
        }

        Ok(entity.with_behavior(Behavior::Controllable(Box::new(controller))))
    }

    /// Builds every scenery entity, numbering them from `first_id`.
    pub fn build_entities(
        &self,
        first_id: EntityId,
        textures: &TextureRegistry,
    ) -> Result<Vec<Entity>, SimError> {
        self.entities
            .iter()
            .zip(first_id..)
            .map(|(descriptor, id)| descriptor.build(id, textures))
            .collect()
    }
}

fn animation_from(frames: &[u32]) -> Animation {
    match frames {
        [frame] => Animation::Static(*frame),
        _ => Animation::Cyclic(frames.to_vec()),
    }
}

fn positive(v: Vec2) -> bool {
    v.is_finite() && v.x > 0.0 && v.y > 0.0
}

fn invalid(entity: &str, reason: &str) -> SimError {
    SimError::InvalidDescriptor {
        entity: entity.to_string(),
        reason: reason.to_string(),
    }
}

const fn default_color() -> Color {
    BLACK
}

const fn default_zoom() -> f32 {
    1.0
}
