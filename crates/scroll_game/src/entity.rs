//! Scene objects. Every object in a scene, including the actor, is an `Entity`;
//! what it does per tick is decided by its `Behavior` tag, which the
//! simulation dispatches on.

use glam::Vec2;
use scroll_core::config::{CollisionInset, WorldBounds};
use scroll_core::interpolate::Interpolator;
use scroll_core::render::{Color, Rect, Surface, BLACK};
use scroll_core::sprite::SpritePlayer;
use serde::Deserialize;

use crate::actor::{ActorController, StepEvents};
use crate::collision::{CollisionBox, CollisionResult, Edges};
use crate::viewport::Viewport;

pub type EntityId = u32;

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct EntityFlags {
    /// Skipped by the collision pass entirely.
    pub transparent: bool,
    pub destructible: bool,
    /// Solid entities push the actor back; non-solid ones are only touched.
    pub solid: bool,
}

impl Default for EntityFlags {
    fn default() -> Self {
        Self {
            transparent: false,
            destructible: false,
            solid: true,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Behavior {
    Static,
    Controllable(Box<ActorController>),
}

#[derive(Debug, Clone)]
pub struct Entity {
    pub id: EntityId,
    pub name: String,
    /// Bottom-left corner, y-up.
    pub position: Vec2,
    pub size: Vec2,
    pub collision_box: CollisionBox,
    /// Result of this tick's query, kept for the debug overlay.
    pub last_collision: CollisionResult,
    pub sprite: Option<SpritePlayer>,
    pub color: Color,
    pub flags: EntityFlags,
    pub shake: Interpolator,
    pub behavior: Behavior,
}

impl Entity {
    pub fn new(id: EntityId, name: &str, position: Vec2, size: Vec2) -> Self {
        Self {
            id,
            name: name.to_string(),
            position,
            size,
            collision_box: CollisionBox::new(position, size),
            last_collision: CollisionResult::default(),
            sprite: None,
            color: BLACK,
            flags: EntityFlags::default(),
            shake: Interpolator::shake(),
            behavior: Behavior::Static,
        }
    }

    pub fn with_sprite(mut self, sprite: SpritePlayer) -> Self {
        self.sprite = Some(sprite);
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_flags(mut self, flags: EntityFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_behavior(mut self, behavior: Behavior) -> Self {
        self.behavior = behavior;
        self
    }

    pub fn controller(&self) -> Option<&ActorController> {
        match &self.behavior {
            Behavior::Controllable(controller) => Some(&**controller),
            Behavior::Static => None,
        }
    }

    pub fn controller_mut(&mut self) -> Option<&mut ActorController> {
        match &mut self.behavior {
            Behavior::Controllable(controller) => Some(&mut **controller),
            Behavior::Static => None,
        }
    }

    pub fn refresh_box(&mut self) {
        self.collision_box.update(self.position, self.size);
    }

    /// Queries this entity's box against `other`. The caller decides whether
    /// to keep the result in `last_collision`.
    pub fn query(&self, other: &CollisionBox, inset: CollisionInset) -> CollisionResult {
        self.collision_box.overlap(other, inset)
    }

    /// Starts the bump shake unless one is already running.
    pub fn bump(&mut self) {
        if !self.shake.is_playing() {
            self.shake.play();
        }
    }

    /// Runs the controller for a controllable entity; static entities are inert.
    pub fn step_actor(&mut self, contacts: &Edges, dt: f32, bounds: &WorldBounds) -> StepEvents {
        let Behavior::Controllable(controller) = &mut self.behavior else {
            return StepEvents::default();
        };
        let events = controller.step(&mut self.position, self.size, contacts, dt, bounds);
        if let Some(sprite) = self.sprite.as_mut() {
            controller.animate(sprite, dt);
        }
        self.refresh_box();
        events
    }

    /// Cosmetic per-tick updates: shake and autoplay sprites.
    pub fn tick_effects(&mut self, dt: f32) {
        self.shake.advance(dt);
        if let (Behavior::Static, Some(sprite)) = (&self.behavior, self.sprite.as_mut()) {
            sprite.tick(dt);
        }
    }

    pub fn is_visible(&self, viewport: &Viewport) -> bool {
        viewport.is_visible(self.position.x, self.size.x)
    }

    pub fn render(&self, surface: &mut dyn Surface, viewport: &Viewport) {
        let lifted = self.position + Vec2::new(0.0, self.shake.value());
        let screen = viewport.to_screen(lifted, self.size.y);
        match &self.sprite {
            Some(sprite) => sprite.render(surface, screen.x, screen.y, viewport.aspect_ratio),
            None => surface.fill_rect(
                self.color,
                Rect::new(
                    screen.x,
                    screen.y,
                    self.size.x * viewport.aspect_ratio,
                    self.size.y * viewport.aspect_ratio,
                ),
            ),
        }
    }

    /// Contacted edges of this entity's box, in surface space.
    pub fn contact_segments(&self, viewport: &Viewport) -> Vec<(Vec2, Vec2)> {
        self.collision_box
            .edge_segments(&self.last_collision.edges)
            .into_iter()
            .map(|(a, b)| (viewport.point_to_screen(a), viewport.point_to_screen(b)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scroll_core::config::{ActorTuning, ViewportConfig};
    use scroll_core::render::{CommandBuffer, DrawCommand};
    use scroll_core::sprite::{Animation, SpriteSheet, TextureId};

    fn brick() -> Entity {
        Entity::new(1, "brick", Vec2::new(32.0, 64.0), Vec2::new(16.0, 16.0))
    }

    #[test]
    fn new_entity_box_matches_bounds() {
        let entity = brick();
        assert_eq!(entity.collision_box.left, 32.0);
        assert_eq!(entity.collision_box.top, 80.0);
        assert!(entity.controller().is_none());
    }

    #[test]
    fn refresh_box_follows_position() {
        let mut entity = brick();
        entity.position.x = 48.0;
        entity.refresh_box();
        assert_eq!(entity.collision_box.left, 48.0);
        assert_eq!(entity.collision_box.right, 64.0);
    }

    #[test]
    fn query_leaves_cached_result_alone() {
        let entity = brick();
        let actor = CollisionBox::new(Vec2::new(32.0, 40.0), Vec2::new(16.0, 32.0));
        let result = entity.query(&actor, CollisionInset::default());
        assert_eq!(result.edges.bottom, Some(64.0));
        assert!(result.colliding);
        assert_eq!(entity.last_collision, CollisionResult::default());
    }

    #[test]
    fn bump_is_idempotent_while_playing() {
        let mut entity = brick();
        entity.bump();
        entity.tick_effects(0.05);
        let progress = entity.shake.progress();
        entity.bump();
        assert_eq!(entity.shake.progress(), progress);
        assert!(entity.shake.value() > 0.0);
    }

    #[test]
    fn shake_lifts_rendered_position() {
        let viewport = Viewport::new(&ViewportConfig::default());
        let mut entity = brick().with_color([1.0, 0.0, 0.0, 1.0]);
        entity.bump();
        entity.tick_effects(0.075);

        let mut buffer = CommandBuffer::new();
        entity.render(&mut buffer, &viewport);
        match &buffer.commands[0] {
            DrawCommand::Fill { rect, color } => {
                assert_eq!(*color, [1.0, 0.0, 0.0, 1.0]);
                assert!((rect.y - (240.0 - 64.0 - 2.5 - 16.0)).abs() < 1e-3);
                assert_eq!(rect.x, 32.0);
            }
            other => panic!("expected fill, got {other:?}"),
        }
    }

    #[test]
    fn sprite_entity_renders_region() {
        let viewport = Viewport::new(&ViewportConfig::default());
        let sprite = SpritePlayer::new(
            SpriteSheet::new(TextureId(3), Vec2::new(16.0, 16.0)),
            Animation::Static(2),
        );
        let entity = brick().with_sprite(sprite);
        let mut buffer = CommandBuffer::new();
        entity.render(&mut buffer, &viewport);
        assert_eq!(buffer.regions().count(), 1);
    }

    #[test]
    fn autoplay_only_runs_for_static_entities() {
        let mut sheet_sprite = SpritePlayer::new(
            SpriteSheet::new(TextureId(3), Vec2::new(16.0, 16.0)),
            Animation::Cyclic(vec![0, 1, 2]),
        );
        sheet_sprite.autoplay = Some(10.0);

        let mut coin = brick().with_sprite(sheet_sprite.clone());
        coin.tick_effects(0.1);
        assert_eq!(coin.sprite.as_ref().map(|s| s.index()), Some(1.0));

        let mut actor = brick()
            .with_sprite(sheet_sprite)
            .with_behavior(Behavior::Controllable(Box::new(ActorController::new(
                ActorTuning::default(),
            ))));
        actor.tick_effects(0.1);
        assert_eq!(actor.sprite.as_ref().map(|s| s.index()), Some(0.0));
    }

    #[test]
    fn step_actor_moves_controllable_and_refreshes_box() {
        let mut actor = Entity::new(0, "actor", Vec2::ZERO, Vec2::new(16.0, 32.0)).with_behavior(
            Behavior::Controllable(Box::new(ActorController::new(ActorTuning::default()))),
        );
        if let Some(controller) = actor.controller_mut() {
            controller.velocity.x = 100.0;
        }
        actor.step_actor(&Edges::default(), 0.1, &WorldBounds::default());
        assert!(actor.position.x > 0.0);
        assert_eq!(actor.collision_box.left, actor.position.x);
    }

    #[test]
    fn step_actor_ignores_static() {
        let mut entity = brick();
        let events = entity.step_actor(&Edges::default(), 0.1, &WorldBounds::default());
        assert_eq!(events, StepEvents::default());
        assert_eq!(entity.position, Vec2::new(32.0, 64.0));
    }
}
