//! Frame-synchronous simulation loop.
//!
//! One `frame()` is one `tick()` followed by one `render()`. The caller owns
//! scheduling and wall-clock measurement; the simulation only sees the elapsed
//! seconds it is handed and the latest intent snapshot.
//!
//! Tick order:
//!
//!   1. frame delta from the clock, intent handed to the actor
//!   2. collision boxes re-derived from positions
//!   3. collision pass: aggregate solid contacts, decide contact reactions
//!   4. actor step and pose animation, then the finiteness check
//!   5. debug toggle and contact reactions (removals, shakes)
//!   6. cosmetic effects (shake, autoplay sprites)
//!   7. viewport follow
//!
//! A tick that fails the finiteness check leaves the scene, actor and clock as
//! they were before it started.

use scroll_core::config::{validate_config, SimConfig};
use scroll_core::error::SimError;
use scroll_core::input::IntentSnapshot;
use scroll_core::render::{Color, Rect, Surface};
use scroll_core::sprite::TextureRegistry;
use scroll_core::time::FrameClock;
use scroll_devtools::{DebugOverlay, EdgeSegment, OverlayStats};

use crate::actor::StepEvents;
use crate::collision::{CollisionResult, Edges};
use crate::entity::{Entity, EntityId};
use crate::level::LevelDescriptor;
use crate::viewport::Viewport;

const DEFAULT_BACKGROUND: Color = [0.36, 0.58, 0.99, 1.0];
const ACTOR_ID: EntityId = 0;

/// Outcome of one `tick`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Ticks while stopped change nothing and report `stopped`.
    pub stopped: bool,
    pub tick: u64,
    pub dt: f32,
    /// Solid contacts as seen from the actor, after aggregation.
    pub contacts: Edges,
    pub events: StepEvents,
    pub removed: Vec<EntityId>,
    pub scrolled: bool,
}

/// Outcome of the collision pass, applied only once the tick is known to succeed.
#[derive(Debug, Default)]
struct CollisionPass {
    /// Solid contacts in the actor's frame.
    contacts: Edges,
    /// One result per entity, in entity order.
    results: Vec<CollisionResult>,
    removed: Vec<EntityId>,
    bumped: Vec<EntityId>,
}

#[derive(Debug, Clone)]
pub struct Simulation {
    config: SimConfig,
    actor: Entity,
    entities: Vec<Entity>,
    viewport: Viewport,
    intent: IntentSnapshot,
    clock: FrameClock,
    overlay: DebugOverlay,
    background: Color,
    running: bool,
    tick_count: u64,
}

impl Simulation {
    pub fn new(
        config: SimConfig,
        level: &LevelDescriptor,
        textures: &TextureRegistry,
    ) -> Result<Self, SimError> {
        validate_config(&config)?;
        let actor = level.build_actor(ACTOR_ID, config.actor, textures)?;
        let entities = level.build_entities(ACTOR_ID + 1, textures)?;
        log::info!(
            "Simulation built: {} entities, actor at ({:.1}, {:.1})",
            entities.len(),
            actor.position.x,
            actor.position.y
        );

        Ok(Self {
            viewport: Viewport::new(&config.viewport),
            clock: FrameClock::new(config.max_frame_dt),
            overlay: DebugOverlay::new(config.debug),
            background: level.background.unwrap_or(DEFAULT_BACKGROUND),
            intent: IntentSnapshot::default(),
            running: false,
            tick_count: 0,
            actor,
            entities,
            config,
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn actor(&self) -> &Entity {
        &self.actor
    }

    pub fn actor_mut(&mut self) -> &mut Entity {
        &mut self.actor
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    pub fn overlay_visible(&self) -> bool {
        self.overlay.visible
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Starts (or restarts) ticking. The first tick after this integrates from dt 0.
    pub fn play(&mut self) {
        self.clock.reset();
        self.viewport.dt = 0.0;
        self.running = true;
        log::info!("Simulation playing at tick {}", self.tick_count);
    }

    /// Takes effect at the next tick boundary.
    pub fn stop(&mut self) {
        if self.running {
            log::info!("Simulation stopped at tick {}", self.tick_count);
        }
        self.running = false;
    }

    /// Latest intent; read by the next tick.
    pub fn set_intent(&mut self, intent: IntentSnapshot) {
        self.intent = intent;
    }

    pub fn tick(&mut self, elapsed: f32) -> Result<TickReport, SimError> {
        if !self.running {
            return Ok(TickReport {
                stopped: true,
                tick: self.tick_count,
                ..TickReport::default()
            });
        }

        let clock_before = self.clock.clone();
        let previous = self.actor.clone();

        let dt = self.clock.begin_frame(elapsed);
        let intent = self.intent;
        if let Some(controller) = self.actor.controller_mut() {
            controller.apply_intent(&intent);
        }

        self.actor.refresh_box();
        for entity in &mut self.entities {
            entity.refresh_box();
        }

        let pass = self.collision_pass();

        let events = self.actor.step_actor(&pass.contacts, dt, &self.config.world);
        if let Some(err) = self.non_finite_actor() {
            log::error!("Tick {} aborted: {err}", self.tick_count);
            self.actor = previous;
            self.clock = clock_before;
            return Err(err);
        }

        // Nothing below runs for an aborted tick.
        self.viewport.dt = dt;
        if self.intent.debug_toggle {
            self.overlay.toggle();
            // Edge-triggered: one toggle per snapshot handed in.
            self.intent.debug_toggle = false;
        }
        self.apply_reactions(&pass);
        if events.landed {
            log::debug!(
                "Actor landed at ({:.1}, {:.1}) on tick {}",
                self.actor.position.x,
                self.actor.position.y,
                self.tick_count
            );
        }

        self.actor.tick_effects(dt);
        for entity in &mut self.entities {
            entity.tick_effects(dt);
        }

        let scrolled = self.viewport.follow(self.actor.collision_box.right);

        let report = TickReport {
            stopped: false,
            tick: self.tick_count,
            dt,
            contacts: pass.contacts,
            events,
            removed: pass.removed,
            scrolled,
        };
        self.tick_count += 1;
        Ok(report)
    }

    /// Queries every entity against the actor without changing anything.
    fn collision_pass(&self) -> CollisionPass {
        let actor_box = self.actor.collision_box;
        let rising = self
            .actor
            .controller()
            .is_some_and(|controller| controller.velocity.y > 0.0);
        let inset = self.config.collision;

        let mut pass = CollisionPass {
            results: Vec::with_capacity(self.entities.len()),
            ..CollisionPass::default()
        };

        for entity in &self.entities {
            if entity.flags.transparent {
                pass.results.push(CollisionResult::default());
                continue;
            }
            let result = entity.query(&actor_box, inset);
            pass.results.push(result);
            if !result.colliding {
                continue;
            }

            if entity.flags.solid {
                pass.contacts = pass.contacts.merge(result.edges.mirrored());
                // Struck from below.
                if rising && result.edges.bottom.is_some() {
                    if entity.flags.destructible {
                        pass.removed.push(entity.id);
                    } else {
                        pass.bumped.push(entity.id);
                    }
                }
            } else if entity.flags.destructible {
                pass.removed.push(entity.id);
            }
        }

        pass
    }

    /// Caches query results, starts shakes and drops consumed entities.
    fn apply_reactions(&mut self, pass: &CollisionPass) {
        for (entity, result) in self.entities.iter_mut().zip(&pass.results) {
            entity.last_collision = *result;
            if pass.bumped.contains(&entity.id) {
                entity.bump();
            }
        }

        if !pass.removed.is_empty() {
            self.entities.retain(|entity| {
                let gone = pass.removed.contains(&entity.id);
                if gone {
                    log::debug!("Removed entity {} '{}'", entity.id, entity.name);
                }
                !gone
            });
        }
    }

    fn non_finite_actor(&self) -> Option<SimError> {
        let velocity = self
            .actor
            .controller()
            .map(|controller| controller.velocity)
            .unwrap_or_default();
        if self.actor.position.is_finite() && velocity.is_finite() {
            return None;
        }
        Some(SimError::NonFiniteState {
            tick: self.tick_count,
            x: self.actor.position.x,
            y: self.actor.position.y,
        })
    }

    /// Draws background, visible scenery, the actor, then the debug overlay.
    pub fn render(&self, surface: &mut dyn Surface) {
        let view = &self.viewport;
        surface.fill_rect(
            self.background,
            Rect::new(
                0.0,
                0.0,
                view.width * view.aspect_ratio,
                view.height * view.aspect_ratio,
            ),
        );

        for entity in self.entities.iter().filter(|e| e.is_visible(view)) {
            entity.render(surface, view);
        }
        self.actor.render(surface, view);

        if self.overlay.visible {
            let edges: Vec<EdgeSegment> = self
                .entities
                .iter()
                .filter(|e| e.is_visible(view))
                .flat_map(|e| e.contact_segments(view))
                .map(|(from, to)| EdgeSegment { from, to })
                .collect();
            self.overlay.render(
                surface,
                view.width,
                view.aspect_ratio,
                &self.overlay_stats(),
                &edges,
            );
        }
    }

    pub fn overlay_stats(&self) -> OverlayStats {
        let speed = self
            .actor
            .controller()
            .map(|controller| controller.velocity)
            .unwrap_or_default();
        OverlayStats {
            intent: self.intent,
            speed,
            position: self.actor.position,
            dt: self.clock.dt,
            fps: self.clock.smoothed_fps,
            entity_count: self.entities.len(),
        }
    }

    /// One tick then one render into `surface`.
    pub fn frame(
        &mut self,
        elapsed: f32,
        surface: &mut dyn Surface,
    ) -> Result<TickReport, SimError> {
        let report = self.tick(elapsed)?;
        self.render(surface);
        Ok(report)
    }
}
