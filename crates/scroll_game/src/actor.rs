//! Controllable actor: intent → velocity → position, with a Grounded/Airborne
//! state machine and pose selection for the sprite.
//!
//! `step` runs in a fixed order and reordering changes the outcome:
//!
//!   1. collision correction from this tick's aggregated contacts
//!   2. horizontal velocity toward intent (friction when grounded and idle)
//!   3. vertical velocity: takeoff, held-jump boost, or gravity
//!   4. world bound clamps
//!   5. position += velocity * dt (velocity first, then position)
//!   6. facing from horizontal velocity
//!   7. pose selection
//!
//! Speed, gravity and boost deltas are applied once per tick; velocities are in
//! world units per second.

use glam::Vec2;
use scroll_core::config::{ActorTuning, WorldBounds};
use scroll_core::input::IntentSnapshot;
use scroll_core::sprite::{Animation, SpritePlayer};

use crate::collision::Edges;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionState {
    Grounded,
    Airborne,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pose {
    Idle,
    Walk,
    Jump,
    Skid,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PoseSet {
    pub idle: Animation,
    pub walk: Animation,
    pub jump: Animation,
    pub skid: Animation,
}

impl PoseSet {
    pub fn get(&self, pose: Pose) -> &Animation {
        match pose {
            Pose::Idle => &self.idle,
            Pose::Walk => &self.walk,
            Pose::Jump => &self.jump,
            Pose::Skid => &self.skid,
        }
    }
}

impl Default for PoseSet {
    fn default() -> Self {
        Self {
            idle: Animation::Static(0),
            walk: Animation::Cyclic(vec![1, 2, 3]),
            jump: Animation::Static(5),
            skid: Animation::Static(4),
        }
    }
}

/// What happened during one `step`, for logging and contact reactions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepEvents {
    pub landed: bool,
    pub jumped: bool,
    pub bumped_head: bool,
}

#[derive(Debug, Clone)]
pub struct ActorController {
    pub velocity: Vec2,
    /// Desired direction, each axis in {-1, 0, 1}.
    pub intent: Vec2,
    pub jump_held: bool,
    pub sprint_held: bool,
    pub current_max_speed: f32,
    pub motion: MotionState,
    pub facing: Facing,
    /// Seconds spent continuously off the ground.
    pub jump_hold_timer: f32,
    jump_started: bool,
    jump_released: bool,
    pub pose: Pose,
    pub poses: PoseSet,
    pub tuning: ActorTuning,
}

impl ActorController {
    pub fn new(tuning: ActorTuning) -> Self {
        Self {
            velocity: Vec2::ZERO,
            intent: Vec2::ZERO,
            jump_held: false,
            sprint_held: false,
            current_max_speed: tuning.walk_speed,
            motion: MotionState::Airborne,
            facing: Facing::Right,
            jump_hold_timer: 0.0,
            jump_started: false,
            jump_released: false,
            pose: Pose::Idle,
            poses: PoseSet::default(),
            tuning,
        }
    }

    pub fn is_airborne(&self) -> bool {
        self.motion == MotionState::Airborne
    }

    pub fn apply_intent(&mut self, intent: &IntentSnapshot) {
        self.intent = Vec2::new(intent.direction_x(), 0.0);
        self.sprint_held = intent.sprint_held;
        self.jump_held = intent.jump_held;
        if self.jump_started && !intent.jump_held {
            self.jump_released = true;
        }
    }

    pub fn step(
        &mut self,
        position: &mut Vec2,
        size: Vec2,
        contacts: &Edges,
        dt: f32,
        bounds: &WorldBounds,
    ) -> StepEvents {
        let mut events = StepEvents::default();
        let tuning = self.tuning;

        // 1. Collision correction.
        let mut supported = false;
        if let Some(line) = contacts.bottom {
            if self.velocity.y <= 0.0 {
                position.y = line;
                self.velocity.y = 0.0;
                supported = true;
            }
        }
        if let Some(line) = contacts.top {
            if self.velocity.y > 0.0 {
                position.y = line - size.y;
                self.velocity.y = 0.0;
                events.bumped_head = true;
                // A bump ends the jump; holding the button cannot push back up.
                self.jump_started = true;
                self.jump_released = true;
            }
        }
        if let Some(line) = contacts.left {
            position.x = line;
            if self.velocity.x < 0.0 {
                self.velocity.x = 0.0;
            }
        }
        if let Some(line) = contacts.right {
            position.x = line - size.x;
            if self.velocity.x > 0.0 {
                self.velocity.x = 0.0;
            }
        }
        if let Some(floor) = bounds.floor {
            if position.y <= floor && self.velocity.y <= 0.0 {
                position.y = floor;
                self.velocity.y = 0.0;
                supported = true;
            }
        }

        if supported {
            events.landed = self.is_airborne();
            self.ground();
        } else {
            self.motion = MotionState::Airborne;
            self.jump_hold_timer += dt;
        }

        // 2. Horizontal.
        let target_max = if self.sprint_held {
            tuning.run_speed
        } else {
            tuning.walk_speed
        };
        self.current_max_speed =
            move_towards(self.current_max_speed, target_max, tuning.speed_delta);

        if self.intent.x != 0.0 {
            let target = self.intent.x * self.current_max_speed;
            self.velocity.x = move_towards(self.velocity.x, target, tuning.speed_delta);
        } else if !self.is_airborne() {
            self.velocity.x = move_towards(self.velocity.x, 0.0, tuning.speed_delta);
        }

        // 3. Vertical.
        let may_take_off = self.jump_held
            && !self.jump_started
            && self.jump_hold_timer < tuning.jump_hold_threshold;
        let sustaining = self.jump_started
            && self.jump_held
            && !self.jump_released
            && self.jump_hold_timer < tuning.jump_hold_threshold;

        if may_take_off {
            self.velocity.y = tuning.jump_impulse;
            self.motion = MotionState::Airborne;
            self.jump_started = true;
            events.jumped = true;
        } else if !self.is_airborne() {
            // Freshly grounded ticks skip gravity.
        } else if sustaining {
            self.velocity.y = move_towards(self.velocity.y, tuning.jump_impulse, tuning.jump_boost);
        } else {
            self.velocity.y = (self.velocity.y + tuning.gravity).max(tuning.max_fall_speed);
        }

        // 4. World bounds.
        if position.x < bounds.left {
            position.x = bounds.left;
            if self.velocity.x < 0.0 {
                self.velocity.x = 0.0;
            }
        }
        if let Some(right) = bounds.right {
            if position.x + size.x > right {
                position.x = right - size.x;
                if self.velocity.x > 0.0 {
                    self.velocity.x = 0.0;
                }
            }
        }
        if let Some(ceiling) = bounds.ceiling {
            if position.y + size.y > ceiling {
                position.y = ceiling - size.y;
                if self.velocity.y > 0.0 {
                    self.velocity.y = 0.0;
                }
            }
        }
        if let Some(floor) = bounds.floor {
            if position.y < floor && self.velocity.y <= 0.0 {
                position.y = floor;
                self.velocity.y = 0.0;
                events.landed |= self.is_airborne();
                self.ground();
            }
        }

        // 5. Semi-implicit Euler.
        *position += self.velocity * dt;

        // 6. Facing; zero velocity keeps the last direction.
        if self.velocity.x > 0.0 {
            self.facing = Facing::Right;
        } else if self.velocity.x < 0.0 {
            self.facing = Facing::Left;
        }

        // 7. Pose.
        self.pose = self.select_pose();

        events
    }

    /// Applies the selected pose to the actor's sprite and advances walk cycles
    /// by distance travelled.
    pub fn animate(&self, sprite: &mut SpritePlayer, dt: f32) {
        sprite.set_animation(self.poses.get(self.pose));
        sprite.mirrored = self.facing == Facing::Left;
        if self.pose == Pose::Walk {
            sprite.advance(self.velocity.x * dt * self.tuning.walk_frames_per_unit);
        }
    }

    fn select_pose(&self) -> Pose {
        let vx = self.velocity.x;
        if self.is_airborne() {
            Pose::Jump
        } else if vx != 0.0 && self.intent.x != 0.0 && self.intent.x.signum() != vx.signum() {
            Pose::Skid
        } else if vx != 0.0 {
            Pose::Walk
        } else {
            Pose::Idle
        }
    }

    fn ground(&mut self) {
        self.motion = MotionState::Grounded;
        self.jump_hold_timer = 0.0;
        self.jump_started = false;
        self.jump_released = false;
    }
}

pub(crate) fn move_towards(current: f32, target: f32, max_delta: f32) -> f32 {
    if (target - current).abs() <= max_delta {
        target
    } else if target > current {
        current + max_delta
    } else {
        current - max_delta
    }
}
