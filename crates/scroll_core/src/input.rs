//! Per-tick intent snapshot plus an accumulator that builds one from
//! press/release events.
//!
//! The simulation only ever sees an `IntentSnapshot`. Whoever maps devices to
//! actions (keyboard, gamepad, replay file) feeds `IntentState`, which tracks:
//!
//! - **Level-triggered (held):** movement, jump and sprint are true every tick
//!   the action stays down.
//! - **Edge-triggered (just pressed):** the debug toggle fires once per press.
//!   It is cleared by `end_tick()`, which the caller runs after the tick has
//!   consumed the snapshot so a press between ticks is never lost.

use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    MoveLeft,
    MoveRight,
    Jump,
    Sprint,
    Debug,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntentSnapshot {
    pub move_left: bool,
    pub move_right: bool,
    pub jump_held: bool,
    pub sprint_held: bool,
    pub debug_toggle: bool,
}

impl IntentSnapshot {
    /// Horizontal intent in {-1, 0, 1}. Opposite directions cancel.
    pub fn direction_x(&self) -> f32 {
        match (self.move_left, self.move_right) {
            (false, true) => 1.0,
            (true, false) => -1.0,
            _ => 0.0,
        }
    }
}

#[derive(Debug, Default)]
pub struct IntentState {
    held: HashSet<Action>,
    just_pressed: HashSet<Action>,
}

impl IntentState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, action: Action) {
        if self.held.insert(action) {
            self.just_pressed.insert(action);
        }
    }

    pub fn release(&mut self, action: Action) {
        self.held.remove(&action);
    }

    pub fn is_held(&self, action: Action) -> bool {
        self.held.contains(&action)
    }

    pub fn is_just_pressed(&self, action: Action) -> bool {
        self.just_pressed.contains(&action)
    }

    pub fn snapshot(&self) -> IntentSnapshot {
        IntentSnapshot {
            move_left: self.is_held(Action::MoveLeft),
            move_right: self.is_held(Action::MoveRight),
            jump_held: self.is_held(Action::Jump),
            sprint_held: self.is_held(Action::Sprint),
            debug_toggle: self.is_just_pressed(Action::Debug),
        }
    }

    pub fn end_tick(&mut self) {
        self.just_pressed.clear();
    }
}
