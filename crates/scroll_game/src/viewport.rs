//! One-directional follow camera.
//!
//! The scroll offset only ever grows: once the actor's right edge passes the
//! middle of the screen the camera keeps it there, and walking back left never
//! pulls the view with it.

use glam::Vec2;
use scroll_core::config::ViewportConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub offset: f32,
    pub aspect_ratio: f32,
    pub dt: f32,
}

impl Viewport {
    pub fn new(config: &ViewportConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
            offset: 0.0,
            aspect_ratio: config.aspect_ratio,
            dt: 0.0,
        }
    }

    /// Returns true when the offset moved.
    pub fn follow(&mut self, actor_right: f32) -> bool {
        let half = self.width / 2.0;
        if actor_right > half + self.offset {
            self.offset = actor_right - half;
            return true;
        }
        false
    }

    pub fn is_visible(&self, x: f32, width: f32) -> bool {
        x + width >= self.offset && x <= self.offset + self.width
    }

    /// Top-left corner on the surface for a y-up world box at `position`.
    pub fn to_screen(&self, position: Vec2, height: f32) -> Vec2 {
        Vec2::new(
            (position.x - self.offset) * self.aspect_ratio,
            (self.height - position.y - height) * self.aspect_ratio,
        )
    }

    /// Surface coordinates of an arbitrary world point.
    pub fn point_to_screen(&self, point: Vec2) -> Vec2 {
        Vec2::new(
            (point.x - self.offset) * self.aspect_ratio,
            (self.height - point.y) * self.aspect_ratio,
        )
    }
}
