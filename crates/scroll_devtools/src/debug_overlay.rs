//! Debug overlay drawn on top of the scene through the same `Surface` the
//! simulation renders into.
//!
//! The overlay is purely observational: it receives a stats snapshot and a
//! list of contact edges already mapped to surface space, and emits a panel
//! with text plus green line segments. It never feeds anything back into the
//! simulation. Visibility is toggled by the intent snapshot's debug flag.

use glam::Vec2;
use scroll_core::input::IntentSnapshot;
use scroll_core::render::{Color, Rect, Surface, WHITE};

const PANEL_WIDTH: f32 = 150.0;
const PANEL_HEIGHT: f32 = 150.0;
const LINE_HEIGHT: f32 = 16.0;
const PANEL_COLOR: Color = [0.0, 0.0, 0.0, 0.5];
const EDGE_COLOR: Color = [0.0, 1.0, 0.0, 1.0];

#[derive(Debug, Clone, Default)]
pub struct OverlayStats {
    pub intent: IntentSnapshot,
    pub speed: Vec2,
    pub position: Vec2,
    pub dt: f32,
    pub fps: f32,
    pub entity_count: usize,
}

/// One contacted box edge, in surface space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeSegment {
    pub from: Vec2,
    pub to: Vec2,
}

#[derive(Debug, Clone, Default)]
pub struct DebugOverlay {
    pub visible: bool,
}

impl DebugOverlay {
    pub fn new(visible: bool) -> Self {
        Self { visible }
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
        log::info!("Debug overlay: {}", if self.visible { "ON" } else { "OFF" });
    }

    /// `viewport_width` is in world units; `scale` maps them to surface pixels.
    pub fn render(
        &self,
        surface: &mut dyn Surface,
        viewport_width: f32,
        scale: f32,
        stats: &OverlayStats,
        edges: &[EdgeSegment],
    ) {
        if !self.visible {
            return;
        }

        for edge in edges {
            surface.stroke_line(EDGE_COLOR, edge.from, edge.to, 2.0 * scale);
        }

        let left = viewport_width - PANEL_WIDTH;
        surface.fill_rect(
            PANEL_COLOR,
            Rect::new(left * scale, 0.0, PANEL_WIDTH * scale, PANEL_HEIGHT * scale),
        );

        let mut text = |label: &str, x: f32, line: f32| {
            surface.fill_text(WHITE, label, Vec2::new(x * scale, line * LINE_HEIGHT * scale));
        };

        let intent = &stats.intent;
        if intent.jump_held {
            text("jump", left + 50.0, 1.0);
        }
        if intent.sprint_held {
            text("sprint", left + 100.0, 1.0);
        }
        if intent.move_left {
            text("left", left + 10.0, 2.0);
        }
        if intent.move_right {
            text("right", left + 100.0, 2.0);
        }

        text(
            &format!("Speed: {:.1},{:.1}", stats.speed.x, stats.speed.y),
            left,
            3.75,
        );
        text(
            &format!("Pos: {:.1},{:.1}", stats.position.x, stats.position.y),
            left,
            4.75,
        );
        text(&format!("dt: {:.4}", stats.dt), left, 5.75);
        text(&format!("fps: {:.0}", stats.fps), left, 6.75);
        text(&format!("Entities: {}", stats.entity_count), left, 7.75);
    }
}
