//! Draw-command contract between the simulation and the raster collaborator.
//!
//! The simulation never touches pixels. It calls into a `Surface`, whose
//! implementation lives outside the core (a canvas, a GPU sprite batcher, or
//! the `CommandBuffer` below for headless runs and tests). Rectangles are in
//! surface space: origin top-left, y growing downward.

use glam::Vec2;

use crate::sprite::TextureId;

pub type Color = [f32; 4];

pub const BLACK: Color = [0.0, 0.0, 0.0, 1.0];
pub const WHITE: Color = [1.0, 1.0, 1.0, 1.0];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }
}

pub trait Surface {
    fn draw_region(&mut self, image: TextureId, src: Rect, dst: Rect, flip_x: bool);
    fn fill_rect(&mut self, color: Color, rect: Rect);
    fn stroke_line(&mut self, color: Color, from: Vec2, to: Vec2, width: f32);
    fn fill_text(&mut self, color: Color, text: &str, at: Vec2);
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Region {
        image: TextureId,
        src: Rect,
        dst: Rect,
        flip_x: bool,
    },
    Fill {
        color: Color,
        rect: Rect,
    },
    Line {
        color: Color,
        from: Vec2,
        to: Vec2,
        width: f32,
    },
    Text {
        color: Color,
        text: String,
        at: Vec2,
    },
}

/// Records every call in order. Cleared by the owner between frames.
#[derive(Debug, Default, Clone)]
pub struct CommandBuffer {
    pub commands: Vec<DrawCommand>,
}

impl CommandBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn regions(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Region { .. }))
    }
}

impl Surface for CommandBuffer {
    fn draw_region(&mut self, image: TextureId, src: Rect, dst: Rect, flip_x: bool) {
        self.commands.push(DrawCommand::Region {
            image,
            src,
            dst,
            flip_x,
        });
    }

    fn fill_rect(&mut self, color: Color, rect: Rect) {
        self.commands.push(DrawCommand::Fill { color, rect });
    }

    fn stroke_line(&mut self, color: Color, from: Vec2, to: Vec2, width: f32) {
        self.commands.push(DrawCommand::Line {
            color,
            from,
            to,
            width,
        });
    }

    fn fill_text(&mut self, color: Color, text: &str, at: Vec2) {
        self.commands.push(DrawCommand::Text {
            color,
            text: text.to_string(),
            at,
        });
    }
}
