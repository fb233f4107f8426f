//! Sprite playback over a texture atlas region.
//!
//! A `SpritePlayer` keeps a fractional frame index into the active frame
//! sequence. Callers move it with `advance`, typically by a speed-derived
//! amount so walk cycles track ground speed. Rendering is a pure dispatch to
//! the surface; it never moves the index.
//!
//! Wrap rule: once the index reaches the sequence length it goes back to 0,
//! not to `index - len`. An empty sequence always shows atlas frame 0.

use std::collections::HashMap;

use glam::Vec2;

use crate::error::SimError;
use crate::render::{Rect, Surface};

/// Opaque image handle handed out by the atlas provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u32);

/// Name -> handle lookup populated by the atlas provider before scene construction.
#[derive(Debug, Clone, Default)]
pub struct TextureRegistry {
    textures: HashMap<String, TextureId>,
}

impl TextureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: &str, id: TextureId) -> Result<(), SimError> {
        if self.textures.contains_key(name) {
            return Err(SimError::DuplicateTexture {
                texture: name.to_string(),
            });
        }
        self.textures.insert(name.to_string(), id);
        Ok(())
    }

    pub fn resolve(&self, name: &str) -> Option<TextureId> {
        self.textures.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}

/// Where a sprite's frames live inside its atlas image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteSheet {
    pub image: TextureId,
    pub origin: Vec2,
    pub frame_size: Vec2,
    pub padding: f32,
    /// Frames per atlas row; `None` lays every frame on a single row.
    pub cells_per_row: Option<u32>,
    pub zoom: f32,
}

impl SpriteSheet {
    pub fn new(image: TextureId, frame_size: Vec2) -> Self {
        Self {
            image,
            origin: Vec2::ZERO,
            frame_size,
            padding: 0.0,
            cells_per_row: None,
            zoom: 1.0,
        }
    }

    pub fn source_rect(&self, frame: u32) -> Rect {
        let (col, row) = match self.cells_per_row {
            Some(per_row) if per_row > 0 => (frame % per_row, frame / per_row),
            _ => (frame, 0),
        };
        Rect::new(
            self.origin.x + col as f32 * (self.frame_size.x + self.padding),
            self.origin.y + row as f32 * (self.frame_size.y + self.padding),
            self.frame_size.x,
            self.frame_size.y,
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Animation {
    Static(u32),
    Cyclic(Vec<u32>),
}

#[derive(Debug, Clone)]
pub struct SpritePlayer {
    sheet: SpriteSheet,
    animation: Animation,
    frames: Vec<u32>,
    index: f32,
    pub mirrored: bool,
    /// Frames per second for sprites that animate on their own.
    pub autoplay: Option<f32>,
}

impl SpritePlayer {
    pub fn new(sheet: SpriteSheet, animation: Animation) -> Self {
        let frames = frames_of(&animation);
        Self {
            sheet,
            animation,
            frames,
            index: 0.0,
            mirrored: false,
            autoplay: None,
        }
    }

    pub fn sheet(&self) -> &SpriteSheet {
        &self.sheet
    }

    pub fn animation(&self) -> &Animation {
        &self.animation
    }

    pub fn index(&self) -> f32 {
        self.index
    }

    /// Switches the active sequence. Re-selecting the current one keeps its
    /// phase; any real switch restarts from the first frame.
    pub fn set_animation(&mut self, animation: &Animation) {
        if self.animation == *animation {
            return;
        }
        self.animation = animation.clone();
        self.frames = frames_of(animation);
        self.index = 0.0;
    }

    pub fn advance(&mut self, speed: f32) {
        self.index += speed.abs();
        if self.index >= self.frames.len() as f32 {
            self.index = 0.0;
        }
    }

    /// Autoplay step, a no-op for sprites driven externally.
    pub fn tick(&mut self, dt: f32) {
        if let Some(fps) = self.autoplay {
            self.advance(fps * dt);
        }
    }

    pub fn current_frame(&self) -> u32 {
        self.frames
            .get(self.index.floor() as usize)
            .copied()
            .unwrap_or(0)
    }

    /// Size on the surface for the given device scale.
    pub fn draw_size(&self, scale: f32) -> Vec2 {
        self.sheet.frame_size * self.sheet.zoom * scale
    }

    /// `x`/`y` are the top-left corner in surface space.
    pub fn render(&self, surface: &mut dyn Surface, x: f32, y: f32, scale: f32) {
        let size = self.draw_size(scale);
        surface.draw_region(
            self.sheet.image,
            self.sheet.source_rect(self.current_frame()),
            Rect::new(x, y, size.x, size.y),
            self.mirrored,
        );
    }
}

fn frames_of(animation: &Animation) -> Vec<u32> {
    match animation {
        Animation::Static(frame) => vec![*frame],
        Animation::Cyclic(frames) => frames.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{CommandBuffer, DrawCommand};

    fn sheet() -> SpriteSheet {
        SpriteSheet::new(TextureId(7), Vec2::new(16.0, 16.0))
    }

    fn walk_player() -> SpritePlayer {
        SpritePlayer::new(sheet(), Animation::Cyclic(vec![1, 2, 3, 4]))
    }

    #[test]
    fn advance_zero_keeps_index() {
        let mut player = walk_player();
        player.advance(1.25);
        let before = player.index();
        player.advance(0.0);
        assert_eq!(player.index(), before);
    }

    #[test]
    fn advance_uses_speed_magnitude() {
        let mut player = walk_player();
        player.advance(-1.5);
        assert_eq!(player.index(), 1.5);
        assert_eq!(player.current_frame(), 2);
    }

    #[test]
    fn reaching_end_wraps_to_zero_not_remainder() {
        let mut player = walk_player();
        player.advance(4.5);
        assert_eq!(player.index(), 0.0);
        assert_eq!(player.current_frame(), 1);

        player.advance(3.5);
        player.advance(0.5);
        assert_eq!(player.index(), 0.0);
    }

    #[test]
    fn empty_sequence_falls_back_to_frame_zero() {
        let mut player = SpritePlayer::new(sheet(), Animation::Cyclic(Vec::new()));
        assert_eq!(player.current_frame(), 0);
        player.advance(3.0);
        assert_eq!(player.index(), 0.0);
        assert_eq!(player.current_frame(), 0);
    }

    #[test]
    fn switching_to_static_resets_index() {
        let mut player = walk_player();
        player.advance(2.5);
        player.set_animation(&Animation::Static(9));
        assert_eq!(player.index(), 0.0);
        assert_eq!(player.current_frame(), 9);

        player.set_animation(&Animation::Cyclic(vec![1, 2, 3, 4]));
        assert_eq!(player.current_frame(), 1);
    }

    #[test]
    fn reselecting_same_animation_keeps_phase() {
        let mut player = walk_player();
        player.advance(2.5);
        player.set_animation(&Animation::Cyclic(vec![1, 2, 3, 4]));
        assert_eq!(player.index(), 2.5);
    }

    #[test]
    fn multi_row_atlas_addressing() {
        let mut sheet = sheet();
        sheet.origin = Vec2::new(4.0, 8.0);
        sheet.padding = 1.0;
        sheet.cells_per_row = Some(3);

        let rect = sheet.source_rect(4);
        assert_eq!(rect, Rect::new(4.0 + 17.0, 8.0 + 17.0, 16.0, 16.0));
        let rect = sheet.source_rect(2);
        assert_eq!(rect, Rect::new(4.0 + 34.0, 8.0, 16.0, 16.0));
    }

    #[test]
    fn render_does_not_mutate_and_honours_mirror() {
        let mut player = walk_player();
        player.advance(1.0);
        player.mirrored = true;
        let mut buffer = CommandBuffer::new();
        player.render(&mut buffer, 10.0, 20.0, 2.0);
        assert_eq!(player.index(), 1.0);
        assert_eq!(
            buffer.commands,
            vec![DrawCommand::Region {
                image: TextureId(7),
                src: Rect::new(32.0, 0.0, 16.0, 16.0),
                dst: Rect::new(10.0, 20.0, 32.0, 32.0),
                flip_x: true,
            }]
        );
    }

    #[test]
    fn autoplay_advances_by_rate_times_dt() {
        let mut player = walk_player();
        player.tick(0.5);
        assert_eq!(player.index(), 0.0);
        player.autoplay = Some(4.0);
        player.tick(0.5);
        assert_eq!(player.index(), 2.0);
    }

    #[test]
    fn registry_rejects_duplicates() {
        let mut registry = TextureRegistry::new();
        registry.register("tiles", TextureId(1)).expect("first insert");
        let err = registry
            .register("tiles", TextureId(2))
            .expect_err("duplicate should fail");
        assert!(matches!(
            err,
            SimError::DuplicateTexture { ref texture } if texture == "tiles"
        ));
        assert!(err.to_string().contains("already registered"));
        assert_eq!(registry.resolve("tiles"), Some(TextureId(1)));
        assert_eq!(registry.resolve("hero"), None);
    }
}
