pub mod config;
pub mod error;
pub mod input;
pub mod interpolate;
pub mod render;
pub mod sprite;
pub mod time;

pub use config::{ActorTuning, CollisionInset, SimConfig, ViewportConfig, WorldBounds};
pub use error::{ConfigError, SimError};
pub use input::{Action, IntentSnapshot, IntentState};
pub use interpolate::{Curve, Interpolator};
pub use render::{Color, CommandBuffer, DrawCommand, Rect, Surface};
pub use sprite::{Animation, SpritePlayer, SpriteSheet, TextureId, TextureRegistry};
pub use time::FrameClock;
