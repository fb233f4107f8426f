pub mod actor;
pub mod collision;
pub mod entity;
pub mod level;
pub mod replay;
pub mod runner;
pub mod simulation;
pub mod viewport;

pub use actor::{ActorController, Facing, MotionState, Pose, PoseSet, StepEvents};
pub use collision::{CollisionBox, CollisionResult, Edges};
pub use entity::{Behavior, Entity, EntityFlags, EntityId};
pub use level::{EntityDescriptor, LevelDescriptor, SpriteDescriptor};
pub use replay::{load_replay_from_path, ReplaySequence};
pub use runner::{demo_level, demo_replay, run_replay, RunSummary};
pub use simulation::{Simulation, TickReport};
pub use viewport::Viewport;
