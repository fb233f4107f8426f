//! Error types shared by the simulation crates.
//!
//! The core has no I/O failure surface during a tick; every variant here is a
//! data-contract violation caught either at scene construction or when a tick
//! would push the actor into a non-finite state.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("validation failed: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum SimError {
    /// A descriptor names a texture the atlas provider never registered.
    #[error("entity '{entity}' references unknown texture '{texture}'")]
    MissingTexture { entity: String, texture: String },

    /// The atlas provider registered the same texture name twice.
    #[error("texture name '{texture}' already registered")]
    DuplicateTexture { texture: String },

    #[error("entity '{entity}' has an invalid descriptor: {reason}")]
    InvalidDescriptor { entity: String, reason: String },

    /// Integration produced NaN or infinity; the previous actor state was kept.
    #[error("actor state became non-finite at tick {tick}: position ({x}, {y})")]
    NonFiniteState { tick: u64, x: f32, y: f32 },

    #[error(transparent)]
    Config(#[from] ConfigError),
}
