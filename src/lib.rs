//! # Forage
//!
//! Forage spawning and breakable container engine for tile-based farming games.
//!
//! ## Architecture Overview
//!
//! The crate is the gameplay core of a forage spawner. Everything the host game
//! owns (terrain, item data, sound, particles, the network) is reached through
//! small collaborator traits, so the engine itself stays deterministic and
//! testable:
//!
//! - **Items**: item categories, descriptors and the resolver that maps a
//!   `(category, id-or-name)` pair to a canonical item ID against host catalogs
//! - **Generation**: spawn rules and the evaluator that picks tiles and items
//!   for each in-game day
//! - **Container**: the breakable barrel/crate state machine
//! - **Effects**: the debris dispatcher that turns container events into
//!   item-drop, sound and particle requests for the host
//! - **World**: tile coordinates, the location traits and an in-memory
//!   [`GridLocation`] used by tests and the `forage-sim` binary
//!
//! ## Determinism
//!
//! No component owns a random source. Every stochastic call takes an explicit
//! [`rand::Rng`] handle, so a seeded generator reproduces the same placements
//! and the same effect data on every run.

pub mod container;
pub mod effects;
pub mod generation;
pub mod items;
pub mod world;

// Core module re-exports
pub use container::*;
pub use effects::*;
pub use generation::*;
pub use items::*;
pub use world::*;

/// Core error type for the forage engine.
///
/// Resolution misses and no-op interactions are not errors; they are reported
/// as `None` or as an outcome value. This type covers configuration and host
/// integration failures only.
#[derive(thiserror::Error, Debug)]
pub enum ForageError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Spawn counts or weights outside their valid bounds
    #[error("Configuration out of range: {0}")]
    ConfigurationRange(String),

    /// Location data that does not describe a valid location
    #[error("Invalid context: {0}")]
    InvalidContext(String),

    /// Breakable containers must be purged before the location is saved
    #[error("{0} breakable container(s) must be purged before saving")]
    UnpurgedContainers(usize),
}

/// Result type used throughout the forage codebase.
pub type ForageResult<T> = Result<T, ForageError>;

/// Version information for the crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine constants.
pub mod config {
    use crate::effects::{SpriteRect, Tint};

    /// Size of one tile in world pixels
    pub const TILE_SIZE: i32 = 64;

    /// Hits a freshly spawned container takes before it breaks
    pub const DEFAULT_HITS_TO_BREAK: i32 = 3;

    /// How long a container shakes after a non-breaking hit
    pub const SHAKE_DURATION_MS: u32 = 300;

    /// Radial debris burst size on a non-breaking hit (inclusive)
    pub const HIT_DEBRIS_COUNT: (u32, u32) = (4, 6);

    /// Decorative particle burst size when a container breaks (inclusive)
    pub const BREAK_DEBRIS_COUNT: (u32, u32) = (4, 11);

    /// Bound of the random pixel offset applied to released items
    pub const ITEM_DEBRIS_JITTER: i32 = 8;

    /// Debris sprite index used for radial hit debris
    pub const RADIAL_DEBRIS_INDEX: u32 = 12;

    /// First decorative break debris source rectangle
    pub const BREAK_DEBRIS_SOURCE: SpriteRect = SpriteRect::new(598, 1275, 13, 4);

    /// Second decorative break debris source rectangle
    pub const BREAK_DEBRIS_SOURCE_ALT: SpriteRect = SpriteRect::new(611, 1275, 10, 4);

    /// Wood tint applied to every container debris particle
    pub const CONTAINER_TINT: Tint = Tint::rgb(130, 80, 30);

    /// Frame interval of decorative debris sprites
    pub const DEBRIS_INTERVAL_MS: f32 = 999.0;

    /// Per-frame alpha fade of decorative debris sprites
    pub const DEBRIS_ALPHA_FADE: f32 = 0.01;

    /// Draw scale of decorative debris sprites
    pub const DEBRIS_SCALE: f32 = 4.0;

    /// Downward acceleration of decorative debris sprites
    pub const DEBRIS_GRAVITY: f32 = 0.3;
}
