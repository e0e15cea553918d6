//! Bouquet Rescue - a rising-flower bounce and catch arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, spawning, scoring, game-over phases)
//! - `game`: The owning `Simulation` that connects the sim to its collaborators
//! - `highscores`: Leaderboard rules (sanitising, ranking, identity dedupe)
//! - `service`: Score/leaderboard gateway abstraction
//! - `persistence`: Local high score persistence
//! - `platform`: Browser/native platform abstraction (input, time, storage)
//! - `tuning`: Data-driven game balance

pub mod game;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod service;
pub mod sim;
pub mod tuning;

pub use game::Simulation;
pub use highscores::{Leaderboard, LeaderboardEntry, LeaderboardError};
pub use service::{LocalScoreService, OfflineScoreService, PendingSubmission, ScoreService};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Canvas dimensions (logical pixels)
    pub const CANVAS_WIDTH: f32 = 400.0;
    pub const CANVAS_HEIGHT: f32 = 600.0;

    /// One nominal simulation unit: a 60 Hz frame in milliseconds
    pub const NOMINAL_FRAME_MS: f64 = 1000.0 / 60.0;
    /// Frame deltas are clamped to this many nominal frames
    pub const MAX_FRAME_DELTA: f32 = 3.0;
    /// Raw frame deltas at or above this many frames skip the tick (tab was hidden)
    pub const SKIP_FRAME_DELTA: f32 = 5.0;

    /// Player sprite size
    pub const PLAYER_SIZE: f32 = 40.0;
    /// Player start height
    pub const PLAYER_START_Y: f32 = 100.0;
    /// Soft ceiling; gravity halves above it and the player can't rise past it
    pub const SOFT_CEILING_Y: f32 = 50.0;

    /// Flower defaults
    pub const FLOWER_SIZE: f32 = 50.0;
    pub const FINCH_WIDTH: f32 = 60.0;
    /// Horizontal spawn margin on each side of the canvas
    pub const SPAWN_MARGIN: f32 = 40.0;
    /// Flowers above this height are gone for good
    pub const FLOWER_OFFSCREEN_Y: f32 = -100.0;
    /// A flower rising past this line uncaught summons an eater
    pub const EATER_TRIGGER_Y: f32 = 50.0;

    /// Catch band below the flower top edge
    pub const CATCH_BAND: f32 = 20.0;
    /// Extra horizontal forgiveness on each side of a flower
    pub const CATCH_PADDING: f32 = 10.0;

    /// Eater defaults
    pub const EATER_SIZE: f32 = 60.0;
    pub const EATER_START_Y: f32 = -50.0;
    pub const EATER_TARGET_Y: f32 = 20.0;

    /// Particle burst
    pub const BURST_PARTICLES: usize = 8;
    pub const PARTICLE_GRAVITY: f32 = 0.1;

    /// Bonus popup offset above the caught flower, and its float speed
    pub const BONUS_TEXT_OFFSET: f32 = 30.0;
    pub const BONUS_TEXT_RISE: f32 = 1.0;

    /// Scenery
    pub const CLOUD_COUNT: usize = 5;
    pub const PINE_TREE_SPACING: f32 = 60.0;
}
