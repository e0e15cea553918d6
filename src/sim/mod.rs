//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Variable `dt` in nominal 60 Hz frames, supplied by the caller
//! - Seeded RNG only
//! - Stable iteration order (newest flower first)
//! - No rendering, storage or network dependencies

pub mod collision;
pub mod phase;
pub mod scenery;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::is_catch;
pub use phase::{PhaseTrigger, RunPhase};
pub use scenery::{Cloud, PineTree};
pub use spawn::{rise_speed, seed_initial_flowers, spawn_interval};
pub use state::{
    BonusText, Eater, EaterPhase, Flower, FlowerColor, FlowerKind, GameEvent, GameState, Particle,
    Player,
};
pub use tick::{
    InputSnapshot, TextEvent, TickOutcome, finish_submission, tick, transition, trigger_game_over,
};
