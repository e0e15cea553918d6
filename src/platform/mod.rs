//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Time/ticks
//! - Input events
//! - Storage (LocalStorage on web)
//! - The leaderboard backend bridge (web only)

pub mod input;
pub mod storage;
pub mod time;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use input::InputCollector;
pub use storage::{KeyValueStore, MemoryStore, StorageError};
pub use time::FrameClock;
