//! Run phase state machine
//!
//! A run is `Playing` until the player falls, then walks the game-over
//! sequence. Transitions are a closed table so they can be tested apart from
//! the timers that drive them.

use serde::Serialize;

/// Phase of the current run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum RunPhase {
    /// Normal play (or countdown / not yet started)
    #[default]
    Playing,
    /// Eaters chomp the remaining flowers one by one
    Eating,
    /// Timed rebuke message
    Scolding,
    /// Leaderboard name entry
    NameEntry,
    /// Terminal until restarted
    GameOver,
}

/// What drives a phase change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseTrigger {
    /// Player dropped below the canvas
    PlayerFell,
    /// No flowers left and no eater mid-chomp
    FlowersConsumed,
    /// Scolding hold finished
    ScoldingElapsed { qualifies: bool },
    /// Name submitted (either outcome) or skipped
    NameResolved,
}

impl RunPhase {
    /// Transition table. `None` means the trigger doesn't apply here.
    pub fn next(self, trigger: PhaseTrigger) -> Option<RunPhase> {
        use PhaseTrigger::*;
        use RunPhase::*;

        match (self, trigger) {
            (Playing, PlayerFell) => Some(Eating),
            (Eating, FlowersConsumed) => Some(Scolding),
            (Scolding, ScoldingElapsed { qualifies: true }) => Some(NameEntry),
            (Scolding, ScoldingElapsed { qualifies: false }) => Some(GameOver),
            (NameEntry, NameResolved) => Some(GameOver),
            _ => None,
        }
    }

    /// Part of the game-over sequence
    pub fn is_game_over(self) -> bool {
        self != RunPhase::Playing
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RunPhase::Playing => "playing",
            RunPhase::Eating => "eating",
            RunPhase::Scolding => "scolding",
            RunPhase::NameEntry => "nameentry",
            RunPhase::GameOver => "gameover",
        }
    }
}
