//! The owning simulation
//!
//! Wraps [`GameState`] together with the collaborators the pure sim must not
//! touch: the local high-score store and the leaderboard service.

use crate::highscores::LeaderboardEntry;
use crate::persistence::HighScoreStore;
use crate::service::{PendingSubmission, ScoreService};
use crate::sim::{self, GameEvent, GameState, InputSnapshot, TickOutcome};
use crate::tuning::Tuning;

pub struct Simulation {
    state: GameState,
    high_scores: HighScoreStore,
    service: Box<dyn ScoreService>,
    /// In-flight submission and the run it belongs to
    pending: Option<(u32, PendingSubmission)>,
}

impl Simulation {
    pub fn new(
        seed: u64,
        tuning: Tuning,
        high_scores: HighScoreStore,
        service: Box<dyn ScoreService>,
    ) -> Self {
        let mut state = GameState::new(seed, tuning);
        state.high_score = high_scores.load();
        let mut simulation = Self {
            state,
            high_scores,
            service,
            pending: None,
        };
        simulation.refresh_leaderboard();
        simulation
    }

    /// Read-only view for rendering
    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn is_available(&self) -> bool {
        self.service.is_available()
    }

    pub fn top_scores(&self) -> &[LeaderboardEntry] {
        &self.state.top_scores
    }

    /// Begin a new run (start or restart button)
    pub fn start_run(&mut self) {
        // A submission from the last run is no longer wanted
        self.pending = None;
        self.refresh_leaderboard();
        self.state.reset_run();
        sim::seed_initial_flowers(&mut self.state);
        log::info!("Run {} started", self.state.run_id);
    }

    /// Re-fetch the cached top list used for the top-ten check
    pub fn refresh_leaderboard(&mut self) {
        match self.service.load_leaderboard() {
            Ok(top) => {
                log::debug!("Leaderboard refreshed ({} entries)", top.len());
                self.state.top_scores = top;
            }
            Err(e) => {
                log::debug!("Leaderboard not loaded: {}", e);
                self.state.top_scores.clear();
            }
        }
    }

    /// Advance one frame and return what happened
    pub fn tick(&mut self, input: &InputSnapshot, dt: f32) -> Vec<GameEvent> {
        self.poll_submission();

        if sim::tick(&mut self.state, input, dt) == TickOutcome::PlayerFell {
            let qualifies = self
                .service
                .is_top_ten(self.state.score, &self.state.top_scores);
            sim::trigger_game_over(&mut self.state, qualifies);
        }

        let events = std::mem::take(&mut self.state.events);
        for event in &events {
            match event {
                GameEvent::NewHighScore(score) => self.high_scores.save(*score),
                GameEvent::SubmitScore { name, score } => {
                    log::info!("Submitting score {} for {:?}", score, name);
                    let pending = self.service.submit_score(name, *score);
                    self.pending = Some((self.state.run_id, pending));
                }
                _ => {}
            }
        }

        // Local services answer immediately; apply without waiting a frame
        if self.pending.is_some() {
            self.poll_submission();
        }
        events
    }

    /// A confirmed name is waiting on the leaderboard
    pub fn is_awaiting_submission(&self) -> bool {
        self.pending.is_some()
    }

    /// Drag presses only steer a live run (not the countdown or game over)
    pub fn accepts_drag(&self) -> bool {
        self.state.active
    }

    /// Whole state as JSON for a page-side renderer
    pub fn snapshot_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.state)
    }

    fn poll_submission(&mut self) {
        let Some((run_id, pending)) = self.pending.as_ref() else {
            return;
        };
        let Some(result) = pending.poll() else {
            return;
        };
        let run_id = *run_id;
        self.pending = None;

        let accepted = match result {
            Ok(entry) => {
                log::info!("Leaderboard accepted {} for {}", entry.score, entry.name);
                true
            }
            Err(e) => {
                log::warn!("Score submission failed: {}", e);
                false
            }
        };
        sim::finish_submission(&mut self.state, run_id);
        if accepted {
            self.refresh_leaderboard();
        }
    }
}
