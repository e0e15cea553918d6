//! Score/leaderboard gateway
//!
//! The simulation never blocks on the leaderboard. Submissions hand back a
//! [`PendingSubmission`] that the owner polls once per tick.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

use crate::highscores::{self, Leaderboard, LeaderboardEntry, LeaderboardError};
use crate::platform::storage::KeyValueStore;
use crate::platform::time::now_ms;

/// Result of a finished submission
pub type SubmissionResult = Result<LeaderboardEntry, LeaderboardError>;

/// Leaderboard backend
pub trait ScoreService {
    fn is_available(&self) -> bool;

    /// Top-ten check against a cached top list. Always false while the
    /// backend is unavailable.
    fn is_top_ten(&self, score: u64, top: &[LeaderboardEntry]) -> bool {
        self.is_available() && highscores::is_top_ten(score, top)
    }

    /// Current top entries, highest first
    fn load_leaderboard(&mut self) -> Result<Vec<LeaderboardEntry>, LeaderboardError>;

    /// Start a submission; the result arrives through the returned handle
    fn submit_score(&mut self, name: &str, score: u64) -> PendingSubmission;
}

/// One-shot handle to an in-flight submission
#[derive(Debug)]
pub struct PendingSubmission {
    rx: Receiver<SubmissionResult>,
}

/// Completing side of a [`PendingSubmission`]
#[derive(Debug, Clone)]
pub struct SubmissionSender {
    tx: Sender<SubmissionResult>,
}

impl SubmissionSender {
    /// Deliver the result. Ignored if the handle was dropped.
    pub fn resolve(self, result: SubmissionResult) {
        if self.tx.send(result).is_err() {
            log::debug!("Submission result arrived after the handle was dropped");
        }
    }
}

impl PendingSubmission {
    pub fn channel() -> (SubmissionSender, PendingSubmission) {
        let (tx, rx) = mpsc::channel();
        (SubmissionSender { tx }, PendingSubmission { rx })
    }

    /// Already-resolved handle
    pub fn ready(result: SubmissionResult) -> Self {
        let (tx, pending) = Self::channel();
        tx.resolve(result);
        pending
    }

    /// Non-blocking check. `None` while still in flight; a sender dropped
    /// without resolving yields `Disconnected`.
    pub fn poll(&self) -> Option<SubmissionResult> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(LeaderboardError::Disconnected)),
        }
    }
}

/// Backend that is never reachable
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineScoreService;

impl ScoreService for OfflineScoreService {
    fn is_available(&self) -> bool {
        false
    }

    fn load_leaderboard(&mut self) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        Err(LeaderboardError::Unavailable)
    }

    fn submit_score(&mut self, _name: &str, _score: u64) -> PendingSubmission {
        log::info!("Leaderboard offline, score not submitted");
        PendingSubmission::ready(Err(LeaderboardError::Unavailable))
    }
}

/// In-process leaderboard, optionally persisted to a key-value store
#[derive(Default)]
pub struct LocalScoreService {
    board: Leaderboard,
    store: Option<Box<dyn KeyValueStore>>,
}

impl LocalScoreService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_board(board: Leaderboard) -> Self {
        Self { board, store: None }
    }

    /// Load the board from `store` and write it back after each accepted score
    pub fn persistent(store: Box<dyn KeyValueStore>) -> Self {
        let board = Leaderboard::load(store.as_ref());
        Self {
            board,
            store: Some(store),
        }
    }

    pub fn board(&self) -> &Leaderboard {
        &self.board
    }
}

impl ScoreService for LocalScoreService {
    fn is_available(&self) -> bool {
        true
    }

    fn load_leaderboard(&mut self) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        Ok(self.board.top())
    }

    fn submit_score(&mut self, name: &str, score: u64) -> PendingSubmission {
        let result = self.board.submit(name, score, now_ms());
        match &result {
            Ok(entry) => {
                log::info!("Score {} submitted for {}", entry.score, entry.name);
                if let Some(store) = self.store.as_mut() {
                    self.board.save(store.as_mut());
                }
            }
            Err(e) => log::warn!("Score submission rejected: {}", e),
        }
        PendingSubmission::ready(result)
    }
}
