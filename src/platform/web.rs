//! Browser leaderboard bridge
//!
//! The page provides `globalThis.bouquetLeaderboard` with promise-returning
//! `list()`, `push(entry)` and `remove(id)`. Submission rules run here, the
//! backend only stores rows.

use std::cell::RefCell;
use std::rc::Rc;

use serde::Deserialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{JsFuture, spawn_local};

use crate::highscores::{
    Leaderboard, LeaderboardEntry, LeaderboardError, RowWrite, plan_submission,
};
use crate::service::{PendingSubmission, ScoreService, SubmissionResult};

#[wasm_bindgen(inline_js = "
    function backend() {
        const b = globalThis.bouquetLeaderboard;
        return b && typeof b.list === 'function' ? b : null;
    }

    export function lb_available() {
        return backend() !== null;
    }

    export function lb_list() {
        return Promise.resolve(backend().list());
    }

    export function lb_push(json) {
        return Promise.resolve(backend().push(JSON.parse(json)));
    }

    export function lb_remove(id) {
        return Promise.resolve(backend().remove(id));
    }
")]
extern "C" {
    fn lb_available() -> bool;
    fn lb_list() -> js_sys::Promise;
    fn lb_push(json: &str) -> js_sys::Promise;
    fn lb_remove(id: &str) -> js_sys::Promise;
}

/// Stored row with its backend key
#[derive(Debug, Deserialize)]
struct RemoteRow {
    id: String,
    #[serde(flatten)]
    entry: LeaderboardEntry,
}

fn transport(err: JsValue) -> LeaderboardError {
    LeaderboardError::Transport(
        err.as_string()
            .unwrap_or_else(|| format!("{:?}", err)),
    )
}

async fn fetch_rows() -> Result<Vec<RemoteRow>, LeaderboardError> {
    let value = JsFuture::from(lb_list()).await.map_err(transport)?;
    let json: String = js_sys::JSON::stringify(&value)
        .map_err(transport)?
        .into();
    serde_json::from_str(&json).map_err(|e| LeaderboardError::Transport(e.to_string()))
}

async fn submit_remote(name: String, score: u64) -> SubmissionResult {
    let rows = fetch_rows().await?;
    let entries: Vec<LeaderboardEntry> = rows.iter().map(|r| r.entry.clone()).collect();
    let plan = plan_submission(&entries, &name, score)?;

    let mut stored = None;
    for write in plan.writes(score, js_sys::Date::now()) {
        match write {
            RowWrite::Insert(entry) => {
                let json = serde_json::to_string(&entry)
                    .map_err(|e| LeaderboardError::Transport(e.to_string()))?;
                JsFuture::from(lb_push(&json)).await.map_err(transport)?;
                stored = Some(entry);
            }
            // The new row is stored; a failed cleanup only leaves a stale lower row
            RowWrite::Remove(i) => match JsFuture::from(lb_remove(&rows[i].id)).await {
                Ok(_) => log::info!("Removed older score {} for {}", rows[i].entry.score, plan.name),
                Err(e) => log::warn!("Failed to remove older score for {}: {:?}", plan.name, e),
            },
        }
    }
    stored.ok_or(LeaderboardError::InvalidName)
}

/// Leaderboard backed by the page's JS backend
#[derive(Default)]
pub struct WebScoreService {
    /// Last fetched top list; refreshed in the background
    cache: Rc<RefCell<Vec<LeaderboardEntry>>>,
}

impl WebScoreService {
    pub fn new() -> Self {
        let service = Self::default();
        if service.is_available() {
            log::info!("Leaderboard backend found");
        } else {
            log::info!("No leaderboard backend, playing offline");
        }
        service
    }

    fn spawn_refresh(&self) {
        let cache = self.cache.clone();
        spawn_local(async move {
            match fetch_rows().await {
                Ok(rows) => {
                    let board =
                        Leaderboard::from_entries(rows.into_iter().map(|r| r.entry).collect());
                    *cache.borrow_mut() = board.top();
                }
                Err(e) => log::warn!("Leaderboard refresh failed: {}", e),
            }
        });
    }
}

impl ScoreService for WebScoreService {
    fn is_available(&self) -> bool {
        lb_available()
    }

    /// Returns the cached list immediately and refreshes it for next time
    fn load_leaderboard(&mut self) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        if !self.is_available() {
            return Err(LeaderboardError::Unavailable);
        }
        self.spawn_refresh();
        Ok(self.cache.borrow().clone())
    }

    fn submit_score(&mut self, name: &str, score: u64) -> PendingSubmission {
        if !self.is_available() {
            return PendingSubmission::ready(Err(LeaderboardError::Unavailable));
        }
        let (tx, pending) = PendingSubmission::channel();
        let name = name.to_string();
        spawn_local(async move {
            tx.resolve(submit_remote(name, score).await);
        });
        pending
    }
}
