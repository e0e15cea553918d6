//! Online leaderboard rules
//!
//! Names are sanitised before storage and compared by a normalised identity,
//! so "John Doe", "johndoe" and "JOHN-DOE" are the same player. Each player
//! keeps only their best score.

use serde::{Deserialize, Serialize};

use crate::platform::storage::KeyValueStore;

/// Number of entries shown and used for the top-ten check
pub const MAX_LEADERBOARD_ENTRIES: usize = 10;

/// Longest stored name
pub const MAX_NAME_LEN: usize = 15;

/// A single leaderboard entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// Sanitised display name
    pub name: String,
    pub score: u64,
    /// Unix timestamp (ms) of the submission
    pub timestamp: f64,
}

/// Leaderboard failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LeaderboardError {
    #[error("leaderboard is not available")]
    Unavailable,
    #[error("a higher score ({existing}) already exists for this name")]
    HigherScoreExists { existing: u64 },
    #[error("name is empty after sanitising")]
    InvalidName,
    #[error("leaderboard request failed: {0}")]
    Transport(String),
    #[error("leaderboard request was dropped before completing")]
    Disconnected,
}

/// Trim, collapse whitespace, keep `[A-Za-z0-9 ]`, cap at 15 characters
pub fn sanitize_name(name: &str) -> String {
    let collapsed = name.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == ' ')
        .take(MAX_NAME_LEN)
        .collect()
}

/// Identity used to detect the same player under different spellings
pub fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Would `score` make the given top list (highest first)?
///
/// Availability is the caller's concern; see `ScoreService::is_top_ten`.
pub fn is_top_ten(score: u64, top: &[LeaderboardEntry]) -> bool {
    if top.len() < MAX_LEADERBOARD_ENTRIES {
        return true;
    }
    top.last().is_some_and(|lowest| score > lowest.score)
}

/// An accepted submission: the stored name and the indices of lower
/// entries for the same player that it replaces
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionPlan {
    pub name: String,
    pub replaces: Vec<usize>,
}

/// One storage write of an accepted submission
#[derive(Debug, Clone, PartialEq)]
pub enum RowWrite {
    Insert(LeaderboardEntry),
    /// Index into the rows the plan was made from
    Remove(usize),
}

impl SubmissionPlan {
    /// Writes in the order they must be applied: the new row first, so a
    /// failure part way never loses the player's previous best
    pub fn writes(&self, score: u64, timestamp: f64) -> Vec<RowWrite> {
        let mut writes = vec![RowWrite::Insert(LeaderboardEntry {
            name: self.name.clone(),
            score,
            timestamp,
        })];
        writes.extend(self.replaces.iter().rev().map(|&i| RowWrite::Remove(i)));
        writes
    }
}

/// Apply the submission rules to `existing` without modifying it
pub fn plan_submission(
    existing: &[LeaderboardEntry],
    name: &str,
    score: u64,
) -> Result<SubmissionPlan, LeaderboardError> {
    let name = sanitize_name(name);
    let identity = normalize_name(&name);
    if identity.is_empty() {
        return Err(LeaderboardError::InvalidName);
    }

    let mut replaces = Vec::new();
    for (i, entry) in existing.iter().enumerate() {
        if normalize_name(&entry.name) != identity {
            continue;
        }
        if entry.score >= score {
            return Err(LeaderboardError::HigherScoreExists {
                existing: entry.score,
            });
        }
        replaces.push(i);
    }
    Ok(SubmissionPlan { name, replaces })
}

/// Full score table with the server-side submission rules
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Leaderboard {
    entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    /// Storage key for the in-process board
    pub const STORAGE_KEY: &'static str = "bouquet_rescue_leaderboard";

    pub fn new() -> Self {
        Self::default()
    }

    /// Load a board saved by [`Leaderboard::save`], or start empty
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let Some(json) = store.get_item(Self::STORAGE_KEY) else {
            log::info!("No saved leaderboard, starting fresh");
            return Self::new();
        };
        match serde_json::from_str::<Leaderboard>(&json) {
            Ok(board) => {
                log::info!("Loaded leaderboard ({} entries)", board.entries.len());
                board
            }
            Err(e) => {
                log::warn!("Discarding unreadable leaderboard: {}", e);
                Self::new()
            }
        }
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) {
        let result = serde_json::to_string(self)
            .map_err(|e| e.to_string())
            .and_then(|json| {
                store
                    .set_item(Self::STORAGE_KEY, &json)
                    .map_err(|e| e.to_string())
            });
        if let Err(e) = result {
            log::warn!("Failed to save leaderboard: {}", e);
        }
    }

    pub fn from_entries(entries: Vec<LeaderboardEntry>) -> Self {
        Self { entries }
    }

    /// Record a score for `name`.
    ///
    /// Rejected without writing anything when the same identity already
    /// holds an equal or higher score; a lower one is replaced.
    pub fn submit(
        &mut self,
        name: &str,
        score: u64,
        timestamp: f64,
    ) -> Result<LeaderboardEntry, LeaderboardError> {
        let plan = plan_submission(&self.entries, name, score)?;
        let mut stored = None;
        // Inserts append and removals run highest index first, so the
        // planned indices stay valid
        for write in plan.writes(score, timestamp) {
            match write {
                RowWrite::Insert(entry) => {
                    self.entries.push(entry.clone());
                    stored = Some(entry);
                }
                RowWrite::Remove(i) => {
                    self.entries.remove(i);
                }
            }
        }
        stored.ok_or(LeaderboardError::InvalidName)
    }

    /// Top entries, highest first (earlier submission wins ties)
    pub fn top(&self) -> Vec<LeaderboardEntry> {
        let mut sorted = self.entries.clone();
        sorted.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then(a.timestamp.total_cmp(&b.timestamp))
        });
        sorted.truncate(MAX_LEADERBOARD_ENTRIES);
        sorted
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One row on the leaderboard page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardRow {
    /// 1-indexed
    pub rank: usize,
    /// Medal for the podium, "N." below it
    pub badge: String,
    pub name: String,
    pub score: u64,
    pub podium: bool,
    pub when: String,
}

/// What the leaderboard page shows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum LeaderboardView {
    Unavailable,
    Empty,
    Ranked(Vec<LeaderboardRow>),
}

/// Build the leaderboard page rows
pub fn leaderboard_view(available: bool, top: &[LeaderboardEntry], now_ms: f64) -> LeaderboardView {
    if !available {
        return LeaderboardView::Unavailable;
    }
    if top.is_empty() {
        return LeaderboardView::Empty;
    }

    let rows = top
        .iter()
        .take(MAX_LEADERBOARD_ENTRIES)
        .enumerate()
        .map(|(i, entry)| {
            let rank = i + 1;
            let badge = match rank {
                1 => "🥇".to_string(),
                2 => "🥈".to_string(),
                3 => "🥉".to_string(),
                _ => format!("{}.", rank),
            };
            LeaderboardRow {
                rank,
                badge,
                name: entry.name.clone(),
                score: entry.score,
                podium: rank <= 3,
                when: format_date(entry.timestamp, now_ms),
            }
        })
        .collect();
    LeaderboardView::Ranked(rows)
}

/// Format a timestamp relative to `now_ms`
pub fn format_date(timestamp: f64, now_ms: f64) -> String {
    let diff_secs = (now_ms - timestamp) / 1000.0;
    let diff_mins = diff_secs / 60.0;
    let diff_hours = diff_mins / 60.0;
    let diff_days = diff_hours / 24.0;

    if diff_days >= 1.0 {
        let days = diff_days.floor() as i64;
        if days == 1 {
            "Yesterday".to_string()
        } else if days < 7 {
            format!("{} days ago", days)
        } else if days < 14 {
            "Last week".to_string()
        } else {
            format!("{} weeks ago", days / 7)
        }
    } else if diff_hours >= 1.0 {
        let hours = diff_hours.floor() as i64;
        if hours == 1 {
            "1 hour ago".to_string()
        } else {
            format!("{} hours ago", hours)
        }
    } else if diff_mins >= 1.0 {
        let mins = diff_mins.floor() as i64;
        if mins == 1 {
            "1 min ago".to_string()
        } else {
            format!("{} mins ago", mins)
        }
    } else {
        "Just now".to_string()
    }
}
