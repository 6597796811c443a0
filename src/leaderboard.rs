//! Leaderboard
//!
//! Persisted to LocalStorage, tracks top 10 scores.

use serde::{Deserialize, Serialize};

use crate::consts::MAX_LEADERBOARD_ENTRIES;
use crate::persistence;
use crate::platform::{Clock, KeyValueStore};

/// LocalStorage key holding the JSON entry array
pub const STORAGE_KEY: &str = "flippaLeaderboard";

/// Shown instead of an empty list
pub const EMPTY_MESSAGE: &str = "No scores yet. Play to get on the board!";

/// A single leaderboard entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub nickname: String,
    pub score: u64,
    /// Local calendar date the score was set
    pub date: String,
}

/// Ranked entries, highest score first.
///
/// Serialized as a bare JSON array; deserializing goes through
/// [`Leaderboard::from_entries`]. Ties keep insertion order, so a new entry
/// ranks below existing entries with the same score.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<LeaderboardEntry>", into = "Vec<LeaderboardEntry>")]
pub struct Leaderboard {
    entries: Vec<LeaderboardEntry>,
}

impl From<Vec<LeaderboardEntry>> for Leaderboard {
    fn from(entries: Vec<LeaderboardEntry>) -> Self {
        Self::from_entries(entries)
    }
}

impl From<Leaderboard> for Vec<LeaderboardEntry> {
    fn from(board: Leaderboard) -> Self {
        board.entries
    }
}

impl Leaderboard {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Build from arbitrary entries, restoring order and size limits
    pub fn from_entries(mut entries: Vec<LeaderboardEntry>) -> Self {
        // Stable: equal scores keep their relative order
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(MAX_LEADERBOARD_ENTRIES);
        Self { entries }
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_LEADERBOARD_ENTRIES {
            return true;
        }
        // Ties with the lowest entry sort after it and fall off
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Insert an entry, keeping the board sorted and trimmed.
    /// Returns the rank achieved (1-indexed) or None if it didn't make the cut.
    pub fn insert(&mut self, entry: LeaderboardEntry) -> Option<usize> {
        if !self.qualifies(entry.score) {
            return None;
        }

        // Insert after every entry with an equal or higher score
        let pos = self.entries.iter().position(|e| entry.score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        self.entries.truncate(MAX_LEADERBOARD_ENTRIES);

        Some(rank)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    /// Read-only ranked view for display
    pub fn render(&self) -> LeaderboardView {
        if self.entries.is_empty() {
            return LeaderboardView::Empty {
                message: EMPTY_MESSAGE,
            };
        }
        LeaderboardView::Ranked(
            self.entries
                .iter()
                .enumerate()
                .map(|(i, e)| RankedEntry {
                    rank: i + 1,
                    nickname: e.nickname.clone(),
                    score: e.score,
                    date: e.date.clone(),
                    podium: Podium::for_rank(i + 1),
                })
                .collect(),
        )
    }
}

/// Medal styling for the top three ranks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Podium {
    Gold,
    Silver,
    Bronze,
}

impl Podium {
    pub fn for_rank(rank: usize) -> Option<Self> {
        match rank {
            1 => Some(Podium::Gold),
            2 => Some(Podium::Silver),
            3 => Some(Podium::Bronze),
            _ => None,
        }
    }

    /// CSS class used by the leaderboard modal
    pub fn css_class(&self) -> &'static str {
        match self {
            Podium::Gold => "top-1",
            Podium::Silver => "top-2",
            Podium::Bronze => "top-3",
        }
    }
}

/// One row of the rendered leaderboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedEntry {
    pub rank: usize,
    pub nickname: String,
    pub score: u64,
    pub date: String,
    pub podium: Option<Podium>,
}

/// What the leaderboard modal should show
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeaderboardView {
    Empty { message: &'static str },
    Ranked(Vec<RankedEntry>),
}

/// Leaderboard bound to its backing store
#[derive(Debug)]
pub struct LeaderboardStore<S: KeyValueStore> {
    store: S,
    board: Leaderboard,
}

impl<S: KeyValueStore> LeaderboardStore<S> {
    /// Load the persisted leaderboard. Absent or malformed data yields an
    /// empty board; errors are only logged.
    pub fn load(store: S) -> Self {
        let board = match persistence::load_json::<Vec<LeaderboardEntry>, _>(&store, STORAGE_KEY) {
            Ok(Some(entries)) => {
                let stored = entries.len();
                let board = Leaderboard::from_entries(entries);
                log::info!("Loaded {} leaderboard entries", board.len());
                if board.len() != stored {
                    log::warn!("Dropped {} entries past the top {}", stored - board.len(), MAX_LEADERBOARD_ENTRIES);
                }
                board
            }
            Ok(None) => {
                log::info!("No leaderboard found, starting fresh");
                Leaderboard::new()
            }
            Err(e) => {
                log::warn!("Leaderboard unreadable, starting fresh: {}", e);
                Leaderboard::new()
            }
        };
        Self { store, board }
    }

    /// Record a finished round, dated from `clock`. Returns the rank within
    /// the top 10, or None when the score was truncated out (or was zero).
    pub fn submit<C: Clock + ?Sized>(&mut self, nickname: &str, score: u64, clock: &C) -> Option<usize> {
        let entry = LeaderboardEntry {
            nickname: nickname.to_string(),
            score,
            date: clock.local_date(),
        };
        let rank = self.board.insert(entry);
        match rank {
            Some(rank) => {
                log::info!("{} placed #{} with {}", nickname, rank, score);
                self.save();
            }
            None => log::info!("{} scored {} - unranked", nickname, score),
        }
        rank
    }

    pub fn render(&self) -> LeaderboardView {
        self.board.render()
    }

    /// Empty the board and drop the stored key. Callers must have confirmed
    /// with the player first.
    pub fn clear(&mut self) {
        self.board.clear();
        match self.store.remove_item(STORAGE_KEY) {
            Ok(()) => log::info!("Leaderboard cleared"),
            Err(e) => log::warn!("Leaderboard cleared in memory only: {}", e),
        }
    }

    pub fn board(&self) -> &Leaderboard {
        &self.board
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn save(&self) {
        match persistence::save_json(&self.store, STORAGE_KEY, &self.board) {
            Ok(()) => log::debug!("Leaderboard saved ({} entries)", self.board.len()),
            Err(e) => log::warn!("Leaderboard not saved: {}", e),
        }
    }
}
