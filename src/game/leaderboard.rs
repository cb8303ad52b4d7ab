//! High-score storage behind a small gateway trait.

use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::config::{Difficulty, LEADERBOARD_MAX_SIZE};
#[cfg(feature = "serde_json")]
use super::error::GameError;
use super::session::Grade;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Clone, Debug, PartialEq)]
pub struct LeaderboardEntry {
    pub id: String,
    pub name: String,
    pub score: u64,
    pub grade: Grade,
    pub level: u32,
    pub wpm: f64,
    pub accuracy: f64,
    pub longest_combo: u32,
    pub difficulty: Difficulty,
    pub timestamp: f64,
}

/// Read and append access to stored scores. The game core never mutates
/// entries once added.
pub trait LeaderboardGateway {
    fn leaderboard(&self, difficulty: Difficulty) -> &[LeaderboardEntry];

    /// Every difficulty's board, empty ones included.
    fn leaderboards(&self) -> BTreeMap<Difficulty, Vec<LeaderboardEntry>> {
        Difficulty::ALL
            .into_iter()
            .map(|d| (d, self.leaderboard(d).to_vec()))
            .collect()
    }

    fn is_high_score(&self, score: u64, difficulty: Difficulty) -> bool {
        let board = self.leaderboard(difficulty);
        board.len() < LEADERBOARD_MAX_SIZE || board.last().is_some_and(|e| score > e.score)
    }

    /// Insert in score order; returns the 1-based rank, or `None` when the
    /// entry did not make the cut.
    fn add_score(&mut self, entry: LeaderboardEntry) -> Option<usize>;
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InMemoryLeaderboard {
    boards: BTreeMap<Difficulty, Vec<LeaderboardEntry>>,
}

impl InMemoryLeaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(feature = "serde_json")]
    pub fn to_json(&self) -> Result<String, GameError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Load stored boards, re-sorting and truncating whatever was saved.
    #[cfg(feature = "serde_json")]
    pub fn from_json(json: &str) -> Result<Self, GameError> {
        let mut loaded: Self = serde_json::from_str(json)?;
        for board in loaded.boards.values_mut() {
            board.sort_by(|a, b| b.score.cmp(&a.score));
            board.truncate(LEADERBOARD_MAX_SIZE);
        }
        Ok(loaded)
    }
}

impl LeaderboardGateway for InMemoryLeaderboard {
    fn leaderboard(&self, difficulty: Difficulty) -> &[LeaderboardEntry] {
        self.boards.get(&difficulty).map(Vec::as_slice).unwrap_or(&[])
    }

    fn add_score(&mut self, entry: LeaderboardEntry) -> Option<usize> {
        let board = self.boards.entry(entry.difficulty).or_default();
        // ties keep the earlier entry ahead
        let rank = board.partition_point(|e| e.score >= entry.score);
        if rank >= LEADERBOARD_MAX_SIZE {
            return None;
        }
        log::debug!("leaderboard {:?}: {} at rank {}", entry.difficulty, entry.name, rank + 1);
        board.insert(rank, entry);
        board.truncate(LEADERBOARD_MAX_SIZE);
        Some(rank + 1)
    }
}
