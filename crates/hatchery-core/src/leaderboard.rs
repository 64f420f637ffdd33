//! Leaderboard collaborator - stores run summaries and ranks them

use serde::{Deserialize, Serialize};

use crate::systems::RunSummary;

/// A summary with its position on the board (1-based)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedRun {
    pub rank: usize,
    pub summary: RunSummary,
}

/// Where finished runs are persisted. The engine only produces summaries;
/// storage is up to the implementor.
pub trait Leaderboard {
    /// Store a summary and return the current ranking.
    fn record(&mut self, summary: RunSummary) -> Vec<RankedRun>;
}

/// In-memory leaderboard keeping the best `capacity` runs.
///
/// Ranked by final balance, highest first; ties go to the faster run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryLeaderboard {
    capacity: usize,
    runs: Vec<RunSummary>,
}

impl MemoryLeaderboard {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            runs: Vec::new(),
        }
    }

    pub fn ranking(&self) -> Vec<RankedRun> {
        self.runs
            .iter()
            .enumerate()
            .map(|(i, summary)| RankedRun {
                rank: i + 1,
                summary: summary.clone(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }
}

impl Default for MemoryLeaderboard {
    fn default() -> Self {
        Self::new(10)
    }
}

impl Leaderboard for MemoryLeaderboard {
    fn record(&mut self, summary: RunSummary) -> Vec<RankedRun> {
        self.runs.push(summary);
        self.runs.sort_by(|a, b| {
            b.balance
                .total_cmp(&a.balance)
                .then(a.elapsed_ms.cmp(&b.elapsed_ms))
        });
        self.runs.truncate(self.capacity);
        self.ranking()
    }
}
