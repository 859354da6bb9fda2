use serde::{Deserialize, Serialize};

use super::Outcome;

/// Upper bound on games a saved record may carry; keeps `points` within `u32`.
pub const MAX_TOTAL_GAMES: u32 = u32::MAX / 3;

/// Running totals across every round played since the last reset.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
    pub total_games: u32,
    pub points: u32,
}

impl Statistics {
    pub fn reset() -> Statistics {
        Statistics::default()
    }

    pub fn record_outcome(&self, outcome: Outcome) -> Statistics {
        let mut next = *self;
        match outcome {
            Outcome::Win => next.wins = next.wins.saturating_add(1),
            Outcome::Lose => next.losses = next.losses.saturating_add(1),
            Outcome::Tie => next.ties = next.ties.saturating_add(1),
        }
        next.total_games = next.total_games.saturating_add(1);
        next.points = next.points.saturating_add(outcome.points());
        next
    }

    /// Percentage of games won, rounded half away from zero.
    pub fn win_rate(&self) -> u32 {
        if self.total_games == 0 {
            return 0;
        }
        (100.0 * self.wins as f64 / self.total_games as f64).round() as u32
    }

    pub fn is_consistent(&self) -> bool {
        let counted = self.wins as u64 + self.losses as u64 + self.ties as u64;
        let expected_points = Outcome::Win.points() as u64 * self.wins as u64
            + Outcome::Tie.points() as u64 * self.ties as u64
            + Outcome::Lose.points() as u64 * self.losses as u64;
        counted == self.total_games as u64
            && expected_points == self.points as u64
            && self.total_games < MAX_TOTAL_GAMES
    }

    pub fn is_empty(&self) -> bool {
        self.total_games == 0
    }
}
