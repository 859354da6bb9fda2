use std::time::SystemTime;

use crate::game::resolver::resolve;
use crate::model::{Choice, History, PersistedState, RoundRecord, Statistics};

/// Statistics plus history; every transition returns a new value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameState {
    pub stats: Statistics,
    pub history: History,
}

impl GameState {
    pub fn new(stats: Statistics, history: History) -> Self {
        Self { stats, history }
    }

    pub fn reset() -> GameState {
        GameState::new(Statistics::reset(), History::clear())
    }

    /// Resolves one round with an already selected opponent choice.
    pub fn play(
        &self,
        player: Choice,
        opponent: Choice,
        occurred_at: SystemTime,
    ) -> (RoundRecord, GameState) {
        let outcome = resolve(player, opponent);
        let record = RoundRecord::new(player, opponent, outcome, occurred_at);
        let next = GameState {
            stats: self.stats.record_outcome(outcome),
            history: self.history.append(record.clone()),
        };
        (record, next)
    }

    pub fn to_persisted(&self) -> PersistedState {
        PersistedState::new(self.stats, self.history.clone())
    }
}

impl From<PersistedState> for GameState {
    fn from(state: PersistedState) -> Self {
        GameState::new(state.stats, state.history)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Outcome;

    #[test]
    fn test_play_updates_stats_and_history() {
        let now = SystemTime::now();
        let (record, next) = GameState::reset().play(Choice::Rock, Choice::Scissors, now);

        assert_eq!(record.outcome, Outcome::Win);
        assert_eq!(record.occurred_at, now);
        assert_eq!(next.stats.wins, 1);
        assert_eq!(next.stats.points, 3);
        assert_eq!(next.history.latest(), Some(&record));
    }

    #[test]
    fn test_play_leaves_previous_state_alone() {
        let start = GameState::reset();
        let (_, next) = start.play(Choice::Paper, Choice::Paper, SystemTime::now());
        assert_eq!(start, GameState::reset());
        assert_eq!(next.stats.ties, 1);
    }

    #[test]
    fn test_persisted_round_trip() {
        let (_, state) = GameState::reset().play(Choice::Scissors, Choice::Rock, SystemTime::now());
        let restored = GameState::from(state.to_persisted());
        assert_eq!(restored, state);
    }
}
