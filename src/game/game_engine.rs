use log::{debug, error, info, trace};
use std::time::SystemTime;
use uuid::Uuid;

use super::game_state::GameState;
use super::opponent::OpponentSelector;
use super::persistence::{KeyValueStore, PersistenceGateway};
use crate::model::{Choice, GameCommand, History, RoundRecord, Statistics};

pub type Clock = fn() -> SystemTime;

/// Plays rounds against an opponent and keeps the saved state in step.
///
/// The in-memory state is authoritative for the session: a failed save is
/// logged and play continues.
pub struct GameEngine<O: OpponentSelector, S: KeyValueStore> {
    state: GameState,
    last_round: Option<RoundRecord>,
    opponent: O,
    gateway: PersistenceGateway<S>,
    clock: Clock,
    session_id: Uuid,
}

impl<O: OpponentSelector, S: KeyValueStore> GameEngine<O, S> {
    pub fn new(opponent: O, gateway: PersistenceGateway<S>) -> Self {
        let session_id = Uuid::new_v4();
        let state = match gateway.load_state() {
            Some(saved) => {
                info!(
                    target: "game_engine",
                    "Session {}: resuming after {} games",
                    session_id,
                    saved.stats.total_games
                );
                GameState::from(saved)
            }
            None => {
                info!(target: "game_engine", "Session {}: first run", session_id);
                GameState::reset()
            }
        };
        Self {
            state,
            last_round: None,
            opponent,
            gateway,
            clock: SystemTime::now,
            session_id,
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn play_round(&mut self, choice: Choice) -> RoundRecord {
        let opponent_choice = self.opponent.select();
        let (record, next) = self.state.play(choice, opponent_choice, (self.clock)());
        debug!(
            target: "game_engine",
            "{} vs {}: {:?}",
            record.player_choice,
            record.opponent_choice,
            record.outcome
        );
        self.state = next;
        self.last_round = Some(record.clone());
        self.persist();
        record
    }

    pub fn reset_all(&mut self) {
        info!(
            target: "game_engine",
            "Session {}: resetting after {} games",
            self.session_id,
            self.state.stats.total_games
        );
        self.state = GameState::reset();
        self.last_round = None;
        self.persist();
    }

    /// Returns the played round for [`GameCommand::Play`].
    pub fn handle_command(&mut self, command: GameCommand) -> Option<RoundRecord> {
        trace!(target: "game_engine", "Handling command: {:?}", command);
        match command {
            GameCommand::Play(choice) => Some(self.play_round(choice)),
            GameCommand::ResetAll => {
                self.reset_all();
                None
            }
        }
    }

    pub fn statistics(&self) -> Statistics {
        self.state.stats
    }

    pub fn history(&self) -> &History {
        &self.state.history
    }

    pub fn last_round(&self) -> Option<&RoundRecord> {
        self.last_round.as_ref()
    }

    fn persist(&mut self) {
        if let Err(e) = self.gateway.save_state(&self.state.to_persisted()) {
            error!(
                target: "game_engine",
                "Session {}: failed to save state: {}",
                self.session_id,
                e
            );
        }
    }
}
