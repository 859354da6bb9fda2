pub mod game_engine;
pub mod game_state;
pub mod opponent;
pub mod persistence;
pub mod resolver;
pub mod settings;

pub use game_engine::GameEngine;
pub use game_state::GameState;
pub use opponent::{OpponentSelector, RandomOpponent, ScriptedOpponent};
pub use persistence::{
    FileStore, KeyValueStore, MemoryStore, PersistenceError, PersistenceGateway,
};
pub use resolver::resolve;
pub use settings::Settings;
