mod choice;
mod game_command;
mod history;
mod outcome;
mod persisted_state;
mod round_record;
mod statistics;

pub use choice::{Choice, UnknownChoice};
pub use game_command::GameCommand;
pub use history::{History, MAX_HISTORY_LEN};
pub use outcome::Outcome;
pub use persisted_state::PersistedState;
pub use round_record::RoundRecord;
pub use statistics::Statistics;
