use serde::{Deserialize, Serialize};

/// Result of a round, from the human player's side.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Win,
    Lose,
    Tie,
}

impl Outcome {
    pub fn points(&self) -> u32 {
        match self {
            Outcome::Win => 3,
            Outcome::Tie => 1,
            Outcome::Lose => 0,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Outcome::Win => "🎉 You Win!",
            Outcome::Lose => "😅 Bot Wins!",
            Outcome::Tie => "🤝 It's a Tie!",
        }
    }

    pub fn badge(&self) -> &'static str {
        match self {
            Outcome::Win => "Won",
            Outcome::Lose => "Lost",
            Outcome::Tie => "Tie",
        }
    }
}
