use crate::model::{Choice, Outcome};

/// Decides a round from the player's side.
pub fn resolve(player: Choice, opponent: Choice) -> Outcome {
    if player == opponent {
        Outcome::Tie
    } else if player.beats() == opponent {
        Outcome::Win
    } else {
        Outcome::Lose
    }
}
