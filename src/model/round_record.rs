use std::time::SystemTime;

use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use serde_with::TimestampMilliSeconds;
use uuid::Uuid;

use super::{Choice, Outcome};

/// One resolved round. Field names on disk follow the `rps-history` blob layout.
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoundRecord {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    #[serde(rename = "playerChoice")]
    pub player_choice: Choice,
    #[serde(rename = "botChoice")]
    pub opponent_choice: Choice,
    #[serde(rename = "result")]
    pub outcome: Outcome,
    #[serde_as(as = "TimestampMilliSeconds<i64>")]
    #[serde(rename = "timestamp")]
    pub occurred_at: SystemTime,
}

impl RoundRecord {
    pub fn new(
        player_choice: Choice,
        opponent_choice: Choice,
        outcome: Outcome,
        occurred_at: SystemTime,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            player_choice,
            opponent_choice,
            outcome,
            occurred_at,
        }
    }

    pub fn points_earned(&self) -> u32 {
        self.outcome.points()
    }
}
