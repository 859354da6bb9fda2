use serde::{Deserialize, Serialize};

use super::{History, Statistics};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PersistedState {
    pub stats: Statistics,
    pub history: History,
}

impl PersistedState {
    pub fn new(stats: Statistics, history: History) -> Self {
        Self { stats, history }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}
