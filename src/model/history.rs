use serde::{Deserialize, Serialize};

use super::RoundRecord;

pub const MAX_HISTORY_LEN: usize = 10;

/// Recent rounds, most recent first, never longer than [`MAX_HISTORY_LEN`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct History {
    records: Vec<RoundRecord>,
}

impl History {
    pub fn clear() -> History {
        History::default()
    }

    /// Builds a history from records ordered most recent first, keeping the newest entries.
    pub fn from_records(mut records: Vec<RoundRecord>) -> History {
        records.truncate(MAX_HISTORY_LEN);
        History { records }
    }

    pub fn append(&self, record: RoundRecord) -> History {
        let mut records = Vec::with_capacity(MAX_HISTORY_LEN);
        records.push(record);
        records.extend(self.records.iter().take(MAX_HISTORY_LEN - 1).cloned());
        History { records }
    }

    pub fn latest(&self) -> Option<&RoundRecord> {
        self.records.first()
    }

    pub fn get(&self, index: usize) -> Option<&RoundRecord> {
        self.records.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RoundRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<'a> IntoIterator for &'a History {
    type Item = &'a RoundRecord;
    type IntoIter = std::slice::Iter<'a, RoundRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
