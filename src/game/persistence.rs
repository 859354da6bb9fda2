use log::{debug, error, trace, warn};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::rc::Rc;
use thiserror::Error;

use crate::model::{History, PersistedState, RoundRecord, Statistics};

pub const STATS_KEY: &str = "rps-stats";
pub const HISTORY_KEY: &str = "rps-history";

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not encode {key}: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

pub type Result<T> = std::result::Result<T, PersistenceError>;

/// Synchronous string blob storage keyed by name.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Stores each key as `<key>.json` inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path(key);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(PersistenceError::Io { path, source }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|source| PersistenceError::Io {
            path: self.dir.clone(),
            source,
        })?;
        let path = self.path(key);
        fs::write(&path, value).map_err(|source| PersistenceError::Io { path, source })
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let path = self.path(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(PersistenceError::Io { path, source }),
        }
    }
}

/// In-memory store. Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
    fail_writes: Rc<RefCell<bool>>,
    failing_keys: Rc<RefCell<HashSet<String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_writes(&self, fail: bool) {
        *self.fail_writes.borrow_mut() = fail;
    }

    /// Makes writes to one key fail while other keys keep working.
    pub fn fail_writes_to(&self, key: &str) {
        self.failing_keys.borrow_mut().insert(key.to_string());
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    fn writes_fail(&self, key: &str) -> bool {
        *self.fail_writes.borrow() || self.failing_keys.borrow().contains(key)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        if self.writes_fail(key) {
            return Err(PersistenceError::Unavailable(format!("write to {}", key)));
        }
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        if self.writes_fail(key) {
            return Err(PersistenceError::Unavailable(format!("remove {}", key)));
        }
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// Loads and saves statistics and history through a [`KeyValueStore`].
///
/// Read failures and malformed blobs degrade to an empty state; they are
/// logged and never surfaced to the caller.
#[derive(Debug)]
pub struct PersistenceGateway<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> PersistenceGateway<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// `None` on first run, when nothing has been saved yet.
    pub fn load_state(&self) -> Option<PersistedState> {
        let stats_blob = self.read(STATS_KEY);
        let history_blob = self.read(HISTORY_KEY);

        let (stats_blob, history_blob) = match (stats_blob, history_blob) {
            (Ok(None), Ok(None)) => {
                debug!(target: "persistence", "No saved state found");
                return None;
            }
            (Ok(stats), Ok(history)) => (stats, history),
            (Err(e), _) | (_, Err(e)) => {
                warn!(target: "persistence", "Could not read saved state, starting empty: {}", e);
                return Some(PersistedState::empty());
            }
        };

        let stats = match stats_blob.as_deref() {
            None => Statistics::reset(),
            Some(blob) => match parse_stats(blob) {
                Some(stats) => stats,
                None => {
                    warn!(target: "persistence", "Saved statistics are malformed, starting empty");
                    return Some(PersistedState::empty());
                }
            },
        };
        let history = match history_blob.as_deref() {
            None => History::clear(),
            Some(blob) => match parse_history(blob) {
                Some(history) => history,
                None => {
                    warn!(target: "persistence", "Saved history is malformed, starting empty");
                    return Some(PersistedState::empty());
                }
            },
        };

        trace!(
            target: "persistence",
            "Loaded {} games and {} history entries",
            stats.total_games,
            history.len()
        );
        Some(PersistedState::new(stats, history))
    }

    /// Writes statistics before history. A failure between the two writes
    /// leaves statistics one round ahead of the saved history, which still
    /// loads: history only ever shows a window of the counted rounds.
    pub fn save_state(&mut self, state: &PersistedState) -> Result<()> {
        let stats = encode(STATS_KEY, &state.stats)?;
        let history = encode(HISTORY_KEY, &state.history)?;
        self.store.set(STATS_KEY, &stats)?;
        self.store.set(HISTORY_KEY, &history)?;
        Ok(())
    }

    fn read(&self, key: &str) -> Result<Option<String>> {
        self.store.get(key).inspect_err(|e| {
            error!(target: "persistence", "Failed to read {}: {}", key, e);
        })
    }
}

fn encode<T: serde::Serialize>(key: &str, value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(|source| PersistenceError::Encode {
        key: key.to_string(),
        source,
    })
}

/// `None` when the blob does not decode or its counters disagree.
fn parse_stats(blob: &str) -> Option<Statistics> {
    let stats: Statistics = match serde_json::from_str(blob) {
        Ok(stats) => stats,
        Err(e) => {
            debug!(target: "persistence", "Statistics decode error: {}", e);
            return None;
        }
    };
    if !stats.is_consistent() {
        debug!(target: "persistence", "Statistics counters disagree: {:?}", stats);
        return None;
    }
    Some(stats)
}

fn parse_history(blob: &str) -> Option<History> {
    let records: Vec<RoundRecord> = match serde_json::from_str(blob) {
        Ok(records) => records,
        Err(e) => {
            debug!(target: "persistence", "History decode error: {}", e);
            return None;
        }
    };
    let count = records.len();
    let history = History::from_records(records);
    if history.len() < count {
        debug!(
            target: "persistence",
            "Dropped {} history entries past the limit",
            count - history.len()
        );
    }
    Some(history)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Choice, Outcome};
    use std::time::SystemTime;
    use uuid::Uuid;

    fn sample_state() -> PersistedState {
        let record = RoundRecord::new(Choice::Rock, Choice::Scissors, Outcome::Win, SystemTime::now());
        PersistedState::new(
            Statistics::reset().record_outcome(Outcome::Win),
            History::clear().append(record),
        )
    }

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("rps-arena-test-{}", Uuid::new_v4()))
    }

    #[test]
    fn test_first_run_is_absent() {
        let gateway = PersistenceGateway::new(MemoryStore::new());
        assert_eq!(gateway.load_state(), None);
    }

    #[test]
    fn test_save_then_load() {
        let mut gateway = PersistenceGateway::new(MemoryStore::new());
        let state = sample_state();
        gateway.save_state(&state).unwrap();

        let loaded = gateway.load_state().unwrap();
        assert_eq!(loaded.stats, state.stats);
        assert_eq!(loaded.history.len(), 1);
        assert_eq!(
            loaded.history.latest().unwrap().id,
            state.history.latest().unwrap().id
        );
    }

    #[test]
    fn test_uses_separate_keys() {
        let store = MemoryStore::new();
        let mut gateway = PersistenceGateway::new(store.clone());
        gateway.save_state(&sample_state()).unwrap();

        let stats = store.get(STATS_KEY).unwrap().unwrap();
        let history = store.get(HISTORY_KEY).unwrap().unwrap();
        assert!(stats.contains("\"totalGames\":1"));
        assert!(history.starts_with('['));
    }

    #[test]
    fn test_corrupt_stats_fall_back_to_empty() {
        let mut store = MemoryStore::new();
        store.set(STATS_KEY, "{not json").unwrap();
        store.set(HISTORY_KEY, "[]").unwrap();

        let gateway = PersistenceGateway::new(store);
        assert_eq!(gateway.load_state(), Some(PersistedState::empty()));
    }

    #[test]
    fn test_schema_mismatch_falls_back_to_empty() {
        let mut store = MemoryStore::new();
        store.set(STATS_KEY, r#"{"wins":"many"}"#).unwrap();

        let gateway = PersistenceGateway::new(store);
        assert_eq!(gateway.load_state(), Some(PersistedState::empty()));
    }

    #[test]
    fn test_inconsistent_stats_fall_back_to_empty() {
        let mut store = MemoryStore::new();
        store
            .set(
                STATS_KEY,
                r#"{"wins":5,"losses":0,"ties":0,"totalGames":2,"points":15}"#,
            )
            .unwrap();

        let gateway = PersistenceGateway::new(store);
        assert_eq!(gateway.load_state(), Some(PersistedState::empty()));
    }

    #[test]
    fn test_corrupt_history_discards_everything() {
        let mut store = MemoryStore::new();
        store
            .set(
                STATS_KEY,
                r#"{"wins":1,"losses":0,"ties":0,"totalGames":1,"points":3}"#,
            )
            .unwrap();
        store.set(HISTORY_KEY, r#"[{"playerChoice":"lizard"}]"#).unwrap();

        let gateway = PersistenceGateway::new(store);
        assert_eq!(gateway.load_state(), Some(PersistedState::empty()));
    }

    #[test]
    fn test_only_stats_present() {
        let mut store = MemoryStore::new();
        store
            .set(
                STATS_KEY,
                r#"{"wins":0,"losses":1,"ties":1,"totalGames":2,"points":1}"#,
            )
            .unwrap();

        let loaded = PersistenceGateway::new(store).load_state().unwrap();
        assert_eq!(loaded.stats.total_games, 2);
        assert!(loaded.history.is_empty());
    }

    #[test]
    fn test_overlong_history_is_truncated() {
        let entries: Vec<String> = (0..15)
            .map(|i| {
                format!(
                    r#"{{"playerChoice":"rock","botChoice":"rock","result":"tie","timestamp":{}}}"#,
                    1000 - i
                )
            })
            .collect();
        let mut store = MemoryStore::new();
        store
            .set(HISTORY_KEY, &format!("[{}]", entries.join(",")))
            .unwrap();

        let loaded = PersistenceGateway::new(store).load_state().unwrap();
        assert_eq!(loaded.history.len(), 10);
    }

    #[test]
    fn test_failing_writes_are_reported() {
        let store = MemoryStore::new();
        store.set_fail_writes(true);
        let mut gateway = PersistenceGateway::new(store);

        let result = gateway.save_state(&sample_state());
        assert!(matches!(result, Err(PersistenceError::Unavailable(_))));
    }

    #[test]
    fn test_interrupted_save_keeps_history_within_counted_rounds() {
        let store = MemoryStore::new();
        let mut gateway = PersistenceGateway::new(store.clone());
        let first = sample_state();
        gateway.save_state(&first).unwrap();

        store.fail_writes_to(HISTORY_KEY);
        let record = RoundRecord::new(Choice::Paper, Choice::Rock, Outcome::Win, SystemTime::now());
        let second = PersistedState::new(
            first.stats.record_outcome(Outcome::Win),
            first.history.append(record),
        );
        assert!(gateway.save_state(&second).is_err());

        let loaded = gateway.load_state().unwrap();
        assert_eq!(loaded.stats, second.stats);
        assert_eq!(loaded.history.len(), 1);
        assert!(loaded.history.len() as u32 <= loaded.stats.total_games);
    }

    #[test]
    fn test_saturated_stats_fall_back_to_empty() {
        let mut store = MemoryStore::new();
        store
            .set(
                STATS_KEY,
                r#"{"wins":0,"losses":0,"ties":4294967295,"totalGames":4294967295,"points":4294967295}"#,
            )
            .unwrap();

        let gateway = PersistenceGateway::new(store);
        assert_eq!(gateway.load_state(), Some(PersistedState::empty()));
    }

    #[test]
    fn test_file_store() {
        let dir = temp_dir();
        let mut store = FileStore::new(&dir);

        assert_eq!(store.get("missing").unwrap(), None);
        store.set("greeting", "\"hello\"").unwrap();
        assert!(dir.join("greeting.json").exists());
        assert_eq!(store.get("greeting").unwrap().as_deref(), Some("\"hello\""));

        store.remove("greeting").unwrap();
        store.remove("greeting").unwrap();
        assert_eq!(store.get("greeting").unwrap(), None);

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_file_backed_gateway_survives_restart() {
        let dir = temp_dir();
        let state = sample_state();
        {
            let mut gateway = PersistenceGateway::new(FileStore::new(&dir));
            gateway.save_state(&state).unwrap();
        }

        let gateway = PersistenceGateway::new(FileStore::new(&dir));
        assert_eq!(gateway.load_state().unwrap().stats, state.stats);

        let _ = fs::remove_dir_all(dir);
    }
}
