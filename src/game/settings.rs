use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const APP_DIR: &str = "rps-arena";
const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Settings {
    #[serde(default = "default_version")]
    version: u32,

    /// Pause before revealing the opponent's pick. Purely cosmetic.
    #[serde(default = "default_reveal_delay_ms")]
    pub reveal_delay_ms: u64,

    #[serde(default = "default_true")]
    pub confirm_reset: bool,
}

// Helper functions for default values
fn default_version() -> u32 {
    1
}
fn default_reveal_delay_ms() -> u64 {
    500
}
fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            version: default_version(),
            reveal_delay_ms: default_reveal_delay_ms(),
            confirm_reset: true,
        }
    }
}

impl Settings {
    /// Falls back to (and writes) defaults when the file is missing or unreadable.
    pub fn load_from(dir: &Path) -> Self {
        let path = dir.join(SETTINGS_FILE);
        if let Ok(contents) = fs::read_to_string(&path) {
            match serde_json::from_str::<Settings>(&contents) {
                Ok(mut settings) => {
                    settings.migrate();
                    return settings;
                }
                Err(e) => warn!(target: "settings", "Ignoring malformed {:?}: {}", path, e),
            }
        }
        let default = Settings::default();
        if let Err(e) = default.save_to(dir) {
            warn!(target: "settings", "Could not write default settings: {}", e);
        }
        default
    }

    pub fn save_to(&self, dir: &Path) -> Result<(), std::io::Error> {
        fs::create_dir_all(dir)?;
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(dir.join(SETTINGS_FILE), contents)
    }

    pub fn reveal_delay(&self) -> Duration {
        Duration::from_millis(self.reveal_delay_ms)
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    fn migrate(&mut self) {
        match self.version {
            0 => {
                self.version = 1;
            }
            _ => (),
        }
    }

    /// `RPS_DATA_DIR`, else the XDG data home, else `~/.local/share`.
    pub fn data_dir() -> PathBuf {
        if let Some(dir) = env_path("RPS_DATA_DIR") {
            return dir;
        }
        if let Some(dir) = env_path("XDG_DATA_HOME") {
            return dir.join(APP_DIR);
        }
        if let Some(home) = env_path("HOME") {
            return home.join(".local").join("share").join(APP_DIR);
        }
        PathBuf::from(format!(".{}", APP_DIR))
    }

    pub fn is_debug_mode() -> bool {
        std::env::var("DEBUG").map(|v| v == "1").unwrap_or(false)
    }

    pub fn seed_from_env() -> Option<u64> {
        std::env::var("SEED").ok().and_then(|v| v.parse::<u64>().ok())
    }
}

fn env_path(name: &str) -> Option<PathBuf> {
    std::env::var_os(name)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}
