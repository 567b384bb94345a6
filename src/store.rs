use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::session::result::SessionResult;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SessionHistory {
    #[serde(default)]
    pub sessions: Vec<SessionResult>,
}

impl SessionHistory {
    pub fn best_wpm(&self, mode: &str) -> Option<f64> {
        self.sessions
            .iter()
            .filter(|s| s.mode == mode)
            .map(|s| s.wpm)
            .fold(None, |best, wpm| match best {
                Some(b) if b >= wpm => Some(b),
                _ => Some(wpm),
            })
    }
}

/// JSON-file persistence for finished sessions. Loads degrade to an empty
/// history on missing or corrupt files; saves go through a temp file and
/// rename so a crash mid-write never clobbers existing data.
pub struct HistoryStore {
    base_dir: PathBuf,
}

impl HistoryStore {
    const FILE_NAME: &'static str = "history.json";

    pub fn new() -> Result<Self> {
        let base_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("keyflow");
        Self::with_base_dir(base_dir)
    }

    #[allow(dead_code)] // Used by tests
    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn load_history(&self) -> SessionHistory {
        let path = self.base_dir.join(Self::FILE_NAME);
        match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
            Err(_) => SessionHistory::default(),
        }
    }

    pub fn save_history(&self, history: &SessionHistory) -> Result<()> {
        let path = self.base_dir.join(Self::FILE_NAME);
        let tmp_path = path.with_extension("tmp");

        let json = serde_json::to_string_pretty(history)?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }
}
