use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::mode::Mode;

/// Best score per mode, stored as a flat JSON object keyed by mode name
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HighScoreRecord {
    #[serde(default)]
    pub blitz: u32,
    #[serde(default)]
    pub standard: u32,
    #[serde(default)]
    pub unlimited: u32,
}

impl HighScoreRecord {
    pub fn get(&self, mode: Mode) -> u32 {
        match mode {
            Mode::Blitz => self.blitz,
            Mode::Standard => self.standard,
            Mode::Unlimited => self.unlimited,
        }
    }

    fn slot(&mut self, mode: Mode) -> &mut u32 {
        match mode {
            Mode::Blitz => &mut self.blitz,
            Mode::Standard => &mut self.standard,
            Mode::Unlimited => &mut self.unlimited,
        }
    }

    /// Raise the stored value for `mode` to `score`; true if it changed
    pub fn raise(&mut self, mode: Mode, score: u32) -> bool {
        let slot = self.slot(mode);
        if score > *slot {
            *slot = score;
            true
        } else {
            false
        }
    }
}

pub trait ScoreStore {
    /// 0 when nothing has been recorded for `mode`
    fn get(&self, mode: Mode) -> u32;

    /// Keep `score` if it beats the stored best. Returns true on a new best.
    /// Persistence failures are logged, never returned.
    fn update(&mut self, mode: Mode, score: u32) -> bool;

    fn reset(&mut self);

    fn get_by_name(&self, name: &str) -> Result<u32> {
        Ok(self.get(Mode::from_name(name)?))
    }
}

impl<S: ScoreStore + ?Sized> ScoreStore for Box<S> {
    fn get(&self, mode: Mode) -> u32 {
        (**self).get(mode)
    }

    fn update(&mut self, mode: Mode, score: u32) -> bool {
        (**self).update(mode, score)
    }

    fn reset(&mut self) {
        (**self).reset()
    }
}

/// JSON file in the user data directory, written after every new best
#[derive(Debug, Clone)]
pub struct FileScoreStore {
    path: PathBuf,
    record: HighScoreRecord,
}

impl FileScoreStore {
    /// Reads the record at `p`, creating a zeroed file if none exists.
    /// Unreadable files load as all zeros.
    pub fn open<P: AsRef<Path>>(p: P) -> Self {
        let path = p.as_ref().to_path_buf();
        let record = match Self::read(&path) {
            Ok(Some(record)) => record,
            Ok(None) => {
                info!("no high scores at {}, creating", path.display());
                let record = HighScoreRecord::default();
                if let Err(e) = Self::write(&path, &record) {
                    warn!("{}", e);
                }
                record
            }
            Err(e) => {
                warn!("loading high scores from {}: {}", path.display(), e);
                HighScoreRecord::default()
            }
        };
        Self { path, record }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn record(&self) -> HighScoreRecord {
        self.record
    }

    fn read(path: &Path) -> Result<Option<HighScoreRecord>> {
        match fs::read(path).map_err(Error::from) {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write(path: &Path, record: &HighScoreRecord) -> Result<()> {
        let storage_err = |source| Error::StorageWrite {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(storage_err)?;
        }
        let data = serde_json::to_vec_pretty(record)?;
        fs::write(path, data).map_err(storage_err)
    }

    fn persist(&self) {
        match Self::write(&self.path, &self.record) {
            Ok(()) => debug!("saved high scores to {}", self.path.display()),
            Err(e) => warn!("{}", e),
        }
    }
}

impl ScoreStore for FileScoreStore {
    fn get(&self, mode: Mode) -> u32 {
        self.record.get(mode)
    }

    fn update(&mut self, mode: Mode, score: u32) -> bool {
        if !self.record.raise(mode, score) {
            return false;
        }
        info!("new {} high score: {}", mode, score);
        self.persist();
        true
    }

    fn reset(&mut self) {
        self.record = HighScoreRecord::default();
        self.persist();
    }
}

/// Keeps scores for the lifetime of the process only
#[derive(Debug, Clone, Default)]
pub struct MemoryScoreStore {
    record: HighScoreRecord,
}

impl MemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScoreStore for MemoryScoreStore {
    fn get(&self, mode: Mode) -> u32 {
        self.record.get(mode)
    }

    fn update(&mut self, mode: Mode, score: u32) -> bool {
        self.record.raise(mode, score)
    }

    fn reset(&mut self) {
        self.record = HighScoreRecord::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use tempfile::tempdir;

    #[test]
    fn test_get_defaults_to_zero() {
        let store = MemoryScoreStore::new();
        for mode in Mode::ALL {
            assert_eq!(store.get(mode), 0);
        }
    }

    #[test]
    fn test_update_only_raises() {
        let mut store = MemoryScoreStore::new();
        assert!(store.update(Mode::Standard, 100));
        assert!(!store.update(Mode::Standard, 50));
        assert_eq!(store.get(Mode::Standard), 100);
        assert!(store.update(Mode::Standard, 150));
        assert_eq!(store.get(Mode::Standard), 150);
        assert_eq!(store.get(Mode::Blitz), 0);
    }

    #[test]
    fn test_update_is_idempotent() {
        let mut store = MemoryScoreStore::new();
        assert!(store.update(Mode::Blitz, 7));
        assert!(!store.update(Mode::Blitz, 7));
        assert!(!store.update(Mode::Blitz, 7));
        assert_eq!(store.get(Mode::Blitz), 7);
    }

    #[test]
    fn test_get_by_name() {
        let mut store = MemoryScoreStore::new();
        store.update(Mode::Unlimited, 12);
        assert_eq!(store.get_by_name("Unlimited").unwrap(), 12);
        assert_matches!(store.get_by_name("Endless"), Err(Error::InvalidMode(_)));
    }

    #[test]
    fn test_open_creates_default_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("high_scores.json");
        let store = FileScoreStore::open(&path);
        assert_eq!(store.record(), HighScoreRecord::default());
        assert!(path.exists());

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"Blitz\": 0"));
        assert!(text.contains("\"Standard\": 0"));
        assert!(text.contains("\"Unlimited\": 0"));
    }

    #[test]
    fn test_update_persists_immediately() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("high_scores.json");
        let mut store = FileScoreStore::open(&path);
        store.update(Mode::Blitz, 42);

        let reopened = FileScoreStore::open(&path);
        assert_eq!(reopened.get(Mode::Blitz), 42);
        assert_eq!(reopened.get(Mode::Standard), 0);
    }

    #[test]
    fn test_malformed_file_loads_as_zero() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("high_scores.json");
        fs::write(&path, "{not json").unwrap();
        let store = FileScoreStore::open(&path);
        assert_eq!(store.record(), HighScoreRecord::default());
    }

    #[test]
    fn test_partial_file_fills_missing_modes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("high_scores.json");
        fs::write(&path, r#"{"Standard": 31, "Legacy": 5}"#).unwrap();
        let store = FileScoreStore::open(&path);
        assert_eq!(store.get(Mode::Standard), 31);
        assert_eq!(store.get(Mode::Blitz), 0);
        assert_eq!(store.get(Mode::Unlimited), 0);
    }

    #[test]
    fn test_write_failure_is_swallowed() {
        let dir = tempdir().unwrap();
        // A directory where the file should be makes every write fail
        let path = dir.path().join("high_scores.json");
        fs::create_dir_all(&path).unwrap();
        let mut store = FileScoreStore::open(&path);
        assert!(store.update(Mode::Unlimited, 9));
        assert_eq!(store.get(Mode::Unlimited), 9);
    }

    #[test]
    fn test_reset_zeroes_and_persists() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("high_scores.json");
        let mut store = FileScoreStore::open(&path);
        store.update(Mode::Standard, 80);
        store.reset();
        assert_eq!(FileScoreStore::open(&path).get(Mode::Standard), 0);
    }
}
