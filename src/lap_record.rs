use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LapRecordError {
    #[error("lap record io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("lap record is not valid json: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Serialize, Deserialize)]
struct LapRecord {
    best_lap_time: f32,
}

/// Best lap time kept on disk between runs of the game.
#[derive(Clone, Debug)]
pub struct LapRecordStore {
    path: PathBuf,
}

impl LapRecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `Ok(None)` when nothing has been saved yet.
    pub fn load(&self) -> Result<Option<f32>, LapRecordError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let record: LapRecord = serde_json::from_str(&fs::read_to_string(&self.path)?)?;
        if record.best_lap_time.is_finite() && record.best_lap_time > 0.0 {
            Ok(Some(record.best_lap_time))
        } else {
            Ok(None)
        }
    }

    pub fn save(&self, best_lap_time: f32) -> Result<(), LapRecordError> {
        let json = serde_json::to_string_pretty(&LapRecord { best_lap_time })?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_record_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = LapRecordStore::new(dir.path().join("best_lap.json"));
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = LapRecordStore::new(dir.path().join("best_lap.json"));
        store.save(83.25).unwrap();
        assert_eq!(store.load().unwrap(), Some(83.25));
        store.save(80.5).unwrap();
        assert_eq!(store.load().unwrap(), Some(80.5));
    }

    #[test]
    fn test_corrupt_record_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("best_lap.json");
        fs::write(&path, "{ best").unwrap();
        let store = LapRecordStore::new(&path);
        assert!(matches!(store.load(), Err(LapRecordError::Parse(_))));
    }

    #[test]
    fn test_nonsense_time_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("best_lap.json");
        fs::write(&path, r#"{ "best_lap_time": -3.0 }"#).unwrap();
        assert_eq!(LapRecordStore::new(&path).load().unwrap(), None);
    }
}
