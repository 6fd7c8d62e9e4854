//! Durable match store.
//!
//! A match's full `MatchStateRecord` must survive process restarts and
//! be retrievable by id. `FileMatchStore` keeps one JSON file per
//! match and writes atomically (temp file + rename), so a crash can
//! never leave a half-written record behind. The format beyond "JSON
//! via serde" is deliberately unspecified.

use std::fs::{rename, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use lm_core::{MatchId, MatchStateRecord};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("corrupted record for match {id}: {reason}")]
    Corrupted { id: MatchId, reason: String },
}

pub trait MatchStore: Send + Sync {
    fn save(&self, record: &MatchStateRecord) -> Result<(), StoreError>;
    fn load(&self, id: MatchId) -> Result<Option<MatchStateRecord>, StoreError>;
}

pub struct FileMatchStore {
    dir: PathBuf,
}

impl FileMatchStore {
    pub fn new(dir: impl Into<PathBuf>) -> Result<FileMatchStore, StoreError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(FileMatchStore { dir })
    }

    fn record_path(&self, id: MatchId) -> PathBuf {
        self.dir.join(format!("match_{}.json", id))
    }

    fn write_atomic(path: &Path, data: &[u8]) -> Result<(), StoreError> {
        let temp_path = path.with_extension("tmp");
        {
            let mut file = File::create(&temp_path)?;
            file.write_all(data)?;
            file.flush()?;
            // sync_all ensures data is on disk before the rename (portable fsync)
            file.sync_all()?;
        }
        rename(&temp_path, path)?;
        Ok(())
    }
}

impl MatchStore for FileMatchStore {
    fn save(&self, record: &MatchStateRecord) -> Result<(), StoreError> {
        let json = record
            .to_json()
            .map_err(|e| StoreError::Corrupted { id: record.id, reason: e.to_string() })?;
        Self::write_atomic(&self.record_path(record.id), json.as_bytes())?;
        tracing::debug!(match_id = %record.id, bytes = json.len(), "match record saved");
        Ok(())
    }

    fn load(&self, id: MatchId) -> Result<Option<MatchStateRecord>, StoreError> {
        let path = self.record_path(id);
        if !path.exists() {
            return Ok(None);
        }
        let mut data = String::new();
        File::open(&path)?.read_to_string(&mut data)?;
        let record = MatchStateRecord::from_json(&data)
            .map_err(|e| StoreError::Corrupted { id, reason: e.to_string() })?;
        Ok(Some(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lm_core::MatchEngine;
    use tempfile::TempDir;
    use uuid::Uuid;

    fn sample_record() -> MatchStateRecord {
        let mut engine = MatchEngine::new(Uuid::new_v4(), "Red", "Blue", 1).unwrap();
        engine.start().unwrap();
        for _ in 0..25 {
            engine.tick().unwrap();
        }
        engine.to_record()
    }

    #[test]
    fn test_save_load_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileMatchStore::new(temp_dir.path()).unwrap();
        let record = sample_record();

        store.save(&record).unwrap();
        let loaded = store.load(record.id).unwrap().expect("record should exist");
        assert_eq!(loaded.id, record.id);
        assert_eq!(loaded.simulation_step, record.simulation_step);
        assert_eq!(loaded.rng_word_pos, record.rng_word_pos);
    }

    #[test]
    fn test_atomic_save_leaves_no_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileMatchStore::new(temp_dir.path()).unwrap();
        let record = sample_record();

        store.save(&record).unwrap();
        let path = store.record_path(record.id);
        assert!(path.exists());
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn test_load_missing_returns_none() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileMatchStore::new(temp_dir.path()).unwrap();
        assert!(store.load(Uuid::new_v4()).unwrap().is_none());
    }

    #[test]
    fn test_corrupted_record_is_an_error_not_a_panic() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileMatchStore::new(temp_dir.path()).unwrap();
        let id = Uuid::new_v4();
        std::fs::write(store.record_path(id), b"{ not json").unwrap();
        assert!(matches!(store.load(id), Err(StoreError::Corrupted { .. })));
    }
}
