//! Player record persistence with file locking.
//!
//! One JSON file per player keeps writes independent: saving one player's
//! record never touches another's file.

use crate::{Error, PlayerId, PlayerProgressRecord, Result};
use fs2::FileExt;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Load/save contract the engine's host persists through
pub trait ProgressStore {
    /// Stored record for a player, or `None` if the player was never saved
    fn load(&self, player_id: PlayerId) -> Result<Option<PlayerProgressRecord>>;

    /// Persist a record, replacing any previous version
    fn save(&self, record: &PlayerProgressRecord) -> Result<()>;
}

/// File-backed store: `<dir>/<player uuid>.json`
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding a player's record
    pub fn record_path(&self, player_id: PlayerId) -> PathBuf {
        self.dir.join(format!("{}.json", player_id))
    }

    /// Load every stored record, skipping unreadable files with a warning
    ///
    /// Records come back sorted by player id.
    pub fn load_all(&self) -> Result<Vec<PlayerProgressRecord>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut records = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().map_or(true, |ext| ext != "json") {
                continue;
            }
            match read_record(&path) {
                Ok(record) => records.push(record),
                Err(e) => tracing::warn!("Skipping unreadable record {:?}: {}", path, e),
            }
        }

        records.sort_by_key(|r| r.player_id);
        tracing::debug!("Loaded {} records from {:?}", records.len(), self.dir);
        Ok(records)
    }
}

/// Read and parse one record under a shared lock
fn read_record(path: &Path) -> Result<PlayerProgressRecord> {
    let file = File::open(path)?;
    file.lock_shared()?;

    let mut contents = String::new();
    let read = std::io::BufReader::new(&file).read_to_string(&mut contents);
    file.unlock()?;
    read?;

    let mut record: PlayerProgressRecord = serde_json::from_str(&contents)?;
    record.normalize();
    Ok(record)
}

impl ProgressStore for JsonFileStore {
    /// Corrupted or unreadable files are reported as errors; the host decides
    /// whether to continue with a fresh in-memory record.
    fn load(&self, player_id: PlayerId) -> Result<Option<PlayerProgressRecord>> {
        let path = self.record_path(player_id);
        if !path.exists() {
            tracing::debug!("No record for player {}", player_id);
            return Ok(None);
        }

        let record = read_record(&path).map_err(|e| Error::Persistence {
            player_id: player_id.to_string(),
            reason: format!("failed to load {:?}: {}", path, e),
        })?;

        if record.player_id != player_id {
            return Err(Error::Persistence {
                player_id: player_id.to_string(),
                reason: format!("{:?} belongs to player {}", path, record.player_id),
            });
        }

        tracing::debug!("Loaded record for player {} from {:?}", player_id, path);
        Ok(Some(record))
    }

    /// Atomically writes the record by:
    /// 1. Writing to a temp file in the same directory
    /// 2. Syncing to disk
    /// 3. Renaming over the original
    fn save(&self, record: &PlayerProgressRecord) -> Result<()> {
        let path = self.record_path(record.player_id);
        write_atomic(&self.dir, &path, record).map_err(|e| Error::Persistence {
            player_id: record.player_id.to_string(),
            reason: format!("failed to save {:?}: {}", path, e),
        })?;

        tracing::debug!("Saved record for player {} to {:?}", record.player_id, path);
        Ok(())
    }
}

fn write_atomic(dir: &Path, path: &Path, record: &PlayerProgressRecord) -> Result<()> {
    std::fs::create_dir_all(dir)?;

    // Unique temp file in the same directory for atomic rename; readers
    // holding a shared lock on the old file keep reading the old inode
    let temp = NamedTempFile::new_in(dir)?;

    {
        let mut writer = std::io::BufWriter::new(temp.as_file());
        let contents = serde_json::to_string(record)?;
        writer.write_all(contents.as_bytes())?;
        writer.flush()?;
    }

    temp.as_file().sync_all()?;

    temp.persist(path).map_err(|e| Error::Io(e.error))?;
    Ok(())
}

/// In-memory store for embedding and tests
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RefCell<HashMap<PlayerId, PlayerProgressRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.borrow().is_empty()
    }
}

impl ProgressStore for MemoryStore {
    fn load(&self, player_id: PlayerId) -> Result<Option<PlayerProgressRecord>> {
        Ok(self.records.borrow().get(&player_id).cloned())
    }

    fn save(&self, record: &PlayerProgressRecord) -> Result<()> {
        self.records
            .borrow_mut()
            .insert(record.player_id, record.clone());
        Ok(())
    }
}
