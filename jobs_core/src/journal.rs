//! Append-only award journal.
//!
//! Every non-empty award is appended as one JSON line, with file locking so
//! several server processes can share a journal.

use crate::{AwardResult, PlayerId, Result, Reward};
use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// One journaled award
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AwardEntry {
    pub id: Uuid,
    pub recorded_at: DateTime<Utc>,
    pub player_id: PlayerId,
    pub job_id: String,
    pub action: String,
    pub material: String,
    pub xp_gained: u32,
    pub levels_reached: Vec<u32>,
    pub rewards: Vec<Reward>,
}

impl AwardEntry {
    pub fn new(player_id: PlayerId, action: &str, material: &str, result: &AwardResult) -> Self {
        Self {
            id: Uuid::new_v4(),
            recorded_at: Utc::now(),
            player_id,
            job_id: result.job_id.clone(),
            action: action.to_string(),
            material: material.to_string(),
            xp_gained: result.xp_gained,
            levels_reached: result.levels_reached.clone(),
            rewards: result.rewards.clone(),
        }
    }
}

/// Destination for award entries
pub trait AwardSink {
    fn append(&mut self, entry: &AwardEntry) -> Result<()>;
}

/// Shared JSONL journal, one entry per line
///
/// Each entry is written with a single `write_all` on an append-mode handle
/// while holding an exclusive lock, so lines from concurrent servers never
/// interleave.
pub struct JsonlJournal {
    path: PathBuf,
}

impl JsonlJournal {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AwardSink for JsonlJournal {
    fn append(&mut self, entry: &AwardEntry) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut line = serde_json::to_string(entry)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.lock_exclusive()?;
        let written = file.write_all(line.as_bytes());
        file.unlock()?;
        written?;

        tracing::debug!(
            "Journaled award {} for player {} in '{}'",
            entry.id,
            entry.player_id,
            entry.job_id
        );
        Ok(())
    }
}

/// Read all entries from a journal file
///
/// Corrupted lines are skipped with a warning.
pub fn read_entries(path: &Path) -> Result<Vec<AwardEntry>> {
    scan(path, |_| true)
}

/// Most recent entries for one player, oldest first
///
/// `limit` keeps only the last `limit` matching entries.
pub fn read_entries_for(
    path: &Path,
    player_id: PlayerId,
    limit: Option<usize>,
) -> Result<Vec<AwardEntry>> {
    let mut entries = scan(path, |entry| entry.player_id == player_id)?;
    if let Some(limit) = limit {
        let skip = entries.len().saturating_sub(limit);
        entries.drain(..skip);
    }
    Ok(entries)
}

fn scan(path: &Path, mut keep: impl FnMut(&AwardEntry) -> bool) -> Result<Vec<AwardEntry>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    file.lock_shared()?;

    let mut entries = Vec::new();
    let mut skipped = 0usize;
    let mut read_error = None;
    for (index, line) in BufReader::new(&file).lines().enumerate() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                read_error = Some(e);
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<AwardEntry>(&line) {
            Ok(entry) if keep(&entry) => entries.push(entry),
            Ok(_) => {}
            Err(e) => {
                skipped += 1;
                tracing::warn!("Skipping journal line {}: {}", index + 1, e);
            }
        }
    }

    file.unlock()?;
    if let Some(e) = read_error {
        return Err(e.into());
    }

    tracing::debug!(
        "Read {} awards from {:?} ({} corrupted lines)",
        entries.len(),
        path,
        skipped
    );
    Ok(entries)
}
