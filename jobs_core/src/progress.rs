//! Per-player job progress.
//!
//! A `PlayerProgressRecord` is the serializable unit the store persists.
//! Job ids are opaque here: progress for a job that no longer exists in the
//! registry is kept until the host explicitly prunes it.

use crate::registry::JobRegistry;
use crate::{Error, PlayerId, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// XP and level for one job
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobProgress {
    /// XP accumulated since the last level-up
    #[serde(default)]
    pub current_xp: u64,
    /// Lifetime XP, never decreases
    #[serde(default)]
    pub total_xp: u64,
    #[serde(default = "default_level")]
    pub level: u32,
}

fn default_level() -> u32 {
    1
}

impl Default for JobProgress {
    fn default() -> Self {
        Self {
            current_xp: 0,
            total_xp: 0,
            level: default_level(),
        }
    }
}

/// All job progress for one player
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerProgressRecord {
    pub player_id: PlayerId,
    #[serde(default)]
    jobs: BTreeMap<String, JobProgress>,
}

impl PlayerProgressRecord {
    /// Empty record; every job reads as level 1 with no XP
    pub fn new(player_id: PlayerId) -> Self {
        Self {
            player_id,
            jobs: BTreeMap::new(),
        }
    }

    /// Record with an explicit default entry for every registered job
    pub fn initialized_for(player_id: PlayerId, registry: &JobRegistry) -> Self {
        let mut record = Self::new(player_id);
        for job_id in registry.job_ids() {
            record.jobs.insert(job_id.to_string(), JobProgress::default());
        }
        record
    }

    /// Progress for a job (defaults if nothing is recorded)
    pub fn job(&self, job_id: &str) -> JobProgress {
        self.jobs.get(job_id).copied().unwrap_or_default()
    }

    pub fn current_xp(&self, job_id: &str) -> u64 {
        self.job(job_id).current_xp
    }

    pub fn total_xp(&self, job_id: &str) -> u64 {
        self.job(job_id).total_xp
    }

    pub fn level(&self, job_id: &str) -> u32 {
        self.job(job_id).level
    }

    pub fn set_current_xp(&mut self, job_id: &str, xp: u64) {
        self.entry(job_id).current_xp = xp;
    }

    pub fn set_total_xp(&mut self, job_id: &str, xp: u64) {
        self.entry(job_id).total_xp = xp;
    }

    pub fn set_level(&mut self, job_id: &str, level: u32) {
        self.entry(job_id).level = level;
    }

    /// Add XP to both the current and lifetime counters
    ///
    /// Negative deltas are rejected and leave the record untouched.
    pub fn add_xp(&mut self, job_id: &str, delta: i64) -> Result<()> {
        let delta = u64::try_from(delta).map_err(|_| Error::InvalidXpDelta {
            job_id: job_id.to_string(),
            delta,
        })?;

        let progress = self.entry(job_id);
        progress.current_xp = progress.current_xp.saturating_add(delta);
        progress.total_xp = progress.total_xp.saturating_add(delta);
        Ok(())
    }

    /// Job ids with recorded progress, ascending
    pub fn job_ids(&self) -> impl Iterator<Item = &str> {
        self.jobs.keys().map(String::as_str)
    }

    /// Recorded entries, ascending by job id
    pub fn entries(&self) -> impl Iterator<Item = (&str, &JobProgress)> {
        self.jobs.iter().map(|(id, p)| (id.as_str(), p))
    }

    /// Remove progress for jobs the registry no longer defines
    ///
    /// Returns the removed job ids.
    pub fn prune_orphans(&mut self, registry: &JobRegistry) -> Vec<String> {
        let orphans: Vec<String> = self
            .jobs
            .keys()
            .filter(|id| !registry.contains(id))
            .cloned()
            .collect();

        for id in &orphans {
            self.jobs.remove(id);
        }

        if !orphans.is_empty() {
            tracing::info!(
                "Pruned {} orphaned jobs for player {}: {:?}",
                orphans.len(),
                self.player_id,
                orphans
            );
        }
        orphans
    }

    /// Clamp persisted levels below 1 back to 1
    pub fn normalize(&mut self) {
        for (job_id, progress) in self.jobs.iter_mut() {
            if progress.level < 1 {
                tracing::warn!(
                    "Player {} job '{}' had level {}, resetting to 1",
                    self.player_id,
                    job_id,
                    progress.level
                );
                progress.level = 1;
            }
        }
    }

    fn entry(&mut self, job_id: &str) -> &mut JobProgress {
        self.jobs.entry(job_id.to_string()).or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::JobConfig;
    use crate::material::MaterialCatalog;

    fn registry(ids: &[&str]) -> JobRegistry {
        let raw: BTreeMap<String, JobConfig> = ids
            .iter()
            .map(|id| {
                (
                    id.to_string(),
                    JobConfig {
                        name: id.to_string(),
                        color: "WHITE".into(),
                        xp: BTreeMap::new(),
                        rewards: BTreeMap::new(),
                    },
                )
            })
            .collect();
        JobRegistry::load_from(&raw, MaterialCatalog::builtin()).unwrap()
    }

    #[test]
    fn test_fresh_record_defaults() {
        let record = PlayerProgressRecord::new(PlayerId::new_v4());
        assert_eq!(record.level("miner"), 1);
        assert_eq!(record.current_xp("miner"), 0);
        assert_eq!(record.total_xp("miner"), 0);
        assert_eq!(record.job_ids().count(), 0);
    }

    #[test]
    fn test_initialized_for_registry() {
        let registry = registry(&["farmer", "miner"]);
        let record = PlayerProgressRecord::initialized_for(PlayerId::new_v4(), &registry);

        let ids: Vec<&str> = record.job_ids().collect();
        assert_eq!(ids, vec!["farmer", "miner"]);
        for (_, progress) in record.entries() {
            assert_eq!(*progress, JobProgress::default());
        }
    }

    #[test]
    fn test_add_xp_updates_both_counters() {
        let mut record = PlayerProgressRecord::new(PlayerId::new_v4());
        record.add_xp("miner", 5).unwrap();
        record.add_xp("miner", 7).unwrap();

        assert_eq!(record.current_xp("miner"), 12);
        assert_eq!(record.total_xp("miner"), 12);
        assert_eq!(record.level("miner"), 1);
    }

    #[test]
    fn test_negative_delta_rejected() {
        let mut record = PlayerProgressRecord::new(PlayerId::new_v4());
        record.add_xp("miner", 3).unwrap();
        let before = record.clone();

        let err = record.add_xp("miner", -1).unwrap_err();
        assert!(matches!(err, Error::InvalidXpDelta { delta: -1, .. }));
        assert_eq!(record, before);
    }

    #[test]
    fn test_unknown_job_ids_accepted() {
        let mut record = PlayerProgressRecord::new(PlayerId::new_v4());
        record.add_xp("retired_job", 10).unwrap();
        assert_eq!(record.total_xp("retired_job"), 10);
    }

    #[test]
    fn test_prune_orphans() {
        let registry = registry(&["miner"]);
        let mut record = PlayerProgressRecord::new(PlayerId::new_v4());
        record.add_xp("miner", 1).unwrap();
        record.add_xp("retired_job", 10).unwrap();

        let removed = record.prune_orphans(&registry);
        assert_eq!(removed, vec!["retired_job".to_string()]);
        assert_eq!(record.job_ids().collect::<Vec<_>>(), vec!["miner"]);
    }

    #[test]
    fn test_json_roundtrip() {
        let mut record = PlayerProgressRecord::new(PlayerId::new_v4());
        record.set_level("miner", 7);
        record.set_current_xp("miner", 33);
        record.set_total_xp("miner", 410);
        record.add_xp("farmer", 2).unwrap();

        let json = serde_json::to_string(&record).unwrap();
        let parsed: PlayerProgressRecord = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, record);
        assert_eq!(parsed.job("miner"), record.job("miner"));
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let id = PlayerId::new_v4();
        let json = format!(r#"{{"player_id":"{}","jobs":{{"miner":{{"current_xp":4}}}}}}"#, id);
        let record: PlayerProgressRecord = serde_json::from_str(&json).unwrap();

        assert_eq!(record.level("miner"), 1);
        assert_eq!(record.current_xp("miner"), 4);
        assert_eq!(record.total_xp("miner"), 0);
    }

    #[test]
    fn test_normalize_clamps_zero_level() {
        let mut record = PlayerProgressRecord::new(PlayerId::new_v4());
        record.set_level("miner", 0);
        record.normalize();
        assert_eq!(record.level("miner"), 1);
    }
}
