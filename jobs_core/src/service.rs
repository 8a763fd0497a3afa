//! Host-facing orchestration around the progression engine.
//!
//! The service is what a game server wires its events into:
//! - `on_player_join` lazily creates a stored record for new players
//! - `on_action` asks every job about one in-world action, persists after
//!   each award that yielded XP and forwards messages/rewards to the host
//! - `progress` answers status queries
//!
//! Persistence is best-effort: a failed save is logged and reported in the
//! outcome, but the in-memory record stays authoritative for the session.

use crate::engine::ProgressionEngine;
use crate::journal::{AwardEntry, AwardSink};
use crate::registry::JobRegistry;
use crate::store::ProgressStore;
use crate::{AwardResult, JobDefinition, JobStatus, PlayerId, PlayerProgressRecord, Result, Reward};
use std::collections::HashMap;
use std::sync::Arc;

/// Callbacks the host implements to materialize progression events
///
/// Only reward grants are mandatory; messages default to no-ops.
pub trait Notifier {
    fn xp_gained(&mut self, _player_id: PlayerId, _job: &JobDefinition, _xp: u32) {}

    fn level_up(&mut self, _player_id: PlayerId, _job: &JobDefinition, _level: u32) {}

    /// Hand `reward.quantity` of `reward.material` to the player
    fn reward_granted(&mut self, player_id: PlayerId, job: &JobDefinition, reward: &Reward);
}

/// How a player's session started
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JoinOutcome {
    /// Record already cached or found in the store
    Existing,
    /// No stored record; a default one (or the cached session record) was saved
    Initialized { persisted: bool },
    /// Stored record could not be read; playing on a fresh in-memory record
    LoadFailed,
}

/// Everything one action event produced across all jobs
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ActionOutcome {
    /// Non-empty awards, in registry order
    pub awards: Vec<AwardResult>,
    /// False if any save after an award failed
    pub persisted: bool,
}

impl ActionOutcome {
    pub fn total_xp(&self) -> u64 {
        self.awards.iter().map(|a| u64::from(a.xp_gained)).sum()
    }

    pub fn rewards(&self) -> impl Iterator<Item = &Reward> {
        self.awards.iter().flat_map(|a| a.rewards.iter())
    }
}

/// Session-scoped progression service for one game server
pub struct JobsService<S: ProgressStore> {
    engine: ProgressionEngine,
    store: S,
    journal: Option<Box<dyn AwardSink>>,
    sessions: HashMap<PlayerId, PlayerProgressRecord>,
}

impl<S: ProgressStore> JobsService<S> {
    pub fn new(registry: Arc<JobRegistry>, store: S) -> Self {
        Self {
            engine: ProgressionEngine::new(registry),
            store,
            journal: None,
            sessions: HashMap::new(),
        }
    }

    /// Journal every non-empty award to `sink`
    pub fn with_journal(mut self, sink: impl AwardSink + 'static) -> Self {
        self.journal = Some(Box::new(sink));
        self
    }

    pub fn engine(&self) -> &ProgressionEngine {
        &self.engine
    }

    pub fn registry(&self) -> &JobRegistry {
        self.engine.registry()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Cached record for an active player
    pub fn record(&self, player_id: PlayerId) -> Option<&PlayerProgressRecord> {
        self.sessions.get(&player_id)
    }

    /// Load or lazily create the player's record
    ///
    /// A session started earlier by a query or an unrewarded action is not
    /// stored yet; joining persists it.
    pub fn on_player_join(&mut self, player_id: PlayerId) -> JoinOutcome {
        let stored = self.store.load(player_id);

        if let Some(cached) = self.sessions.get(&player_id) {
            return match stored {
                Ok(None) => {
                    tracing::info!("Persisting job data for player {}", player_id);
                    let persisted = save_best_effort(&self.store, cached);
                    JoinOutcome::Initialized { persisted }
                }
                _ => JoinOutcome::Existing,
            };
        }

        let (record, outcome) = match stored {
            Ok(Some(record)) => (record, JoinOutcome::Existing),
            Ok(None) => {
                tracing::info!("Initializing job data for player {}", player_id);
                let record = PlayerProgressRecord::initialized_for(player_id, self.registry());
                let persisted = save_best_effort(&self.store, &record);
                (record, JoinOutcome::Initialized { persisted })
            }
            Err(e) => {
                tracing::warn!(
                    "Unable to load job data for player {}: {}. Using defaults.",
                    player_id,
                    e
                );
                let record = PlayerProgressRecord::initialized_for(player_id, self.registry());
                (record, JoinOutcome::LoadFailed)
            }
        };

        self.sessions.insert(player_id, record);
        outcome
    }

    /// Drop the player's cached record (it was saved after every mutation)
    pub fn on_player_quit(&mut self, player_id: PlayerId) -> Option<PlayerProgressRecord> {
        self.sessions.remove(&player_id)
    }

    /// Process one in-world action against every job
    pub fn on_action(
        &mut self,
        player_id: PlayerId,
        action: &str,
        material_key: &str,
        notifier: &mut dyn Notifier,
    ) -> Result<ActionOutcome> {
        self.ensure_session(player_id);

        let Self {
            engine,
            store,
            journal,
            sessions,
        } = self;
        let Some(record) = sessions.get_mut(&player_id) else {
            return Ok(ActionOutcome::default());
        };

        let mut outcome = ActionOutcome {
            awards: Vec::new(),
            persisted: true,
        };

        for job in engine.registry().jobs() {
            let result = engine.award_for_action(job.id(), action, material_key, record)?;
            if result.is_empty() {
                continue;
            }

            notify(notifier, player_id, job, &result);

            if let Some(sink) = journal.as_mut() {
                let entry = AwardEntry::new(player_id, action, material_key, &result);
                if let Err(e) = sink.append(&entry) {
                    tracing::warn!("Failed to journal award for player {}: {}", player_id, e);
                }
            }

            outcome.persisted &= save_best_effort(store, record);
            outcome.awards.push(result);
        }

        Ok(outcome)
    }

    /// Per-job status for a player, in registry order
    pub fn progress(&mut self, player_id: PlayerId) -> Vec<JobStatus> {
        self.ensure_session(player_id);
        match self.sessions.get(&player_id) {
            Some(record) => self.engine.status(record),
            None => Vec::new(),
        }
    }

    /// Remove stored progress for jobs no longer in the registry
    pub fn prune_orphans(&mut self, player_id: PlayerId) -> Result<Vec<String>> {
        self.ensure_session(player_id);

        let Some(record) = self.sessions.get_mut(&player_id) else {
            return Ok(Vec::new());
        };
        let removed = record.prune_orphans(self.engine.registry());
        if !removed.is_empty() {
            self.store.save(record)?;
        }
        Ok(removed)
    }

    /// Make sure a record is cached without creating a stored one
    fn ensure_session(&mut self, player_id: PlayerId) {
        if self.sessions.contains_key(&player_id) {
            return;
        }

        let record = match self.store.load(player_id) {
            Ok(Some(record)) => record,
            Ok(None) => PlayerProgressRecord::initialized_for(player_id, self.registry()),
            Err(e) => {
                tracing::warn!(
                    "Unable to load job data for player {}: {}. Using defaults.",
                    player_id,
                    e
                );
                PlayerProgressRecord::initialized_for(player_id, self.registry())
            }
        };
        self.sessions.insert(player_id, record);
    }
}

/// Forward messages for one award: XP, then each level followed by its rewards
fn notify(notifier: &mut dyn Notifier, player_id: PlayerId, job: &JobDefinition, result: &AwardResult) {
    notifier.xp_gained(player_id, job, result.xp_gained);
    for &level in &result.levels_reached {
        notifier.level_up(player_id, job, level);
        for reward in result.rewards.iter().filter(|r| r.level == level) {
            notifier.reward_granted(player_id, job, reward);
        }
    }
}

fn save_best_effort<S: ProgressStore>(store: &S, record: &PlayerProgressRecord) -> bool {
    match store.save(record) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(
                "Unable to save job data for player {}: {}",
                record.player_id,
                e
            );
            false
        }
    }
}
