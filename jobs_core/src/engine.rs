//! Progression engine: turns an action into XP, level-ups and rewards.
//!
//! Award flow for a single (job, action, material):
//! 1. Look up the XP value in the registry; 0 means nothing happens at all
//! 2. Add the XP to the player's record (current and lifetime)
//! 3. Level up while `current_xp >= xp_required(level)`, one level at a time
//! 4. Evaluate reward milestones for every level reached
//!
//! The engine does not iterate jobs itself; callers ask it once per job.

use crate::curve::xp_required_for;
use crate::registry::JobRegistry;
use crate::rewards::rewards_for;
use crate::{AwardResult, JobStatus, PlayerProgressRecord, Result};
use std::sync::Arc;

/// Stateless orchestrator over a shared, read-only registry
#[derive(Clone, Debug)]
pub struct ProgressionEngine {
    registry: Arc<JobRegistry>,
}

impl ProgressionEngine {
    pub fn new(registry: Arc<JobRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &JobRegistry {
        &self.registry
    }

    /// Award XP for one action against one job
    ///
    /// Returns an empty result (and leaves `record` untouched) when the job
    /// does not reward this action/material pair.
    pub fn award_for_action(
        &self,
        job_id: &str,
        action: &str,
        material_key: &str,
        record: &mut PlayerProgressRecord,
    ) -> Result<AwardResult> {
        let xp = self.registry.xp_for_action(job_id, action, material_key);
        if xp == 0 {
            return Ok(AwardResult::empty(job_id));
        }

        record.add_xp(job_id, i64::from(xp))?;

        let mut result = AwardResult::empty(job_id);
        result.xp_gained = xp;
        result.levels_reached = level_up(job_id, record);

        if let Some(job) = self.registry.get(job_id) {
            for &level in &result.levels_reached {
                result.rewards.extend(rewards_for(job, level));
            }
        }

        tracing::debug!(
            "Player {} gained {} XP in '{}' ({} {}), levels reached: {:?}",
            record.player_id,
            xp,
            job_id,
            action,
            material_key,
            result.levels_reached
        );

        Ok(result)
    }

    /// Status rows for every registered job, in registry order
    pub fn status(&self, record: &PlayerProgressRecord) -> Vec<JobStatus> {
        self.registry
            .jobs()
            .map(|job| {
                let progress = record.job(job.id());
                JobStatus {
                    job_id: job.id().to_string(),
                    job_name: job.name().to_string(),
                    color: job.color(),
                    level: progress.level,
                    current_xp: progress.current_xp,
                    xp_required: xp_required_for(progress.level),
                }
            })
            .collect()
    }
}

/// Run the level-up loop for one job and return every level reached
///
/// Leaves `current_xp < xp_required(level)` on return, except at the
/// `u32::MAX` level cap where excess XP is kept.
pub fn level_up(job_id: &str, record: &mut PlayerProgressRecord) -> Vec<u32> {
    let mut reached = Vec::new();
    let mut progress = record.job(job_id);

    loop {
        let required = xp_required_for(progress.level);
        if progress.current_xp < required {
            break;
        }
        // Level cap: leftover XP stays banked
        let Some(next) = progress.level.checked_add(1) else {
            break;
        };
        progress.current_xp -= required;
        progress.level = next;
        reached.push(next);
    }

    if !reached.is_empty() {
        record.set_current_xp(job_id, progress.current_xp);
        record.set_level(job_id, progress.level);
        tracing::info!(
            "Player {} reached level {} in '{}'",
            record.player_id,
            progress.level,
            job_id
        );
    }

    reached
}
