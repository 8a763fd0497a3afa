//! Reward milestone evaluation.

use crate::{JobDefinition, Reward};

/// Rewards due when a player reaches `level` in `job`
///
/// Every milestone whose interval divides `level` fires; overlapping
/// milestones (e.g. every 5 and every 10 at level 10) all fire. Results are
/// ordered by ascending interval, then by item order within a milestone.
/// Pure: evaluate once per level reached, not once per award.
pub fn rewards_for(job: &JobDefinition, level: u32) -> Vec<Reward> {
    job.milestones()
        .iter()
        .filter(|m| m.interval != 0 && level % m.interval == 0)
        .flat_map(|m| {
            m.items.iter().map(move |item| Reward {
                job_id: job.id().to_string(),
                level,
                interval: m.interval,
                material: item.material.clone(),
                quantity: item.quantity,
            })
        })
        .collect()
}
