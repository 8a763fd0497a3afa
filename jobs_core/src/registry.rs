//! Job registry: the immutable catalog of job definitions.
//!
//! Built once from the raw job tables of the config. Loading is fail-fast for
//! structural problems (bad color, bad milestone key) and lenient for unknown
//! materials, which are reported as diagnostics for the host to log.

use crate::config::JobConfig;
use crate::error::LoadError;
use crate::material::{normalize_key, MaterialCatalog};
use crate::{JobDefinition, LoadDiagnostic, Milestone, RewardItem, XpEntry};
use crate::{ColorTag, Result};
use std::collections::{BTreeMap, HashMap};

const MILESTONE_PREFIX: &str = "every_";
const MILESTONE_SUFFIX: &str = "_levels";

/// Read-only catalog of jobs, iterated in ascending id order
#[derive(Clone, Debug)]
pub struct JobRegistry {
    jobs: BTreeMap<String, JobDefinition>,
    diagnostics: Vec<LoadDiagnostic>,
}

/// Parse `every_<N>_levels` into `N`
///
/// Returns `None` for anything that does not match the pattern exactly.
pub fn parse_milestone_key(key: &str) -> Option<u32> {
    let digits = key
        .strip_prefix(MILESTONE_PREFIX)?
        .strip_suffix(MILESTONE_SUFFIX)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

impl JobRegistry {
    /// Build the registry from raw job definitions
    ///
    /// Any `LoadError` aborts the whole load; no partial registry is returned.
    pub fn load_from(
        raw: &BTreeMap<String, JobConfig>,
        materials: &MaterialCatalog,
    ) -> Result<Self> {
        if raw.is_empty() {
            return Err(LoadError::NoJobs.into());
        }

        let mut jobs = BTreeMap::new();
        let mut diagnostics = Vec::new();

        for (job_id, job) in raw {
            let definition = load_job(job_id, job, materials, &mut diagnostics)?;
            jobs.insert(job_id.clone(), definition);
        }

        tracing::info!(
            "Loaded {} jobs ({} diagnostics)",
            jobs.len(),
            diagnostics.len()
        );

        Ok(Self { jobs, diagnostics })
    }

    /// Non-fatal problems found during loading
    pub fn diagnostics(&self) -> &[LoadDiagnostic] {
        &self.diagnostics
    }

    pub fn get(&self, job_id: &str) -> Option<&JobDefinition> {
        self.jobs.get(job_id)
    }

    pub fn contains(&self, job_id: &str) -> bool {
        self.jobs.contains_key(job_id)
    }

    /// All jobs in ascending id order
    pub fn jobs(&self) -> impl Iterator<Item = &JobDefinition> {
        self.jobs.values()
    }

    pub fn job_ids(&self) -> impl Iterator<Item = &str> {
        self.jobs.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// XP for performing `action` on `material_key` within a job
    ///
    /// Unknown job, unknown action, and unmatched material all yield 0.
    pub fn xp_for_action(&self, job_id: &str, action: &str, material_key: &str) -> u32 {
        let Some(job) = self.jobs.get(job_id) else {
            return 0;
        };

        let key = normalize_key(material_key);
        job.action_entries(action)
            .iter()
            .find(|entry| entry.material.is_known() && entry.material.key() == key)
            .map(|entry| entry.xp)
            .unwrap_or(0)
    }
}

fn load_job(
    job_id: &str,
    job: &JobConfig,
    materials: &MaterialCatalog,
    diagnostics: &mut Vec<LoadDiagnostic>,
) -> Result<JobDefinition> {
    let color = ColorTag::parse(&job.color).ok_or_else(|| LoadError::InvalidColor {
        job_id: job_id.to_string(),
        value: job.color.clone(),
    })?;

    let mut actions = BTreeMap::new();
    for (action, table) in &job.xp {
        if table.is_empty() {
            diagnostics.push(LoadDiagnostic::EmptyAction {
                job_id: job_id.to_string(),
                action: action.clone(),
            });
            continue;
        }

        // normalized key -> config key that claimed it first
        let mut seen: HashMap<String, &str> = HashMap::new();
        let mut entries = Vec::with_capacity(table.len());
        for (raw_key, &xp) in table {
            let material = materials.resolve(raw_key);
            if !material.is_known() {
                diagnostics.push(LoadDiagnostic::UnknownActionMaterial {
                    job_id: job_id.to_string(),
                    action: action.clone(),
                    key: raw_key.clone(),
                });
            } else if let Some(first) = seen.get(material.key()) {
                diagnostics.push(LoadDiagnostic::DuplicateActionMaterial {
                    job_id: job_id.to_string(),
                    action: action.clone(),
                    key: raw_key.clone(),
                    first: first.to_string(),
                });
                continue;
            } else {
                seen.insert(material.key().to_string(), raw_key.as_str());
            }
            entries.push(XpEntry { material, xp });
        }

        actions.insert(action.clone(), entries);
    }

    let mut milestones = Vec::with_capacity(job.rewards.len());
    for (key, reward) in &job.rewards {
        let interval = parse_milestone_key(key).ok_or_else(|| LoadError::InvalidMilestoneFormat {
            job_id: job_id.to_string(),
            key: key.clone(),
        })?;
        if interval == 0 {
            return Err(LoadError::ZeroMilestoneInterval {
                job_id: job_id.to_string(),
                key: key.clone(),
            }
            .into());
        }

        let items = reward
            .item
            .iter()
            .map(|item| {
                let material = materials.resolve(&item.name);
                if !material.is_known() {
                    diagnostics.push(LoadDiagnostic::UnknownRewardMaterial {
                        job_id: job_id.to_string(),
                        interval,
                        key: item.name.clone(),
                    });
                }
                RewardItem {
                    material,
                    quantity: item.quantity,
                }
            })
            .collect();

        milestones.push(Milestone { interval, items });
    }
    // Keys like every_5_levels and every_10_levels sort lexically; order numerically
    milestones.sort_by_key(|m| m.interval);

    Ok(JobDefinition {
        id: job_id.to_string(),
        name: job.name.clone(),
        color,
        actions,
        milestones,
    })
}
