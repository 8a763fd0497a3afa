//! Configuration file support for the jobs engine.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/jobs/config.toml` and holds
//! both the host settings and the raw job definitions:
//!
//! ```toml
//! [jobs.miner]
//! name = "Miner"
//! color = "GRAY"
//!
//! [jobs.miner.xp.break]
//! stone = 1
//! diamond_ore = 50
//!
//! [jobs.miner.rewards.every_10_levels]
//! item = [{ name = "diamond", quantity = 2 }]
//! ```
//!
//! Material keys are checked against a built-in catalog of common blocks and
//! items. Keys outside it load as unknown and never award XP; servers with
//! modded or newer materials list them under `[materials] extra`:
//!
//! ```toml
//! [materials]
//! extra = ["mythril_ore", "minecraft:pale_oak_log"]
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub materials: MaterialsConfig,

    #[serde(default)]
    pub journal: JournalConfig,

    /// Raw job definitions keyed by job id
    #[serde(default)]
    pub jobs: BTreeMap<String, JobConfig>,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Extra material keys known to the host
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct MaterialsConfig {
    #[serde(default)]
    pub extra: Vec<String>,
}

/// Award journal configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct JournalConfig {
    #[serde(default = "default_journal_enabled")]
    pub enabled: bool,
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            enabled: default_journal_enabled(),
        }
    }
}

/// One job as written in the config file
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct JobConfig {
    pub name: String,
    pub color: String,

    /// action -> material key -> XP
    #[serde(default)]
    pub xp: BTreeMap<String, BTreeMap<String, u32>>,

    /// `every_<N>_levels` -> reward block
    #[serde(default)]
    pub rewards: BTreeMap<String, RewardConfig>,
}

/// Reward block under a milestone key
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct RewardConfig {
    #[serde(default)]
    pub item: Vec<RewardItemConfig>,
}

/// One reward item as written in the config file
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RewardItemConfig {
    pub name: String,
    pub quantity: u32,
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| {
        std::env::var_os("HOME")
            .map(|home| PathBuf::from(home).join(".local/share"))
            .unwrap_or_else(|| PathBuf::from("."))
    });
    base.join("jobs")
}

fn default_journal_enabled() -> bool {
    true
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        tracing::info!("Loaded config from {:?} ({} jobs)", path, config.jobs.len());
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            std::env::var_os("HOME")
                .map(|home| PathBuf::from(home).join(".config"))
                .unwrap_or_else(|| PathBuf::from("."))
        });
        base.join("jobs").join("config.toml")
    }

    /// Directory holding one JSON file per player
    pub fn players_dir(&self) -> PathBuf {
        self.data.data_dir.join("players")
    }

    /// Path of the award journal
    pub fn journal_path(&self) -> PathBuf {
        self.data.data_dir.join("awards.jsonl")
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[data]
data_dir = "/tmp/jobs-test"

[jobs.miner]
name = "Miner"
color = "GRAY"

[jobs.miner.xp.break]
stone = 1
diamond_ore = 50

[jobs.miner.rewards.every_10_levels]
item = [{ name = "diamond", quantity = 2 }, { name = "emerald", quantity = 1 }]

[jobs.lumberjack]
name = "Lumberjack"
color = "DARK_GREEN"

[jobs.lumberjack.xp.break]
oak_log = 2
"#;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.jobs.is_empty());
        assert!(config.journal.enabled);
        assert!(config.materials.extra.is_empty());
        assert!(config.data.data_dir.ends_with("jobs"));
    }

    #[test]
    fn test_parse_jobs() {
        let config: Config = toml::from_str(SAMPLE).unwrap();
        assert_eq!(config.jobs.len(), 2);

        let miner = &config.jobs["miner"];
        assert_eq!(miner.name, "Miner");
        assert_eq!(miner.color, "GRAY");
        assert_eq!(miner.xp["break"]["diamond_ore"], 50);
        assert_eq!(miner.rewards["every_10_levels"].item.len(), 2);
        assert_eq!(miner.rewards["every_10_levels"].item[1].name, "emerald");

        let lumberjack = &config.jobs["lumberjack"];
        assert!(lumberjack.rewards.is_empty());
        assert_eq!(config.players_dir(), PathBuf::from("/tmp/jobs-test/players"));
    }

    #[test]
    fn test_config_roundtrip() {
        let config: Config = toml::from_str(SAMPLE).unwrap();
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nested/config.toml");

        config.save_to(&path).unwrap();
        let parsed = Config::load_from(&path).unwrap();

        assert_eq!(parsed.jobs, config.jobs);
        assert_eq!(parsed.data.data_dir, config.data.data_dir);
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[journal]
enabled = false
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert!(!config.journal.enabled);
        assert!(config.jobs.is_empty()); // default
    }

    #[test]
    fn test_negative_xp_rejected_by_parser() {
        let toml_str = r#"
[jobs.miner]
name = "Miner"
color = "GRAY"

[jobs.miner.xp.break]
stone = -3
"#;
        assert!(toml::from_str::<Config>(toml_str).is_err());
    }
}
