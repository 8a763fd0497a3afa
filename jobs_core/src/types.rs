//! Core domain types for the jobs progression engine.
//!
//! This module defines the fundamental types used throughout the system:
//! - Player identifiers
//! - Display colors and materials
//! - Job definitions (XP tables and reward milestones)
//! - Award outcomes and status rows handed back to the host

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// ============================================================================
// Player Identity
// ============================================================================

/// Stable player identifier (never the display name, which can change)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub Uuid);

impl PlayerId {
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }
}

impl From<Uuid> for PlayerId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl FromStr for PlayerId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// ============================================================================
// Display Colors
// ============================================================================

/// Chat color/format code attached to a job for display
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ColorTag {
    Black,
    DarkBlue,
    DarkGreen,
    DarkAqua,
    DarkRed,
    DarkPurple,
    Gold,
    Gray,
    DarkGray,
    Blue,
    Green,
    Aqua,
    Red,
    LightPurple,
    Yellow,
    White,
    Magic,
    Bold,
    Strikethrough,
    Underline,
    Italic,
    Reset,
}

impl ColorTag {
    pub const ALL: [ColorTag; 22] = [
        ColorTag::Black,
        ColorTag::DarkBlue,
        ColorTag::DarkGreen,
        ColorTag::DarkAqua,
        ColorTag::DarkRed,
        ColorTag::DarkPurple,
        ColorTag::Gold,
        ColorTag::Gray,
        ColorTag::DarkGray,
        ColorTag::Blue,
        ColorTag::Green,
        ColorTag::Aqua,
        ColorTag::Red,
        ColorTag::LightPurple,
        ColorTag::Yellow,
        ColorTag::White,
        ColorTag::Magic,
        ColorTag::Bold,
        ColorTag::Strikethrough,
        ColorTag::Underline,
        ColorTag::Italic,
        ColorTag::Reset,
    ];

    /// Config name of the color (e.g. `DARK_AQUA`)
    pub fn name(&self) -> &'static str {
        match self {
            ColorTag::Black => "BLACK",
            ColorTag::DarkBlue => "DARK_BLUE",
            ColorTag::DarkGreen => "DARK_GREEN",
            ColorTag::DarkAqua => "DARK_AQUA",
            ColorTag::DarkRed => "DARK_RED",
            ColorTag::DarkPurple => "DARK_PURPLE",
            ColorTag::Gold => "GOLD",
            ColorTag::Gray => "GRAY",
            ColorTag::DarkGray => "DARK_GRAY",
            ColorTag::Blue => "BLUE",
            ColorTag::Green => "GREEN",
            ColorTag::Aqua => "AQUA",
            ColorTag::Red => "RED",
            ColorTag::LightPurple => "LIGHT_PURPLE",
            ColorTag::Yellow => "YELLOW",
            ColorTag::White => "WHITE",
            ColorTag::Magic => "MAGIC",
            ColorTag::Bold => "BOLD",
            ColorTag::Strikethrough => "STRIKETHROUGH",
            ColorTag::Underline => "UNDERLINE",
            ColorTag::Italic => "ITALIC",
            ColorTag::Reset => "RESET",
        }
    }

    /// Exact, case-sensitive lookup by config name
    pub fn parse(raw: &str) -> Option<ColorTag> {
        Self::ALL.iter().copied().find(|c| c.name() == raw)
    }
}

impl fmt::Display for ColorTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Materials
// ============================================================================

/// In-game material referenced by an XP table or a reward
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "status", content = "key", rename_all = "snake_case")]
pub enum Material {
    /// Resolved against the host's material catalog (normalized key)
    Known(String),
    /// Config key that did not resolve; kept verbatim
    Unknown(String),
}

impl Material {
    pub fn key(&self) -> &str {
        match self {
            Material::Known(key) | Material::Unknown(key) => key,
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, Material::Known(_))
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

// ============================================================================
// Job Definitions
// ============================================================================

/// XP awarded for performing an action on one material
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct XpEntry {
    pub material: Material,
    pub xp: u32,
}

/// One item handed out when a milestone fires
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RewardItem {
    pub material: Material,
    pub quantity: u32,
}

/// Reward block that fires whenever the level is a multiple of `interval`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Milestone {
    pub interval: u32,
    pub items: Vec<RewardItem>,
}

/// Immutable job definition, built once by the registry
///
/// Fields are only reachable through accessors so the canonical catalog
/// cannot be mutated by callers.
#[derive(Clone, Debug)]
pub struct JobDefinition {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) color: ColorTag,
    pub(crate) actions: BTreeMap<String, Vec<XpEntry>>,
    /// Sorted by ascending interval
    pub(crate) milestones: Vec<Milestone>,
}

impl JobDefinition {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn color(&self) -> ColorTag {
        self.color
    }

    /// XP table entries for an action, ordered by config key
    pub fn action_entries(&self, action: &str) -> &[XpEntry] {
        self.actions.get(action).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn actions(&self) -> impl Iterator<Item = &str> {
        self.actions.keys().map(String::as_str)
    }

    pub fn milestones(&self) -> &[Milestone] {
        &self.milestones
    }
}

// ============================================================================
// Load Diagnostics
// ============================================================================

/// Non-fatal problem found while building the registry
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadDiagnostic {
    /// XP table entry whose material key is not recognised; it will never match
    UnknownActionMaterial {
        job_id: String,
        action: String,
        key: String,
    },
    /// Reward item whose material key is not recognised; granted with the raw key
    UnknownRewardMaterial {
        job_id: String,
        interval: u32,
        key: String,
    },
    /// Action block with no materials
    EmptyAction { job_id: String, action: String },
    /// Second config key for a material already in the action; ignored
    DuplicateActionMaterial {
        job_id: String,
        action: String,
        key: String,
        first: String,
    },
}

impl fmt::Display for LoadDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadDiagnostic::UnknownActionMaterial {
                job_id,
                action,
                key,
            } => write!(
                f,
                "job '{}' action '{}': unknown material '{}'",
                job_id, action, key
            ),
            LoadDiagnostic::UnknownRewardMaterial {
                job_id,
                interval,
                key,
            } => write!(
                f,
                "job '{}' reward every_{}_levels: unknown material '{}'",
                job_id, interval, key
            ),
            LoadDiagnostic::EmptyAction { job_id, action } => {
                write!(f, "job '{}' action '{}' has no materials", job_id, action)
            }
            LoadDiagnostic::DuplicateActionMaterial {
                job_id,
                action,
                key,
                first,
            } => write!(
                f,
                "job '{}' action '{}': material '{}' duplicates '{}' and is ignored",
                job_id, action, key, first
            ),
        }
    }
}

// ============================================================================
// Award Outcomes
// ============================================================================

/// A reward due at a specific level
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reward {
    pub job_id: String,
    pub level: u32,
    pub interval: u32,
    pub material: Material,
    pub quantity: u32,
}

/// Outcome of a single XP award for one job
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwardResult {
    pub job_id: String,
    pub xp_gained: u32,
    /// Every level reached by this award, ascending
    pub levels_reached: Vec<u32>,
    pub rewards: Vec<Reward>,
}

impl AwardResult {
    pub fn empty(job_id: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.xp_gained == 0
    }

    pub fn leveled_up(&self) -> bool {
        !self.levels_reached.is_empty()
    }
}

/// Per-job status row for a status command or UI
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct JobStatus {
    pub job_id: String,
    pub job_name: String,
    pub color: ColorTag,
    pub level: u32,
    pub current_xp: u64,
    /// XP `current_xp` must reach to advance past `level`
    pub xp_required: u64,
}
