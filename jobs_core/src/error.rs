//! Error types for the jobs_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal problems found while building the job registry.
///
/// Any of these aborts the whole load: the host is expected to run without
/// the progression feature rather than with a partial job catalog.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    /// No jobs were configured at all
    #[error("no jobs defined in configuration")]
    NoJobs,

    /// Color tag is not one of the known chat colors
    #[error("job '{job_id}' has invalid color '{value}'")]
    InvalidColor { job_id: String, value: String },

    /// Reward key does not follow the `every_<N>_levels` pattern
    #[error("job '{job_id}' has invalid reward milestone '{key}' (expected every_<N>_levels)")]
    InvalidMilestoneFormat { job_id: String, key: String },

    /// Reward milestone interval of zero
    #[error("job '{job_id}' has reward milestone '{key}' with interval 0")]
    ZeroMilestoneInterval { job_id: String, key: String },
}

/// Core error type for jobs_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Job registry could not be built
    #[error("Job registry error: {0}")]
    Load(#[from] LoadError),

    /// Negative XP passed to a progress record
    #[error("Invalid XP delta {delta} for job '{job_id}'")]
    InvalidXpDelta { job_id: String, delta: i64 },

    /// Player record could not be loaded or saved
    #[error("Persistence error for player {player_id}: {reason}")]
    Persistence { player_id: String, reason: String },

    /// Generic error
    #[error("{0}")]
    Other(String),
}
