#![forbid(unsafe_code)]

//! Core domain model and business logic for the jobs progression engine.
//!
//! This crate provides:
//! - Domain types (jobs, materials, rewards, award outcomes)
//! - Job registry loading and validation
//! - XP curve, level-up and milestone reward evaluation
//! - Persistence (per-player JSON records, award journal, CSV export)
//! - A host-facing service wiring it all together

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod curve;
pub mod material;
pub mod registry;
pub mod progress;
pub mod rewards;
pub mod engine;
pub mod store;
pub mod journal;
pub mod export;
pub mod service;

// Re-export commonly used types
pub use error::{Error, LoadError, Result};
pub use types::*;
pub use config::Config;
pub use curve::xp_required;
pub use material::MaterialCatalog;
pub use registry::JobRegistry;
pub use progress::{JobProgress, PlayerProgressRecord};
pub use rewards::rewards_for;
pub use engine::ProgressionEngine;
pub use store::{JsonFileStore, MemoryStore, ProgressStore};
pub use journal::{AwardEntry, AwardSink, JsonlJournal};
pub use export::export_progress;
pub use service::{ActionOutcome, JobsService, JoinOutcome, Notifier};
