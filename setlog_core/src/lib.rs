#![forbid(unsafe_code)]

//! Core domain model and business logic for the Setlog workout tracker.
//!
//! This crate provides:
//! - Domain types (prescriptions, session records, set/exercise/workout views)
//! - Unit conversion between kilograms and pounds
//! - The set merge engine (prescription + history -> per-set views)
//! - The per-set state machine and derived progress aggregation
//! - The batched save coordinator and persistence seam

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod units;
pub mod merge;
pub mod set;
pub mod progress;
pub mod workout;
pub mod store;
pub mod save;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use merge::merge_exercise;
pub use progress::{aggregate_progress, WorkoutProgress};
pub use workout::{WorkoutSource, stub_workout};
pub use store::{SessionStore, JsonlStore};
pub use save::{save_workout, Notifier, NoticeLevel, SaveOutcome, StderrNotifier};
