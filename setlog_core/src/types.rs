//! Core domain types for the Setlog workout tracker.
//!
//! This module defines the fundamental types used throughout the system:
//! - Server-issued prescriptions and raw session records (inbound wire shapes)
//! - Derived per-set, per-exercise, and per-workout view models
//! - Set status and value-provenance enumerations

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Inbound Wire Types
// ============================================================================

/// A weight value paired with the unit it was entered in
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct Weight {
    pub value: f64,
    pub unit: WeightUnit,
}

/// Weight unit on the wire and in display
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    Kg,
    Lb,
}

/// Server-defined default sets/reps/weight for an exercise on a scheduled day.
///
/// Immutable from the engine's perspective; supplied by a collaborator service.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prescription {
    pub schedule_id: String,
    pub exercise_id: String,
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(rename = "type", default)]
    pub exercise_type: String,
    pub sets_count: Option<u32>,
    pub default_reps: Option<u32>,
    pub default_weight: Option<Weight>,
    pub default_duration_seconds: Option<u32>,
}

/// Completion status of a raw session record as reported by the server
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    Completed,
    /// Anything the server sends that is not "completed" (skipped, abandoned, ...)
    #[serde(other)]
    Other,
}

/// A raw historical performance entry for one set.
///
/// Only records with `status == Completed` and a non-null `set_number`
/// participate in merging; everything else is ignored.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub schedule_id: String,
    pub set_number: Option<u32>,
    pub reps: Option<u32>,
    pub weight: Option<Weight>,
    pub elapsed_seconds: Option<u32>,
    pub status: RecordStatus,
    pub created_at: Option<DateTime<Utc>>,
}

impl SessionRecord {
    /// Whether this record may influence a merged set view
    pub fn qualifies(&self) -> bool {
        self.status == RecordStatus::Completed && self.set_number.is_some()
    }
}

// ============================================================================
// Derived View Types
// ============================================================================

/// Lifecycle state of a single set
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SetStatus {
    Pending,
    InProgress,
    Done,
}

/// Origin of a set view's current values
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Prescription defaults, untouched
    FromPrescription,
    /// Server-confirmed historical record
    FromSession,
    /// Edited locally since the last save
    LocallyEdited,
}

/// Derived, mutable per-set state the rest of the system consumes.
///
/// Invariant: `status == Done` with `provenance == FromSession` means the
/// value fields are server-confirmed and read-only, and `is_modified` is false.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SetView {
    pub set_number: u32,
    pub reps: Option<u32>,
    pub weight_kg: Option<f64>,
    pub weight_display_unit: WeightUnit,
    pub duration_seconds: u32,
    pub status: SetStatus,
    pub provenance: Provenance,
    pub is_modified: bool,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub last_saved_at: Option<DateTime<Utc>>,
}

/// Ordered set views for one exercise; status is always derived, never stored
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExerciseView {
    pub schedule_id: String,
    pub exercise_id: String,
    pub name: String,
    pub category: String,
    pub sets: Vec<SetView>,
}

/// Top-level per-day aggregate, exclusively owned by the active view session.
///
/// Rebuilt from scratch whenever a new data source initializes the screen and
/// discarded when the user leaves without saving.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkoutView {
    pub day: String,
    pub category: String,
    pub exercises: Vec<ExerciseView>,
    pub saving: bool,
}
