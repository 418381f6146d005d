//! Batched save coordinator.
//!
//! Groups save-eligible sets by exercise, issues one store write per
//! exercise concurrently, and reconciles the in-memory view with the
//! per-exercise outcomes: a succeeded exercise's sets are promoted to
//! server-confirmed, a failed exercise's sets stay dirty and retryable.
//! Every failure is surfaced through the injected [`Notifier`] and the
//! `saving` flag is always cleared, no automatic retries.
//!
//! Request ordering inside one save is not guaranteed and nothing here
//! relies on it.

use crate::error::Error;
use crate::store::{PerformedSet, SavePayload, SessionStore};
use crate::types::{Provenance, WorkoutView};
use chrono::{DateTime, Utc};
use futures::future::join_all;

/// Severity of a user-facing notice
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// User-facing notification capability, injected into the coordinator.
///
/// Replaces a mutable module-level toast hook: callers decide how notices
/// reach the user.
pub trait Notifier: Send + Sync {
    fn notify(&self, level: NoticeLevel, message: &str);
}

/// Notifier that writes notices to stderr
pub struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn notify(&self, level: NoticeLevel, message: &str) {
        match level {
            NoticeLevel::Info => eprintln!("{message}"),
            NoticeLevel::Error => eprintln!("error: {message}"),
        }
    }
}

/// Per-exercise result of one save invocation
#[derive(Debug, Default)]
pub struct SaveOutcome {
    /// Schedule ids whose write succeeded and whose sets were promoted
    pub saved: Vec<String>,
    /// Schedule ids whose write failed; their sets remain dirty
    pub failed: Vec<(String, Error)>,
}

impl SaveOutcome {
    /// True when every issued write succeeded (vacuously true for none)
    pub fn is_full_success(&self) -> bool {
        self.failed.is_empty()
    }
}

fn payload_for(exercise: &crate::types::ExerciseView) -> SavePayload {
    SavePayload {
        schedule_id: exercise.schedule_id.clone(),
        performed_sets: exercise
            .sets
            .iter()
            .filter(|s| s.is_save_eligible())
            .map(|s| PerformedSet {
                set_number: s.set_number,
                reps: s.reps,
                weight: s.weight_kg,
                weight_unit: s.weight_display_unit,
            })
            .collect(),
    }
}

/// Persist every save-eligible set, one concurrent write per exercise.
///
/// On success an exercise's eligible sets become server-confirmed
/// (`is_modified = false`, `provenance = FromSession`, `last_saved_at =
/// now`). Failed exercises are reported in the outcome and left dirty so a
/// later save retries exactly the unsaved remainder.
pub async fn save_workout(
    workout: &mut WorkoutView,
    store: &dyn SessionStore,
    notifier: &dyn Notifier,
    now: DateTime<Utc>,
) -> SaveOutcome {
    // Partition: only exercises holding at least one eligible set get a write
    let batch: Vec<(usize, SavePayload)> = workout
        .exercises
        .iter()
        .enumerate()
        .filter(|(_, e)| e.has_save_eligible_sets())
        .map(|(idx, e)| (idx, payload_for(e)))
        .collect();

    if batch.is_empty() {
        tracing::debug!("Nothing to save");
        return SaveOutcome::default();
    }

    workout.saving = true;
    tracing::info!(exercises = batch.len(), "Saving workout");

    let results = join_all(batch.iter().map(|(idx, payload)| async move {
        (*idx, store.save_performed_sets(payload).await)
    }))
    .await;

    let mut outcome = SaveOutcome::default();
    for (idx, result) in results {
        let exercise = &mut workout.exercises[idx];
        match result {
            Ok(()) => {
                for set in exercise.sets.iter_mut().filter(|s| s.is_save_eligible()) {
                    set.is_modified = false;
                    set.provenance = Provenance::FromSession;
                    set.last_saved_at = Some(now);
                }
                outcome.saved.push(exercise.schedule_id.clone());
            }
            Err(e) => {
                tracing::error!(
                    schedule_id = %exercise.schedule_id,
                    "Save failed: {}",
                    e
                );
                outcome.failed.push((exercise.schedule_id.clone(), e));
            }
        }
    }

    workout.saving = false;

    if outcome.is_full_success() {
        notifier.notify(NoticeLevel::Info, "Workout saved");
    } else {
        notifier.notify(
            NoticeLevel::Error,
            &format!(
                "Failed to save {} of {} exercises; unsaved sets kept for retry",
                outcome.failed.len(),
                batch.len()
            ),
        );
    }

    outcome
}
