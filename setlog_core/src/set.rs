//! Per-set state machine and derived exercise status.
//!
//! Each set moves `Pending -> InProgress -> Done`, with `Done` terminal.
//! Illegal operations are logged no-ops rather than errors: completing a set
//! that was never started does nothing, and value edits are ignored the
//! moment a set is done. Timestamps are passed in by the caller so the
//! transitions stay deterministic under test.

use crate::types::{ExerciseView, Provenance, SetStatus, SetView};
use chrono::{DateTime, Utc};

impl SetView {
    /// Begin working the set: `Pending -> InProgress`, recording `started_at`.
    ///
    /// Returns whether the transition applied; any other starting state is a
    /// no-op.
    pub fn start(&mut self, now: DateTime<Utc>) -> bool {
        match self.status {
            SetStatus::Pending => {
                self.status = SetStatus::InProgress;
                self.started_at = Some(now);
                tracing::debug!(set = self.set_number, "Set started");
                true
            }
            SetStatus::InProgress | SetStatus::Done => {
                tracing::debug!(
                    set = self.set_number,
                    status = ?self.status,
                    "Ignoring start on non-pending set"
                );
                false
            }
        }
    }

    /// Finish the set: `InProgress -> Done`.
    ///
    /// Duration is computed from `started_at` to `now` when available, else
    /// 0. The completion is a local fact until saved, so `is_modified`
    /// becomes true while provenance stays whatever it was. Completing a
    /// pending or already-done set is a no-op.
    pub fn complete(&mut self, now: DateTime<Utc>) -> bool {
        match self.status {
            SetStatus::InProgress => {
                self.duration_seconds = self
                    .started_at
                    .map(|started| (now - started).num_seconds().max(0) as u32)
                    .unwrap_or(0);
                self.status = SetStatus::Done;
                self.completed_at = Some(now);
                self.is_modified = true;
                tracing::debug!(
                    set = self.set_number,
                    duration = self.duration_seconds,
                    "Set completed"
                );
                true
            }
            SetStatus::Pending | SetStatus::Done => {
                tracing::debug!(
                    set = self.set_number,
                    status = ?self.status,
                    "Ignoring complete on set that is not in progress"
                );
                false
            }
        }
    }

    /// Edit the rep count. Editing closes as soon as the set is done.
    pub fn set_reps(&mut self, reps: u32) -> bool {
        self.edit(|set| set.reps = Some(reps))
    }

    /// Edit the weight (canonical kilograms). Editing closes once done.
    pub fn set_weight_kg(&mut self, weight_kg: f64) -> bool {
        self.edit(|set| set.weight_kg = Some(weight_kg))
    }

    fn edit(&mut self, apply: impl FnOnce(&mut Self)) -> bool {
        match self.status {
            SetStatus::Pending | SetStatus::InProgress => {
                apply(self);
                self.provenance = Provenance::LocallyEdited;
                self.is_modified = true;
                true
            }
            // Done sets are read-only whether server-confirmed or locally
            // completed; the edit is silently ignored.
            SetStatus::Done => {
                tracing::debug!(set = self.set_number, "Ignoring edit on done set");
                false
            }
        }
    }

    /// Whether this set has unsaved local changes the server must see:
    /// newly completed locally, or value-edited since the last save.
    pub fn is_save_eligible(&self) -> bool {
        (self.status == SetStatus::Done && self.provenance != Provenance::FromSession)
            || self.is_modified
    }
}

impl ExerciseView {
    /// Derived exercise status; never stored or set directly.
    ///
    /// Done when every set is done and at least one exists; InProgress when
    /// any set is done-but-not-all or any set is in progress; else Pending.
    pub fn status(&self) -> SetStatus {
        let total = self.sets.len();
        let done = self
            .sets
            .iter()
            .filter(|s| s.status == SetStatus::Done)
            .count();
        let in_progress = self
            .sets
            .iter()
            .any(|s| s.status == SetStatus::InProgress);

        if total > 0 && done == total {
            SetStatus::Done
        } else if done > 0 || in_progress {
            SetStatus::InProgress
        } else {
            SetStatus::Pending
        }
    }

    /// Whether any set in this exercise has unsaved changes
    pub fn has_save_eligible_sets(&self) -> bool {
        self.sets.iter().any(SetView::is_save_eligible)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::WeightUnit;
    use chrono::Duration;

    fn pending_set(set_number: u32) -> SetView {
        SetView {
            set_number,
            reps: Some(10),
            weight_kg: Some(60.0),
            weight_display_unit: WeightUnit::Kg,
            duration_seconds: 0,
            status: SetStatus::Pending,
            provenance: Provenance::FromPrescription,
            is_modified: false,
            started_at: None,
            completed_at: None,
            last_saved_at: None,
        }
    }

    #[test]
    fn test_start_records_timestamp() {
        let mut set = pending_set(1);
        let now = Utc::now();

        assert!(set.start(now));
        assert_eq!(set.status, SetStatus::InProgress);
        assert_eq!(set.started_at, Some(now));
        assert!(!set.is_modified, "starting alone is not an edit");
    }

    #[test]
    fn test_complete_requires_start() {
        let mut set = pending_set(1);

        assert!(!set.complete(Utc::now()));
        assert_eq!(set.status, SetStatus::Pending);
        assert!(!set.is_modified);
    }

    #[test]
    fn test_complete_computes_duration() {
        let mut set = pending_set(1);
        let started = Utc::now();
        set.start(started);

        assert!(set.complete(started + Duration::seconds(42)));
        assert_eq!(set.status, SetStatus::Done);
        assert_eq!(set.duration_seconds, 42);
        assert!(set.is_modified);
        assert!(set.completed_at.is_some());
    }

    #[test]
    fn test_complete_without_started_at_yields_zero_duration() {
        let mut set = pending_set(1);
        set.status = SetStatus::InProgress;

        assert!(set.complete(Utc::now()));
        assert_eq!(set.duration_seconds, 0);
    }

    #[test]
    fn test_no_transition_out_of_done() {
        let mut set = pending_set(1);
        set.start(Utc::now());
        set.complete(Utc::now());

        assert!(!set.start(Utc::now()));
        assert!(!set.complete(Utc::now()));
        assert_eq!(set.status, SetStatus::Done);
    }

    #[test]
    fn test_edits_mark_locally_edited() {
        let mut set = pending_set(1);

        assert!(set.set_reps(12));
        assert_eq!(set.reps, Some(12));
        assert_eq!(set.provenance, Provenance::LocallyEdited);
        assert!(set.is_modified);
        assert_eq!(set.status, SetStatus::Pending, "edits never change status");
    }

    #[test]
    fn test_editable_while_in_progress() {
        let mut set = pending_set(1);
        set.start(Utc::now());

        assert!(set.set_weight_kg(65.0));
        assert_eq!(set.weight_kg, Some(65.0));
    }

    #[test]
    fn test_done_sets_are_read_only() {
        let mut set = pending_set(1);
        set.start(Utc::now());
        set.complete(Utc::now());

        assert!(!set.set_reps(99));
        assert!(!set.set_weight_kg(999.0));
        assert_eq!(set.reps, Some(10));
        assert_eq!(set.weight_kg, Some(60.0));
    }

    #[test]
    fn test_server_confirmed_done_set_not_save_eligible() {
        let mut set = pending_set(1);
        set.status = SetStatus::Done;
        set.provenance = Provenance::FromSession;

        assert!(!set.is_save_eligible());
    }

    #[test]
    fn test_locally_completed_set_is_save_eligible() {
        let mut set = pending_set(1);
        set.start(Utc::now());
        set.complete(Utc::now());

        assert!(set.is_save_eligible());
    }

    #[test]
    fn test_exercise_status_derivation() {
        let mut exercise = ExerciseView {
            schedule_id: "sched-1".into(),
            exercise_id: "ex-1".into(),
            name: "Back Squat".into(),
            category: "legs".into(),
            sets: vec![pending_set(1), pending_set(2)],
        };
        assert_eq!(exercise.status(), SetStatus::Pending);

        exercise.sets[0].start(Utc::now());
        assert_eq!(exercise.status(), SetStatus::InProgress);

        exercise.sets[0].complete(Utc::now());
        assert_eq!(exercise.status(), SetStatus::InProgress);

        exercise.sets[1].start(Utc::now());
        exercise.sets[1].complete(Utc::now());
        assert_eq!(exercise.status(), SetStatus::Done);
    }

    #[test]
    fn test_empty_exercise_is_pending() {
        let exercise = ExerciseView {
            schedule_id: "sched-1".into(),
            exercise_id: "ex-1".into(),
            name: "Back Squat".into(),
            category: "legs".into(),
            sets: vec![],
        };
        assert_eq!(exercise.status(), SetStatus::Pending);
    }
}
