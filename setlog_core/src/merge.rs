//! Set merge engine: reconcile a prescription with session history.
//!
//! For one exercise this combines the server-issued prescription (default
//! sets/reps/weight) with the raw historical records into an ordered sequence
//! of per-set views. Sets with a qualifying completed record come back `Done`
//! and server-confirmed; the rest come back `Pending` carrying the
//! prescription defaults. The merge is a pure, idempotent transform.

use crate::types::{
    ExerciseView, Prescription, Provenance, SessionRecord, SetStatus, SetView, Weight, WeightUnit,
};
use crate::units;
use std::collections::HashMap;

/// Fallback when a prescription carries no usable sets count
pub const DEFAULT_SETS_COUNT: u32 = 3;

/// Normalize a wire weight to the canonical kilogram value
fn weight_to_kg(weight: &Weight) -> f64 {
    match weight.unit {
        WeightUnit::Kg => weight.value,
        WeightUnit::Lb => units::lbs_to_kg(weight.value),
    }
}

/// Merge one prescription with its session records into an exercise view.
///
/// Records are scanned in input order and a later record for the same set
/// number overwrites an earlier one. This is last-write-wins by array order,
/// not by `created_at`; reordering the input can change which historical
/// value wins.
pub fn merge_exercise(prescription: &Prescription, records: &[SessionRecord]) -> ExerciseView {
    // set_number -> last qualifying record seen, in input order
    let mut by_set: HashMap<u32, &SessionRecord> = HashMap::new();
    for record in records {
        if !record.qualifies() {
            tracing::debug!(
                schedule_id = %record.schedule_id,
                "Ignoring non-completed or unnumbered session record"
            );
            continue;
        }
        if let Some(set_number) = record.set_number {
            by_set.insert(set_number, record);
        }
    }

    let sets_count = match prescription.sets_count {
        Some(n) if n > 0 => n,
        _ => {
            tracing::warn!(
                exercise_id = %prescription.exercise_id,
                "Prescription has no usable sets count, defaulting to {}",
                DEFAULT_SETS_COUNT
            );
            DEFAULT_SETS_COUNT
        }
    };

    let default_unit = prescription
        .default_weight
        .map(|w| w.unit)
        .unwrap_or(WeightUnit::Kg);

    let mut sets = Vec::with_capacity(sets_count as usize);
    for set_number in 1..=sets_count {
        let view = match by_set.get(&set_number) {
            Some(record) => SetView {
                set_number,
                reps: record.reps,
                weight_kg: record.weight.as_ref().map(weight_to_kg),
                weight_display_unit: record.weight.map(|w| w.unit).unwrap_or(default_unit),
                duration_seconds: record.elapsed_seconds.unwrap_or(0),
                status: SetStatus::Done,
                provenance: Provenance::FromSession,
                is_modified: false,
                started_at: None,
                completed_at: record.created_at,
                last_saved_at: record.created_at,
            },
            None => SetView {
                set_number,
                reps: prescription.default_reps,
                weight_kg: prescription.default_weight.as_ref().map(weight_to_kg),
                weight_display_unit: default_unit,
                duration_seconds: prescription.default_duration_seconds.unwrap_or(0),
                status: SetStatus::Pending,
                provenance: Provenance::FromPrescription,
                is_modified: false,
                started_at: None,
                completed_at: None,
                last_saved_at: None,
            },
        };
        sets.push(view);
    }

    tracing::debug!(
        exercise_id = %prescription.exercise_id,
        total = sets.len(),
        completed = sets.iter().filter(|s| s.status == SetStatus::Done).count(),
        "Merged exercise"
    );

    ExerciseView {
        schedule_id: prescription.schedule_id.clone(),
        exercise_id: prescription.exercise_id.clone(),
        name: prescription.name.clone(),
        category: prescription.category.clone(),
        sets,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RecordStatus;
    use chrono::Utc;

    fn prescription(sets_count: Option<u32>) -> Prescription {
        Prescription {
            schedule_id: "sched-1".into(),
            exercise_id: "ex-1".into(),
            name: "Back Squat".into(),
            category: "legs".into(),
            exercise_type: "strength".into(),
            sets_count,
            default_reps: Some(10),
            default_weight: Some(Weight {
                value: 60.0,
                unit: WeightUnit::Kg,
            }),
            default_duration_seconds: None,
        }
    }

    fn completed_record(set_number: u32, reps: u32, weight_kg: f64) -> SessionRecord {
        SessionRecord {
            schedule_id: "sched-1".into(),
            set_number: Some(set_number),
            reps: Some(reps),
            weight: Some(Weight {
                value: weight_kg,
                unit: WeightUnit::Kg,
            }),
            elapsed_seconds: Some(45),
            status: RecordStatus::Completed,
            created_at: Some(Utc::now()),
        }
    }

    #[test]
    fn test_no_records_yields_all_pending_defaults() {
        let view = merge_exercise(&prescription(Some(4)), &[]);

        assert_eq!(view.sets.len(), 4);
        for (i, set) in view.sets.iter().enumerate() {
            assert_eq!(set.set_number, i as u32 + 1);
            assert_eq!(set.status, SetStatus::Pending);
            assert_eq!(set.provenance, Provenance::FromPrescription);
            assert_eq!(set.reps, Some(10));
            assert_eq!(set.weight_kg, Some(60.0));
            assert!(!set.is_modified);
        }
    }

    #[test]
    fn test_completed_record_marks_set_done() {
        let records = vec![completed_record(1, 8, 62.5)];
        let view = merge_exercise(&prescription(Some(3)), &records);

        assert_eq!(view.sets[0].status, SetStatus::Done);
        assert_eq!(view.sets[0].provenance, Provenance::FromSession);
        assert_eq!(view.sets[0].reps, Some(8));
        assert_eq!(view.sets[0].weight_kg, Some(62.5));
        assert!(view.sets[0].completed_at.is_some());

        assert_eq!(view.sets[1].status, SetStatus::Pending);
        assert_eq!(view.sets[2].status, SetStatus::Pending);
    }

    #[test]
    fn test_non_completed_and_unnumbered_records_ignored() {
        let mut skipped = completed_record(1, 8, 62.5);
        skipped.status = RecordStatus::Other;
        let mut unnumbered = completed_record(2, 9, 70.0);
        unnumbered.set_number = None;

        let view = merge_exercise(&prescription(Some(3)), &[skipped, unnumbered]);

        for set in &view.sets {
            assert_eq!(set.status, SetStatus::Pending);
            assert_eq!(set.provenance, Provenance::FromPrescription);
        }
    }

    #[test]
    fn test_duplicate_set_numbers_last_in_array_wins() {
        let mut older = completed_record(1, 8, 60.0);
        // The older-by-timestamp record sits later in the array and still wins
        older.created_at = Some(Utc::now() - chrono::Duration::days(2));
        let newer = completed_record(1, 12, 80.0);

        let view = merge_exercise(&prescription(Some(1)), &[newer, older]);

        assert_eq!(view.sets[0].reps, Some(8));
        assert_eq!(view.sets[0].weight_kg, Some(60.0));
    }

    #[test]
    fn test_missing_sets_count_defaults_to_three() {
        assert_eq!(merge_exercise(&prescription(None), &[]).sets.len(), 3);
        assert_eq!(merge_exercise(&prescription(Some(0)), &[]).sets.len(), 3);
    }

    #[test]
    fn test_null_reps_and_weight_surface_as_none() {
        let mut record = completed_record(1, 8, 60.0);
        record.reps = None;
        record.weight = None;

        let view = merge_exercise(&prescription(Some(1)), &[record]);

        assert_eq!(view.sets[0].status, SetStatus::Done);
        assert_eq!(view.sets[0].reps, None);
        assert_eq!(view.sets[0].weight_kg, None);
    }

    #[test]
    fn test_pound_weights_normalized_to_kg() {
        let mut record = completed_record(1, 8, 0.0);
        record.weight = Some(Weight {
            value: 135.0,
            unit: WeightUnit::Lb,
        });

        let view = merge_exercise(&prescription(Some(1)), &[record]);

        assert_eq!(view.sets[0].weight_kg, Some(61.23));
        assert_eq!(view.sets[0].weight_display_unit, WeightUnit::Lb);
    }

    #[test]
    fn test_merge_is_idempotent() {
        let records = vec![completed_record(2, 8, 62.5), completed_record(1, 9, 65.0)];
        let p = prescription(Some(3));

        let first = merge_exercise(&p, &records);
        let second = merge_exercise(&p, &records);

        assert_eq!(first.sets, second.sets);
    }
}
