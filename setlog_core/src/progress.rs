//! Workout-level progress aggregation.
//!
//! A pure rollup over the current view state, recomputed on demand rather
//! than incrementally maintained, so it can never drift from the sets.

use crate::types::{SetStatus, WorkoutView};

/// Aggregate counts and percentage for a workout
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorkoutProgress {
    pub total_sets: usize,
    pub completed_sets: usize,
    pub percentage: u32,
}

/// Roll per-set status up into workout-level counts and a percentage.
///
/// Percentage is `round(100 * completed / total)`, or 0 when either count
/// is 0.
pub fn aggregate_progress(workout: &WorkoutView) -> WorkoutProgress {
    let total_sets: usize = workout.exercises.iter().map(|e| e.sets.len()).sum();
    let completed_sets: usize = workout
        .exercises
        .iter()
        .flat_map(|e| e.sets.iter())
        .filter(|s| s.status == SetStatus::Done)
        .count();

    let percentage = if completed_sets > 0 && total_sets > 0 {
        (100.0 * completed_sets as f64 / total_sets as f64).round() as u32
    } else {
        0
    };

    WorkoutProgress {
        total_sets,
        completed_sets,
        percentage,
    }
}
