//! Workout view construction and the dirty-edit tracker.
//!
//! The initializer accepts three alternate inbound shapes (a single-day
//! detail as returned by a fetch-by-id, a grouped-by-day plan, or flat
//! prescription/record lists) and normalizes them all through the merge
//! engine. When no shape yields a usable exercise the screen still gets a
//! fixed stub workout instead of an error.
//!
//! Dirtiness is derived, never stored: a workout is dirty while any set is
//! save-eligible, and that single flag gates both the save action and the
//! leave-without-saving guard.

use crate::merge::merge_exercise;
use crate::types::{Prescription, SessionRecord, WorkoutView};
use serde::Deserialize;
use std::collections::HashMap;

/// One day's prescriptions and history inside a grouped plan
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayPlan {
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub prescriptions: Vec<Prescription>,
    #[serde(default)]
    pub records: Vec<SessionRecord>,
}

/// A single-day payload as returned by a fetch-by-id
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutDetail {
    pub day: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub prescriptions: Vec<Prescription>,
    #[serde(default)]
    pub records: Vec<SessionRecord>,
}

/// The three inbound shapes the initializer accepts
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum WorkoutSource {
    /// Fetch-by-id result carrying its own day and category
    Detail(WorkoutDetail),
    /// Full plan keyed by day name
    GroupedByDay(HashMap<String, DayPlan>),
    /// Ungrouped prescription and record lists
    Flat {
        #[serde(default)]
        prescriptions: Vec<Prescription>,
        #[serde(default)]
        records: Vec<SessionRecord>,
    },
}

/// Fixed fallback shown when no data source yields a usable exercise
pub fn stub_workout(day: &str) -> WorkoutView {
    let prescription = Prescription {
        schedule_id: "stub".into(),
        exercise_id: "stub-bodyweight-squat".into(),
        name: "Bodyweight Squat".into(),
        category: "general".into(),
        exercise_type: "strength".into(),
        sets_count: Some(3),
        default_reps: Some(10),
        default_weight: None,
        default_duration_seconds: None,
    };

    WorkoutView {
        day: day.to_string(),
        category: "general".into(),
        exercises: vec![merge_exercise(&prescription, &[])],
        saving: false,
    }
}

fn build_exercises(
    prescriptions: &[Prescription],
    records: &[SessionRecord],
) -> Vec<crate::types::ExerciseView> {
    prescriptions
        .iter()
        .map(|prescription| {
            let own: Vec<SessionRecord> = records
                .iter()
                .filter(|r| r.schedule_id == prescription.schedule_id)
                .cloned()
                .collect();
            merge_exercise(prescription, &own)
        })
        .collect()
}

impl WorkoutView {
    /// Build the view for `day` from whichever shape the caller obtained.
    ///
    /// Falls back to [`stub_workout`] when the source contains no exercise
    /// for the requested day.
    pub fn from_source(source: &WorkoutSource, day: &str) -> WorkoutView {
        let built = match source {
            WorkoutSource::Detail(detail) => {
                let exercises = build_exercises(&detail.prescriptions, &detail.records);
                WorkoutView {
                    day: detail.day.clone(),
                    category: detail.category.clone(),
                    exercises,
                    saving: false,
                }
            }
            WorkoutSource::GroupedByDay(days) => match days.get(day) {
                Some(plan) => WorkoutView {
                    day: day.to_string(),
                    category: plan.category.clone(),
                    exercises: build_exercises(&plan.prescriptions, &plan.records),
                    saving: false,
                },
                None => {
                    tracing::warn!(day, "Grouped plan has no entry for requested day");
                    stub_workout(day)
                }
            },
            WorkoutSource::Flat {
                prescriptions,
                records,
            } => {
                let category = prescriptions
                    .first()
                    .map(|p| p.category.clone())
                    .unwrap_or_default();
                WorkoutView {
                    day: day.to_string(),
                    category,
                    exercises: build_exercises(prescriptions, records),
                    saving: false,
                }
            }
        };

        if built.exercises.is_empty() {
            tracing::warn!(day, "No usable exercises in data source, using stub workout");
            stub_workout(day)
        } else {
            built
        }
    }

    /// Whether any set in the workout is save-eligible.
    ///
    /// Gates the save action and the leave-without-saving confirmation:
    /// the guard fires exactly when this returns true.
    pub fn dirty(&self) -> bool {
        self.exercises.iter().any(|e| e.has_save_eligible_sets())
    }
}
