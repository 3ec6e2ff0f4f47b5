//! Workout templates and session logs.
//!
//! Both tables carry list-shaped data (`workouts.exercises`,
//! `workout_sessions.exercises_done`) as JSON text. The value types here
//! define that encoding; the storage layer is the only place that turns
//! them into text.

use serde::{Deserialize, Deserializer, Serialize};

/// `workout_id` recorded for sessions logged without a template.
pub const QUICK_LOG_WORKOUT_ID: i64 = 0;

/// A number as found in stored blobs: older rows carry ids and counts that
/// were taken straight from text input, e.g. `"exercise_id":"4"`.
#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Int(i64),
    Float(f64),
    Text(String),
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
impl NumberOrText {
    fn into_f64<E: serde::de::Error>(self) -> Result<f64, E> {
        match self {
            Self::Int(i) => Ok(i as f64),
            Self::Float(f) => Ok(f),
            Self::Text(s) => {
                let s = s.trim();
                if s.is_empty() {
                    return Ok(0.0);
                }
                s.parse::<f64>()
                    .map_err(|_| E::custom(format!("expected a number, got '{s}'")))
            }
        }
    }

    fn into_i64<E: serde::de::Error>(self) -> Result<i64, E> {
        if let Self::Int(i) = self {
            return Ok(i);
        }
        if let Self::Text(s) = &self {
            if let Ok(i) = s.trim().parse::<i64>() {
                return Ok(i);
            }
        }
        let f = self.into_f64::<E>()?;
        if !f.is_finite() {
            return Err(E::custom(format!("expected an integer, got {f}")));
        }
        Ok(f.trunc() as i64)
    }
}

/// Integer field that also accepts numeric text, floats and `null` (as 0).
fn lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<NumberOrText>::deserialize(deserializer)?.map_or(Ok(0), NumberOrText::into_i64)
}

fn lenient_opt_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<NumberOrText>::deserialize(deserializer)?
        .map(NumberOrText::into_i64)
        .transpose()
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<NumberOrText>::deserialize(deserializer)?.map_or(Ok(0.0), NumberOrText::into_f64)
}

/// One exercise slot inside a workout template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutExercise {
    #[serde(deserialize_with = "lenient_i64")]
    pub exercise_id: i64,
    pub name: String,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub sets: i64,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub reps: i64,
    /// Position within the template, starting at 0.
    #[serde(default, deserialize_with = "lenient_i64")]
    pub order: i64,
}

/// A reusable workout plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workout {
    pub id: i64,
    /// `None` only for rows written before titles existed.
    pub title: Option<String>,
    pub exercises: Vec<WorkoutExercise>,
    pub is_template: bool,
    pub created_at: Option<String>,
}

/// Fields for creating a workout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewWorkout {
    pub title: String,
    pub exercises: Vec<WorkoutExercise>,
    pub is_template: bool,
}

impl NewWorkout {
    /// Build a template, numbering the exercises in the given order.
    #[must_use]
    pub fn template(title: &str, exercises: impl IntoIterator<Item = WorkoutExercise>) -> Self {
        let exercises = exercises
            .into_iter()
            .enumerate()
            .map(|(i, mut ex)| {
                ex.order = i64::try_from(i).unwrap_or(i64::MAX);
                ex
            })
            .collect();
        Self {
            title: title.trim().to_string(),
            exercises,
            is_template: true,
        }
    }
}

/// One logged set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SetLog {
    #[serde(default, deserialize_with = "lenient_i64")]
    pub reps: i64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub weight: f64,
    #[serde(default)]
    pub completed: bool,
}

/// An exercise as performed in a session.
///
/// Template sessions fill `order` and `sets_performed`; quick logs fill
/// `weight`, `duration` and `is_timed`. Absent fields decode to defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformedExercise {
    #[serde(deserialize_with = "lenient_i64")]
    pub exercise_id: i64,
    pub name: String,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub sets: i64,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub reps: i64,
    #[serde(
        default,
        deserialize_with = "lenient_opt_i64",
        skip_serializing_if = "Option::is_none"
    )]
    pub order: Option<i64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub weight: f64,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub duration: i64,
    #[serde(default)]
    pub is_timed: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sets_performed: Vec<SetLog>,
}

impl PerformedExercise {
    /// Record a template slot together with the sets actually done.
    #[must_use]
    pub fn from_template(slot: &WorkoutExercise, sets_performed: Vec<SetLog>) -> Self {
        Self {
            exercise_id: slot.exercise_id,
            name: slot.name.clone(),
            sets: slot.sets,
            reps: slot.reps,
            order: Some(slot.order),
            sets_performed,
            ..Self::default()
        }
    }

    /// Number of sets marked completed.
    #[must_use]
    pub fn completed_sets(&self) -> usize {
        self.sets_performed.iter().filter(|s| s.completed).count()
    }
}

/// A completed or quick-logged workout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSession {
    pub id: i64,
    /// Template id, or [`QUICK_LOG_WORKOUT_ID`]. Not checked against `workouts`.
    pub workout_id: i64,
    pub date: String,
    pub duration_seconds: i64,
    pub exercises_done: Vec<PerformedExercise>,
    pub calories_burned: i64,
}

impl WorkoutSession {
    #[must_use]
    pub fn is_quick_log(&self) -> bool {
        self.workout_id == QUICK_LOG_WORKOUT_ID
    }
}

/// Fields for logging a session. `date` defaults to the call time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewWorkoutSession {
    pub workout_id: i64,
    pub date: Option<chrono::DateTime<chrono::Utc>>,
    pub duration_seconds: i64,
    pub exercises_done: Vec<PerformedExercise>,
    pub calories_burned: i64,
}
