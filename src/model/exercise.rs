//! Exercise model for FitLog.
//!
//! Exercises are seeded from a fixed catalog on first run and may be
//! extended with custom rows. The category is stored as a plain string so
//! values written by other app versions survive a round trip.

use serde::{Deserialize, Serialize};

/// Known exercise categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExerciseCategory {
    Barbell,
    Dumbbell,
    Bodyweight,
    Machine,
    Cardio,
    Core,
    Mobility,
}

impl ExerciseCategory {
    /// All categories in display order.
    pub const ALL: [Self; 7] = [
        Self::Barbell,
        Self::Dumbbell,
        Self::Bodyweight,
        Self::Machine,
        Self::Cardio,
        Self::Core,
        Self::Mobility,
    ];

    /// Get the string representation for storage.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Barbell => "Barbell",
            Self::Dumbbell => "Dumbbell",
            Self::Bodyweight => "Bodyweight",
            Self::Machine => "Machine",
            Self::Cardio => "Cardio",
            Self::Core => "Core",
            Self::Mobility => "Mobility",
        }
    }

    /// Parse a stored category, case-insensitively.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
    }
}

impl std::fmt::Display for ExerciseCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered coaching cues for an exercise.
///
/// Stored as a JSON array of strings in `exercises.cues`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CueList(pub Vec<String>);

impl CueList {
    #[must_use]
    pub fn new<I, S>(cues: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(cues.into_iter().map(Into::into).collect())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// An exercise definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: i64,
    pub name: String,
    /// Enum-like category string (see [`ExerciseCategory`]).
    pub category: String,
    /// Comma-separated muscle groups.
    pub muscles: String,
    pub equipment: String,
    pub default_sets: i64,
    /// Reps, or seconds/minutes for timed exercises.
    pub default_reps: i64,
    pub is_timed: bool,
    pub demo_video_url: Option<String>,
    pub cues: CueList,
    pub is_favorite: bool,
    pub is_custom: bool,
    pub note: Option<String>,
}

/// Fields supplied by the caller when adding an exercise.
///
/// There is no `is_custom` field: the record layer sets it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewExercise {
    pub name: String,
    pub category: String,
    pub muscles: String,
    pub equipment: String,
    pub default_sets: i64,
    pub default_reps: i64,
    pub is_timed: bool,
    pub demo_video_url: Option<String>,
    pub cues: CueList,
    pub note: Option<String>,
}

impl NewExercise {
    /// A custom exercise with the app's default 3x10 prescription.
    #[must_use]
    pub fn custom(name: &str, category: ExerciseCategory) -> Self {
        Self {
            name: name.trim().to_string(),
            category: category.as_str().to_string(),
            muscles: String::new(),
            equipment: String::new(),
            default_sets: 3,
            default_reps: 10,
            is_timed: false,
            demo_video_url: None,
            cues: CueList::default(),
            note: None,
        }
    }

    #[must_use]
    pub fn with_muscles(mut self, muscles: &str) -> Self {
        self.muscles = muscles.trim().to_string();
        self
    }

    #[must_use]
    pub fn with_equipment(mut self, equipment: &str) -> Self {
        self.equipment = equipment.trim().to_string();
        self
    }

    #[must_use]
    pub fn timed(mut self, is_timed: bool) -> Self {
        self.is_timed = is_timed;
        self
    }
}
