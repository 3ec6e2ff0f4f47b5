//! Default exercise catalog seeded into an empty store.

use rusqlite::Connection;

use crate::model::ExerciseCategory::{Barbell, Bodyweight, Cardio, Core, Dumbbell, Machine};
use crate::model::{CueList, ExerciseCategory, NewExercise};

use super::sqlite::insert_exercise_row;

/// One built-in exercise.
#[derive(Debug, Clone, Copy)]
pub struct CatalogEntry {
    pub name: &'static str,
    pub category: ExerciseCategory,
    pub muscles: &'static str,
    pub equipment: &'static str,
    pub sets: i64,
    pub reps: i64,
    pub timed: bool,
    pub cues: [&'static str; 5],
}

impl CatalogEntry {
    #[must_use]
    pub fn to_new_exercise(&self) -> NewExercise {
        NewExercise {
            name: self.name.to_string(),
            category: self.category.as_str().to_string(),
            muscles: self.muscles.to_string(),
            equipment: self.equipment.to_string(),
            default_sets: self.sets,
            default_reps: self.reps,
            is_timed: self.timed,
            demo_video_url: None,
            cues: CueList::new(self.cues),
            note: None,
        }
    }
}

const fn entry(
    name: &'static str,
    category: ExerciseCategory,
    muscles: &'static str,
    equipment: &'static str,
    (sets, reps, timed): (i64, i64, bool),
    cues: [&'static str; 5],
) -> CatalogEntry {
    CatalogEntry {
        name,
        category,
        muscles,
        equipment,
        sets,
        reps,
        timed,
        cues,
    }
}

pub const DEFAULT_CATALOG: &[CatalogEntry] = &[
    entry(
        "Barbell Back Squat",
        Barbell,
        "Quadriceps, Glutes, Hamstrings",
        "Barbell, Rack",
        (4, 8, false),
        [
            "Place bar on upper traps",
            "Feet shoulder-width apart",
            "Push knees out as you descend",
            "Keep chest up and core braced",
            "Drive through heels to stand",
        ],
    ),
    entry(
        "Barbell Deadlift",
        Barbell,
        "Hamstrings, Glutes, Lower Back, Traps",
        "Barbell",
        (3, 6, false),
        [
            "Bar over mid-foot",
            "Grip just outside legs",
            "Engage lats, chest up",
            "Push floor away with legs",
            "Lock out hips at top",
        ],
    ),
    entry(
        "Barbell Bench Press",
        Barbell,
        "Chest, Triceps, Shoulders",
        "Barbell, Bench",
        (4, 8, false),
        [
            "Retract shoulder blades",
            "Grip slightly wider than shoulders",
            "Lower bar to mid-chest",
            "Press up and slightly back",
            "Keep elbows at 45 degrees",
        ],
    ),
    entry(
        "Barbell Overhead Press",
        Barbell,
        "Shoulders, Triceps, Upper Chest",
        "Barbell",
        (4, 8, false),
        [
            "Bar at collarbone level",
            "Grip just outside shoulders",
            "Brace core tightly",
            "Press straight up",
            "Shrug at top for lockout",
        ],
    ),
    entry(
        "Barbell Row",
        Barbell,
        "Upper Back, Lats, Biceps",
        "Barbell",
        (4, 10, false),
        [
            "Hinge at hips, torso parallel to floor",
            "Pull bar to lower chest/upper abdomen",
            "Squeeze shoulder blades together",
            "Keep elbows close to body",
            "Control descent",
        ],
    ),
    entry(
        "Dumbbell Goblet Squat",
        Dumbbell,
        "Quadriceps, Glutes",
        "Dumbbell",
        (3, 12, false),
        [
            "Hold dumbbell at chest",
            "Elbows between knees",
            "Squat deep",
            "Keep torso upright",
            "Drive through heels",
        ],
    ),
    entry(
        "Dumbbell Lunges",
        Dumbbell,
        "Quadriceps, Glutes, Hamstrings",
        "Dumbbells",
        (3, 10, false),
        [
            "Hold dumbbells at sides",
            "Step forward into lunge",
            "Back knee nearly touches ground",
            "Keep torso upright",
            "Push through front heel",
        ],
    ),
    entry(
        "Dumbbell Shoulder Press",
        Dumbbell,
        "Shoulders, Triceps",
        "Dumbbells",
        (3, 10, false),
        [
            "Start at shoulder height",
            "Press up and slightly in",
            "Avoid arching back",
            "Control the descent",
            "Keep core tight",
        ],
    ),
    entry(
        "Dumbbell Romanian Deadlift",
        Dumbbell,
        "Hamstrings, Glutes, Lower Back",
        "Dumbbells",
        (3, 12, false),
        [
            "Hold dumbbells in front of thighs",
            "Hinge at hips, slight knee bend",
            "Keep back flat",
            "Lower until hamstring stretch",
            "Drive hips forward to return",
        ],
    ),
    entry(
        "Push-ups",
        Bodyweight,
        "Chest, Triceps, Shoulders",
        "None",
        (3, 15, false),
        [
            "Hands shoulder-width apart",
            "Body in straight line",
            "Lower chest to floor",
            "Push back up",
            "Keep core engaged",
        ],
    ),
    entry(
        "Pull-ups",
        Bodyweight,
        "Lats, Biceps, Upper Back",
        "Pull-up Bar",
        (3, 8, false),
        [
            "Hang from bar, hands shoulder-width",
            "Pull chest to bar",
            "Squeeze shoulder blades",
            "Control descent",
            "Full arm extension at bottom",
        ],
    ),
    entry(
        "Bodyweight Squats",
        Bodyweight,
        "Quadriceps, Glutes",
        "None",
        (3, 20, false),
        [
            "Feet shoulder-width apart",
            "Arms forward for balance",
            "Squat until thighs parallel",
            "Keep chest up",
            "Drive through heels",
        ],
    ),
    entry(
        "Plank",
        Core,
        "Core, Abs, Lower Back",
        "None",
        (3, 60, true),
        [
            "Forearms on ground",
            "Body in straight line",
            "Engage core and glutes",
            "Hold position",
            "Breathe steadily",
        ],
    ),
    entry(
        "Hanging Leg Raises",
        Core,
        "Lower Abs, Hip Flexors",
        "Pull-up Bar",
        (3, 12, false),
        [
            "Hang from bar",
            "Raise legs to 90 degrees",
            "Control the movement",
            "Avoid swinging",
            "Lower with control",
        ],
    ),
    entry(
        "Lat Pulldown",
        Machine,
        "Lats, Biceps, Upper Back",
        "Cable Machine",
        (3, 12, false),
        [
            "Grip bar wider than shoulders",
            "Pull bar to upper chest",
            "Squeeze lats at bottom",
            "Keep torso upright",
            "Control the return",
        ],
    ),
    entry(
        "Leg Press",
        Machine,
        "Quadriceps, Glutes, Hamstrings",
        "Leg Press Machine",
        (3, 12, false),
        [
            "Feet shoulder-width on platform",
            "Lower until 90-degree knee bend",
            "Push through heels",
            "Avoid locking knees",
            "Control the descent",
        ],
    ),
    entry(
        "Running",
        Cardio,
        "Full Body Cardio",
        "Treadmill or Outdoors",
        (1, 30, true),
        [
            "Maintain steady pace",
            "Land mid-foot",
            "Keep shoulders relaxed",
            "Swing arms naturally",
            "Breathe rhythmically",
        ],
    ),
];

/// Insert the catalog if `exercises` has no rows. Returns rows inserted.
///
/// Runs in one transaction so a failure leaves the table empty and the
/// next startup tries again.
///
/// # Errors
///
/// Returns an error if the count or any insert fails.
pub fn seed_if_empty(conn: &mut Connection) -> rusqlite::Result<usize> {
    let tx = conn.transaction()?;

    let existing: i64 = tx.query_row("SELECT COUNT(*) FROM exercises", [], |row| row.get(0))?;
    if existing > 0 {
        return Ok(0);
    }

    for item in DEFAULT_CATALOG {
        insert_exercise_row(&tx, &item.to_new_exercise(), false)?;
    }

    tx.commit()?;
    Ok(DEFAULT_CATALOG.len())
}
