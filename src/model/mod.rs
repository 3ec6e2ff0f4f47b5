//! Data models for FitLog.
//!
//! This module contains all domain models:
//! - User
//! - Exercise
//! - Workout / WorkoutSession
//! - FoodEntry / WeightSample

pub mod exercise;
pub mod nutrition;
pub mod user;
pub mod workout;

pub use exercise::{CueList, Exercise, ExerciseCategory, NewExercise};
pub use nutrition::{
    DEFAULT_WEIGHT_HISTORY, FoodEntry, NewFoodEntry, NutritionTotals, WeightSample,
};
pub use user::{User, UserProfile};
pub use workout::{
    NewWorkout, NewWorkoutSession, PerformedExercise, QUICK_LOG_WORKOUT_ID, SetLog, Workout,
    WorkoutExercise, WorkoutSession,
};
