//! Food and body-weight log entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of weight samples returned when no limit is given.
pub const DEFAULT_WEIGHT_HISTORY: u32 = 30;

/// A logged food item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodEntry {
    pub id: i64,
    pub name: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub timestamp: String,
}

/// Fields for logging food. `timestamp` defaults to the call time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewFoodEntry {
    pub name: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub timestamp: Option<DateTime<Utc>>,
}

impl NewFoodEntry {
    #[must_use]
    pub fn new(name: &str, calories: f64, protein: f64, carbs: f64, fat: f64) -> Self {
        Self {
            name: name.to_string(),
            calories,
            protein,
            carbs,
            fat,
            timestamp: None,
        }
    }

    #[must_use]
    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

/// Summed macros for one day. Zero when nothing was logged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NutritionTotals {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

/// A body-weight measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightSample {
    pub id: i64,
    pub weight: f64,
    pub timestamp: String,
    pub note: Option<String>,
}
