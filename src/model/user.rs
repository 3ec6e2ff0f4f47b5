//! User profile model.
//!
//! The app keeps one local profile. Every column is nullable because
//! onboarding never collected some of them (for example `dob`).

use serde::{Deserialize, Serialize};

/// The local user profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub dob: Option<String>,
    pub gender: Option<String>,
    /// Height in centimetres.
    pub height: Option<f64>,
    /// Weight at onboarding, in kilograms.
    pub starting_weight: Option<f64>,
    pub activity_level: Option<String>,
    pub goal: Option<String>,
    pub created_at: Option<String>,
}

/// Profile fields collected at onboarding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub dob: Option<String>,
    pub gender: Option<String>,
    pub height: Option<f64>,
    pub starting_weight: Option<f64>,
    pub activity_level: Option<String>,
    pub goal: Option<String>,
}
