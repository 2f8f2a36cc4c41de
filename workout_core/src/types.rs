//! Core domain types for the workout planner.
//!
//! This module defines the fundamental types used throughout the system:
//! - The parsed plan (plan, days, exercises)
//! - The user profile that a plan is generated for
//! - The saved plan with its completion tracking state

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ============================================================================
// Plan Types
// ============================================================================

/// A single named activity with optional prescriptive attributes
///
/// Absent attributes mean the plan did not report them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sets: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reps: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rest: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tips: Option<String>,
}

impl Exercise {
    /// Create an exercise with no details reported yet
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// One labeled session within a plan (e.g. "Day 1: Full Body")
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutDay {
    /// Short label, e.g. "Day 2"
    pub day: String,
    /// Free-text description, may be empty
    pub title: String,
    #[serde(default)]
    pub exercises: Vec<Exercise>,
}

/// Structured representation of a multi-day exercise program
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutPlan {
    pub title: String,
    #[serde(default)]
    pub days: Vec<WorkoutDay>,
}

impl WorkoutPlan {
    /// Total number of exercises across all days
    pub fn exercise_count(&self) -> usize {
        self.days.iter().map(|d| d.exercises.len()).sum()
    }
}

impl Default for WorkoutPlan {
    fn default() -> Self {
        Self {
            title: crate::parser::DEFAULT_PLAN_TITLE.to_string(),
            days: Vec::new(),
        }
    }
}

// ============================================================================
// Profile Types
// ============================================================================

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Male,
    Female,
    Other,
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Sex::Male => "male",
            Sex::Female => "female",
            Sex::Other => "other",
        };
        f.write_str(s)
    }
}

/// Self-reported training experience
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FitnessLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl fmt::Display for FitnessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FitnessLevel::Beginner => "beginner",
            FitnessLevel::Intermediate => "intermediate",
            FitnessLevel::Advanced => "advanced",
        };
        f.write_str(s)
    }
}

/// Health and fitness profile a plan is generated for
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserProfile {
    pub age: u32,
    pub sex: Sex,
    pub height_cm: u32,
    pub weight_kg: u32,
    /// Known conditions or surgeries, if any were reported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medical_history: Option<String>,
    pub fitness_level: FitnessLevel,
    pub workout_history: String,
}

// ============================================================================
// Saved Plan Types
// ============================================================================

/// Completion flags keyed by day index, then exercise index (both 0-based)
pub type CompletionMap = BTreeMap<usize, BTreeMap<usize, bool>>;

/// A parsed plan wrapped with the profile it was made for and tracking state
///
/// The parser never produces or touches `completed_exercises`; only the
/// tracker methods in [`crate::tracker`] mutate it.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SavedPlan {
    pub plan: WorkoutPlan,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<UserProfile>,
    #[serde(default)]
    pub completed_exercises: CompletionMap,
    pub saved_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
