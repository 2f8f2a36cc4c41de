//! Completion tracking for saved plans.
//!
//! Completion is recorded per (day index, exercise index) pair. Entries that
//! no longer address an exercise in the plan are kept but never counted.

use crate::{Error, Result, SavedPlan, UserProfile, WorkoutPlan};
use chrono::Utc;
use serde::Serialize;

/// Completed vs total exercise count
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
}

impl Progress {
    /// Percentage complete in `0.0..=100.0`; an empty plan is 0% complete
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.completed as f64 / self.total as f64) * 100.0
    }

    /// Percentage rounded to the nearest whole number, for display
    pub fn rounded_percentage(&self) -> u32 {
        self.percentage().round() as u32
    }

    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.completed == self.total
    }
}

impl SavedPlan {
    /// Wrap a freshly parsed plan with empty tracking state
    pub fn new(plan: WorkoutPlan, profile: Option<UserProfile>) -> Self {
        let now = Utc::now();
        Self {
            plan,
            profile,
            completed_exercises: Default::default(),
            saved_at: now,
            updated_at: now,
        }
    }

    /// Mark an exercise as done or not done
    ///
    /// Indices are 0-based and must address an exercise in the plan.
    pub fn set_completed(
        &mut self,
        day_index: usize,
        exercise_index: usize,
        completed: bool,
    ) -> Result<()> {
        let day = self.plan.days.get(day_index).ok_or_else(|| {
            Error::Tracking(format!(
                "day {} does not exist (plan has {} days)",
                day_index + 1,
                self.plan.days.len()
            ))
        })?;

        if exercise_index >= day.exercises.len() {
            return Err(Error::Tracking(format!(
                "exercise {} does not exist ({} has {} exercises)",
                exercise_index + 1,
                day.day,
                day.exercises.len()
            )));
        }

        self.completed_exercises
            .entry(day_index)
            .or_default()
            .insert(exercise_index, completed);
        self.updated_at = Utc::now();

        tracing::debug!(
            "Set {} / {:?} completed = {}",
            day.day,
            day.exercises[exercise_index].name,
            completed
        );
        Ok(())
    }

    /// Whether an exercise is marked done; unknown entries are not done
    pub fn is_completed(&self, day_index: usize, exercise_index: usize) -> bool {
        self.completed_exercises
            .get(&day_index)
            .and_then(|day| day.get(&exercise_index))
            .copied()
            .unwrap_or(false)
    }

    /// Progress over the whole plan
    pub fn progress(&self) -> Progress {
        (0..self.plan.days.len())
            .filter_map(|idx| self.day_progress(idx))
            .fold(Progress::default(), |acc, p| Progress {
                completed: acc.completed + p.completed,
                total: acc.total + p.total,
            })
    }

    /// Progress within a single day, `None` if the day does not exist
    pub fn day_progress(&self, day_index: usize) -> Option<Progress> {
        let day = self.plan.days.get(day_index)?;
        let completed = (0..day.exercises.len())
            .filter(|&ex| self.is_completed(day_index, ex))
            .count();
        Some(Progress {
            completed,
            total: day.exercises.len(),
        })
    }

    /// Clear all completion state
    pub fn reset_progress(&mut self) {
        self.completed_exercises.clear();
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn two_day_plan() -> SavedPlan {
        let plan = parse(
            "# Test\n## Day 1: A\n### Squat\n### Row\n## Day 2: B\n### Run\n### Plank\n",
        );
        SavedPlan::new(plan, None)
    }

    #[test]
    fn test_new_saved_plan_has_no_progress() {
        let saved = two_day_plan();
        assert!(saved.completed_exercises.is_empty());
        assert_eq!(saved.progress(), Progress { completed: 0, total: 4 });
        assert_eq!(saved.progress().percentage(), 0.0);
    }

    #[test]
    fn test_empty_plan_is_zero_percent() {
        let saved = SavedPlan::new(parse(""), None);
        let progress = saved.progress();
        assert_eq!(progress.total, 0);
        assert_eq!(progress.percentage(), 0.0);
        assert!(!progress.is_complete());
    }

    #[test]
    fn test_set_completed_updates_progress() {
        let mut saved = two_day_plan();
        saved.set_completed(0, 1, true).unwrap();
        saved.set_completed(1, 0, true).unwrap();

        assert!(saved.is_completed(0, 1));
        assert!(!saved.is_completed(0, 0));
        assert_eq!(saved.progress().percentage(), 50.0);
        assert_eq!(saved.day_progress(0), Some(Progress { completed: 1, total: 2 }));
        assert_eq!(saved.day_progress(5), None);

        // Unchecking keeps the entry but stops counting it
        saved.set_completed(1, 0, false).unwrap();
        assert!(!saved.completed_exercises[&1][&0]);
        assert_eq!(saved.progress().completed, 1);
    }

    #[test]
    fn test_set_completed_out_of_range() {
        let mut saved = two_day_plan();
        let err = saved.set_completed(2, 0, true).unwrap_err();
        assert!(matches!(err, Error::Tracking(_)));

        let err = saved.set_completed(0, 2, true).unwrap_err();
        assert!(err.to_string().contains("exercise 3 does not exist"));
        assert!(saved.completed_exercises.is_empty());
    }

    #[test]
    fn test_stale_entries_not_counted() {
        let mut saved = two_day_plan();
        saved.completed_exercises.entry(0).or_default().insert(7, true);
        saved.completed_exercises.entry(9).or_default().insert(0, true);
        saved.set_completed(0, 0, true).unwrap();

        assert_eq!(saved.progress(), Progress { completed: 1, total: 4 });
    }

    #[test]
    fn test_rounding_and_completion() {
        let p = Progress { completed: 1, total: 3 };
        assert_eq!(p.rounded_percentage(), 33);
        let p = Progress { completed: 2, total: 3 };
        assert_eq!(p.rounded_percentage(), 67);
        assert!(Progress { completed: 3, total: 3 }.is_complete());
    }

    #[test]
    fn test_reset_progress() {
        let mut saved = two_day_plan();
        saved.set_completed(0, 0, true).unwrap();
        saved.reset_progress();
        assert_eq!(saved.progress().completed, 0);
    }

    #[test]
    fn test_completion_map_json_shape() {
        let mut saved = two_day_plan();
        saved.set_completed(1, 1, true).unwrap();

        let json = serde_json::to_value(&saved).unwrap();
        assert_eq!(json["completed_exercises"]["1"]["1"], true);

        let text = serde_json::to_string(&saved).unwrap();
        let back: SavedPlan = serde_json::from_str(&text).unwrap();
        assert_eq!(back, saved);
    }
}
