//! User profile loading and validation.
//!
//! Profiles are small TOML documents:
//!
//! ```toml
//! age = 34
//! sex = "female"
//! height_cm = 168
//! weight_kg = 61
//! fitness_level = "intermediate"
//! workout_history = "Running twice a week, occasional yoga"
//! medical_history = "Mild asthma"
//! ```

use crate::{Error, Result, UserProfile};
use std::ops::RangeInclusive;
use std::path::Path;

const AGE_RANGE: RangeInclusive<u32> = 18..=100;
const HEIGHT_CM_RANGE: RangeInclusive<u32> = 100..=250;
const WEIGHT_KG_RANGE: RangeInclusive<u32> = 30..=300;
const WORKOUT_HISTORY_CHARS: RangeInclusive<usize> = 10..=500;

impl UserProfile {
    /// Load and validate a profile from a TOML file
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let profile: UserProfile = toml::from_str(&contents)?;
        profile.validate()?;
        tracing::info!("Loaded profile from {:?}", path);
        Ok(profile)
    }

    /// Check the profile against the accepted ranges
    pub fn validate(&self) -> Result<()> {
        check_range("age", self.age, &AGE_RANGE, "years")?;
        check_range("height", self.height_cm, &HEIGHT_CM_RANGE, "cm")?;
        check_range("weight", self.weight_kg, &WEIGHT_KG_RANGE, "kg")?;

        let history_len = self.workout_history.trim().chars().count();
        if !WORKOUT_HISTORY_CHARS.contains(&history_len) {
            return Err(Error::Profile(format!(
                "workout history must be {}-{} characters, got {}",
                WORKOUT_HISTORY_CHARS.start(),
                WORKOUT_HISTORY_CHARS.end(),
                history_len
            )));
        }
        Ok(())
    }

    /// Medical history text, or `None` if nothing meaningful was reported
    pub fn medical_history_text(&self) -> Option<&str> {
        self.medical_history
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

fn check_range(field: &str, value: u32, range: &RangeInclusive<u32>, unit: &str) -> Result<()> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(Error::Profile(format!(
            "{} must be between {} and {} {}, got {}",
            field,
            range.start(),
            range.end(),
            unit,
            value
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FitnessLevel, Sex};

    fn sample_profile() -> UserProfile {
        UserProfile {
            age: 34,
            sex: Sex::Female,
            height_cm: 168,
            weight_kg: 61,
            medical_history: None,
            fitness_level: FitnessLevel::Intermediate,
            workout_history: "Running twice a week".into(),
        }
    }

    #[test]
    fn test_valid_profile() {
        assert!(sample_profile().validate().is_ok());
    }

    #[test]
    fn test_rejects_underage() {
        let mut profile = sample_profile();
        profile.age = 17;
        let err = profile.validate().unwrap_err();
        assert!(matches!(err, Error::Profile(_)));
        assert!(err.to_string().contains("age must be between 18 and 100"));
    }

    #[test]
    fn test_rejects_out_of_range_body_metrics() {
        let mut profile = sample_profile();
        profile.height_cm = 6;
        assert!(profile.validate().is_err());

        let mut profile = sample_profile();
        profile.weight_kg = 301;
        assert!(profile.validate().is_err());
    }

    #[test]
    fn test_workout_history_length() {
        let mut profile = sample_profile();
        profile.workout_history = "   none   ".into();
        assert!(profile.validate().is_err());

        profile.workout_history = "x".repeat(501);
        assert!(profile.validate().is_err());

        profile.workout_history = "x".repeat(500);
        assert!(profile.validate().is_ok());
    }

    #[test]
    fn test_blank_medical_history_is_none() {
        let mut profile = sample_profile();
        profile.medical_history = Some("  ".into());
        assert_eq!(profile.medical_history_text(), None);

        profile.medical_history = Some(" Knee surgery 2019 ".into());
        assert_eq!(profile.medical_history_text(), Some("Knee surgery 2019"));
    }

    #[test]
    fn test_load_from_toml() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("profile.toml");
        std::fs::write(
            &path,
            r#"
age = 52
sex = "male"
height_cm = 180
weight_kg = 90
fitness_level = "beginner"
workout_history = "Walks the dog daily"
"#,
        )
        .unwrap();

        let profile = UserProfile::load_from(&path).unwrap();
        assert_eq!(profile.sex, Sex::Male);
        assert_eq!(profile.fitness_level, FitnessLevel::Beginner);
        assert_eq!(profile.medical_history, None);
    }

    #[test]
    fn test_load_from_rejects_unknown_level() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("profile.toml");
        std::fs::write(
            &path,
            "age = 30\nsex = \"other\"\nheight_cm = 170\nweight_kg = 70\n\
             fitness_level = \"elite\"\nworkout_history = \"Lifting four days a week\"\n",
        )
        .unwrap();

        assert!(matches!(UserProfile::load_from(&path), Err(Error::Toml(_))));
    }
}
