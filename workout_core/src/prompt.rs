//! Plan-generation prompt rendering.
//!
//! Builds the request text handed to the plan generator. The layout section
//! asks for exactly the markdown structure [`crate::parser`] understands.

use crate::UserProfile;

/// Medical history placeholder when the profile reports none
pub const NO_MEDICAL_HISTORY: &str = "No specific conditions reported.";

/// Render the plan-generation prompt for a profile
pub fn render_plan_prompt(profile: &UserProfile) -> String {
    let medical_history = profile.medical_history_text().unwrap_or(NO_MEDICAL_HISTORY);

    format!(
        "You are an AI personal trainer who generates workout plans based on a user's \
medical history, fitness level, and workout history.

The user's information is as follows:
Age: {age}
Sex: {sex}
Height: {height} cm
Weight: {weight} kg
Medical History: {medical}
Fitness Level: {level}
Workout History: {history}

Generate a workout plan that is safe and achievable for the user, taking into account \
their medical history and fitness level. Pay particular attention to the medical history \
and ensure that the workout plan does not include any exercises that could be harmful \
to the user.

The workout plan MUST be in markdown format. Include a variety of exercises targeting \
different muscle groups. For each exercise, specify the number of sets, repetitions, \
and rest time.

Use this layout:
# <plan title>
## Day 1: <focus of the day>
### <exercise name>
- Sets: <number of sets>
- Reps: <repetitions or duration>
- Rest: <rest time>
- Tips: <one short coaching cue>
",
        age = profile.age,
        sex = profile.sex,
        height = profile.height_cm,
        weight = profile.weight_kg,
        medical = medical_history,
        level = profile.fitness_level,
        history = profile.workout_history.trim(),
    )
}
