//! CSV export of saved plans.
//!
//! One row per exercise, carrying its day, prescribed details and whether
//! it has been completed. Day and exercise numbers are 1-based.

use crate::{Result, SavedPlan};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow<'a> {
    day_number: usize,
    day: &'a str,
    day_title: &'a str,
    exercise_number: usize,
    exercise: &'a str,
    sets: Option<&'a str>,
    reps: Option<&'a str>,
    rest: Option<&'a str>,
    tips: Option<&'a str>,
    completed: bool,
}

/// Write a saved plan as CSV, returning the number of exercise rows
pub fn write_csv<W: Write>(saved: &SavedPlan, out: W) -> Result<usize> {
    let mut writer = csv::Writer::from_writer(out);
    let mut rows = 0;

    for (day_idx, day) in saved.plan.days.iter().enumerate() {
        for (ex_idx, exercise) in day.exercises.iter().enumerate() {
            writer.serialize(CsvRow {
                day_number: day_idx + 1,
                day: &day.day,
                day_title: &day.title,
                exercise_number: ex_idx + 1,
                exercise: &exercise.name,
                sets: exercise.sets.as_deref(),
                reps: exercise.reps.as_deref(),
                rest: exercise.rest.as_deref(),
                tips: exercise.tips.as_deref(),
                completed: saved.is_completed(day_idx, ex_idx),
            })?;
            rows += 1;
        }
    }

    writer.flush()?;
    Ok(rows)
}

/// Export a saved plan to a CSV file, replacing it if present
pub fn export_csv(saved: &SavedPlan, path: &Path) -> Result<usize> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let file = File::create(path)?;
    let rows = write_csv(saved, &file)?;
    file.sync_all()?;

    tracing::info!("Exported {} exercises to {:?}", rows, path);
    Ok(rows)
}
