//! Markdown workout-plan parser.
//!
//! Converts the semi-structured markdown produced by the plan generator into
//! a [`WorkoutPlan`]. The grammar is line oriented:
//!
//! ```text
//! # Plan title
//! ## Day 1: Day title
//! ### Exercise name
//! - Sets: 3
//! - Reps: 10-12
//! - Rest: 60s
//! - Tips: Keep your core tight
//! ```
//!
//! Parsing is total: any input yields a plan. Content that does not fit the
//! grammar is dropped, and [`parse_report`] lists what was dropped.

use crate::{Exercise, WorkoutDay, WorkoutPlan};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Title used when the markdown has no `# ` heading
pub const DEFAULT_PLAN_TITLE: &str = "Your Personalized Workout Plan";

/// Parser behaviour switches
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseOptions {
    /// Keep `## ` headings that are not of the form `Day N`, using the raw
    /// heading text as both the day label and the day title.
    #[serde(default)]
    pub keep_unlabeled_days: bool,
}

/// Why a line of input did not make it into the plan
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// `## ` heading that does not start with `Day <number>`
    UnlabeledDayHeading(String),
    /// Exercise that was never attached to a day and was discarded
    OrphanExercise(String),
    /// Bullet line with no exercise open
    DetailWithoutExercise,
    /// Bullet line under an exercise without a `key: value` shape
    MalformedDetail,
    /// Bullet line with a key that maps to no exercise field
    UnknownDetailKey(String),
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::UnlabeledDayHeading(h) => {
                write!(f, "day heading {:?} is not of the form \"Day N\"", h)
            }
            DiagnosticKind::OrphanExercise(name) => {
                write!(f, "exercise {:?} appears before any day", name)
            }
            DiagnosticKind::DetailWithoutExercise => {
                write!(f, "detail line outside of an exercise")
            }
            DiagnosticKind::MalformedDetail => write!(f, "detail line is not \"key: value\""),
            DiagnosticKind::UnknownDetailKey(key) => write!(f, "unknown detail key {:?}", key),
        }
    }
}

/// A dropped piece of input, located by its 1-based line number
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub line: usize,
    pub kind: DiagnosticKind,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.kind)
    }
}

/// Parsed plan together with everything that was dropped on the way
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseReport {
    pub plan: WorkoutPlan,
    pub diagnostics: Vec<Diagnostic>,
}

/// Parse plan markdown with default options
pub fn parse(markdown: &str) -> WorkoutPlan {
    parse_with(markdown, &ParseOptions::default())
}

/// Parse plan markdown with explicit options
pub fn parse_with(markdown: &str, options: &ParseOptions) -> WorkoutPlan {
    parse_report(markdown, options).plan
}

/// Parse plan markdown and report every line that was dropped
pub fn parse_report(markdown: &str, options: &ParseOptions) -> ParseReport {
    let mut builder = PlanBuilder::new(options);

    for (idx, raw) in markdown.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        builder.feed(idx + 1, line);
    }

    let report = builder.finish();
    tracing::debug!(
        "Parsed workout plan {:?}: {} days, {} exercises, {} dropped lines",
        report.plan.title,
        report.plan.days.len(),
        report.plan.exercise_count(),
        report.diagnostics.len()
    );
    report
}

/// Single-pass accumulator holding the open day and open exercise
struct PlanBuilder<'a> {
    options: &'a ParseOptions,
    plan: WorkoutPlan,
    current_day: Option<WorkoutDay>,
    /// Open exercise and the line it was opened on
    current_exercise: Option<(usize, Exercise)>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> PlanBuilder<'a> {
    fn new(options: &'a ParseOptions) -> Self {
        Self {
            options,
            plan: WorkoutPlan::default(),
            current_day: None,
            current_exercise: None,
            diagnostics: Vec::new(),
        }
    }

    fn feed(&mut self, line_no: usize, line: &str) {
        if let Some(title) = line.strip_prefix("# ") {
            self.plan.title = title.trim().to_string();
        } else if let Some(heading) = line.strip_prefix("## ") {
            self.open_day(line_no, heading.trim());
        } else if let Some(name) = line.strip_prefix("### ") {
            self.open_exercise(line_no, name.trim());
        } else if let Some(detail) = line
            .strip_prefix("- ")
            .or_else(|| line.strip_prefix("* "))
        {
            self.apply_detail(line_no, detail);
        }
    }

    /// Close the open day and start a new one from a `## ` heading
    ///
    /// An exercise opened while no day was open (before the first day, or
    /// after a dropped heading such as `## Warm-up`) stays pending here and
    /// becomes the first exercise of the day this heading opens. It is only
    /// discarded if another `### ` line or the end of input closes it first.
    fn open_day(&mut self, line_no: usize, heading: &str) {
        if let Some(mut day) = self.current_day.take() {
            if let Some((_, exercise)) = self.current_exercise.take() {
                day.exercises.push(exercise);
            }
            self.plan.days.push(day);
        }

        match split_day_label(heading) {
            Some((day, title)) => {
                self.current_day = Some(WorkoutDay {
                    day,
                    title,
                    exercises: Vec::new(),
                });
            }
            None if self.options.keep_unlabeled_days => {
                self.current_day = Some(WorkoutDay {
                    day: heading.to_string(),
                    title: heading.to_string(),
                    exercises: Vec::new(),
                });
            }
            None => {
                self.report(line_no, DiagnosticKind::UnlabeledDayHeading(heading.into()));
            }
        }
    }

    fn open_exercise(&mut self, line_no: usize, name: &str) {
        self.close_exercise();
        self.current_exercise = Some((line_no, Exercise::new(name)));
    }

    /// Append the open exercise to the open day, or discard it if there is none
    fn close_exercise(&mut self) {
        let Some((opened_at, exercise)) = self.current_exercise.take() else {
            return;
        };
        match self.current_day.as_mut() {
            Some(day) => day.exercises.push(exercise),
            None => self.report(opened_at, DiagnosticKind::OrphanExercise(exercise.name)),
        }
    }

    fn apply_detail(&mut self, line_no: usize, detail: &str) {
        let Some((_, exercise)) = self.current_exercise.as_mut() else {
            self.report(line_no, DiagnosticKind::DetailWithoutExercise);
            return;
        };

        let Some((key, value)) = detail.split_once(':') else {
            self.report(line_no, DiagnosticKind::MalformedDetail);
            return;
        };
        let key = key.trim().to_lowercase();
        let value = value.trim();
        if key.is_empty() || value.is_empty() {
            self.report(line_no, DiagnosticKind::MalformedDetail);
            return;
        }

        let field = match key.as_str() {
            "sets" => &mut exercise.sets,
            "reps" | "repetitions" => &mut exercise.reps,
            "rest" => &mut exercise.rest,
            "tips" | "note" => &mut exercise.tips,
            _ => {
                self.report(line_no, DiagnosticKind::UnknownDetailKey(key));
                return;
            }
        };
        *field = Some(value.to_string());
    }

    /// Every dropped line goes through here
    fn report(&mut self, line: usize, kind: DiagnosticKind) {
        tracing::trace!("Dropped line {}: {}", line, kind);
        self.diagnostics.push(Diagnostic { line, kind });
    }

    fn finish(mut self) -> ParseReport {
        self.close_exercise();
        if let Some(day) = self.current_day.take() {
            self.plan.days.push(day);
        }
        self.diagnostics.sort_by_key(|d| d.line);
        ParseReport {
            plan: self.plan,
            diagnostics: self.diagnostics,
        }
    }
}

/// Split `Day <digits>[:] <rest>` into its label and title
fn split_day_label(heading: &str) -> Option<(String, String)> {
    let rest = heading.strip_prefix("Day ")?;
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let (number, tail) = rest.split_at(digits);
    let tail = tail.strip_prefix(':').unwrap_or(tail).trim();
    Some((format!("Day {}", number), tail.to_string()))
}
